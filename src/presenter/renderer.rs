use crate::device::DeviceClass;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OverlayElement {
    Instructions,
    SoundNotice,
    LoadingNotice,
    /// Advance, info and external-link buttons
    Buttons,
    InfoPanel,
    Diagnostics,
}

impl fmt::Display for OverlayElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OverlayElement::Instructions => "instructions",
            OverlayElement::SoundNotice => "sound_notice",
            OverlayElement::LoadingNotice => "loading_notice",
            OverlayElement::Buttons => "buttons",
            OverlayElement::InfoPanel => "info_panel",
            OverlayElement::Diagnostics => "diagnostics",
        };
        write!(f, "{}", name)
    }
}

/// Values refreshed opportunistically while the session runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveFields {
    /// 0-based index of the visible video
    pub index: Option<usize>,
    pub total: usize,
    pub muted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticsFields {
    pub device_class: DeviceClass,
    pub index: Option<usize>,
    pub total: usize,
    pub muted: bool,
    pub stored_count: Option<u32>,
    pub failed_count: usize,
    pub version: String,
    pub session_started: DateTime<Utc>,
}

impl DiagnosticsFields {
    pub fn with_live(&self, live: &LiveFields) -> Self {
        Self {
            index: live.index,
            total: live.total,
            muted: live.muted,
            ..self.clone()
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let position = match self.index {
            Some(index) => format!("{}/{}", index + 1, self.total),
            None => format!("-/{}", self.total),
        };
        vec![
            format!("Device: {}", self.device_class),
            format!("Video: {}", position),
            format!("Sound: {}", if self.muted { "off" } else { "on" }),
            format!(
                "Stored count: {}",
                self.stored_count
                    .map_or_else(|| "none".to_string(), |count| count.to_string())
            ),
            format!("Failed sources: {}", self.failed_count),
            format!("Version: {}", self.version),
            format!("Session: {}", self.session_started.format("%Y-%m-%d %H:%M:%S UTC")),
        ]
    }
}

/// Presentation command for the rendering layer
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayCommand {
    Show(OverlayElement),
    Hide(OverlayElement),
    SetInstructions(String),
    SetSoundNotice { muted: bool },
    /// Persistent sound-state label, always kept current
    SetSoundLabel { muted: bool },
    SetLiveFields(LiveFields),
    SetDiagnostics(DiagnosticsFields),
    SetFullscreen(bool),
    OpenLink(String),
}

/// Rendering layer that draws the overlay; owns no playback state
pub trait OverlayRenderer: Send {
    fn apply(&mut self, command: OverlayCommand);
}

/// Renderer that records every command; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    commands: Arc<Mutex<Vec<OverlayCommand>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<OverlayCommand> {
        self.commands.lock().clone()
    }

    pub fn clear(&self) {
        self.commands.lock().clear();
    }

    pub fn count(&self, command: &OverlayCommand) -> usize {
        self.commands.lock().iter().filter(|c| *c == command).count()
    }

    pub fn contains(&self, command: &OverlayCommand) -> bool {
        self.count(command) > 0
    }
}

impl OverlayRenderer for RecordingRenderer {
    fn apply(&mut self, command: OverlayCommand) {
        self.commands.lock().push(command);
    }
}
