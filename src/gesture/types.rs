use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic commands a gesture or key press resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureCommand {
    ToggleMute,
    Advance,
    ToggleFullscreen,
    /// Two or more fingers on a touch surface
    ShowDiagnostics,
    /// Dedicated diagnostics key
    ToggleDiagnostics,
}

impl fmt::Display for GestureCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GestureCommand::ToggleMute => "toggle mute",
            GestureCommand::Advance => "advance",
            GestureCommand::ToggleFullscreen => "toggle fullscreen",
            GestureCommand::ShowDiagnostics => "show diagnostics",
            GestureCommand::ToggleDiagnostics => "toggle diagnostics",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputModality {
    Pointer,
    Touch,
}

/// Where on the page an input landed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HitRegion {
    /// The video surface itself; the only region gestures are classified on
    #[default]
    Surface,
    AdvanceButton,
    InfoButton,
    ExternalLinkButton,
    InfoPanel,
}

impl HitRegion {
    pub fn is_control(&self) -> bool {
        !matches!(self, HitRegion::Surface)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Space,
    Char(char),
    Escape,
    Other,
}

/// Raw input delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    PointerClick {
        /// Ctrl, Cmd or the platform equivalent was held
        modifier: bool,
        region: HitRegion,
    },
    TouchStart {
        /// Touch points currently on the surface
        points: u32,
        region: HitRegion,
    },
    TouchMove {
        points: u32,
    },
    TouchEnd {
        /// Touch points still on the surface after this release
        remaining: u32,
        region: HitRegion,
    },
    Key(KeyInput),
}

impl InputEvent {
    pub fn click() -> Self {
        InputEvent::PointerClick {
            modifier: false,
            region: HitRegion::Surface,
        }
    }

    pub fn touch_start(points: u32) -> Self {
        InputEvent::TouchStart {
            points,
            region: HitRegion::Surface,
        }
    }

    pub fn touch_end(remaining: u32) -> Self {
        InputEvent::TouchEnd {
            remaining,
            region: HitRegion::Surface,
        }
    }
}

/// Actions of the on-screen controls, which bypass gesture classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Advance,
    ToggleInfoPanel,
    CloseInfoPanel,
    OpenExternalLink,
}

/// What a single input resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    Command(GestureCommand),
    Control(ControlAction),
    Shutdown,
}
