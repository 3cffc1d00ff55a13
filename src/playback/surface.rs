use super::slot::SlotId;
use crate::error::MediaError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rendering layer that owns the two video elements.
///
/// Setters apply immediately. `load` and `play` are the two independent
/// suspension points of a transition and may each fail.
#[async_trait]
pub trait VideoSurface: Send + Sync {
    fn set_source(&self, slot: SlotId, url: &str);
    fn set_muted(&self, slot: SlotId, muted: bool);
    fn set_opacity(&self, slot: SlotId, opacity: f32);
    fn pause(&self, slot: SlotId);

    async fn load(&self, slot: SlotId) -> Result<(), MediaError>;
    async fn play(&self, slot: SlotId) -> Result<(), MediaError>;

    /// Resume a suspended platform audio context; `Ok(false)` when the host has none
    async fn resume_audio(&self) -> Result<bool, MediaError> {
        Ok(false)
    }
}

/// Identifies one transition attempt; completions carrying an older ticket are stale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransitionTicket(pub u64);

impl fmt::Display for TransitionTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Asynchronous surface work requested by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaTask {
    Load {
        ticket: TransitionTicket,
        slot: SlotId,
    },
    Play {
        ticket: TransitionTicket,
        slot: SlotId,
    },
    /// Restart a paused active slot after unmuting
    Resume { slot: SlotId },
    ResumeAudio,
}

/// Completion of a [`MediaTask`], fed back to the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaOutcome {
    Loaded {
        ticket: TransitionTicket,
        result: Result<(), MediaError>,
    },
    Played {
        ticket: TransitionTicket,
        result: Result<(), MediaError>,
    },
    Resumed {
        slot: SlotId,
        result: Result<(), MediaError>,
    },
    AudioResumed {
        result: Result<bool, MediaError>,
    },
    /// The surface paused a slot on its own, outside any task
    Paused { slot: SlotId },
}

impl MediaTask {
    /// Run the task against a surface and package its completion
    pub async fn execute(self, surface: &dyn VideoSurface) -> MediaOutcome {
        match self {
            MediaTask::Load { ticket, slot } => MediaOutcome::Loaded {
                ticket,
                result: surface.load(slot).await,
            },
            MediaTask::Play { ticket, slot } => MediaOutcome::Played {
                ticket,
                result: surface.play(slot).await,
            },
            MediaTask::Resume { slot } => MediaOutcome::Resumed {
                slot,
                result: surface.play(slot).await,
            },
            MediaTask::ResumeAudio => MediaOutcome::AudioResumed {
                result: surface.resume_audio().await,
            },
        }
    }
}
