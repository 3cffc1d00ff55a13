use crate::gesture::InputEvent;
use crate::playback::{MediaOutcome, MediaTask};
use std::fmt;

/// Component lifecycle states
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentState {
    Stopped,
    Starting,
    Running,
    Stopping,
    /// Running without a usable playlist
    Degraded,
}

/// System shutdown reason
#[derive(Debug, Clone, PartialEq)]
pub enum ShutdownReason {
    Signal(String),
    Error(String),
    UserRequest,
    /// Every host sender was dropped
    HostClosed,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownReason::Signal(signal) => write!(f, "signal {}", signal),
            ShutdownReason::Error(error) => write!(f, "error: {}", error),
            ShutdownReason::UserRequest => write!(f, "user request"),
            ShutdownReason::HostClosed => write!(f, "host closed"),
        }
    }
}

/// Everything the runtime loop consumes besides timers
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Input(InputEvent),
    Media(MediaOutcome),
    Shutdown(ShutdownReason),
}

/// Work a session step asks the host to carry out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects {
    pub tasks: Vec<MediaTask>,
    pub shutdown: bool,
}

impl Effects {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn task(task: MediaTask) -> Self {
        Self {
            tasks: vec![task],
            shutdown: false,
        }
    }

    pub fn shutdown() -> Self {
        Self {
            tasks: Vec::new(),
            shutdown: true,
        }
    }

    pub fn merge(&mut self, other: Effects) {
        self.tasks.extend(other.tasks);
        self.shutdown |= other.shutdown;
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && !self.shutdown
    }
}
