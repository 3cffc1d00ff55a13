use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotId {
    A,
    B,
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotId::A => write!(f, "A"),
            SlotId::B => write!(f, "B"),
        }
    }
}

/// Controller-side view of one of the two video surfaces
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSlot {
    pub id: SlotId,
    /// Unset until the slot receives its first source
    pub source: Option<String>,
    pub muted: bool,
    pub opacity: f32,
    pub playing: bool,
}

impl PlaybackSlot {
    pub fn new(id: SlotId, visible: bool) -> Self {
        Self {
            id,
            source: None,
            // Autoplay is only allowed for muted media.
            muted: true,
            opacity: if visible { 1.0 } else { 0.0 },
            playing: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }

    /// File name portion of the source URL, for logs
    pub fn source_name(&self) -> Option<&str> {
        self.source.as_deref().map(source_file_name)
    }
}

pub fn source_file_name(url: &str) -> &str {
    let name = url.rsplit('/').next().unwrap_or(url);
    name.split('?').next().unwrap_or(name)
}
