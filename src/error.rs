use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReelError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Playlist error: {0}")]
    Playlist(#[from] PlaylistError),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Event bus error: {0}")]
    EventBus(#[from] EventBusError),

    #[error("System error: {message}")]
    System { message: String },

    #[error("Component error in {component}: {message}")]
    Component { component: String, message: String },
}

impl ReelError {
    pub fn system<S: Into<String>>(message: S) -> Self {
        Self::System {
            message: message.into(),
        }
    }

    pub fn component<S: Into<String>>(component: S, message: S) -> Self {
        Self::Component {
            component: component.into(),
            message: message.into(),
        }
    }
}

/// Failures reported by a video surface. None of these are fatal to the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    #[error("Failed to load {source_url}: {details}")]
    LoadFailed { source_url: String, details: String },

    #[error("Playback rejected: {details}")]
    PlayRejected { details: String },

    #[error("Audio context could not be resumed: {details}")]
    AudioResume { details: String },

    #[error("Slot {slot} has no source assigned")]
    NoSource { slot: String },
}

#[derive(Error, Debug)]
pub enum PlaylistError {
    #[error("No sources available for {device}")]
    Empty { device: String },

    #[error("Invalid catalog base URL '{url}': {details}")]
    InvalidBaseUrl { url: String, details: String },

    #[error("Catalog store error: {details}")]
    Store { details: String },
}

#[derive(Error, Debug)]
pub enum EventBusError {
    #[error("Failed to publish event: {details}")]
    PublishFailed { details: String },

    #[error("Receiver lagged behind by {0} events")]
    Lagged(u64),

    #[error("Event channel closed")]
    ChannelClosed,
}

pub type Result<T> = std::result::Result<T, ReelError>;
