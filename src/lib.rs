pub mod app;
pub mod config;
pub mod counters;
pub mod debounce;
pub mod device;
pub mod error;
pub mod events;
pub mod gesture;
pub mod playback;
pub mod playlist;
pub mod presenter;
pub mod terminal;

pub use app::{
    ComponentState, HostHandle, ReelOrchestrator, ReelOrchestratorBuilder, ReelSession,
    ShutdownReason,
};
pub use config::ReelConfig;
pub use counters::SessionCounters;
pub use debounce::Debounce;
pub use device::{DeviceClass, ModifierConvention};
pub use error::{MediaError, PlaylistError, ReelError, Result};
pub use events::{EventBus, EventFilter, EventReceiver, ReelEvent};
pub use gesture::{GestureClassifier, GestureCommand, InputEvent, InputRouter};
pub use playback::{PlaybackController, SlotId, TransitionState, VideoSurface};
pub use playlist::{Playlist, PlaylistProvider};
pub use presenter::{OverlayPresenter, OverlayRenderer};
