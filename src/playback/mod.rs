mod controller;
mod mock;
mod selection;
mod slot;
mod surface;

pub use controller::{
    AdvanceOutcome, FailurePolicy, MuteOutcome, PlaybackController, StartedTransition,
    TransitionState, TransitionStep,
};
pub use mock::{MockVideoSurface, SurfaceCall};
pub use selection::SourceSelector;
pub use slot::{source_file_name, PlaybackSlot, SlotId};
pub use surface::{MediaOutcome, MediaTask, TransitionTicket, VideoSurface};
