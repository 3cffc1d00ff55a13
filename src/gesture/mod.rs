mod accumulator;
mod classifier;
mod router;
mod types;
#[cfg(test)]
mod tests;

pub use accumulator::GestureAccumulator;
pub use classifier::{ClassifierState, GestureClassifier, GestureTiming};
pub use router::InputRouter;
pub use types::{
    ControlAction, GestureCommand, HitRegion, InputEvent, InputModality, KeyInput, Routed,
};
