//! Terminal host: drives a session from a TTY with a headless video surface.

mod input;
mod renderer;
mod surface;

pub use input::{translate, TerminalInput};
pub use renderer::LogRenderer;
pub use surface::SimulatedSurface;
