mod overlay;
mod renderer;
#[cfg(test)]
mod tests;

pub use overlay::{instruction_text, OverlayPresenter, PresenterTiming};
pub use renderer::{
    DiagnosticsFields, LiveFields, OverlayCommand, OverlayElement, OverlayRenderer,
    RecordingRenderer,
};
