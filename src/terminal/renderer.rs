use crate::presenter::{OverlayCommand, OverlayElement, OverlayRenderer};
use tracing::{debug, info};

/// Overlay renderer that writes the overlay as log lines
#[derive(Debug, Default)]
pub struct LogRenderer {
    instructions: String,
    diagnostics: Vec<String>,
    sound_notice: Option<bool>,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn describe(&self, element: OverlayElement) -> String {
        match element {
            OverlayElement::Instructions => self.instructions.clone(),
            OverlayElement::SoundNotice => match self.sound_notice {
                Some(true) => "Sound off".to_string(),
                Some(false) => "Sound on".to_string(),
                None => String::new(),
            },
            OverlayElement::LoadingNotice => "Loading next video...".to_string(),
            OverlayElement::Buttons => "[next] [info] [link]".to_string(),
            OverlayElement::InfoPanel => "About this reel".to_string(),
            OverlayElement::Diagnostics => self.diagnostics.join(" | "),
        }
    }
}

impl OverlayRenderer for LogRenderer {
    fn apply(&mut self, command: OverlayCommand) {
        match command {
            OverlayCommand::Show(element) => {
                info!(target: "dreamreel::ui", "Show {}: {}", element, self.describe(element));
            }
            OverlayCommand::Hide(element) => {
                debug!(target: "dreamreel::ui", "Hide {}", element);
            }
            OverlayCommand::SetInstructions(text) => self.instructions = text,
            OverlayCommand::SetSoundNotice { muted } => self.sound_notice = Some(muted),
            OverlayCommand::SetSoundLabel { muted } => {
                debug!(target: "dreamreel::ui", "Sound label: {}", if muted { "off" } else { "on" });
            }
            OverlayCommand::SetLiveFields(fields) => {
                debug!(
                    target: "dreamreel::ui",
                    "Live fields: index={:?} total={} muted={}",
                    fields.index, fields.total, fields.muted
                );
            }
            OverlayCommand::SetDiagnostics(fields) => self.diagnostics = fields.lines(),
            OverlayCommand::SetFullscreen(enabled) => {
                info!(
                    target: "dreamreel::ui",
                    "Fullscreen {}", if enabled { "entered" } else { "exited" }
                );
            }
            OverlayCommand::OpenLink(url) => {
                info!(target: "dreamreel::ui", "Opening external link: {}", url);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_uses_latest_text() {
        let mut renderer = LogRenderer::new();
        renderer.apply(OverlayCommand::SetInstructions("Double-click for next".to_string()));
        renderer.apply(OverlayCommand::SetSoundNotice { muted: false });

        assert_eq!(
            renderer.describe(OverlayElement::Instructions),
            "Double-click for next"
        );
        assert_eq!(renderer.describe(OverlayElement::SoundNotice), "Sound on");

        renderer.apply(OverlayCommand::Show(OverlayElement::Instructions));
        renderer.apply(OverlayCommand::Hide(OverlayElement::Instructions));
    }
}
