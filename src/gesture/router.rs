use super::classifier::GestureClassifier;
use super::types::{ControlAction, GestureCommand, HitRegion, InputEvent, KeyInput, Routed};
use crate::device::DeviceClass;
use tokio::time::Instant;
use tracing::{debug, info};

/// Front door for raw host input.
///
/// Presses on the on-screen controls go straight to their own actions; only
/// input on the video surface reaches the gesture classifier.
#[derive(Debug)]
pub struct InputRouter {
    classifier: GestureClassifier,
    device_class: DeviceClass,
    /// A touch sequence began on a control and has not fully lifted yet
    control_contact: bool,
}

impl InputRouter {
    pub fn new(classifier: GestureClassifier, device_class: DeviceClass) -> Self {
        Self {
            classifier,
            device_class,
            control_contact: false,
        }
    }

    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    pub fn device_class(&self) -> DeviceClass {
        self.device_class
    }

    pub fn route(&mut self, event: InputEvent, now: Instant) -> Option<Routed> {
        match event {
            InputEvent::PointerClick { modifier, region } => {
                if self.device_class == DeviceClass::Touch {
                    // Touch devices synthesize clicks after touchend.
                    debug!(target: "dreamreel::input", "Ignoring synthesized click on touch device");
                    return None;
                }
                if region.is_control() {
                    return Self::control_for(region).map(Routed::Control);
                }
                self.classifier.on_click(modifier, now).map(Routed::Command)
            }
            InputEvent::TouchStart { points, region } => {
                if region.is_control() {
                    self.control_contact = true;
                    return None;
                }
                self.classifier.on_primary_input_down(points, now);
                None
            }
            InputEvent::TouchMove { points } => {
                if self.control_contact {
                    return None;
                }
                self.classifier.on_primary_input_move(points);
                None
            }
            InputEvent::TouchEnd { remaining, region } => {
                if region.is_control() || self.control_contact {
                    if remaining == 0 {
                        self.control_contact = false;
                    }
                    return Self::control_for(region).map(Routed::Control);
                }
                self.classifier
                    .on_primary_input_up(remaining, now)
                    .map(Routed::Command)
            }
            InputEvent::Key(KeyInput::Escape) | InputEvent::Key(KeyInput::Char('q')) => {
                info!(target: "dreamreel::input", "Quit key pressed");
                Some(Routed::Shutdown)
            }
            InputEvent::Key(key) => self.classifier.on_key(key).map(Routed::Command),
        }
    }

    pub fn poll(&mut self, now: Instant) -> Vec<GestureCommand> {
        self.classifier.poll(now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.classifier.next_deadline()
    }

    fn control_for(region: HitRegion) -> Option<ControlAction> {
        match region {
            HitRegion::Surface => None,
            HitRegion::AdvanceButton => Some(ControlAction::Advance),
            HitRegion::InfoButton => Some(ControlAction::ToggleInfoPanel),
            HitRegion::ExternalLinkButton => Some(ControlAction::OpenExternalLink),
            HitRegion::InfoPanel => Some(ControlAction::CloseInfoPanel),
        }
    }
}
