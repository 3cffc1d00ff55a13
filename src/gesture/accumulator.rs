use super::types::InputModality;
use crate::debounce::{earliest, Debounce};
use std::time::Duration;
use tokio::time::Instant;

/// Transient record of one gesture sequence, from its first input until it
/// resolves to a command or is abandoned
#[derive(Debug, Clone)]
pub struct GestureAccumulator {
    pub modality: InputModality,
    /// Clicks or taps counted so far
    pub repetitions: u32,
    /// Running maximum of concurrent touch points across the whole sequence
    pub max_fingers: u32,
    /// Touch points currently down
    pub points_down: u32,
    /// Start of the current contact, set on every press
    pub contact_started_at: Option<Instant>,
    /// A command was already emitted; remaining input is swallowed until release
    pub resolved: bool,
    pub repetition_timer: Debounce,
    pub finger_timer: Debounce,
}

impl GestureAccumulator {
    pub fn pointer() -> Self {
        Self::new(InputModality::Pointer, 0)
    }

    /// Start a touch sequence and open the multi-finger detection window
    pub fn touch(now: Instant, points: u32, detect_window: Duration) -> Self {
        let mut accumulator = Self::new(InputModality::Touch, points);
        accumulator.contact_started_at = Some(now);
        accumulator.finger_timer.arm(now, detect_window);
        accumulator
    }

    fn new(modality: InputModality, points: u32) -> Self {
        Self {
            modality,
            repetitions: 0,
            max_fingers: points,
            points_down: points,
            contact_started_at: None,
            resolved: false,
            repetition_timer: Debounce::new(),
            finger_timer: Debounce::new(),
        }
    }

    /// Record a touch point count; returns true when the sequence just became
    /// a multi-finger gesture
    pub fn observe_points(&mut self, points: u32) -> bool {
        self.points_down = points;
        let was_multi = self.is_multi_finger();
        self.max_fingers = self.max_fingers.max(points);
        !was_multi && self.is_multi_finger()
    }

    pub fn is_multi_finger(&self) -> bool {
        self.max_fingers >= 2
    }

    pub fn contact_open(&self) -> bool {
        self.points_down > 0
    }

    /// Drop any pending click/tap classification for this sequence
    pub fn suppress_taps(&mut self) {
        self.repetitions = 0;
        self.repetition_timer.cancel();
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        earliest([
            self.repetition_timer.deadline(),
            self.finger_timer.deadline(),
        ])
    }
}
