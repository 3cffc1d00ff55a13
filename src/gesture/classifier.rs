use super::accumulator::GestureAccumulator;
use super::types::{GestureCommand, KeyInput};
use crate::config::TimingConfig;
use crate::debounce::earliest;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// Windows used to disambiguate gestures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureTiming {
    pub click_coalesce: Duration,
    pub tap_max_duration: Duration,
    pub multi_finger_detect: Duration,
}

impl From<&TimingConfig> for GestureTiming {
    fn from(config: &TimingConfig) -> Self {
        Self {
            click_coalesce: config.click_coalesce(),
            tap_max_duration: config.tap_max_duration(),
            multi_finger_detect: config.multi_finger_detect(),
        }
    }
}

impl Default for GestureTiming {
    fn default() -> Self {
        Self::from(&crate::config::ReelConfig::default().timing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierState {
    Idle,
    Accumulating,
}

/// Turns clicks, touches and key presses into at most one command per gesture.
///
/// Pointer and touch sequences are tracked independently. Commands are
/// returned either directly from an input method or from [`poll`] once a
/// debounce window has elapsed.
///
/// [`poll`]: GestureClassifier::poll
#[derive(Debug)]
pub struct GestureClassifier {
    timing: GestureTiming,
    pointer: Option<GestureAccumulator>,
    touch: Option<GestureAccumulator>,
}

impl GestureClassifier {
    pub fn new(timing: GestureTiming) -> Self {
        Self {
            timing,
            pointer: None,
            touch: None,
        }
    }

    pub fn timing(&self) -> GestureTiming {
        self.timing
    }

    pub fn state(&self) -> ClassifierState {
        if self.pointer.is_some() || self.touch.is_some() {
            ClassifierState::Accumulating
        } else {
            ClassifierState::Idle
        }
    }

    pub fn touch_accumulator(&self) -> Option<&GestureAccumulator> {
        self.touch.as_ref()
    }

    pub fn pointer_accumulator(&self) -> Option<&GestureAccumulator> {
        self.pointer.as_ref()
    }

    /// A touch point went down; `points` is the number now on the surface
    pub fn on_primary_input_down(&mut self, points: u32, now: Instant) {
        match self.touch.as_mut() {
            None => {
                debug!(target: "dreamreel::input", "Touch gesture started with {} point(s)", points);
                self.touch = Some(GestureAccumulator::touch(
                    now,
                    points,
                    self.timing.multi_finger_detect,
                ));
            }
            Some(accumulator) => {
                if !accumulator.contact_open() && !accumulator.resolved {
                    accumulator
                        .finger_timer
                        .arm(now, self.timing.multi_finger_detect);
                }
                accumulator.contact_started_at = Some(now);
                if accumulator.observe_points(points) {
                    debug!(target: "dreamreel::input", "Multi-finger gesture, suppressing taps");
                    accumulator.suppress_taps();
                }
            }
        }
    }

    /// Touch points moved; only the finger count matters and no timer restarts
    pub fn on_primary_input_move(&mut self, points: u32) {
        if let Some(accumulator) = self.touch.as_mut() {
            if accumulator.observe_points(points) {
                debug!(target: "dreamreel::input", "Multi-finger gesture, suppressing taps");
                accumulator.suppress_taps();
            }
        }
    }

    /// A touch point lifted; `remaining` points are still down
    pub fn on_primary_input_up(&mut self, remaining: u32, now: Instant) -> Option<GestureCommand> {
        let timing = self.timing;
        let accumulator = self.touch.as_mut()?;
        accumulator.points_down = remaining;
        if remaining > 0 {
            return None;
        }

        accumulator.finger_timer.cancel();

        if accumulator.resolved {
            self.touch = None;
            return None;
        }

        if accumulator.is_multi_finger() {
            info!(
                target: "dreamreel::input",
                "{}-finger gesture detected - show diagnostics",
                accumulator.max_fingers
            );
            self.touch = None;
            return Some(GestureCommand::ShowDiagnostics);
        }

        let duration = accumulator
            .contact_started_at
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default();

        if duration < timing.tap_max_duration {
            accumulator.repetitions += 1;
            if accumulator.repetitions >= 2 {
                info!(target: "dreamreel::input", "Double tap detected - advance");
                self.touch = None;
                return Some(GestureCommand::Advance);
            }
            accumulator.repetition_timer.arm(now, timing.click_coalesce);
            debug!(target: "dreamreel::input", "Tap registered, waiting for a second tap");
        } else if accumulator.repetitions == 0 {
            debug!(
                target: "dreamreel::input",
                "Press held for {:?}, not a tap", duration
            );
            self.touch = None;
        }

        None
    }

    /// A pointer click on the surface
    pub fn on_click(&mut self, with_modifier: bool, now: Instant) -> Option<GestureCommand> {
        if with_modifier {
            info!(target: "dreamreel::input", "Modifier click detected - toggle fullscreen");
            self.pointer = None;
            return Some(GestureCommand::ToggleFullscreen);
        }

        let accumulator = self
            .pointer
            .get_or_insert_with(GestureAccumulator::pointer);
        accumulator.repetitions += 1;

        if accumulator.repetitions >= 3 {
            info!(target: "dreamreel::input", "Triple click detected - toggle fullscreen");
            self.pointer = None;
            return Some(GestureCommand::ToggleFullscreen);
        }

        accumulator
            .repetition_timer
            .arm(now, self.timing.click_coalesce);
        None
    }

    /// Keys map directly to commands without any counting
    pub fn on_key(&mut self, key: KeyInput) -> Option<GestureCommand> {
        match key {
            KeyInput::Space => {
                info!(target: "dreamreel::input", "Space key pressed - toggle mute");
                Some(GestureCommand::ToggleMute)
            }
            KeyInput::Char('i') | KeyInput::Char('I') => {
                info!(target: "dreamreel::input", "Info key pressed - toggle diagnostics");
                Some(GestureCommand::ToggleDiagnostics)
            }
            _ => None,
        }
    }

    /// Resolve every debounce window that has elapsed by `now`
    pub fn poll(&mut self, now: Instant) -> Vec<GestureCommand> {
        let mut commands = Vec::new();

        if let Some(command) = self.poll_pointer(now) {
            commands.push(command);
        }
        if let Some(command) = self.poll_touch(now) {
            commands.push(command);
        }

        commands
    }

    fn poll_pointer(&mut self, now: Instant) -> Option<GestureCommand> {
        let accumulator = self.pointer.as_mut()?;
        if !accumulator.repetition_timer.fire(now) {
            return None;
        }

        let clicks = accumulator.repetitions;
        self.pointer = None;
        match clicks {
            1 => {
                info!(target: "dreamreel::input", "Single click detected - toggle mute");
                Some(GestureCommand::ToggleMute)
            }
            2 => {
                info!(target: "dreamreel::input", "Double click detected - advance");
                Some(GestureCommand::Advance)
            }
            _ => None,
        }
    }

    fn poll_touch(&mut self, now: Instant) -> Option<GestureCommand> {
        let timing = self.timing;
        let accumulator = self.touch.as_mut()?;

        if accumulator.finger_timer.fire(now)
            && accumulator.is_multi_finger()
            && !accumulator.resolved
        {
            info!(
                target: "dreamreel::input",
                "{}-finger gesture held - show diagnostics",
                accumulator.max_fingers
            );
            accumulator.resolved = true;
            accumulator.suppress_taps();
            return Some(GestureCommand::ShowDiagnostics);
        }

        if !accumulator.repetition_timer.fire(now) {
            return None;
        }

        let command = if accumulator.repetitions == 1 && !accumulator.is_multi_finger() {
            info!(target: "dreamreel::input", "Single tap detected - toggle mute");
            Some(GestureCommand::ToggleMute)
        } else {
            None
        };

        if accumulator.contact_open() {
            // The press still down starts the next sequence.
            let mut next = GestureAccumulator::touch(
                now,
                accumulator.points_down,
                timing.multi_finger_detect,
            );
            next.contact_started_at = accumulator.contact_started_at;
            self.touch = Some(next);
        } else {
            self.touch = None;
        }

        command
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        earliest([
            self.pointer.as_ref().and_then(|a| a.next_deadline()),
            self.touch.as_ref().and_then(|a| a.next_deadline()),
        ])
    }

    /// Abandon any sequence in progress without emitting anything
    pub fn reset(&mut self) {
        self.pointer = None;
        self.touch = None;
    }
}
