use super::renderer::{DiagnosticsFields, LiveFields, OverlayCommand, OverlayElement, OverlayRenderer};
use crate::config::{DiagnosticsMode, ReelConfig, TimingConfig};
use crate::counters::SessionCounters;
use crate::debounce::{earliest, Debounce};
use crate::device::{DeviceClass, ModifierConvention};
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenterTiming {
    pub overlay_auto_hide: Duration,
    pub notice_auto_hide: Duration,
    pub diagnostics_auto_hide: Duration,
    pub initial_instructions_delay: Duration,
}

impl From<&TimingConfig> for PresenterTiming {
    fn from(config: &TimingConfig) -> Self {
        Self {
            overlay_auto_hide: config.overlay_auto_hide(),
            notice_auto_hide: config.notice_auto_hide(),
            diagnostics_auto_hide: config.diagnostics_auto_hide(),
            initial_instructions_delay: config.initial_instructions_delay(),
        }
    }
}

/// Control hint for the device class and modifier naming
pub fn instruction_text(device: DeviceClass, modifier: ModifierConvention) -> String {
    match device {
        DeviceClass::Touch => "One Tap / Sound On / Two Taps / Next One".to_string(),
        DeviceClass::Pointer => format!(
            "One Click Sound On / Two Clicks Next One / {} + Click Full Screen",
            modifier.label()
        ),
    }
}

/// Decides what the overlay shows and for how long.
///
/// Every auto-hide purpose owns one [`Debounce`]; showing an element again
/// re-arms its timer instead of stacking a second one.
pub struct OverlayPresenter {
    renderer: Box<dyn OverlayRenderer>,
    device_class: DeviceClass,
    modifier: ModifierConvention,
    timing: PresenterTiming,
    sound_notice_cap: u32,
    loading_notice_cap: u32,
    diagnostics_mode: DiagnosticsMode,
    visible: HashSet<OverlayElement>,
    fullscreen: bool,
    diagnostics: Option<DiagnosticsFields>,
    initial_timer: Debounce,
    instructions_timer: Debounce,
    buttons_timer: Debounce,
    sound_timer: Debounce,
    loading_timer: Debounce,
    diagnostics_timer: Debounce,
}

impl OverlayPresenter {
    pub fn new(renderer: Box<dyn OverlayRenderer>, device_class: DeviceClass, config: &ReelConfig) -> Self {
        Self {
            renderer,
            device_class,
            modifier: ModifierConvention::resolve(config.presenter.modifier),
            timing: PresenterTiming::from(&config.timing),
            sound_notice_cap: config.presenter.sound_notice_cap,
            loading_notice_cap: config.presenter.loading_notice_cap,
            diagnostics_mode: config.presenter.diagnostics_mode,
            visible: HashSet::new(),
            fullscreen: false,
            diagnostics: None,
            initial_timer: Debounce::new(),
            instructions_timer: Debounce::new(),
            buttons_timer: Debounce::new(),
            sound_timer: Debounce::new(),
            loading_timer: Debounce::new(),
            diagnostics_timer: Debounce::new(),
        }
    }

    pub fn instruction_text(&self) -> String {
        instruction_text(self.device_class, self.modifier)
    }

    pub fn schedule_initial_instructions(&mut self, now: Instant) {
        self.initial_timer
            .arm(now, self.timing.initial_instructions_delay);
    }

    pub fn show_instructions(&mut self, now: Instant, counters: &mut SessionCounters) {
        counters.mark_initial_instructions_shown();
        let text = self.instruction_text();
        info!(target: "dreamreel::ui", "Showing instructions: {}", text);

        self.renderer.apply(OverlayCommand::SetInstructions(text));
        self.show(OverlayElement::Instructions);
        self.instructions_timer.arm(now, self.timing.overlay_auto_hide);

        if !self.fullscreen && !self.is_visible(OverlayElement::InfoPanel) {
            self.show(OverlayElement::Buttons);
            self.buttons_timer.arm(now, self.timing.overlay_auto_hide);
        }
    }

    /// Re-render the hint text; a visible hint gets a fresh hide deadline
    pub fn refresh_instructions(&mut self, now: Instant) {
        self.renderer
            .apply(OverlayCommand::SetInstructions(self.instruction_text()));
        if self.is_visible(OverlayElement::Instructions) {
            self.instructions_timer.arm(now, self.timing.overlay_auto_hide);
        }
    }

    pub fn show_sound_state(&mut self, now: Instant, muted: bool, counters: &SessionCounters) {
        self.renderer.apply(OverlayCommand::SetSoundLabel { muted });
        self.hide_loading();

        if self.fullscreen {
            debug!(target: "dreamreel::ui", "Sound notice suppressed in fullscreen");
            return;
        }

        if counters.sound_notice_allowed(self.sound_notice_cap) {
            self.renderer.apply(OverlayCommand::SetSoundNotice { muted });
            self.show(OverlayElement::SoundNotice);
            self.sound_timer.arm(now, self.timing.notice_auto_hide);
        } else {
            debug!(
                target: "dreamreel::ui",
                "Sound notice capped after {} toggles", self.sound_notice_cap
            );
        }

        if !self.is_visible(OverlayElement::InfoPanel) {
            self.show(OverlayElement::Buttons);
            self.buttons_timer.arm(now, self.timing.notice_auto_hide);
        }
    }

    /// A user-triggered advance started
    pub fn show_loading(&mut self, now: Instant, counters: &SessionCounters) {
        self.hide_timed(OverlayElement::SoundNotice);

        if counters.loading_notice_allowed(self.loading_notice_cap) {
            self.show(OverlayElement::LoadingNotice);
            // Backup in case the transition never reports back.
            self.loading_timer.arm(now, self.timing.notice_auto_hide);
        }

        if self.fullscreen {
            self.hide_timed(OverlayElement::Buttons);
        } else if !self.is_visible(OverlayElement::InfoPanel) {
            self.show(OverlayElement::Buttons);
            self.buttons_timer.arm(now, self.timing.notice_auto_hide);
        }
    }

    pub fn finish_loading(&mut self) {
        self.hide_loading();
    }

    pub fn toggle_info_panel(&mut self) {
        if self.is_visible(OverlayElement::InfoPanel) {
            self.close_info_panel();
        } else {
            self.show(OverlayElement::InfoPanel);
            self.hide_timed(OverlayElement::Buttons);
        }
    }

    pub fn close_info_panel(&mut self) {
        self.hide(OverlayElement::InfoPanel);
    }

    /// Multi-finger gesture disclosure
    pub fn show_diagnostics(&mut self, now: Instant, fields: DiagnosticsFields) {
        match self.diagnostics_mode {
            DiagnosticsMode::AutoHide => self.reveal_diagnostics(now, fields),
            DiagnosticsMode::Persistent => self.toggle_diagnostics(now, fields),
        }
    }

    pub fn toggle_diagnostics(&mut self, now: Instant, fields: DiagnosticsFields) {
        if self.is_visible(OverlayElement::Diagnostics) {
            self.hide_timed(OverlayElement::Diagnostics);
        } else {
            self.reveal_diagnostics(now, fields);
        }
    }

    fn reveal_diagnostics(&mut self, now: Instant, fields: DiagnosticsFields) {
        info!(target: "dreamreel::ui", "Diagnostics: {}", fields.lines().join(" | "));
        self.renderer
            .apply(OverlayCommand::SetDiagnostics(fields.clone()));
        self.diagnostics = Some(fields);
        self.show(OverlayElement::Diagnostics);

        if self.diagnostics_mode == DiagnosticsMode::AutoHide {
            self.diagnostics_timer
                .arm(now, self.timing.diagnostics_auto_hide);
        }
    }

    pub fn update_live_fields(&mut self, live: LiveFields) {
        if self.is_visible(OverlayElement::Diagnostics) {
            if let Some(fields) = self.diagnostics.as_ref().map(|base| base.with_live(&live)) {
                self.renderer
                    .apply(OverlayCommand::SetDiagnostics(fields.clone()));
                self.diagnostics = Some(fields);
            }
        }
        self.renderer.apply(OverlayCommand::SetLiveFields(live));
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
        self.renderer.apply(OverlayCommand::SetFullscreen(fullscreen));
        if fullscreen {
            self.hide_timed(OverlayElement::SoundNotice);
            self.hide_timed(OverlayElement::Buttons);
        }
    }

    pub fn open_external_link(&mut self, url: &str) {
        info!(target: "dreamreel::ui", "Opening external link {}", url);
        self.renderer.apply(OverlayCommand::OpenLink(url.to_string()));
    }

    /// Run expired timers
    pub fn poll(&mut self, now: Instant, counters: &mut SessionCounters) {
        if self.initial_timer.fire(now) {
            if counters.has_shown_initial_instructions {
                debug!(target: "dreamreel::ui", "Initial instructions skipped, user already interacted");
            } else {
                self.show_instructions(now, counters);
            }
        }
        if self.instructions_timer.fire(now) {
            self.hide(OverlayElement::Instructions);
        }
        if self.buttons_timer.fire(now) {
            self.hide(OverlayElement::Buttons);
        }
        if self.sound_timer.fire(now) {
            self.hide(OverlayElement::SoundNotice);
        }
        if self.loading_timer.fire(now) {
            self.hide(OverlayElement::LoadingNotice);
        }
        if self.diagnostics_timer.fire(now) {
            self.hide(OverlayElement::Diagnostics);
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        earliest([
            self.initial_timer.deadline(),
            self.instructions_timer.deadline(),
            self.buttons_timer.deadline(),
            self.sound_timer.deadline(),
            self.loading_timer.deadline(),
            self.diagnostics_timer.deadline(),
        ])
    }

    pub fn is_visible(&self, element: OverlayElement) -> bool {
        self.visible.contains(&element)
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn device_class(&self) -> DeviceClass {
        self.device_class
    }

    fn hide_loading(&mut self) {
        self.hide_timed(OverlayElement::LoadingNotice);
    }

    /// Hide an element and disarm its auto-hide timer
    fn hide_timed(&mut self, element: OverlayElement) {
        match element {
            OverlayElement::Instructions => self.instructions_timer.cancel(),
            OverlayElement::Buttons => self.buttons_timer.cancel(),
            OverlayElement::SoundNotice => self.sound_timer.cancel(),
            OverlayElement::LoadingNotice => self.loading_timer.cancel(),
            OverlayElement::Diagnostics => self.diagnostics_timer.cancel(),
            OverlayElement::InfoPanel => {}
        }
        self.hide(element);
    }

    fn show(&mut self, element: OverlayElement) {
        if self.visible.insert(element) {
            debug!(target: "dreamreel::ui", "show {}", element);
            self.renderer.apply(OverlayCommand::Show(element));
        }
    }

    fn hide(&mut self, element: OverlayElement) {
        if self.visible.remove(&element) {
            debug!(target: "dreamreel::ui", "hide {}", element);
            self.renderer.apply(OverlayCommand::Hide(element));
        }
    }
}
