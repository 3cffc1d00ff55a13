use super::types::Effects;
use crate::config::ReelConfig;
use crate::counters::SessionCounters;
use crate::debounce::earliest;
use crate::device::DeviceClass;
use crate::error::PlaylistError;
use crate::events::{EventBus, ReelEvent};
use crate::gesture::{
    ControlAction, GestureClassifier, GestureCommand, GestureTiming, InputEvent, InputRouter,
    Routed,
};
use crate::playback::{
    AdvanceOutcome, FailurePolicy, MediaOutcome, PlaybackController, SourceSelector,
    StartedTransition, TransitionStep, VideoSurface,
};
use crate::playlist::Playlist;
use crate::presenter::{DiagnosticsFields, LiveFields, OverlayPresenter, OverlayRenderer};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::time::Instant;
use tracing::{debug, info};

/// The explicit session context: classifier, controller, presenter and
/// counters, constructed once and driven by the runtime loop.
///
/// Nothing here awaits. Each handler returns the [`Effects`] the host has to
/// carry out, so the whole session can be stepped deterministically.
pub struct ReelSession {
    router: InputRouter,
    controller: PlaybackController,
    presenter: OverlayPresenter,
    counters: SessionCounters,
    event_bus: EventBus,
    device_class: DeviceClass,
    fullscreen: bool,
    external_link: String,
    stored_count: Option<u32>,
    session_started: DateTime<Utc>,
}

impl ReelSession {
    pub fn new(
        config: &ReelConfig,
        device_class: DeviceClass,
        surface: Arc<dyn VideoSurface>,
        renderer: Box<dyn OverlayRenderer>,
        selector: SourceSelector,
        event_bus: EventBus,
    ) -> Self {
        let classifier = GestureClassifier::new(GestureTiming::from(&config.timing));
        let controller =
            PlaybackController::new(surface, selector, FailurePolicy::from(&config.playback));
        let presenter = OverlayPresenter::new(renderer, device_class, config);

        Self {
            router: InputRouter::new(classifier, device_class),
            controller,
            presenter,
            counters: SessionCounters::new(),
            event_bus,
            device_class,
            fullscreen: false,
            external_link: config.presenter.external_link.clone(),
            stored_count: None,
            session_started: Utc::now(),
        }
    }

    /// Install the playlist, schedule the first hint and start the silent first advance
    pub fn bootstrap(
        &mut self,
        now: Instant,
        playlist: Result<Playlist, PlaylistError>,
        stored_count: Option<u32>,
    ) -> Effects {
        self.stored_count = stored_count;
        self.presenter.schedule_initial_instructions(now);

        match playlist {
            Ok(playlist) => self.controller.set_playlist(playlist),
            Err(e) => {
                self.controller.playlist_unavailable(&e);
                self.event_bus.emit(ReelEvent::SystemError {
                    component: "playlist".to_string(),
                    error: e.to_string(),
                });
                return Effects::none();
            }
        }

        self.advance(false, now)
    }

    pub fn handle_input(&mut self, event: InputEvent, now: Instant) -> Effects {
        match self.router.route(event, now) {
            Some(Routed::Command(command)) => self.handle_command(command, now),
            Some(Routed::Control(action)) => self.handle_control(action, now),
            Some(Routed::Shutdown) => Effects::shutdown(),
            None => Effects::none(),
        }
    }

    pub fn handle_command(&mut self, command: GestureCommand, now: Instant) -> Effects {
        info!(target: "dreamreel::input", "Command: {}", command);
        self.event_bus.emit(ReelEvent::CommandIssued {
            command,
            timestamp: SystemTime::now(),
        });
        // A user who already gestured does not need the first-run hint.
        self.counters.mark_initial_instructions_shown();

        match command {
            GestureCommand::ToggleMute => self.toggle_mute(now),
            GestureCommand::Advance => self.advance(true, now),
            GestureCommand::ToggleFullscreen => {
                self.toggle_fullscreen();
                Effects::none()
            }
            GestureCommand::ShowDiagnostics => {
                let fields = self.diagnostics_fields();
                self.presenter.show_diagnostics(now, fields);
                Effects::none()
            }
            GestureCommand::ToggleDiagnostics => {
                let fields = self.diagnostics_fields();
                self.presenter.toggle_diagnostics(now, fields);
                Effects::none()
            }
        }
    }

    pub fn handle_control(&mut self, action: ControlAction, now: Instant) -> Effects {
        debug!(target: "dreamreel::input", "Control: {:?}", action);
        self.counters.mark_initial_instructions_shown();

        match action {
            ControlAction::Advance => return self.advance(true, now),
            ControlAction::ToggleInfoPanel => self.presenter.toggle_info_panel(),
            ControlAction::CloseInfoPanel => self.presenter.close_info_panel(),
            ControlAction::OpenExternalLink => {
                let url = self.external_link.clone();
                self.presenter.open_external_link(&url);
                self.event_bus.emit(ReelEvent::ExternalLinkOpened { url });
            }
        }
        Effects::none()
    }

    pub fn handle_media(&mut self, outcome: MediaOutcome, now: Instant) -> Effects {
        match outcome {
            MediaOutcome::Loaded { ticket, result } => {
                let step = self.controller.on_load_finished(ticket, result);
                self.apply_step(step, now)
            }
            MediaOutcome::Played { ticket, result } => {
                let step = self.controller.on_play_finished(ticket, result);
                self.apply_step(step, now)
            }
            MediaOutcome::Resumed { slot, result } => {
                self.controller.on_resume_finished(slot, result);
                Effects::none()
            }
            MediaOutcome::AudioResumed { result } => {
                self.controller.on_audio_resumed(result);
                Effects::none()
            }
            MediaOutcome::Paused { slot } => {
                self.controller.on_slot_paused(slot);
                Effects::none()
            }
        }
    }

    /// Resolve elapsed gesture windows and overlay timers
    pub fn poll(&mut self, now: Instant) -> Effects {
        let mut effects = Effects::none();
        for command in self.router.poll(now) {
            effects.merge(self.handle_command(command, now));
        }
        self.presenter.poll(now, &mut self.counters);
        effects
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        earliest([self.router.next_deadline(), self.presenter.next_deadline()])
    }

    fn advance(&mut self, user_triggered: bool, now: Instant) -> Effects {
        match self.controller.advance(user_triggered) {
            AdvanceOutcome::Started(started) => {
                if user_triggered {
                    self.counters.record_loading_toggle();
                    self.presenter.show_loading(now, &self.counters);
                }
                self.announce(&started);
                Effects::task(started.task)
            }
            AdvanceOutcome::Dropped => {
                self.event_bus
                    .emit(ReelEvent::TransitionDropped { user_triggered });
                Effects::none()
            }
            AdvanceOutcome::Unavailable => Effects::none(),
        }
    }

    fn toggle_mute(&mut self, now: Instant) -> Effects {
        self.counters.record_sound_toggle();
        let outcome = self.controller.toggle_mute();
        self.presenter
            .show_sound_state(now, outcome.muted, &self.counters);
        let live = self.live_fields();
        self.presenter.update_live_fields(live);
        self.event_bus.emit(ReelEvent::MuteChanged {
            muted: outcome.muted,
        });

        Effects {
            tasks: outcome.tasks,
            shutdown: false,
        }
    }

    fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
        info!(
            target: "dreamreel::ui",
            "{} fullscreen", if self.fullscreen { "Entering" } else { "Leaving" }
        );
        self.presenter.set_fullscreen(self.fullscreen);
        self.event_bus.emit(ReelEvent::FullscreenChanged {
            fullscreen: self.fullscreen,
        });
    }

    fn apply_step(&mut self, step: TransitionStep, now: Instant) -> Effects {
        match step {
            TransitionStep::Pending(task) => Effects::task(task),
            TransitionStep::Completed {
                ticket,
                index,
                load_count,
                refresh_instructions,
                ..
            } => {
                self.presenter.finish_loading();
                if refresh_instructions {
                    self.presenter.refresh_instructions(now);
                }
                let live = self.live_fields();
                self.presenter.update_live_fields(live);
                self.event_bus.emit(ReelEvent::TransitionCompleted {
                    ticket: ticket.0,
                    index,
                    load_count,
                });
                Effects::none()
            }
            TransitionStep::Failed {
                ticket,
                error,
                retry,
            } => {
                self.event_bus.emit(ReelEvent::TransitionFailed {
                    ticket: ticket.0,
                    error: error.to_string(),
                });
                match retry {
                    Some(started) => {
                        self.announce(&started);
                        Effects::task(started.task)
                    }
                    None => {
                        self.presenter.finish_loading();
                        Effects::none()
                    }
                }
            }
            TransitionStep::Stale => Effects::none(),
        }
    }

    fn announce(&self, started: &StartedTransition) {
        self.event_bus.emit(ReelEvent::TransitionStarted {
            ticket: started.ticket.0,
            index: started.index,
            user_triggered: started.user_triggered,
        });
    }

    pub fn live_fields(&self) -> LiveFields {
        LiveFields {
            index: self.controller.current_index(),
            total: self.controller.playlist_len(),
            muted: self.controller.is_muted(),
        }
    }

    pub fn diagnostics_fields(&self) -> DiagnosticsFields {
        DiagnosticsFields {
            device_class: self.device_class,
            index: self.controller.current_index(),
            total: self.controller.playlist_len(),
            muted: self.controller.is_muted(),
            stored_count: self.stored_count,
            failed_count: self.controller.failed_count(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            session_started: self.session_started,
        }
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn presenter(&self) -> &OverlayPresenter {
        &self.presenter
    }

    pub fn counters(&self) -> &SessionCounters {
        &self.counters
    }

    pub fn router(&self) -> &InputRouter {
        &self.router
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn device_class(&self) -> DeviceClass {
        self.device_class
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
