use super::selection::SourceSelector;
use super::slot::{source_file_name, PlaybackSlot, SlotId};
use super::surface::{MediaTask, TransitionTicket, VideoSurface};
use crate::config::{FailurePolicyKind, PlaybackConfig};
use crate::error::{MediaError, PlaylistError};
use crate::playlist::Playlist;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransitionState {
    Idle,
    Loading,
    CrossfadingIn,
    /// No usable playlist; the surface stays on its placeholder
    Error,
}

impl fmt::Display for TransitionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionState::Idle => write!(f, "idle"),
            TransitionState::Loading => write!(f, "loading"),
            TransitionState::CrossfadingIn => write!(f, "crossfading"),
            TransitionState::Error => write!(f, "error"),
        }
    }
}

/// What happens after a load or play failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Keep showing the current video
    Stay,
    /// Start another advance, bounded by consecutive failures
    SkipToNext { max_attempts: u32 },
}

impl From<&PlaybackConfig> for FailurePolicy {
    fn from(config: &PlaybackConfig) -> Self {
        match config.failure_policy {
            FailurePolicyKind::Stay => FailurePolicy::Stay,
            FailurePolicyKind::SkipToNext => FailurePolicy::SkipToNext {
                max_attempts: config.max_skip_attempts,
            },
        }
    }
}

/// A transition that was just started; `task` must be executed by the host
#[derive(Debug, Clone, PartialEq)]
pub struct StartedTransition {
    pub ticket: TransitionTicket,
    pub index: usize,
    pub user_triggered: bool,
    pub task: MediaTask,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    Started(StartedTransition),
    /// Another transition is in flight
    Dropped,
    /// No playlist to pick from
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransitionStep {
    /// Continue with the next media task
    Pending(MediaTask),
    Completed {
        ticket: TransitionTicket,
        index: usize,
        load_count: u64,
        user_triggered: bool,
        /// First load of the session or a user-triggered advance
        refresh_instructions: bool,
    },
    Failed {
        ticket: TransitionTicket,
        error: MediaError,
        retry: Option<StartedTransition>,
    },
    /// Completion for a superseded or unknown ticket
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MuteOutcome {
    pub muted: bool,
    pub tasks: Vec<MediaTask>,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    ticket: TransitionTicket,
    index: usize,
    user_triggered: bool,
}

/// Owns the two playback slots and runs crossfade transitions between them.
///
/// The controller never awaits. Each asynchronous step is handed to the
/// host as a [`MediaTask`] and its completion comes back through
/// [`on_load_finished`](Self::on_load_finished) or
/// [`on_play_finished`](Self::on_play_finished), tagged with the ticket of
/// the transition it belongs to.
pub struct PlaybackController {
    surface: Arc<dyn VideoSurface>,
    playlist: Option<Playlist>,
    selector: SourceSelector,
    policy: FailurePolicy,
    active: PlaybackSlot,
    inactive: PlaybackSlot,
    state: TransitionState,
    in_flight: Option<InFlight>,
    next_ticket: u64,
    current_index: Option<usize>,
    load_count: u64,
    consecutive_failures: u32,
}

impl PlaybackController {
    /// Starts in `Error` until a playlist is installed
    pub fn new(surface: Arc<dyn VideoSurface>, selector: SourceSelector, policy: FailurePolicy) -> Self {
        let active = PlaybackSlot::new(SlotId::A, true);
        let inactive = PlaybackSlot::new(SlotId::B, false);

        surface.set_opacity(active.id, active.opacity);
        surface.set_opacity(inactive.id, inactive.opacity);
        surface.set_muted(active.id, active.muted);
        surface.set_muted(inactive.id, inactive.muted);

        Self {
            surface,
            playlist: None,
            selector,
            policy,
            active,
            inactive,
            state: TransitionState::Error,
            in_flight: None,
            next_ticket: 0,
            current_index: None,
            load_count: 0,
            consecutive_failures: 0,
        }
    }

    pub fn set_playlist(&mut self, playlist: Playlist) {
        if playlist.is_empty() {
            warn!(target: "dreamreel::video", "Playlist is empty, staying on placeholder");
            self.playlist = None;
            self.state = TransitionState::Error;
            return;
        }

        info!(
            target: "dreamreel::video",
            "Playlist installed: {} sources, start hint {:?}",
            playlist.len(),
            playlist.start_index()
        );
        self.playlist = Some(playlist);
        self.in_flight = None;
        self.state = TransitionState::Idle;
    }

    pub fn playlist_unavailable(&mut self, error: &PlaylistError) {
        warn!(target: "dreamreel::video", "No playlist available: {}", error);
        self.playlist = None;
        self.in_flight = None;
        self.state = TransitionState::Error;
    }

    pub fn advance(&mut self, user_triggered: bool) -> AdvanceOutcome {
        match self.state {
            TransitionState::Idle => {}
            TransitionState::Error => {
                debug!(target: "dreamreel::video", "Advance ignored, no playlist");
                return AdvanceOutcome::Unavailable;
            }
            TransitionState::Loading | TransitionState::CrossfadingIn => {
                debug!(
                    target: "dreamreel::video",
                    "Advance dropped, transition already in progress ({})", self.state
                );
                return AdvanceOutcome::Dropped;
            }
        }

        let Some(playlist) = self.playlist.as_ref() else {
            return AdvanceOutcome::Unavailable;
        };
        let Some(index) = self.selector.pick(playlist) else {
            return AdvanceOutcome::Unavailable;
        };
        let Some(source) = playlist.get(index).map(str::to_string) else {
            return AdvanceOutcome::Unavailable;
        };

        self.next_ticket += 1;
        let ticket = TransitionTicket(self.next_ticket);
        self.state = TransitionState::Loading;
        self.in_flight = Some(InFlight {
            ticket,
            index,
            user_triggered,
        });

        info!(
            target: "dreamreel::video",
            "Loading video {}/{}: {} into slot {} ({})",
            index + 1,
            playlist.len(),
            source_file_name(&source),
            self.inactive.id,
            if user_triggered { "user" } else { "automatic" }
        );

        self.surface.set_source(self.inactive.id, &source);
        self.inactive.source = Some(source);
        self.inactive.muted = self.active.muted;
        self.surface.set_muted(self.inactive.id, self.inactive.muted);

        AdvanceOutcome::Started(StartedTransition {
            ticket,
            index,
            user_triggered,
            task: MediaTask::Load {
                ticket,
                slot: self.inactive.id,
            },
        })
    }

    pub fn on_load_finished(
        &mut self,
        ticket: TransitionTicket,
        result: Result<(), MediaError>,
    ) -> TransitionStep {
        let Some(flight) = self.current_flight(ticket, TransitionState::Loading) else {
            return TransitionStep::Stale;
        };

        match result {
            Ok(()) => {
                debug!(
                    target: "dreamreel::video",
                    "Video loaded in slot {} for transition {}", self.inactive.id, ticket
                );
                self.state = TransitionState::CrossfadingIn;
                TransitionStep::Pending(MediaTask::Play {
                    ticket,
                    slot: self.inactive.id,
                })
            }
            Err(e) => {
                if let Some(source) = self.inactive.source.clone() {
                    self.selector.record_failure(&source);
                }
                self.fail(flight, e)
            }
        }
    }

    pub fn on_play_finished(
        &mut self,
        ticket: TransitionTicket,
        result: Result<(), MediaError>,
    ) -> TransitionStep {
        let Some(flight) = self.current_flight(ticket, TransitionState::CrossfadingIn) else {
            return TransitionStep::Stale;
        };

        if let Err(e) = result {
            self.surface.pause(self.inactive.id);
            self.inactive.playing = false;
            return self.fail(flight, e);
        }

        self.inactive.playing = true;
        self.active.opacity = 0.0;
        self.inactive.opacity = 1.0;
        self.surface.set_opacity(self.active.id, self.active.opacity);
        self.surface.set_opacity(self.inactive.id, self.inactive.opacity);

        std::mem::swap(&mut self.active, &mut self.inactive);

        // The faded-out slot must not keep playing audio while hidden.
        if self.inactive.playing {
            self.surface.pause(self.inactive.id);
            self.inactive.playing = false;
        }

        self.state = TransitionState::Idle;
        self.in_flight = None;
        self.current_index = Some(flight.index);
        self.load_count += 1;
        self.consecutive_failures = 0;

        info!(
            target: "dreamreel::video",
            "Crossfade complete: slot {} now active with {} (load #{})",
            self.active.id,
            self.active.source_name().unwrap_or("-"),
            self.load_count
        );

        TransitionStep::Completed {
            ticket,
            index: flight.index,
            load_count: self.load_count,
            user_triggered: flight.user_triggered,
            refresh_instructions: self.load_count == 1 || flight.user_triggered,
        }
    }

    pub fn toggle_mute(&mut self) -> MuteOutcome {
        let muted = !self.active.muted;
        self.active.muted = muted;
        self.inactive.muted = muted;
        self.surface.set_muted(self.active.id, muted);
        self.surface.set_muted(self.inactive.id, muted);

        let mut tasks = Vec::new();
        if !muted {
            if !self.active.playing && self.active.source.is_some() {
                tasks.push(MediaTask::Resume {
                    slot: self.active.id,
                });
            }
            tasks.push(MediaTask::ResumeAudio);
        }

        info!(
            target: "dreamreel::video",
            "Sound {}", if muted { "off" } else { "on" }
        );
        MuteOutcome { muted, tasks }
    }

    pub fn on_resume_finished(&mut self, slot: SlotId, result: Result<(), MediaError>) {
        match result {
            Ok(()) if slot == self.active.id => {
                self.active.playing = true;
                debug!(target: "dreamreel::video", "Resumed playback in slot {}", slot);
            }
            Ok(()) => {
                // Slot was swapped out meanwhile; keep hidden media silent.
                self.surface.pause(slot);
            }
            Err(e) => {
                warn!(target: "dreamreel::video", "Playback resume rejected: {}", e);
            }
        }
    }

    /// The host paused a slot on its own (e.g. a platform media policy)
    pub fn on_slot_paused(&mut self, slot: SlotId) {
        if self.active.id == slot {
            self.active.playing = false;
        } else {
            self.inactive.playing = false;
        }
        debug!(target: "dreamreel::video", "Slot {} paused by host", slot);
    }

    pub fn on_audio_resumed(&mut self, result: Result<bool, MediaError>) {
        match result {
            Ok(true) => debug!(target: "dreamreel::video", "Audio context resumed"),
            Ok(false) => {}
            Err(e) => warn!(target: "dreamreel::video", "Audio context resume failed: {}", e),
        }
    }

    fn current_flight(&self, ticket: TransitionTicket, expected: TransitionState) -> Option<InFlight> {
        match self.in_flight {
            Some(flight) if flight.ticket == ticket && self.state == expected => Some(flight),
            _ => {
                debug!(
                    target: "dreamreel::video",
                    "Ignoring stale completion for transition {}", ticket
                );
                None
            }
        }
    }

    fn fail(&mut self, flight: InFlight, error: MediaError) -> TransitionStep {
        error!(
            target: "dreamreel::video",
            "Transition {} failed: {}", flight.ticket, error
        );
        self.state = TransitionState::Idle;
        self.in_flight = None;
        self.consecutive_failures += 1;

        let policy = self.policy;
        let retry = match policy {
            FailurePolicy::SkipToNext { max_attempts }
                if self.consecutive_failures <= max_attempts =>
            {
                info!(
                    target: "dreamreel::video",
                    "Skipping to another video (attempt {}/{})",
                    self.consecutive_failures,
                    max_attempts
                );
                match self.advance(flight.user_triggered) {
                    AdvanceOutcome::Started(started) => Some(started),
                    _ => None,
                }
            }
            _ => {
                self.consecutive_failures = 0;
                None
            }
        };

        TransitionStep::Failed {
            ticket: flight.ticket,
            error,
            retry,
        }
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn active(&self) -> &PlaybackSlot {
        &self.active
    }

    pub fn inactive(&self) -> &PlaybackSlot {
        &self.inactive
    }

    pub fn is_muted(&self) -> bool {
        self.active.muted
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn playlist_len(&self) -> usize {
        self.playlist.as_ref().map_or(0, Playlist::len)
    }

    pub fn load_count(&self) -> u64 {
        self.load_count
    }

    pub fn failed_count(&self) -> usize {
        self.selector.ledger().failed_count()
    }

    pub fn in_flight_ticket(&self) -> Option<TransitionTicket> {
        self.in_flight.map(|flight| flight.ticket)
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }
}
