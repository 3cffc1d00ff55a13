use super::{ComponentState, Effects, HostEvent, ReelOrchestrator};
use crate::playback::MediaTask;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{info, warn};

impl ReelOrchestrator {
    /// Register component states
    pub fn initialize(&mut self) {
        info!(target: "dreamreel::system", "Initializing dreamreel components");

        for component in ["playlist", "playback", "presenter", "input"] {
            self.set_component_state(component, ComponentState::Stopped);
        }
    }

    /// Load the playlist and kick off the silent first advance
    pub fn start(&mut self) {
        let device_class = self.session.device_class();
        info!(
            target: "dreamreel::system",
            "Starting dreamreel {} for {} device",
            env!("CARGO_PKG_VERSION"),
            device_class
        );

        self.set_component_state("playlist", ComponentState::Starting);
        let playlist = self.provider.playlist(device_class);
        let stored_count = self.provider.stored_count(device_class);

        match &playlist {
            Ok(playlist) => {
                info!(
                    target: "dreamreel::system",
                    "Playlist loaded: {} videos", playlist.len()
                );
                self.set_component_state("playlist", ComponentState::Running);
            }
            Err(e) => {
                warn!(target: "dreamreel::system", "Playlist unavailable: {}", e);
                self.set_component_state("playlist", ComponentState::Degraded);
            }
        }

        let effects = self.session.bootstrap(Instant::now(), playlist, stored_count);
        self.apply_effects(effects);

        self.set_component_state("playback", ComponentState::Running);
        self.set_component_state("presenter", ComponentState::Running);
        self.set_component_state("input", ComponentState::Running);
    }

    /// Spawn requested media work; returns true when shutdown was requested
    pub(super) fn apply_effects(&mut self, effects: Effects) -> bool {
        for task in effects.tasks {
            self.spawn_media_task(task);
        }
        effects.shutdown
    }

    fn spawn_media_task(&mut self, task: MediaTask) {
        self.media_tasks.retain(|handle| !handle.is_finished());

        let surface = Arc::clone(&self.surface);
        let sender = self.host_sender.clone();
        let cancellation_token = self.cancellation_token.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                outcome = task.execute(surface.as_ref()) => {
                    // Receiver is gone only during shutdown.
                    let _ = sender.send(HostEvent::Media(outcome));
                }
                _ = cancellation_token.cancelled() => {}
            }
        });
        self.media_tasks.push(handle);
    }
}
