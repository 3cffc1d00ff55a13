use super::{ComponentState, ReelOrchestrator, ShutdownReason};
use crate::events::ReelEvent;
use std::time::SystemTime;
use tracing::{debug, info};

impl ReelOrchestrator {
    /// Stop background work and report the process exit code
    pub async fn shutdown(&mut self, reason: &ShutdownReason) -> i32 {
        info!(target: "dreamreel::system", "Beginning graceful shutdown");

        self.event_bus.emit(ReelEvent::ShutdownRequested {
            timestamp: SystemTime::now(),
            reason: reason.to_string(),
        });

        for component in ["input", "presenter", "playback", "playlist"] {
            self.set_component_state(component, ComponentState::Stopping);
        }

        // Cancel all background tasks
        self.cancellation_token.cancel();
        for handle in self.media_tasks.drain(..) {
            if !handle.is_finished() {
                debug!(target: "dreamreel::system", "Waiting for in-flight media task");
            }
            // Tasks observe the token; a join error here means it was aborted.
            let _ = handle.await;
        }

        for component in ["input", "presenter", "playback", "playlist"] {
            self.set_component_state(component, ComponentState::Stopped);
        }

        let exit_code = match reason {
            ShutdownReason::Error(_) => 1,
            _ => 0,
        };
        info!(
            target: "dreamreel::system",
            "Graceful shutdown completed with exit code: {}", exit_code
        );
        exit_code
    }
}
