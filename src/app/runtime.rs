use super::{HostEvent, ReelOrchestrator, ShutdownReason};
use crate::error::{ReelError, Result};
use tokio::signal;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

impl ReelOrchestrator {
    /// Run the main application loop with signal handling
    pub async fn run(&mut self) -> Result<i32> {
        info!(target: "dreamreel::system", "dreamreel is running");

        self.setup_signal_handlers();
        let reason = self.run_loop().await?;

        info!(target: "dreamreel::system", "Shutdown initiated: {}", reason);
        let exit_code = self.shutdown(&reason).await;

        info!(target: "dreamreel::system", "dreamreel shutdown complete");
        Ok(exit_code)
    }

    /// Drive the session until shutdown; signal handling is left to the caller
    pub async fn run_loop(&mut self) -> Result<ShutdownReason> {
        let mut receiver = self
            .host_receiver
            .take()
            .ok_or_else(|| ReelError::system("Host receiver already taken"))?;

        let cancellation_token = self.cancellation_token.clone();

        let reason = loop {
            let deadline = self.session.next_deadline();

            tokio::select! {
                _ = cancellation_token.cancelled() => {
                    break ShutdownReason::UserRequest;
                }
                event = receiver.recv() => {
                    let Some(event) = event else {
                        break ShutdownReason::HostClosed;
                    };
                    if let Some(reason) = self.handle_host_event(event) {
                        break reason;
                    }
                }
                _ = wait_until(deadline) => {
                    let effects = self.session.poll(Instant::now());
                    if self.apply_effects(effects) {
                        break ShutdownReason::UserRequest;
                    }
                }
            }
        };

        self.host_receiver = Some(receiver);
        Ok(reason)
    }

    fn handle_host_event(&mut self, event: HostEvent) -> Option<ShutdownReason> {
        let now = Instant::now();
        let effects = match event {
            HostEvent::Input(input) => {
                debug!(target: "dreamreel::input", "Input: {:?}", input);
                self.session.handle_input(input, now)
            }
            HostEvent::Media(outcome) => self.session.handle_media(outcome, now),
            HostEvent::Shutdown(reason) => return Some(reason),
        };

        if self.apply_effects(effects) {
            Some(ShutdownReason::UserRequest)
        } else {
            None
        }
    }

    /// Set up signal handlers for graceful shutdown
    fn setup_signal_handlers(&self) {
        // Handle SIGTERM (systemd stop) - Unix only
        #[cfg(unix)]
        {
            let sender = self.host_sender.clone();
            tokio::spawn(async move {
                match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                    Ok(mut sigterm) => {
                        if sigterm.recv().await.is_some() {
                            info!(target: "dreamreel::system", "Received SIGTERM signal");
                            notify(&sender, ShutdownReason::Signal("SIGTERM".to_string()));
                        }
                    }
                    Err(e) => warn!("Failed to register SIGTERM handler: {}", e),
                }
            });
        }

        // Handle SIGINT (Ctrl+C) - Cross-platform
        let sender = self.host_sender.clone();
        tokio::spawn(async move {
            if let Ok(()) = signal::ctrl_c().await {
                info!(target: "dreamreel::system", "Received SIGINT signal (Ctrl+C)");
                notify(&sender, ShutdownReason::Signal("SIGINT".to_string()));
            }
        });
    }
}

fn notify(sender: &mpsc::UnboundedSender<HostEvent>, reason: ShutdownReason) {
    let _ = sender.send(HostEvent::Shutdown(reason));
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
