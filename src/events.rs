use crate::error::EventBusError;
use crate::gesture::GestureCommand;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Events that can occur during a presentation session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReelEvent {
    /// The gesture classifier or a control resolved user input to a command
    CommandIssued {
        command: GestureCommand,
        timestamp: SystemTime,
    },
    /// A transition started loading a new source into the inactive slot
    TransitionStarted {
        ticket: u64,
        index: usize,
        user_triggered: bool,
    },
    /// The crossfade completed and the slots swapped roles
    TransitionCompleted {
        ticket: u64,
        index: usize,
        load_count: u64,
    },
    /// A load or play failed; the previous video keeps playing
    TransitionFailed { ticket: u64, error: String },
    /// An advance arrived while another transition was in flight
    TransitionDropped { user_triggered: bool },
    /// Both slots switched their mute flag
    MuteChanged { muted: bool },
    /// The exclusive full-viewport mode was entered or left
    FullscreenChanged { fullscreen: bool },
    /// The external link control was activated
    ExternalLinkOpened { url: String },
    /// A system error occurred in a component
    SystemError { component: String, error: String },
    /// System shutdown requested
    ShutdownRequested {
        timestamp: SystemTime,
        reason: String,
    },
}

impl ReelEvent {
    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            ReelEvent::CommandIssued { command, .. } => format!("Command issued: {}", command),
            ReelEvent::TransitionStarted {
                ticket,
                index,
                user_triggered,
            } => format!(
                "Transition {} started for video {}{}",
                ticket,
                index + 1,
                if *user_triggered { " (user)" } else { " (silent)" }
            ),
            ReelEvent::TransitionCompleted {
                ticket,
                index,
                load_count,
            } => format!(
                "Transition {} completed on video {} (load {})",
                ticket,
                index + 1,
                load_count
            ),
            ReelEvent::TransitionFailed { ticket, error } => {
                format!("Transition {} failed: {}", ticket, error)
            }
            ReelEvent::TransitionDropped { .. } => {
                "Advance dropped while a transition is in flight".to_string()
            }
            ReelEvent::MuteChanged { muted } => {
                format!("Sound {}", if *muted { "off" } else { "on" })
            }
            ReelEvent::FullscreenChanged { fullscreen } => format!(
                "Fullscreen {}",
                if *fullscreen { "entered" } else { "exited" }
            ),
            ReelEvent::ExternalLinkOpened { url } => format!("External link opened: {}", url),
            ReelEvent::SystemError { component, error } => {
                format!("Error in {}: {}", component, error)
            }
            ReelEvent::ShutdownRequested { reason, .. } => {
                format!("Shutdown requested: {}", reason)
            }
        }
    }

    /// Get the event type as a string for filtering
    pub fn event_type(&self) -> &'static str {
        match self {
            ReelEvent::CommandIssued { .. } => "command_issued",
            ReelEvent::TransitionStarted { .. } => "transition_started",
            ReelEvent::TransitionCompleted { .. } => "transition_completed",
            ReelEvent::TransitionFailed { .. } => "transition_failed",
            ReelEvent::TransitionDropped { .. } => "transition_dropped",
            ReelEvent::MuteChanged { .. } => "mute_changed",
            ReelEvent::FullscreenChanged { .. } => "fullscreen_changed",
            ReelEvent::ExternalLinkOpened { .. } => "external_link_opened",
            ReelEvent::SystemError { .. } => "system_error",
            ReelEvent::ShutdownRequested { .. } => "shutdown_requested",
        }
    }
}

/// Broadcast bus that lets hosts observe the session
pub struct EventBus {
    sender: broadcast::Sender<ReelEvent>,
}

impl EventBus {
    /// Create a new event bus with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReelEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: ReelEvent) -> Result<usize, EventBusError> {
        debug!("Publishing event: {}", event.description());

        match &event {
            ReelEvent::SystemError { component, error } => {
                error!("System error in {}: {}", component, error);
            }
            ReelEvent::TransitionFailed { ticket, error } => {
                warn!("Transition {} failed: {}", ticket, error);
            }
            ReelEvent::ShutdownRequested { reason, .. } => {
                info!("Shutdown requested: {}", reason);
            }
            _ => {}
        }

        self.sender
            .send(event)
            .map_err(|e| EventBusError::PublishFailed {
                details: e.to_string(),
            })
    }

    /// Publish without treating a missing audience as a failure
    pub fn emit(&self, event: ReelEvent) {
        if self.sender.receiver_count() == 0 {
            return;
        }

        if let Err(e) = self.publish(event) {
            debug!("Event not delivered: {}", e);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn has_subscribers(&self) -> bool {
        self.sender.receiver_count() > 0
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

/// Event filter for selective event handling
#[derive(Debug, Clone)]
pub enum EventFilter {
    All,
    EventTypes(Vec<&'static str>),
    /// Accept events from specific components (for SystemError events)
    Components(Vec<String>),
    Custom(fn(&ReelEvent) -> bool),
}

impl EventFilter {
    /// Check if an event passes this filter
    pub fn matches(&self, event: &ReelEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::EventTypes(types) => types.contains(&event.event_type()),
            EventFilter::Components(components) => {
                if let ReelEvent::SystemError { component, .. } = event {
                    components.contains(component)
                } else {
                    false
                }
            }
            EventFilter::Custom(filter_fn) => filter_fn(event),
        }
    }
}

/// Event receiver with filtering
pub struct EventReceiver {
    receiver: broadcast::Receiver<ReelEvent>,
    filter: EventFilter,
    name: String,
}

impl EventReceiver {
    pub fn new(receiver: broadcast::Receiver<ReelEvent>, filter: EventFilter, name: String) -> Self {
        Self {
            receiver,
            filter,
            name,
        }
    }

    /// Receive the next filtered event
    pub async fn recv(&mut self) -> Result<ReelEvent, EventBusError> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => {
                    if self.filter.matches(&event) {
                        debug!(
                            "Receiver '{}' received event: {}",
                            self.name,
                            event.description()
                        );
                        return Ok(event);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Receiver '{}' lagged behind by {} events", self.name, n);
                    return Err(EventBusError::Lagged(n));
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("Event bus closed for receiver '{}'", self.name);
                    return Err(EventBusError::ChannelClosed);
                }
            }
        }
    }

    /// Try to receive an event without blocking
    pub fn try_recv(&mut self) -> Result<Option<ReelEvent>, EventBusError> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.filter.matches(&event) {
                        return Ok(Some(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    warn!("Receiver '{}' lagged behind by {} events", self.name, n);
                    return Err(EventBusError::Lagged(n));
                }
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(EventBusError::ChannelClosed);
                }
            }
        }
    }
}
