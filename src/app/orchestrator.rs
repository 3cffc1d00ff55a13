use super::session::ReelSession;
use super::types::{ComponentState, HostEvent, ShutdownReason};
use crate::config::ReelConfig;
use crate::device::DeviceClass;
use crate::error::{ReelError, Result};
use crate::events::EventBus;
use crate::gesture::InputEvent;
use crate::playback::{MediaOutcome, SlotId, SourceSelector, VideoSurface};
use crate::playlist::PlaylistProvider;
use crate::presenter::OverlayRenderer;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Main application coordinator that owns the session and runs its event loop
pub struct ReelOrchestrator {
    pub(super) config: ReelConfig,
    pub(super) session: ReelSession,
    pub(super) surface: Arc<dyn VideoSurface>,
    pub(super) provider: Box<dyn PlaylistProvider>,
    pub(super) event_bus: EventBus,

    // Host plumbing
    pub(super) host_sender: mpsc::UnboundedSender<HostEvent>,
    pub(super) host_receiver: Option<mpsc::UnboundedReceiver<HostEvent>>,
    pub(super) media_tasks: Vec<JoinHandle<()>>,

    // Lifecycle management
    pub(super) component_states: HashMap<String, ComponentState>,
    pub(super) cancellation_token: CancellationToken,
}

/// Cloneable handle through which a host feeds input into the loop
#[derive(Debug, Clone)]
pub struct HostHandle {
    sender: mpsc::UnboundedSender<HostEvent>,
}

impl HostHandle {
    /// Returns false once the orchestrator is gone
    pub fn send_input(&self, event: InputEvent) -> bool {
        self.sender.send(HostEvent::Input(event)).is_ok()
    }

    /// Report a pause the surface made by itself (e.g. autoplay policy)
    pub fn report_paused(&self, slot: SlotId) -> bool {
        self.sender
            .send(HostEvent::Media(MediaOutcome::Paused { slot }))
            .is_ok()
    }

    pub fn request_shutdown(&self, reason: ShutdownReason) -> bool {
        self.sender.send(HostEvent::Shutdown(reason)).is_ok()
    }
}

impl ReelOrchestrator {
    pub fn builder() -> ReelOrchestratorBuilder {
        ReelOrchestratorBuilder::default()
    }

    pub fn host_handle(&self) -> HostHandle {
        HostHandle {
            sender: self.host_sender.clone(),
        }
    }

    pub fn session(&self) -> &ReelSession {
        &self.session
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn config(&self) -> &ReelConfig {
        &self.config
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }
}

/// Builder for [`ReelOrchestrator`]
#[derive(Default)]
pub struct ReelOrchestratorBuilder {
    config: Option<ReelConfig>,
    surface: Option<Arc<dyn VideoSurface>>,
    renderer: Option<Box<dyn OverlayRenderer>>,
    provider: Option<Box<dyn PlaylistProvider>>,
    device_class: Option<DeviceClass>,
    seed: Option<u64>,
    event_bus: Option<EventBus>,
}

impl ReelOrchestratorBuilder {
    pub fn with_config(mut self, config: ReelConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_surface(mut self, surface: Arc<dyn VideoSurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn with_renderer(mut self, renderer: Box<dyn OverlayRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_provider(mut self, provider: Box<dyn PlaylistProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Override device class detection
    pub fn with_device_class(mut self, device_class: DeviceClass) -> Self {
        self.device_class = Some(device_class);
        self
    }

    /// Seed source selection for reproducible sessions
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn build(self) -> Result<ReelOrchestrator> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let surface = self
            .surface
            .ok_or_else(|| ReelError::component("orchestrator", "video surface is required"))?;
        let renderer = self
            .renderer
            .ok_or_else(|| ReelError::component("orchestrator", "overlay renderer is required"))?;
        let provider = self
            .provider
            .ok_or_else(|| ReelError::component("orchestrator", "playlist provider is required"))?;

        let device_class = self
            .device_class
            .unwrap_or_else(|| DeviceClass::detect(&config.system));
        let max_failures = config.catalog.max_failures_per_source;
        let selector = match self.seed {
            Some(seed) => SourceSelector::seeded(seed, max_failures),
            None => SourceSelector::new(max_failures),
        };
        let event_bus = self
            .event_bus
            .unwrap_or_else(|| EventBus::new(config.system.event_bus_capacity));

        debug!("Building orchestrator for {} device", device_class);
        let session = ReelSession::new(
            &config,
            device_class,
            Arc::clone(&surface),
            renderer,
            selector,
            event_bus.clone(),
        );
        let (host_sender, host_receiver) = mpsc::unbounded_channel();

        Ok(ReelOrchestrator {
            config,
            session,
            surface,
            provider,
            event_bus,
            host_sender,
            host_receiver: Some(host_receiver),
            media_tasks: Vec::new(),
            component_states: HashMap::new(),
            cancellation_token: CancellationToken::new(),
        })
    }
}
