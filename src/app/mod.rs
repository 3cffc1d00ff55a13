mod orchestrator;
mod runtime;
mod session;
mod shutdown;
mod startup;
mod state;
mod types;


pub use orchestrator::{HostHandle, ReelOrchestrator, ReelOrchestratorBuilder};
pub use session::ReelSession;
pub use types::{ComponentState, Effects, HostEvent, ShutdownReason};
