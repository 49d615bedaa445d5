//! Runtime wiring: the [`MonitorSystem`] orchestrator and [`setup_tracing`].

pub mod system;
pub mod tracing;

pub use system::MonitorSystem;
pub use self::tracing::setup_tracing;
