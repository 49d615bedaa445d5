use std::fmt::Display;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Identifies one run of the poller. Handles from earlier runs are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonitorHandle(u64);

impl Display for MonitorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "poller_{}", self.0)
    }
}

pub(super) struct Running {
    pub(super) handle: MonitorHandle,
    pub(super) shutdown: watch::Sender<bool>,
    pub(super) task: JoinHandle<()>,
}

#[derive(Default)]
pub(super) struct PollerState {
    generation: u64,
    pub(super) running: Option<Running>,
}

impl PollerState {
    pub(super) fn next_handle(&mut self) -> MonitorHandle {
        self.generation += 1;
        MonitorHandle(self.generation)
    }
}
