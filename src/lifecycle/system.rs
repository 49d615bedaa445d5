use crate::config::MonitorConfig;
use crate::monitor::{ChangeMonitor, MonitorError, MonitorHandle};
use crate::notify::{ChannelNotifier, Notice, Notifier};
use crate::store::{self, OrderStoreClient};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Wires the order store and the change monitor together and owns their tasks.
///
/// # Example
///
/// ```rust
/// use order_monitor::config::MonitorConfig;
/// use order_monitor::lifecycle::MonitorSystem;
/// use order_monitor::model::{Line, OrderCreate};
///
/// #[tokio::main]
/// async fn main() {
///     let (system, mut notices) = MonitorSystem::with_channel(&MonitorConfig::default());
///
///     system
///         .store
///         .insert(OrderCreate::floating("Kiosk 2").with_line(Line::new("Wrap", 1.0, 7.0)))
///         .await
///         .unwrap();
///     system.monitor.scan().await.unwrap();
///     assert!(notices.recv().await.is_some());
///
///     system.shutdown().await.unwrap();
/// }
/// ```
pub struct MonitorSystem<N> {
    /// Host-facing handle to the orders.
    pub store: OrderStoreClient,
    pub monitor: ChangeMonitor<OrderStoreClient, N>,
    poller: MonitorHandle,
    store_task: JoinHandle<()>,
}

impl<N: Notifier> MonitorSystem<N> {
    /// Spawns the store actor and starts the poller.
    pub fn start(config: &MonitorConfig, notifier: N) -> Self {
        let (actor, store) = store::new(config.store_buffer);
        let store_task = tokio::spawn(actor.run());

        let monitor = ChangeMonitor::new(store.clone(), notifier, config);
        let poller = monitor.start();

        Self {
            store,
            monitor,
            poller,
            store_task,
        }
    }

    /// Stops the poller, then closes the store and waits for it to drain.
    ///
    /// Clones of the store client or the monitor held elsewhere keep the store alive, so
    /// drop them first.
    pub async fn shutdown(self) -> Result<(), MonitorError> {
        info!("Shutting down monitor system...");

        self.monitor.stop(self.poller).await?;
        drop(self.monitor);
        drop(self.store);

        if let Err(e) = self.store_task.await {
            error!(error = %e, "Order store task failed");
            return Err(MonitorError::TaskFailed(e.to_string()));
        }

        info!("Monitor system shutdown complete.");
        Ok(())
    }
}

impl MonitorSystem<ChannelNotifier> {
    /// Starts a system whose notices are forwarded to the returned receiver.
    pub fn with_channel(config: &MonitorConfig) -> (Self, mpsc::Receiver<Notice>) {
        let (notifier, notices) = ChannelNotifier::new(config.notice_buffer);
        (Self::start(config, notifier), notices)
    }
}
