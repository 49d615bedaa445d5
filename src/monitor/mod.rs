//! # Change Monitor
//!
//! Drives change detection over time. A single background poller asks the store for a
//! floating-order sweep every `poll_interval` (or sooner, when the host calls
//! [`ChangeMonitor::signal_changed`]) and delivers the resulting notices.
//!
//! ## Lifecycle
//!
//! ```text
//!   start() ──► poller task ──tick / wake──► scan() ──► store sweep ──► notifier
//!                    ▲                                                     │
//!   stop(handle) ────┴── watch(true), await task ◄─────────────────────────┘
//! ```
//!
//! - [`start`](ChangeMonitor::start) is idempotent: while a poller runs, it returns that
//!   poller's handle instead of spawning a second one.
//! - [`stop`](ChangeMonitor::stop) waits for the poller to exit. The poller re-checks the
//!   shutdown flag before every notice, so nothing is delivered once `stop` returns.
//! - Scans never overlap: timer ticks, wake-ups and manual [`scan`](ChangeMonitor::scan)
//!   calls go through the same async gate.
//!
//! ## Failure handling
//!
//! A store error aborts only the current tick. A failed or slow notifier is logged and
//! counted; the snapshots were already committed by the sweep, so the change is not
//! re-announced. The same holds for notices dropped because `stop` landed mid-scan:
//! their order ids are logged at `warn`.

mod handle;

pub use handle::MonitorHandle;

use crate::config::MonitorConfig;
use crate::detect::{DetectSettings, TableChanges};
use crate::model::TableId;
use crate::notify::{Notice, Notifier, NotifyError};
use crate::store::{OrderStore, StoreError};
use handle::{PollerState, Running};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{watch, Notify};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Poller task failed: {0}")]
    TaskFailed(String),
}

/// Counters of one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Floating orders evaluated by the sweep.
    pub inspected: usize,
    /// Notices the notifier accepted.
    pub notified: usize,
    /// Orders skipped because they were malformed.
    pub failed_orders: usize,
    /// Notices that errored or timed out.
    pub failed_notices: usize,
    /// Notices dropped because the monitor was stopping.
    pub suppressed: usize,
}

struct Inner<S, N> {
    store: S,
    notifier: N,
    settings: DetectSettings,
    poll_interval: Duration,
    notify_timeout: Duration,
    scan_gate: tokio::sync::Mutex<()>,
    wake: Notify,
}

/// Periodic change monitor over an [`OrderStore`], announcing through a [`Notifier`].
pub struct ChangeMonitor<S, N> {
    inner: Arc<Inner<S, N>>,
    poller: Arc<Mutex<PollerState>>,
}

impl<S, N> Clone for ChangeMonitor<S, N> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            poller: self.poller.clone(),
        }
    }
}

impl<S: OrderStore, N: Notifier> ChangeMonitor<S, N> {
    pub fn new(store: S, notifier: N, config: &MonitorConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                notifier,
                settings: config.detect_settings(),
                poll_interval: config.poll_interval(),
                notify_timeout: config.notify_timeout(),
                scan_gate: tokio::sync::Mutex::new(()),
                wake: Notify::new(),
            }),
            poller: Arc::default(),
        }
    }

    /// Starts the background poller, or returns the handle of the one already running.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self) -> MonitorHandle {
        let mut state = self.poller.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(running) = state.running.as_ref().filter(|r| !r.task.is_finished()) {
            debug!(handle = %running.handle, "Monitor already running");
            return running.handle;
        }

        let handle = state.next_handle();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(poll(self.inner.clone(), shutdown_rx));
        state.running = Some(Running {
            handle,
            shutdown: shutdown_tx,
            task,
        });
        info!(%handle, interval = ?self.inner.poll_interval, "Monitor started");
        handle
    }

    /// Stops the poller identified by `handle` and waits for it to exit.
    ///
    /// Returns `Ok(false)` when `handle` is not the running poller (already stopped, or
    /// replaced by a later `start`).
    pub async fn stop(&self, handle: MonitorHandle) -> Result<bool, MonitorError> {
        let running = {
            let mut state = self.poller.lock().unwrap_or_else(PoisonError::into_inner);
            match state.running.take() {
                Some(running) if running.handle == handle => running,
                other => {
                    state.running = other;
                    debug!(%handle, "Stale monitor handle");
                    return Ok(false);
                }
            }
        };

        let _ = running.shutdown.send(true);
        running
            .task
            .await
            .map_err(|e| MonitorError::TaskFailed(e.to_string()))?;
        info!(%handle, "Monitor stopped");
        Ok(true)
    }

    pub fn is_running(&self) -> bool {
        self.poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .running
            .as_ref()
            .is_some_and(|r| !r.task.is_finished())
    }

    /// Asks the running poller to scan now instead of waiting for the next tick.
    ///
    /// Signals coalesce: several calls during one scan cause a single extra scan.
    pub fn signal_changed(&self) {
        self.inner.wake.notify_one();
    }

    /// Runs one sweep and delivers its notices, independently of the poller.
    pub async fn scan(&self) -> Result<ScanSummary, MonitorError> {
        self.inner.scan(None).await
    }

    /// Counts pending kitchen changes at `table`, announcing a stale self-order if any.
    pub async fn table_changes(&self, table: TableId) -> Result<TableChanges, MonitorError> {
        let _gate = self.inner.scan_gate.lock().await;
        let changes = self.inner.store.count_table_changes(table).await?;
        if let Some(notice) = &changes.notice {
            self.inner.deliver(notice).await;
        }
        Ok(changes)
    }
}

impl<S: OrderStore, N: Notifier> Inner<S, N> {
    async fn scan(
        &self,
        shutdown: Option<&watch::Receiver<bool>>,
    ) -> Result<ScanSummary, MonitorError> {
        let _gate = self.scan_gate.lock().await;
        let report = self.store.sweep_floating(self.settings).await?;

        let mut summary = ScanSummary {
            inspected: report.inspected,
            failed_orders: report.failures.len(),
            ..ScanSummary::default()
        };

        let mut suppressed = Vec::new();
        for notice in &report.notices {
            if shutdown.is_some_and(|rx| *rx.borrow()) {
                suppressed.push(notice.order);
                continue;
            }
            if self.deliver(notice).await {
                summary.notified += 1;
            } else {
                summary.failed_notices += 1;
            }
        }

        if !suppressed.is_empty() {
            summary.suppressed = suppressed.len();
            // Their snapshots are already committed: these changes will not be announced.
            warn!(orders = ?suppressed, "Monitor stopping, notices dropped");
        }

        if summary != ScanSummary::default() {
            debug!(?summary, "Scan finished");
        }
        Ok(summary)
    }

    /// Delivers one notice within `notify_timeout`. Returns whether it was accepted.
    async fn deliver(&self, notice: &Notice) -> bool {
        let result = match time::timeout(self.notify_timeout, self.notifier.notify(notice)).await {
            Ok(result) => result,
            Err(_) => Err(NotifyError::TimedOut(self.notify_timeout)),
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(order = %notice.order, error = %e, "Notification failed");
                false
            }
        }
    }
}

async fn poll<S: OrderStore, N: Notifier>(
    inner: Arc<Inner<S, N>>,
    mut shutdown: watch::Receiver<bool>,
) {
    // `interval_at` panics on a zero period.
    let period = inner.poll_interval.max(Duration::from_millis(1));
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            // A dropped sender means the monitor itself is gone.
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
            _ = inner.wake.notified() => debug!("Woken for scan"),
        }
        if *shutdown.borrow() {
            break;
        }
        if let Err(e) = inner.scan(Some(&shutdown)).await {
            warn!(error = %e, "Scan failed, retrying next tick");
        }
    }

    debug!("Poller exited");
}
