//! # Notifications
//!
//! The monitor reports a detected change through a [`Notifier`]. Notifiers are
//! fire-and-forget from the monitor's point of view: it bounds every call with a
//! timeout and only logs failures. Snapshot state is committed before delivery and
//! never depends on the outcome.
//!
//! Two notifiers ship with the crate:
//! - [`LogNotifier`] writes the notice to the log (the "bell" of a headless install).
//! - [`ChannelNotifier`] forwards notices to the host UI over a bounded channel.

pub mod channel;
pub mod log;

pub use channel::ChannelNotifier;
pub use log::LogNotifier;

use crate::model::{Order, OrderId, TableId};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Which detection path raised the notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Floating,
    Table(TableId),
}

/// A detected change, addressed to staff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub order: OrderId,
    /// Floating name or table the staff knows the order by.
    pub label: String,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn floating(order: &Order) -> Self {
        Self {
            order: order.id,
            label: order
                .floating_name
                .clone()
                .unwrap_or_else(|| order.pos_reference.clone()),
            kind: NoticeKind::Floating,
        }
    }

    pub fn table(order: &Order, table: TableId) -> Self {
        Self {
            order: order.id,
            label: table.to_string(),
            kind: NoticeKind::Table(table),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum NotifyError {
    #[error("Notice channel is full")]
    Saturated,

    #[error("Notice channel is closed")]
    Closed,

    #[error("Notifier timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Notifier failed: {0}")]
    Failed(String),
}

/// Write-only sink for change notices.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn notify(&self, notice: &Notice) -> Result<(), NotifyError>;
}

#[async_trait]
impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    async fn notify(&self, notice: &Notice) -> Result<(), NotifyError> {
        (**self).notify(notice).await
    }
}
