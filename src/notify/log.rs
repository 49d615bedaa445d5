use super::{Notice, NoticeKind, Notifier, NotifyError};
use async_trait::async_trait;
use tracing::info;

/// Announces notices in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notice: &Notice) -> Result<(), NotifyError> {
        match notice.kind {
            NoticeKind::Floating => {
                info!(order = %notice.order, label = %notice.label, "Floating order updated")
            }
            NoticeKind::Table(table) => {
                info!(order = %notice.order, %table, "Self-order changes at table")
            }
        }
        Ok(())
    }
}
