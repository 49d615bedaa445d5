use super::{Notice, Notifier, NotifyError};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Forwards notices to whoever plays the sound (usually the host UI).
///
/// Uses `try_send` so a slow consumer never stalls the poll loop: a full
/// channel drops the notice and reports [`NotifyError::Saturated`].
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::Sender<Notice>,
}

impl ChannelNotifier {
    /// Creates the notifier and the receiving end for the consumer.
    pub fn new(buffer_size: usize) -> (Self, mpsc::Receiver<Notice>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn notify(&self, notice: &Notice) -> Result<(), NotifyError> {
        self.sender
            .try_send(notice.clone())
            .map_err(|e| match e {
                TrySendError::Full(_) => NotifyError::Saturated,
                TrySendError::Closed(_) => NotifyError::Closed,
            })
    }
}
