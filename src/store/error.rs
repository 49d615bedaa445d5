//! # Store Errors

use crate::model::{OrderId, UpdateError};

/// Errors returned by the order store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("Order store closed")]
    Closed,
    #[error("Order store dropped response channel")]
    Dropped,
    #[error("Order not found: {0}")]
    NotFound(OrderId),
    #[error(transparent)]
    Update(#[from] UpdateError),
}
