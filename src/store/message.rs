//! # Store Messages
//!
//! Requests understood by the [`OrderStoreActor`](super::OrderStoreActor). Each carries
//! the oneshot sender the actor answers on.

use super::StoreError;
use crate::detect::{DetectSettings, ScanReport, TableChanges};
use crate::model::{Order, OrderCreate, OrderId, OrderUpdate, TableId};
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the store.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// The first group of variants is the host's CRUD surface; the last two are the
/// detection passes, which run inside the actor so they see a consistent order set.
#[derive(Debug)]
pub enum StoreRequest {
    Insert {
        params: OrderCreate,
        respond_to: Response<OrderId>,
    },
    Get {
        id: OrderId,
        respond_to: Response<Option<Order>>,
    },
    Update {
        id: OrderId,
        update: OrderUpdate,
        respond_to: Response<Order>,
    },
    Finalize {
        id: OrderId,
        respond_to: Response<Order>,
    },
    Remove {
        id: OrderId,
        respond_to: Response<()>,
    },
    List {
        respond_to: Response<Vec<Order>>,
    },
    SweepFloating {
        settings: DetectSettings,
        respond_to: Response<ScanReport>,
    },
    CountTableChanges {
        table: TableId,
        respond_to: Response<TableChanges>,
    },
}
