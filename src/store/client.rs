//! # Order Store Client

use super::message::StoreRequest;
use super::StoreError;
use crate::detect::{DetectSettings, ScanReport, TableChanges};
use crate::model::{Order, OrderCreate, OrderId, OrderUpdate, TableId};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// Cheaply cloneable handle to the [`OrderStoreActor`](super::OrderStoreActor).
///
/// Every method sends one request and awaits the reply. The store shuts down once the
/// last client is dropped.
#[derive(Debug, Clone)]
pub struct OrderStoreClient {
    sender: mpsc::Sender<StoreRequest>,
}

impl OrderStoreClient {
    pub fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, StoreError>>) -> StoreRequest,
    ) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::Closed)?;
        response.await.map_err(|_| StoreError::Dropped)?
    }

    #[instrument(skip(self, params), fields(reference = %params.pos_reference))]
    pub async fn insert(&self, params: OrderCreate) -> Result<OrderId, StoreError> {
        debug!("Sending request");
        self.request(|respond_to| StoreRequest::Insert { params, respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        debug!("Sending request");
        self.request(|respond_to| StoreRequest::Get { id, respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: OrderId, update: OrderUpdate) -> Result<Order, StoreError> {
        debug!("Sending request");
        self.request(|respond_to| StoreRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    /// Marks the order paid. Both detection passes skip it from then on.
    #[instrument(skip(self))]
    pub async fn finalize(&self, id: OrderId) -> Result<Order, StoreError> {
        debug!("Sending request");
        self.request(|respond_to| StoreRequest::Finalize { id, respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: OrderId) -> Result<(), StoreError> {
        debug!("Sending request");
        self.request(|respond_to| StoreRequest::Remove { id, respond_to })
            .await
    }

    pub async fn list(&self) -> Result<Vec<Order>, StoreError> {
        self.request(|respond_to| StoreRequest::List { respond_to })
            .await
    }

    /// Runs the floating-order sweep inside the store and commits its snapshots.
    pub async fn sweep_floating(&self, settings: DetectSettings) -> Result<ScanReport, StoreError> {
        self.request(|respond_to| StoreRequest::SweepFloating {
            settings,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn count_table_changes(&self, table: TableId) -> Result<TableChanges, StoreError> {
        debug!("Sending request");
        self.request(|respond_to| StoreRequest::CountTableChanges { table, respond_to })
            .await
    }
}
