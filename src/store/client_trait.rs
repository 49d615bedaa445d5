//! # OrderStore Trait
//!
//! The narrow view of the store the change monitor depends on. The production
//! implementation is [`OrderStoreClient`]; tests may provide their own.

use super::{OrderStoreClient, StoreError};
use crate::detect::{DetectSettings, ScanReport, TableChanges};
use crate::model::TableId;
use async_trait::async_trait;

#[async_trait]
pub trait OrderStore: Send + Sync + 'static {
    /// One atomic floating-order sweep. Snapshots are committed before this returns.
    async fn sweep_floating(&self, settings: DetectSettings) -> Result<ScanReport, StoreError>;

    async fn count_table_changes(&self, table: TableId) -> Result<TableChanges, StoreError>;
}

#[async_trait]
impl OrderStore for OrderStoreClient {
    async fn sweep_floating(&self, settings: DetectSettings) -> Result<ScanReport, StoreError> {
        OrderStoreClient::sweep_floating(self, settings).await
    }

    async fn count_table_changes(&self, table: TableId) -> Result<TableChanges, StoreError> {
        OrderStoreClient::count_table_changes(self, table).await
    }
}
