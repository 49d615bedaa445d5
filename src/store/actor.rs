//! # Order Store Actor
//!
//! The `OrderStoreActor` owns every in-memory order together with the snapshots the
//! change monitor keeps on them. It processes requests sequentially, so a sweep never
//! interleaves with a host mutation and no order is ever observed half-updated.

use super::client::OrderStoreClient;
use super::message::StoreRequest;
use super::StoreError;
use crate::detect;
use crate::model::{Order, OrderId, OrderState, UpdateError};
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The server half of the store.
///
/// Orders are kept in a `BTreeMap` so both detection passes walk them in id order,
/// which makes "the first self-order at a table" well defined.
pub struct OrderStoreActor {
    receiver: mpsc::Receiver<StoreRequest>,
    orders: BTreeMap<OrderId, Order>,
    next_id: u32,
}

impl OrderStoreActor {
    /// Creates the actor and its client.
    ///
    /// `buffer_size` is the request channel capacity; callers wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, OrderStoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            orders: BTreeMap::new(),
            next_id: 1,
        };
        (actor, OrderStoreClient::new(sender))
    }

    /// Runs the event loop until every client is dropped.
    pub async fn run(mut self) {
        info!("Order store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Insert { params, respond_to } => {
                    let id = OrderId(self.next_id);
                    self.next_id += 1;
                    debug!(%id, reference = %params.pos_reference, "Insert");
                    self.orders.insert(id, Order::from_create(id, params));
                    info!(%id, size = self.orders.len(), "Inserted");
                    let _ = respond_to.send(Ok(id));
                }
                StoreRequest::Get { id, respond_to } => {
                    let order = self.orders.get(&id).cloned();
                    debug!(%id, found = order.is_some(), "Get");
                    let _ = respond_to.send(Ok(order));
                }
                StoreRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(%id, ?update, "Update");
                    let result = match self.orders.get_mut(&id) {
                        Some(order) => order
                            .apply(update)
                            .map(|()| order.clone())
                            .map_err(StoreError::from),
                        None => Err(StoreError::NotFound(id)),
                    };
                    if let Err(e) = &result {
                        warn!(%id, error = %e, "Update failed");
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Finalize { id, respond_to } => {
                    let result = match self.orders.get_mut(&id) {
                        Some(order) if order.is_finalized() => {
                            Err(StoreError::Update(UpdateError::Finalized(id)))
                        }
                        Some(order) => {
                            order.state = OrderState::Paid;
                            info!(%id, "Finalized");
                            Ok(order.clone())
                        }
                        None => Err(StoreError::NotFound(id)),
                    };
                    if let Err(e) = &result {
                        warn!(%id, error = %e, "Finalize failed");
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Remove { id, respond_to } => {
                    let result = match self.orders.remove(&id) {
                        Some(_) => {
                            info!(%id, size = self.orders.len(), "Removed");
                            Ok(())
                        }
                        None => {
                            warn!(%id, "Not found");
                            Err(StoreError::NotFound(id))
                        }
                    };
                    let _ = respond_to.send(result);
                }
                StoreRequest::List { respond_to } => {
                    let _ = respond_to.send(Ok(self.orders.values().cloned().collect()));
                }
                StoreRequest::SweepFloating {
                    settings,
                    respond_to,
                } => {
                    let report = detect::sweep_floating(self.orders.values_mut(), &settings);
                    debug!(
                        inspected = report.inspected,
                        changed = report.notices.len(),
                        failed = report.failures.len(),
                        "Sweep"
                    );
                    let _ = respond_to.send(Ok(report));
                }
                StoreRequest::CountTableChanges { table, respond_to } => {
                    let changes = detect::count_table_changes(self.orders.values_mut(), table);
                    debug!(%table, changes = changes.changes, "Table changes");
                    let _ = respond_to.send(Ok(changes));
                }
            }
        }

        info!(size = self.orders.len(), "Order store shutdown");
    }
}
