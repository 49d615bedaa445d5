//! # Mock Store
//!
//! [`MockStore`] hands out a real [`OrderStoreClient`] whose requests are answered from a
//! queue of expectations instead of by an actor. It makes store failures trivial to
//! inject into monitor tests:
//!
//! ```rust
//! use order_monitor::detect::ScanReport;
//! use order_monitor::store::mock::MockStore;
//! use order_monitor::store::StoreError;
//! use order_monitor::detect::DetectSettings;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockStore::new();
//!     mock.expect_sweep().return_err(StoreError::Closed);
//!     mock.expect_sweep().return_ok(ScanReport::default());
//!
//!     let client = mock.client();
//!     let settings = DetectSettings::default();
//!     assert_eq!(client.sweep_floating(settings).await, Err(StoreError::Closed));
//!     assert!(client.sweep_floating(settings).await.is_ok());
//!     mock.verify();
//! }
//! ```
//!
//! For step-by-step control use [`create_mock_store`] and answer requests by hand with
//! [`expect_sweep`].

use super::message::{Response, StoreRequest};
use super::{OrderStoreClient, StoreError};
use crate::detect::{DetectSettings, ScanReport, TableChanges};
use crate::model::TableId;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;

enum Expectation {
    Sweep {
        response: Result<ScanReport, StoreError>,
    },
    Table {
        table: TableId,
        response: Result<TableChanges, StoreError>,
    },
}

type Expectations = Arc<Mutex<VecDeque<Expectation>>>;

/// A store stand-in answering detection requests from an expectation queue.
///
/// Requests arriving with no matching expectation panic the responder task, which
/// closes the channel, so the caller sees [`StoreError::Closed`] or [`StoreError::Dropped`].
pub struct MockStore {
    client: OrderStoreClient,
    expectations: Expectations,
    _handle: tokio::task::JoinHandle<()>,
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStore {
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<StoreRequest>(100);
        let expectations: Expectations = Arc::default();
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = queue
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .pop_front();

                match (request, expectation) {
                    (
                        StoreRequest::SweepFloating { respond_to, .. },
                        Some(Expectation::Sweep { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::CountTableChanges { table, respond_to },
                        Some(Expectation::Table {
                            table: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(table, expected, "Unexpected table");
                        let _ = respond_to.send(response);
                    }
                    (request, _) => {
                        panic!("Unexpected request or expectation mismatch: {request:?}");
                    }
                }
            }
        });

        Self {
            client: OrderStoreClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    pub fn client(&self) -> OrderStoreClient {
        self.client.clone()
    }

    /// Expects one `sweep_floating` request.
    pub fn expect_sweep(&self) -> SweepExpectationBuilder {
        SweepExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Expects one `count_table_changes` request for `table`.
    pub fn expect_table(&self, table: TableId) -> TableExpectationBuilder {
        TableExpectationBuilder {
            table,
            expectations: self.expectations.clone(),
        }
    }

    /// Panics unless every expectation was consumed.
    pub fn verify(&self) {
        let remaining = self
            .expectations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        if remaining > 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }

    /// Number of expectations not yet consumed.
    pub fn remaining(&self) -> usize {
        self.expectations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

fn push(expectations: &Expectations, expectation: Expectation) {
    expectations
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push_back(expectation);
}

pub struct SweepExpectationBuilder {
    expectations: Expectations,
}

impl SweepExpectationBuilder {
    pub fn return_ok(self, report: ScanReport) {
        push(&self.expectations, Expectation::Sweep { response: Ok(report) });
    }

    pub fn return_err(self, error: StoreError) {
        push(
            &self.expectations,
            Expectation::Sweep {
                response: Err(error),
            },
        );
    }
}

pub struct TableExpectationBuilder {
    table: TableId,
    expectations: Expectations,
}

impl TableExpectationBuilder {
    pub fn return_ok(self, changes: TableChanges) {
        push(
            &self.expectations,
            Expectation::Table {
                table: self.table,
                response: Ok(changes),
            },
        );
    }

    pub fn return_err(self, error: StoreError) {
        push(
            &self.expectations,
            Expectation::Table {
                table: self.table,
                response: Err(error),
            },
        );
    }
}

/// Creates a client and the raw receiver its requests arrive on.
pub fn create_mock_store(buffer_size: usize) -> (OrderStoreClient, mpsc::Receiver<StoreRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (OrderStoreClient::new(sender), receiver)
}

/// Waits for the next request and returns it if it is a sweep.
pub async fn expect_sweep(
    receiver: &mut mpsc::Receiver<StoreRequest>,
) -> Option<(DetectSettings, Response<ScanReport>)> {
    match receiver.recv().await {
        Some(StoreRequest::SweepFloating {
            settings,
            respond_to,
        }) => Some((settings, respond_to)),
        _ => None,
    }
}
