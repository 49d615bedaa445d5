//! # Change Detection
//!
//! Pure, synchronous evaluation of order changes. Nothing in here waits, locks or
//! talks to a notifier: callers hand in mutable orders (the store actor does so while
//! it exclusively owns them) and get back the notices to deliver.
//!
//! ## Floating orders
//!
//! [`sweep_floating`] walks every order, skipping anything that is not a live
//! floating order (see [`is_floating`]). For the rest:
//!
//! 1. Every line is compared against its memoized signature; each differing line
//!    counts once and its signature is written through immediately.
//! 2. The order's running line-change count grows by that amount. Orders from the
//!    external channel (remote user + subscription) add a fixed `+1` per scan.
//! 3. The `{change_count, line_count, total_amount}` triple is compared against the
//!    stored [`ChangeSnapshot`](crate::model::ChangeSnapshot). Any difference yields
//!    one [`Notice`](crate::notify::Notice) and replaces the snapshot.
//!
//! ## Tables
//!
//! [`count_table_changes`] sums pending kitchen changes for one table and notifies
//! at most once per call for a self-order whose table snapshot is stale.

mod floating;
mod table;

pub use floating::*;
pub use table::*;

use crate::model::OrderId;
use thiserror::Error;

/// Price tolerance, in currency units, used when none is configured.
pub const DEFAULT_PRICE_EPSILON: f64 = 0.01;

/// Tunables of the detection pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectSettings {
    /// Price and amount differences up to this value are treated as equal.
    pub price_epsilon: f64,
}

impl Default for DetectSettings {
    fn default() -> Self {
        Self {
            price_epsilon: DEFAULT_PRICE_EPSILON,
        }
    }
}

/// Per-order evaluation failure. The sweep records it and moves on.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DetectError {
    #[error("Order {order} has a non-finite total amount")]
    NonFiniteTotal { order: OrderId },

    #[error("Order {order} line {line} has a non-finite {field}")]
    NonFiniteLine {
        order: OrderId,
        line: usize,
        field: &'static str,
    },
}
