//! # Order Change Monitor
//!
//! > **Ring a bell when a customer changes their own order.**
//!
//! Kiosk and mobile-app orders wait on the restaurant terminal under a *floating name*
//! until staff pick them up. Customers can keep editing them in the meantime. This crate
//! watches those orders, detects meaningful changes (quantities, prices, notes, line
//! count, total) and announces each one exactly once.
//!
//! ## 🏗️ Design
//!
//! ### Snapshots live with the order
//! Every order and every line carries the signature it had when it was last inspected.
//! A change is "new" when the current state differs from that signature; the signature is
//! then overwritten. No global registry, nothing persisted.
//!
//! ### One owner for all orders
//! Orders live in a single actor ([`store::OrderStoreActor`]) that processes requests
//! sequentially. A sweep runs *inside* the actor, so it never sees an order half-updated
//! by the host and never races another sweep.
//!
//! ### Notifications are fire-and-forget
//! Snapshots are committed before a [`notify::Notifier`] is called. A slow or failing
//! notifier is bounded by a timeout and logged; it can neither block the poller nor cause
//! a change to be announced twice.
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`]: orders, lines, employees and the snapshot types.
//! - [`detect`]: pure change detection (floating sweep, table counter).
//! - [`store`]: the order store actor, its client and a scripted mock.
//! - [`notify`]: the notifier seam, with log and channel implementations.
//! - [`monitor`]: the periodic [`ChangeMonitor`](monitor::ChangeMonitor).
//! - [`lifecycle`]: [`MonitorSystem`](lifecycle::MonitorSystem) wiring and tracing setup.
//! - [`config`]: layered [`MonitorConfig`](config::MonitorConfig).
//! - [`capabilities`], [`payment`], [`ticket`]: terminal rules around the same orders.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run
//! RUST_LOG=debug cargo run -- --config-file monitor.toml --rounds 5
//! ```

pub mod capabilities;
pub mod config;
pub mod detect;
pub mod lifecycle;
pub mod model;
pub mod monitor;
pub mod notify;
pub mod payment;
pub mod store;
pub mod ticket;
