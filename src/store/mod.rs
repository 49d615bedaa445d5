//! # Order Store
//!
//! In-memory home of all orders, built as an actor: [`OrderStoreActor`] owns the orders
//! and processes requests one at a time; [`OrderStoreClient`] is the cloneable handle
//! the host and the monitor talk to.
//!
//! ```rust
//! use order_monitor::model::{Line, OrderCreate, OrderUpdate};
//! use order_monitor::store;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = store::new(16);
//!     tokio::spawn(actor.run());
//!
//!     let id = client
//!         .insert(OrderCreate::floating("Kiosk 1").with_line(Line::new("Tea", 1.0, 2.5)))
//!         .await
//!         .unwrap();
//!     let order = client
//!         .update(id, OrderUpdate::SetQuantity { index: 0, qty: 2.0 })
//!         .await
//!         .unwrap();
//!     assert_eq!(order.lines[0].qty, 2.0);
//! }
//! ```

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::OrderStoreActor;
pub use client::OrderStoreClient;
pub use client_trait::OrderStore;
pub use error::StoreError;
pub use message::StoreRequest;

/// Creates an unstarted store actor and its client. Spawn `actor.run()` to serve requests.
pub fn new(buffer_size: usize) -> (OrderStoreActor, OrderStoreClient) {
    OrderStoreActor::new(buffer_size)
}
