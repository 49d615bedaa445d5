//! Pure data structures: orders, lines, their change snapshots and the staff using the terminal.

pub mod employee;
pub mod order;
pub mod snapshot;

pub use employee::*;
pub use order::*;
pub use snapshot::*;
