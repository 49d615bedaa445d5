//! Memoized change signatures owned by orders and lines.
//!
//! None of these are persisted: they are created on first inspection and overwritten
//! each time a change is confirmed.

/// Order-level signature compared by the floating-order sweep.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChangeSnapshot {
    pub change_count: u64,
    pub line_count: usize,
    pub total_amount: f64,
}

impl ChangeSnapshot {
    /// The signature an order starts from: no changes, no lines, its current total.
    pub fn initial(total_amount: f64) -> Self {
        Self {
            change_count: 0,
            line_count: 0,
            total_amount,
        }
    }

    pub fn differs_from(&self, other: &ChangeSnapshot, epsilon: f64) -> bool {
        self.change_count != other.change_count
            || self.line_count != other.line_count
            || (self.total_amount - other.total_amount).abs() > epsilon
    }
}

/// Last observed quantity, price and note of a line.
///
/// `change_count` counts confirmed changes and never decreases.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineChangeSnapshot {
    pub qty: f64,
    pub price: f64,
    pub note: String,
    pub change_count: u64,
}

/// Signature used by the table change counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableSnapshot {
    pub change_count: u32,
    pub line_count: usize,
}
