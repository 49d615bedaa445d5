use crate::model::snapshot::{ChangeSnapshot, LineChangeSnapshot, TableSnapshot};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

/// Marker carried in `pos_reference` by orders placed at a self-service kiosk.
pub const SELF_ORDER_MARKER: &str = "Self-Order";

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// Type-safe identifier for restaurant tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableId(pub u32);

impl Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "table_{}", self.0)
    }
}

/// Channel an order was placed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderOrigin {
    /// Entered by staff on the terminal (or a kiosk, see [`SELF_ORDER_MARKER`]).
    #[default]
    Pos,
    /// Placed from the mobile ordering app.
    Mobile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    #[default]
    Open,
    Paid,
    Cancelled,
}

/// A single order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub product: String,
    pub qty: f64,
    pub price_subtotal: f64,
    pub note: Option<String>,
    /// Line carries changes not yet sent to the kitchen.
    pub has_unsent_changes: bool,
    #[serde(skip)]
    pub(crate) snapshot: Option<LineChangeSnapshot>,
}

impl Line {
    /// Creates a new, unsent line with no note.
    pub fn new(product: impl Into<String>, qty: f64, price_subtotal: f64) -> Self {
        Self {
            product: product.into(),
            qty,
            price_subtotal,
            note: None,
            has_unsent_changes: true,
            snapshot: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Marks the line as already sent to the kitchen.
    pub fn sent(mut self) -> Self {
        self.has_unsent_changes = false;
        self
    }

    /// The last observed quantity / price / note, if the line was ever inspected.
    pub fn snapshot(&self) -> Option<&LineChangeSnapshot> {
        self.snapshot.as_ref()
    }

    /// Note text with an absent note read as empty.
    pub fn note_text(&self) -> &str {
        self.note.as_deref().unwrap_or("")
    }

    /// Compares the line against its memoized signature and writes it through when it differs.
    ///
    /// Returns `true` when quantity, price (beyond `epsilon`) or note changed since the
    /// last observation. The first observation compares against a zeroed signature.
    pub(crate) fn observe(&mut self, epsilon: f64) -> bool {
        let note = self.note.as_deref().unwrap_or("");
        let snapshot = self.snapshot.get_or_insert_with(LineChangeSnapshot::default);

        let changed = self.qty != snapshot.qty
            || (self.price_subtotal - snapshot.price).abs() > epsilon
            || note != snapshot.note;

        if changed {
            snapshot.qty = self.qty;
            snapshot.price = self.price_subtotal;
            snapshot.note = note.to_string();
            snapshot.change_count += 1;
        }
        changed
    }
}

/// Represents an open (or finalized) point-of-sale order.
///
/// # Change Tracking
/// Besides the business fields the host maintains, an order owns the memoized
/// snapshots the change monitor compares against:
/// - [`ChangeSnapshot`] for the floating-order sweep
/// - [`TableSnapshot`] for the on-demand table counter
/// - one [`LineChangeSnapshot`] per [`Line`]
///
/// Snapshots are created lazily on first inspection and live exactly as long as the
/// in-memory order. They are only written by [`crate::detect`].
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub pos_reference: String,
    pub origin: OrderOrigin,
    pub takeaway: bool,
    pub table: Option<TableId>,
    pub floating_name: Option<String>,
    pub lines: Vec<Line>,
    pub total_amount: f64,
    pub remote_user_id: Option<String>,
    pub subscription_id: Option<String>,
    pub paid_online: bool,
    /// Kitchen changes not yet printed, maintained by the host.
    pub pending_kitchen_changes: u32,
    pub state: OrderState,
    pub ticket_number: Option<u32>,
    pub(crate) observed_line_changes: u64,
    pub(crate) snapshot: Option<ChangeSnapshot>,
    pub(crate) table_snapshot: Option<TableSnapshot>,
}

/// Payload for creating a new order.
///
/// `total_amount` defaults to the sum of line subtotals when left unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderCreate {
    pub pos_reference: String,
    pub origin: OrderOrigin,
    pub takeaway: bool,
    pub table: Option<TableId>,
    pub floating_name: Option<String>,
    pub lines: Vec<Line>,
    pub total_amount: Option<f64>,
    pub remote_user_id: Option<String>,
    pub subscription_id: Option<String>,
    pub paid_online: bool,
    pub pending_kitchen_changes: u32,
}

impl OrderCreate {
    /// A takeaway kiosk order waiting under a floating name.
    pub fn floating(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            pos_reference: format!("{SELF_ORDER_MARKER} {name}"),
            takeaway: true,
            floating_name: Some(name),
            ..Self::default()
        }
    }

    /// A dine-in order bound to `table`.
    pub fn at_table(table: TableId, pos_reference: impl Into<String>) -> Self {
        Self {
            pos_reference: pos_reference.into(),
            table: Some(table),
            ..Self::default()
        }
    }

    pub fn with_line(mut self, line: Line) -> Self {
        self.lines.push(line);
        self
    }

    pub fn with_total(mut self, total: f64) -> Self {
        self.total_amount = Some(total);
        self
    }

    pub fn from_mobile(mut self) -> Self {
        self.origin = OrderOrigin::Mobile;
        self
    }

    /// Tags the order as coming from the external ordering channel.
    pub fn with_remote(mut self, user: impl Into<String>, subscription: impl Into<String>) -> Self {
        self.remote_user_id = Some(user.into());
        self.subscription_id = Some(subscription.into());
        self
    }

    pub fn paid_online(mut self) -> Self {
        self.paid_online = true;
        self
    }

    pub fn with_pending_kitchen_changes(mut self, pending: u32) -> Self {
        self.pending_kitchen_changes = pending;
        self
    }
}

/// Mutations the host applies to a stored order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrderUpdate {
    PushLine(Line),
    ReplaceLines(Vec<Line>),
    SetQuantity { index: usize, qty: f64 },
    SetPrice { index: usize, price_subtotal: f64 },
    SetNote { index: usize, note: Option<String> },
    RemoveLine { index: usize },
    SetTotal(f64),
    /// Recomputes the total from line subtotals.
    RecomputeTotal,
    SetPendingKitchenChanges(u32),
    /// Kitchen tickets printed: nothing is pending any more.
    MarkSent,
}

/// Errors raised while applying an [`OrderUpdate`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UpdateError {
    #[error("Line {index} out of range for {order} ({len} lines)")]
    LineOutOfRange {
        order: OrderId,
        index: usize,
        len: usize,
    },

    #[error("Order {0} is finalized")]
    Finalized(OrderId),
}

impl Order {
    /// Builds the full order from the id assigned by the store and the creation payload.
    pub fn from_create(id: OrderId, params: OrderCreate) -> Self {
        let total_amount = params
            .total_amount
            .unwrap_or_else(|| params.lines.iter().map(|l| l.price_subtotal).sum());
        Self {
            id,
            pos_reference: params.pos_reference,
            origin: params.origin,
            takeaway: params.takeaway,
            table: params.table,
            floating_name: params.floating_name,
            lines: params.lines,
            total_amount,
            remote_user_id: params.remote_user_id,
            subscription_id: params.subscription_id,
            paid_online: params.paid_online,
            pending_kitchen_changes: params.pending_kitchen_changes,
            state: OrderState::Open,
            ticket_number: None,
            observed_line_changes: 0,
            snapshot: None,
            table_snapshot: None,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.state != OrderState::Open
    }

    pub fn is_self_order(&self) -> bool {
        self.pos_reference.contains(SELF_ORDER_MARKER)
    }

    /// Both external-channel identifiers are present.
    pub fn has_remote_subscription(&self) -> bool {
        self.remote_user_id.is_some() && self.subscription_id.is_some()
    }

    pub fn has_unsent_changes(&self) -> bool {
        self.lines.iter().any(|l| l.has_unsent_changes)
    }

    pub fn line_total(&self) -> f64 {
        self.lines.iter().map(|l| l.price_subtotal).sum()
    }

    /// Snapshot stored by the last confirmed floating-order change.
    pub fn snapshot(&self) -> Option<&ChangeSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn table_snapshot(&self) -> Option<&TableSnapshot> {
        self.table_snapshot.as_ref()
    }

    /// Total line changes observed over the order's lifetime.
    pub fn observed_line_changes(&self) -> u64 {
        self.observed_line_changes
    }

    /// Applies a host mutation.
    ///
    /// Removing a line keeps the changes it already contributed to
    /// [`Order::observed_line_changes`].
    pub fn apply(&mut self, update: OrderUpdate) -> Result<(), UpdateError> {
        if self.is_finalized() {
            return Err(UpdateError::Finalized(self.id));
        }
        match update {
            OrderUpdate::PushLine(line) => self.lines.push(line),
            OrderUpdate::ReplaceLines(lines) => self.lines = lines,
            OrderUpdate::SetQuantity { index, qty } => {
                let line = self.line_mut(index)?;
                line.qty = qty;
                line.has_unsent_changes = true;
            }
            OrderUpdate::SetPrice {
                index,
                price_subtotal,
            } => self.line_mut(index)?.price_subtotal = price_subtotal,
            OrderUpdate::SetNote { index, note } => {
                let line = self.line_mut(index)?;
                line.note = note;
                line.has_unsent_changes = true;
            }
            OrderUpdate::RemoveLine { index } => {
                self.line_mut(index)?;
                self.lines.remove(index);
            }
            OrderUpdate::SetTotal(total) => self.total_amount = total,
            OrderUpdate::RecomputeTotal => self.total_amount = self.line_total(),
            OrderUpdate::SetPendingKitchenChanges(pending) => {
                self.pending_kitchen_changes = pending
            }
            OrderUpdate::MarkSent => {
                for line in &mut self.lines {
                    line.has_unsent_changes = false;
                }
                self.pending_kitchen_changes = 0;
            }
        }
        Ok(())
    }

    fn line_mut(&mut self, index: usize) -> Result<&mut Line, UpdateError> {
        let (order, len) = (self.id, self.lines.len());
        self.lines
            .get_mut(index)
            .ok_or(UpdateError::LineOutOfRange { order, index, len })
    }
}
