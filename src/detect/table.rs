use crate::model::{Order, TableId, TableSnapshot};
use crate::notify::Notice;
use tracing::debug;

/// Result of counting pending changes at one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableChanges {
    pub table: TableId,
    /// Sum of pending kitchen changes over the table's open orders.
    pub changes: u32,
    /// At most one notice, for the first self-order whose signature moved.
    pub notice: Option<Notice>,
}

/// Sums pending kitchen changes at `table` and flags the first stale self-order.
///
/// Only the first qualifying self-order (in iteration order) is compared and
/// overwritten per call; a table with several self-orders rings at most once.
pub fn count_table_changes<'a, I>(orders: I, table: TableId) -> TableChanges
where
    I: IntoIterator<Item = &'a mut Order>,
{
    let at_table: Vec<&mut Order> = orders
        .into_iter()
        .filter(|o| o.table == Some(table) && !o.is_finalized())
        .collect();

    let changes = at_table
        .iter()
        .map(|o| o.pending_kitchen_changes)
        .fold(0u32, u32::saturating_add);

    let mut notice = None;
    if changes > 0 {
        for order in at_table.into_iter().filter(|o| o.is_self_order()) {
            let fresh = TableSnapshot {
                change_count: changes,
                line_count: order.lines.len(),
            };
            if order.table_snapshot == Some(fresh) {
                continue;
            }
            debug!(order = %order.id, %table, changes, "Self-order table changes");
            order.table_snapshot = Some(fresh);
            notice = Some(Notice::table(order, table));
            break;
        }
    }

    TableChanges {
        table,
        changes,
        notice,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Line, OrderCreate, OrderId, OrderState};

    fn seated(id: u32, table: u32, reference: &str, pending: u32) -> Order {
        Order::from_create(
            OrderId(id),
            OrderCreate::at_table(TableId(table), reference)
                .with_line(Line::new("Pasta", 1.0, 11.0))
                .with_pending_kitchen_changes(pending),
        )
    }

    #[test]
    fn test_counts_only_open_orders_at_table() {
        let mut a = seated(1, 5, "Order 0001", 2);
        let mut b = seated(2, 5, "Order 0002", 3);
        let mut other = seated(3, 6, "Order 0003", 7);
        let mut paid = seated(4, 5, "Order 0004", 9);
        paid.state = OrderState::Paid;

        let result = count_table_changes([&mut a, &mut b, &mut other, &mut paid], TableId(5));
        assert_eq!(result.changes, 5);
        assert!(result.notice.is_none());
    }

    #[test]
    fn test_self_order_rings_once_until_signature_moves() {
        let mut kiosk = seated(1, 5, "Self-Order 0001", 2);

        let first = count_table_changes([&mut kiosk], TableId(5));
        assert_eq!(first.notice.map(|n| n.order), Some(OrderId(1)));
        assert_eq!(
            kiosk.table_snapshot(),
            Some(&TableSnapshot {
                change_count: 2,
                line_count: 1
            })
        );

        assert!(count_table_changes([&mut kiosk], TableId(5)).notice.is_none());

        kiosk.pending_kitchen_changes = 3;
        assert!(count_table_changes([&mut kiosk], TableId(5)).notice.is_some());
    }

    #[test]
    fn test_only_first_stale_self_order_notifies() {
        let mut first = seated(1, 5, "Self-Order 0001", 1);
        let mut second = seated(2, 5, "Self-Order 0002", 1);

        let result = count_table_changes([&mut first, &mut second], TableId(5));
        assert_eq!(result.notice.map(|n| n.order), Some(OrderId(1)));
        assert!(second.table_snapshot().is_none());

        // The first is now current, so the next call moves on to the second.
        let result = count_table_changes([&mut first, &mut second], TableId(5));
        assert_eq!(result.notice.map(|n| n.order), Some(OrderId(2)));
    }

    #[test]
    fn test_nothing_pending_never_notifies() {
        let mut kiosk = seated(1, 5, "Self-Order 0001", 0);
        let result = count_table_changes([&mut kiosk], TableId(5));
        assert_eq!(result.changes, 0);
        assert!(result.notice.is_none());
        assert!(kiosk.table_snapshot().is_none());
    }
}
