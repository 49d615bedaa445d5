use super::{DetectError, DetectSettings};
use crate::model::{ChangeSnapshot, Order, OrderId, OrderOrigin};
use crate::notify::Notice;
use tracing::{debug, warn};

/// Outcome of one sweep over the stored orders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    /// Live floating orders that were evaluated (including the ones that failed).
    pub inspected: usize,
    /// Notices to deliver, in order id order.
    pub notices: Vec<Notice>,
    pub failures: Vec<(OrderId, DetectError)>,
}

/// A takeaway order with no table, waiting under a name, placed at a kiosk or from the app.
pub fn is_floating(order: &Order) -> bool {
    order.takeaway
        && order.table.is_none()
        && order.floating_name.as_deref().is_some_and(|n| !n.is_empty())
        && (order.is_self_order() || order.origin == OrderOrigin::Mobile)
}

/// Evaluates one order and commits its snapshots.
///
/// Returns `Ok(None)` without touching anything for orders that are not live floating
/// orders. Malformed orders are rejected before any snapshot is written.
pub fn evaluate_floating(
    order: &mut Order,
    settings: &DetectSettings,
) -> Result<Option<Notice>, DetectError> {
    if !is_floating(order) || order.is_finalized() {
        return Ok(None);
    }
    validate(order)?;

    let epsilon = settings.price_epsilon;
    let mut line_changes = 0;
    for line in &mut order.lines {
        if line.observe(epsilon) {
            line_changes += 1;
        }
    }
    order.observed_line_changes += line_changes;

    let mut change_count = order.observed_line_changes;
    if order.has_remote_subscription() {
        change_count += 1;
    }

    let fresh = ChangeSnapshot {
        change_count,
        line_count: order.lines.len(),
        total_amount: order.total_amount,
    };
    let total = order.total_amount;
    let stored = order
        .snapshot
        .get_or_insert_with(|| ChangeSnapshot::initial(total));

    if !stored.differs_from(&fresh, epsilon) {
        return Ok(None);
    }
    debug!(order = %order.id, line_changes, ?fresh, "Floating order changed");
    order.snapshot = Some(fresh);
    Ok(Some(Notice::floating(order)))
}

/// Evaluates every order, isolating failures per order.
pub fn sweep_floating<'a, I>(orders: I, settings: &DetectSettings) -> ScanReport
where
    I: IntoIterator<Item = &'a mut Order>,
{
    let mut report = ScanReport::default();
    for order in orders {
        if !is_floating(order) || order.is_finalized() {
            continue;
        }
        report.inspected += 1;
        match evaluate_floating(order, settings) {
            Ok(Some(notice)) => report.notices.push(notice),
            Ok(None) => {}
            Err(e) => {
                warn!(order = %order.id, error = %e, "Skipping order");
                report.failures.push((order.id, e));
            }
        }
    }
    report
}

fn validate(order: &Order) -> Result<(), DetectError> {
    if !order.total_amount.is_finite() {
        return Err(DetectError::NonFiniteTotal { order: order.id });
    }
    for (index, line) in order.lines.iter().enumerate() {
        let field = if !line.qty.is_finite() {
            "quantity"
        } else if !line.price_subtotal.is_finite() {
            "subtotal"
        } else {
            continue;
        };
        return Err(DetectError::NonFiniteLine {
            order: order.id,
            line: index,
            field,
        });
    }
    Ok(())
}
