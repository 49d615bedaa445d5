//! What the logged-in employee may do with the selected order.
//!
//! Takeaway orders are locked on the terminal: they are edited by the customer (kiosk or
//! app) and only watched by staff, which is what the change monitor is for. Dine-in
//! orders are editable, with non-privileged staff limited to lines not yet sent to the
//! kitchen. Cashiers additionally lose the order list and the cash in/out screen.

use crate::model::{Employee, FloorId, Line, Order, Role};

/// Increments offered by the quick-quantity keys.
pub const QUICK_QUANTITIES: [u32; 3] = [10, 20, 50];

/// Terminal-wide switches that gate individual numpad keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TerminalSettings {
    /// Enables the manual discount key.
    pub manual_discount: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub can_use_actions: bool,
    pub can_use_numpad: bool,
    /// The +/- key is never available.
    pub can_toggle_sign: bool,
    /// The price key is never available.
    pub can_edit_price: bool,
    pub can_apply_discount: bool,
    pub can_select_lines: bool,
    pub can_add_products: bool,
    pub can_view_orders: bool,
    pub can_cash_in_out: bool,
    privileged: bool,
    locked: bool,
}

impl Capabilities {
    pub fn evaluate(employee: &Employee, order: &Order, terminal: &TerminalSettings) -> Self {
        let privileged = employee.role.is_privileged();
        let locked = order.takeaway;
        let can_use_numpad = !locked && (privileged || order.has_unsent_changes());
        let back_office = employee.role != Role::Cashier;
        Self {
            can_use_actions: !locked,
            can_use_numpad,
            can_toggle_sign: false,
            can_edit_price: false,
            can_apply_discount: can_use_numpad && terminal.manual_discount,
            can_select_lines: !locked,
            can_add_products: !locked,
            can_view_orders: back_office,
            can_cash_in_out: back_office,
            privileged,
            locked,
        }
    }

    pub fn can_edit_line(&self, line: &Line) -> bool {
        !self.locked && (self.privileged || line.has_unsent_changes)
    }
}

pub fn can_open_floating_order(employee: &Employee) -> bool {
    employee.can_manage_takeaway_orders
}

/// Floor to show: `current` if the employee may access it, else their first allowed floor.
pub fn resolve_floor(employee: &Employee, current: Option<FloorId>) -> Option<FloorId> {
    current
        .filter(|floor| employee.can_access_floor(*floor))
        .or_else(|| employee.allowed_floors.first().copied())
}

/// Whether adding `product` should merge into an existing line instead of opening a new one.
///
/// Non-privileged staff may not grow a line the kitchen already has, so a product that
/// was sent gets a new line unless an unsent line of it is still open.
pub fn should_merge_line(employee: &Employee, order: &Order, product: &str) -> bool {
    if employee.role.is_privileged() {
        return true;
    }
    let mut sent = false;
    for line in order.lines.iter().filter(|l| l.product == product) {
        if line.has_unsent_changes {
            return true;
        }
        sent = true;
    }
    !sent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OrderCreate, OrderId, TableId};

    fn dine_in(lines: Vec<Line>) -> Order {
        let mut params = OrderCreate::at_table(TableId(1), "Order 0001");
        params.lines = lines;
        Order::from_create(OrderId(1), params)
    }

    #[test]
    fn test_takeaway_orders_are_locked() {
        let order = Order::from_create(
            OrderId(1),
            OrderCreate::floating("Kiosk").with_line(Line::new("Soup", 1.0, 6.0)),
        );
        let caps = Capabilities::evaluate(
            &Employee::new("Ana", Role::Admin),
            &order,
            &TerminalSettings::default(),
        );

        assert!(!caps.can_use_actions);
        assert!(!caps.can_use_numpad);
        assert!(!caps.can_select_lines);
        assert!(!caps.can_add_products);
        assert!(!caps.can_edit_line(&order.lines[0]));
    }

    #[test]
    fn test_price_key_is_always_disabled() {
        let order = dine_in(vec![Line::new("Soup", 1.0, 6.0)]);
        let terminal = TerminalSettings {
            manual_discount: true,
        };
        for role in [Role::Admin, Role::Manager, Role::Cashier, Role::Waiter] {
            let caps = Capabilities::evaluate(&Employee::new("Iv", role), &order, &terminal);
            assert!(caps.can_use_numpad);
            assert!(!caps.can_edit_price);
        }
    }

    #[test]
    fn test_discount_key_follows_terminal_setting() {
        let manager = Employee::new("Jo", Role::Manager);
        let order = dine_in(vec![Line::new("Soup", 1.0, 6.0)]);

        let caps = Capabilities::evaluate(&manager, &order, &TerminalSettings::default());
        assert!(!caps.can_apply_discount);

        let terminal = TerminalSettings {
            manual_discount: true,
        };
        let caps = Capabilities::evaluate(&manager, &order, &terminal);
        assert!(caps.can_apply_discount);

        // No numpad, no discount key.
        let takeaway = Order::from_create(OrderId(2), OrderCreate::floating("Kiosk"));
        let caps = Capabilities::evaluate(&manager, &takeaway, &terminal);
        assert!(!caps.can_apply_discount);
    }

    #[test]
    fn test_cashier_loses_orders_and_cash_screens() {
        let order = dine_in(vec![Line::new("Soup", 1.0, 6.0)]);
        let terminal = TerminalSettings::default();

        let caps = Capabilities::evaluate(&Employee::new("Ka", Role::Cashier), &order, &terminal);
        assert!(!caps.can_view_orders);
        assert!(!caps.can_cash_in_out);

        for role in [Role::Admin, Role::Manager, Role::Waiter] {
            let caps = Capabilities::evaluate(&Employee::new("Lu", role), &order, &terminal);
            assert!(caps.can_view_orders);
            assert!(caps.can_cash_in_out);
        }
    }

    #[test]
    fn test_waiter_numpad_needs_unsent_changes() {
        let waiter = Employee::new("Bo", Role::Waiter);

        let sent = dine_in(vec![Line::new("Soup", 1.0, 6.0).sent()]);
        let caps = Capabilities::evaluate(&waiter, &sent, &TerminalSettings::default());
        assert!(!caps.can_use_numpad);
        assert!(!caps.can_edit_line(&sent.lines[0]));
        assert!(caps.can_use_actions);

        let pending = dine_in(vec![Line::new("Soup", 1.0, 6.0)]);
        let caps = Capabilities::evaluate(&waiter, &pending, &TerminalSettings::default());
        assert!(caps.can_use_numpad);
        assert!(caps.can_edit_line(&pending.lines[0]));
        assert!(!caps.can_toggle_sign);
    }

    #[test]
    fn test_manager_edits_sent_lines() {
        let order = dine_in(vec![Line::new("Soup", 1.0, 6.0).sent()]);
        let caps = Capabilities::evaluate(
            &Employee::new("Cy", Role::Manager),
            &order,
            &TerminalSettings::default(),
        );
        assert!(caps.can_use_numpad);
        assert!(caps.can_edit_line(&order.lines[0]));
    }

    #[test]
    fn test_floor_resolution() {
        let employee = Employee::new("Di", Role::Cashier).with_floors([FloorId(2), FloorId(3)]);
        assert_eq!(resolve_floor(&employee, Some(FloorId(3))), Some(FloorId(3)));
        assert_eq!(resolve_floor(&employee, Some(FloorId(1))), Some(FloorId(2)));
        assert_eq!(resolve_floor(&employee, None), Some(FloorId(2)));
        assert_eq!(resolve_floor(&Employee::new("Ed", Role::Waiter), None), None);
    }

    #[test]
    fn test_merge_rule() {
        let waiter = Employee::new("Fa", Role::Waiter);
        let order = dine_in(vec![
            Line::new("Soup", 1.0, 6.0).sent(),
            Line::new("Bread", 1.0, 2.0).sent(),
            Line::new("Bread", 1.0, 2.0),
        ]);

        assert!(!should_merge_line(&waiter, &order, "Soup"));
        assert!(should_merge_line(&waiter, &order, "Bread"));
        assert!(should_merge_line(&waiter, &order, "Salad"));
        assert!(should_merge_line(&Employee::new("Gi", Role::Admin), &order, "Soup"));
    }

    #[test]
    fn test_takeaway_permission() {
        let mut employee = Employee::new("Ha", Role::Cashier);
        assert!(can_open_floating_order(&employee));
        employee.can_manage_takeaway_orders = false;
        assert!(!can_open_floating_order(&employee));
    }
}
