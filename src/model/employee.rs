use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for restaurant floors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FloorId(pub u32);

impl Display for FloorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "floor_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Cashier,
    Waiter,
}

impl Role {
    /// Admins and managers bypass the line locks.
    pub fn is_privileged(self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }
}

/// The staff member currently logged in at the terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    pub role: Role,
    pub allowed_floors: Vec<FloorId>,
    pub can_manage_takeaway_orders: bool,
}

impl Employee {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
            allowed_floors: Vec::new(),
            can_manage_takeaway_orders: true,
        }
    }

    pub fn with_floors(mut self, floors: impl IntoIterator<Item = FloorId>) -> Self {
        self.allowed_floors = floors.into_iter().collect();
        self
    }

    pub fn can_access_floor(&self, floor: FloorId) -> bool {
        self.allowed_floors.contains(&floor)
    }
}
