//! Payment method gating for orders already paid through the online channel.

use crate::model::Order;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Method reserved for settling orders paid online.
pub const ONLINE_METHOD_NAME: &str = "Online Menupro";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodType {
    #[default]
    Cash,
    Card,
    Online,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentMethod {
    pub name: String,
    pub method_type: PaymentMethodType,
    pub is_online_payment: bool,
    pub use_payment_terminal: bool,
    pub menupro_online_payment: bool,
}

impl PaymentMethod {
    pub fn new(name: impl Into<String>, method_type: PaymentMethodType) -> Self {
        Self {
            name: name.into(),
            method_type,
            ..Self::default()
        }
    }

    pub fn is_reserved(&self) -> bool {
        self.name == ONLINE_METHOD_NAME
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaymentError {
    #[error("Order was paid online; only \"Online Menupro\" is accepted, not {0:?}")]
    OnlineOnly(String),
    #[error("\"Online Menupro\" is reserved for orders paid online")]
    ReservedForOnline,
}

/// Looks like an electronic method: by name, by type, or by any online flag.
pub fn is_online_method(method: &PaymentMethod) -> bool {
    if method.is_reserved() {
        return true;
    }
    let name = method.name.to_lowercase();
    name.contains("online")
        || name.contains("menupro")
        || matches!(
            method.method_type,
            PaymentMethodType::Card | PaymentMethodType::Online
        )
        || method.is_online_payment
        || method.use_payment_terminal
        || method.menupro_online_payment
}

/// Orders paid online settle only with the reserved method, and no other order may use it.
pub fn check_payment_method(order: &Order, method: &PaymentMethod) -> Result<(), PaymentError> {
    match (order.paid_online, method.is_reserved()) {
        (true, false) => Err(PaymentError::OnlineOnly(method.name.clone())),
        (false, true) => Err(PaymentError::ReservedForOnline),
        _ => Ok(()),
    }
}

/// Method to preselect on the payment screen of an online-paid order.
pub fn preselect_method(methods: &[PaymentMethod]) -> Option<&PaymentMethod> {
    methods
        .iter()
        .find(|m| m.is_reserved())
        .or_else(|| methods.iter().find(|m| is_online_method(m)))
        .or_else(|| methods.first())
}
