//! Status and role enums for orders, payments, and users.

use serde::{Deserialize, Serialize};

/// Order fulfillment status as reported by the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// Payment settlement status for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
}

/// Payment method selected at checkout.
///
/// Wire values match the marketplace API's display strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "PayPal")]
    PayPal,
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
    #[serde(rename = "Stripe")]
    Stripe,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreditCard => write!(f, "Credit Card"),
            Self::PayPal => write!(f, "PayPal"),
            Self::CashOnDelivery => write!(f, "Cash on Delivery"),
            Self::Stripe => write!(f, "Stripe"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "credit-card" | "credit card" => Ok(Self::CreditCard),
            "paypal" => Ok(Self::PayPal),
            "cash-on-delivery" | "cash on delivery" | "cod" => Ok(Self::CashOnDelivery),
            "stripe" => Ok(Self::Stripe),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}
