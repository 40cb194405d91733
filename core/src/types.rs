//! Typed transaction payloads.
//!
//! # Design
//! The client treats transactions as opaque and accepts any `Serialize`
//! value, so a raw `serde_json::Value` works just as well. These types
//! describe the documented payload shape for callers who want compile-time
//! field names. Nothing here is validated client-side.

use serde::{Deserialize, Serialize};

/// Payment order submitted to `MainPay::create_transaction`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub order_id: String,
    pub amount: u64,
    pub customer: Customer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Address>,
    #[serde(default)]
    pub items: Vec<Item>,
    /// Payment method identifiers offered to the customer, e.g. `bca_va`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enabled_payments: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    /// ISO 3166-1 alpha-2 code.
    pub country: String,
}

/// A line item. `price` is per unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub item_id: String,
    pub name: String,
    pub price: u64,
    pub quantity: u32,
}
