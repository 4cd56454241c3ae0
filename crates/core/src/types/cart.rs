//! Cart types.
//!
//! The cart is server truth: `total` and `final_total` are opaque outputs
//! (the service applies coupons the client never sees) and must never be
//! recomputed from the line items.

use serde::{Deserialize, Serialize};

use super::id::{CartItemId, ProductId};
use super::product::Product;

/// One line in the cart: a product snapshot plus a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Service-assigned line key.
    pub id: CartItemId,
    /// Key of the product this line refers to.
    #[serde(default)]
    pub product_id: ProductId,
    /// Snapshot of the product at the time it was added.
    pub product: Product,
    /// Quantity, at least 1.
    pub qty: u32,
    /// Server-computed line total.
    #[serde(default)]
    pub total: f64,
    /// Server-computed line total after discounts.
    #[serde(default)]
    pub final_total: f64,
}

/// The shopper's cart with server-computed totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    /// Ordered cart lines. The service calls the collection `carts`.
    #[serde(rename = "carts", default)]
    pub items: Vec<CartItem>,
    /// Server-computed total.
    #[serde(default)]
    pub total: f64,
    /// Server-computed total after discounts.
    #[serde(default)]
    pub final_total: f64,
}

impl Cart {
    /// A cart with no items - the state after a successful clear.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0.0,
            final_total: 0.0,
        }
    }

    /// True when the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
