//! Order submission types.

use serde::{Deserialize, Serialize};

/// Contact and delivery details for an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderContact {
    /// Recipient name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub tel: String,
    /// Delivery address.
    pub address: String,
}

/// The checkout form: contact details plus a free-form message.
///
/// `Default` is the blank form the checkout surface resets to after a
/// successful submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderForm {
    /// Contact and delivery details.
    pub user: OrderContact,
    /// Optional note to the seller.
    #[serde(default)]
    pub message: String,
}
