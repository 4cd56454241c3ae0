//! Wire envelopes for the remote REST service.
//!
//! Every response carries a `success` flag; failures carry a `message` that
//! the service emits either as one string or as an array of validation
//! strings. Write request bodies are wrapped in `{"data": ...}`.

use serde::{Deserialize, Serialize};

use marketstand_core::{Cart, OrderId, Pagination, Product, ProductId};

/// The `{"data": ...}` wrapper around write request bodies.
#[derive(Debug, Serialize)]
pub(crate) struct Data<T> {
    pub data: T,
}

/// Body of an add-to-cart request.
#[derive(Debug, Serialize)]
pub(crate) struct CartAddition<'a> {
    pub product_id: &'a ProductId,
    pub qty: u32,
}

/// A failure `message`: one string or a list of validation strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Message {
    One(String),
    Many(Vec<String>),
}

impl Message {
    /// Fold into a single human-readable string.
    pub fn into_text(self) -> String {
        match self {
            Self::One(text) => text,
            Self::Many(parts) => parts.join("; "),
        }
    }
}

/// The failure body of a non-2xx response.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Failure {
    #[serde(default)]
    pub message: Option<Message>,
}

impl Failure {
    /// Best-effort extraction of the server's message from a raw body.
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<Self>(body)
            .ok()
            .and_then(|failure| failure.message)
            .map(Message::into_text)
    }
}

/// Response to `POST /admin/signin`.
#[derive(Debug, Deserialize)]
pub(crate) struct SignInResponse {
    pub token: String,
    /// Expiry as epoch milliseconds.
    pub expired: i64,
}

/// A response where only the `success` flag matters.
#[derive(Debug, Deserialize)]
pub(crate) struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<Message>,
}

/// Response to the paged admin product list.
#[derive(Debug, Deserialize)]
pub(crate) struct ProductListResponse {
    pub products: Vec<Product>,
    #[serde(default = "Pagination::single_page")]
    pub pagination: Pagination,
}

/// Response to the shopper product list.
#[derive(Debug, Deserialize)]
pub(crate) struct ProductsAllResponse {
    pub products: Vec<Product>,
}

/// Response to the cart fetch.
#[derive(Debug, Deserialize)]
pub(crate) struct CartResponse {
    pub data: Cart,
}

/// Response to an order submission.
#[derive(Debug, Deserialize)]
pub(crate) struct OrderResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default, rename = "orderId")]
    pub order_id: Option<OrderId>,
}
