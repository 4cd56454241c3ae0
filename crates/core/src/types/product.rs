//! Product catalog types.
//!
//! `Product` is what the service returns; `ProductInput` is what write
//! operations send. `ProductInput` deliberately has no `id` field - the
//! record key travels in the URL, never in the payload body.

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A catalog product as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Service-assigned record key.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Category label.
    pub category: String,
    /// Sales unit (e.g. "piece", "box").
    pub unit: String,
    /// Price before discount.
    pub origin_price: f64,
    /// Selling price.
    pub price: f64,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Long-form content.
    #[serde(default)]
    pub content: String,
    /// Whether the product is visible to shoppers. 0/1 on the wire.
    #[serde(with = "flag")]
    pub is_enabled: bool,
    /// Main image URL.
    #[serde(rename = "imageUrl", default)]
    pub image_url: String,
    /// Additional image URLs. Ordering is display order.
    #[serde(rename = "imagesUrl", default)]
    pub images_url: Vec<String>,
}

/// The write payload for creating or updating a product.
///
/// The `Default` value is the empty draft a fresh editing surface opens
/// with: zero prices, disabled, empty strings, no images.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    /// Display title.
    pub title: String,
    /// Category label.
    pub category: String,
    /// Sales unit.
    pub unit: String,
    /// Price before discount.
    pub origin_price: f64,
    /// Selling price.
    pub price: f64,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Long-form content.
    #[serde(default)]
    pub content: String,
    /// Visibility flag, normalized to 0/1 on the wire.
    #[serde(with = "flag")]
    pub is_enabled: bool,
    /// Main image URL.
    #[serde(rename = "imageUrl", default)]
    pub image_url: String,
    /// Additional image URLs, in display order.
    #[serde(rename = "imagesUrl", default)]
    pub images_url: Vec<String>,
}

impl From<&Product> for ProductInput {
    /// Seed a write payload verbatim from an existing record.
    fn from(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            category: product.category.clone(),
            unit: product.unit.clone(),
            origin_price: product.origin_price,
            price: product.price,
            description: product.description.clone(),
            content: product.content.clone(),
            is_enabled: product.is_enabled,
            image_url: product.image_url.clone(),
            images_url: product.images_url.clone(),
        }
    }
}

/// Paging metadata returned alongside the admin product list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Total number of pages.
    pub total_pages: u32,
    /// The page this response covers (1-based).
    pub current_page: u32,
    /// Whether a previous page exists.
    pub has_pre: bool,
    /// Whether a next page exists.
    pub has_next: bool,
    /// Category filter the page was computed under, if any.
    #[serde(default)]
    pub category: Option<String>,
}

impl Pagination {
    /// Metadata for a single unfiltered page - what list endpoints without
    /// paging semantics are folded into.
    #[must_use]
    pub const fn single_page() -> Self {
        Self {
            total_pages: 1,
            current_page: 1,
            has_pre: false,
            has_next: false,
            category: None,
        }
    }
}

/// One page of the product collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    /// The products on this page.
    pub products: Vec<Product>,
    /// Paging metadata.
    pub pagination: Pagination,
}

/// The 0/1 wire encoding of the enabled flag.
///
/// The service stores whatever the original admin UI sent it, so responses
/// carry a mix of numbers and booleans. Accept both; always emit numbers.
mod flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Flag {
            Number(i64),
            Bool(bool),
        }

        Ok(match Flag::deserialize(deserializer)? {
            Flag::Number(n) => n != 0,
            Flag::Bool(b) => b,
        })
    }
}
