//! Core type definitions.
//!
//! Newtype IDs plus the product, cart, and order types in their exact wire
//! shapes.

mod cart;
mod id;
mod order;
mod product;

pub use cart::{Cart, CartItem};
pub use id::{CartItemId, OrderId, ProductId};
pub use order::{OrderContact, OrderForm};
pub use product::{Pagination, Product, ProductInput, ProductPage};
