//! Command implementations, one module per surface.

pub mod admin;
pub mod shop;
