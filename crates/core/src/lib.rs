//! marketstand core - Shared types library.
//!
//! This crate provides the types shared by all marketstand components:
//! - `client` - The reusable session/catalog/cart kernel
//! - `cli` - The thin admin and shop command-line shells
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP. Every type mirrors
//! the remote service's wire format exactly (camelCase image fields, the
//! `carts` collection name, the 0/1 enabled flag), so serializing a value
//! produces a valid request body and deserializing a response body needs no
//! further conversion layer.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs and the product, cart, and order wire types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
