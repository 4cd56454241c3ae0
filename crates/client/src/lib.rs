//! marketstand client - the session/catalog/cart orchestration kernel.
//!
//! One reusable core behind every marketstand presentation shell. The shells
//! (admin console, shop front) only render what these components hand back;
//! all state machines and failure handling live here.
//!
//! # Components
//!
//! - [`SessionStore`] - token acquisition, persistence, validation, and
//!   propagation. The only writer of the shared bearer token.
//! - [`Catalog`] / [`CatalogApi`] - server-truth product collection with
//!   create/update/delete write-through; writes never patch the local list.
//! - [`EditWorkflow`] - one editing surface serving both create and update
//!   through a mode resolved once at open time.
//! - [`CartFlow`] / [`CartApi`] - server-synchronized cart and checkout.
//! - [`StoreClient`] - the reqwest transport implementing every backend
//!   trait against the remote REST service.
//!
//! # Example
//!
//! ```rust,ignore
//! use marketstand_client::{
//!     CartFlow, ClientConfig, Credentials, FileTokenStore, SessionStore, StoreClient,
//! };
//!
//! let config = ClientConfig::from_env()?;
//! let client = StoreClient::new(&config);
//!
//! let mut session = SessionStore::new(client.clone(), FileTokenStore::new(&config.token_path));
//! session.sign_in(&Credentials::new("admin@example.com", "hunter2")).await?;
//!
//! let cart = CartFlow::new(client.clone());
//! cart.fetch().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod editor;
pub mod error;
mod http;
pub mod remote;
pub mod session;
pub mod token;
mod wire;

pub use cart::{AddOutcome, CartApi, CartFlow};
pub use catalog::{Catalog, CatalogApi};
pub use config::{ClientConfig, ConfigError};
pub use editor::{EditDraft, EditMode, EditWorkflow, Field};
pub use error::ApiError;
pub use http::StoreClient;
pub use remote::Remote;
pub use session::{AuthApi, Credentials, SessionState, SessionStore, TokenGrant};
pub use token::{FileTokenStore, MemoryTokenStore, PersistedToken, TokenStore};
