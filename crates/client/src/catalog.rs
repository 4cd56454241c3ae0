//! Catalog repository: server-truth product collection.
//!
//! Writes never patch the local list. Every create/update/delete is followed
//! by a fresh `refresh`; trusting an overlapping read after a write is a
//! drift bug this module refuses to make possible.

use reqwest::Method;
use tracing::{instrument, warn};

use marketstand_core::{Product, ProductId, ProductInput, ProductPage};

use crate::error::ApiError;
use crate::http::StoreClient;
use crate::remote::Remote;
use crate::wire::{Data, ProductListResponse, ProductsAllResponse};

/// Backend operations over the product collection.
pub trait CatalogApi {
    /// One page of the admin product list.
    async fn list(&self, page: u32) -> Result<ProductPage, ApiError>;

    /// The full shopper-visible product list.
    async fn list_all(&self) -> Result<Vec<Product>, ApiError>;

    /// Create a record. The caller re-lists afterwards.
    async fn create(&self, input: &ProductInput) -> Result<(), ApiError>;

    /// Update the record with the given key. The key travels in the URL
    /// only; the payload carries no `id`.
    async fn update(&self, id: &ProductId, input: &ProductInput) -> Result<(), ApiError>;

    /// Delete by key. The caller re-lists afterwards.
    async fn delete(&self, id: &ProductId) -> Result<(), ApiError>;
}

impl CatalogApi for StoreClient {
    #[instrument(skip(self))]
    async fn list(&self, page: u32) -> Result<ProductPage, ApiError> {
        let path = self.api(&format!("admin/products?page={page}"));
        let response: ProductListResponse = self.send(Method::GET, &path).await?;
        Ok(ProductPage {
            products: response.products,
            pagination: response.pagination,
        })
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Product>, ApiError> {
        let path = self.api("products/all");
        let response: ProductsAllResponse = self.send(Method::GET, &path).await?;
        Ok(response.products)
    }

    #[instrument(skip_all)]
    async fn create(&self, input: &ProductInput) -> Result<(), ApiError> {
        let path = self.api("admin/product");
        self.send_ack(Method::POST, &path, Some(&Data { data: input }))
            .await
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn update(&self, id: &ProductId, input: &ProductInput) -> Result<(), ApiError> {
        let path = self.api(&format!("admin/product/{id}"));
        self.send_ack(Method::PUT, &path, Some(&Data { data: input }))
            .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &ProductId) -> Result<(), ApiError> {
        let path = self.api(&format!("admin/product/{id}"));
        self.send_ack::<()>(Method::DELETE, &path, None).await
    }
}

/// The admin list view over a [`CatalogApi`].
///
/// Holds the current page as [`Remote`] state so consumers can tell "not yet
/// loaded" from "empty". Read failures degrade to [`Remote::Failed`]; write
/// failures propagate to the caller.
pub struct Catalog<A> {
    api: A,
    page: Remote<ProductPage>,
    current_page: u32,
}

impl<A: CatalogApi> Catalog<A> {
    /// Create a catalog view that has not asked the server anything yet.
    pub const fn new(api: A) -> Self {
        Self {
            api,
            page: Remote::NotAsked,
            current_page: 1,
        }
    }

    /// The current list state.
    pub const fn page(&self) -> &Remote<ProductPage> {
        &self.page
    }

    /// The backend, for write operations and the shopper list.
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Re-fetch the given page, replacing the current state.
    pub async fn refresh(&mut self, page: u32) {
        self.current_page = page;
        self.page = Remote::Loading;
        match self.api.list(page).await {
            Ok(products) => self.page = Remote::Loaded(products),
            Err(e) => {
                warn!(error = %e, page, "product list fetch failed");
                self.page = Remote::Failed(e.reason());
            }
        }
    }

    /// Re-fetch whatever page was last requested (page 1 before any
    /// `refresh`). This is how writes become visible.
    pub async fn reload(&mut self) {
        self.refresh(self.current_page).await;
    }
}
