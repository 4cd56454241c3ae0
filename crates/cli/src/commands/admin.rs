//! Admin commands: session lifecycle and catalog management.
//!
//! # Usage
//!
//! ```bash
//! mkt admin login -u admin@example.com -p hunter2
//! mkt admin products --page 2
//! mkt admin edit <product-id> --price 250 --enabled false
//! ```
//!
//! # Environment Variables
//!
//! - `MARKET_API_BASE` - Base URL of the remote service
//! - `MARKET_API_PATH` - The store's API path segment
//! - `MARKET_TOKEN_FILE` - Where the session token is persisted (optional)

use marketstand_client::{
    ApiError, Catalog, CatalogApi, ClientConfig, ConfigError, Credentials, EditWorkflow, Field,
    FileTokenStore, Remote, SessionStore, StoreClient,
};
use marketstand_core::{Product, ProductId};
use thiserror::Error;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The service failed or rejected a request.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// No valid session was found or restored.
    #[error("not signed in; run `mkt admin login` first")]
    NotSignedIn,

    /// The catalog page could not be fetched.
    #[error("product list fetch failed: {0}")]
    ListFailed(String),

    /// No product carries the given id.
    #[error("no product found with id: {0}")]
    UnknownProduct(String),
}

/// Product fields accepted by `new` and `edit`. Omitted fields keep their
/// current value (`edit`) or the empty defaults (`new`).
#[derive(Debug, Default, clap::Args)]
pub struct ProductFields {
    /// Product title
    #[arg(long)]
    pub title: Option<String>,

    /// Category
    #[arg(long)]
    pub category: Option<String>,

    /// Sales unit
    #[arg(long)]
    pub unit: Option<String>,

    /// Original price
    #[arg(long)]
    pub origin_price: Option<f64>,

    /// Sale price
    #[arg(long)]
    pub price: Option<f64>,

    /// Short description
    #[arg(long)]
    pub description: Option<String>,

    /// Long-form content
    #[arg(long)]
    pub content: Option<String>,

    /// Whether the product is shopper-visible (`true` or `false`)
    #[arg(long)]
    pub enabled: Option<bool>,

    /// Main image URL
    #[arg(long)]
    pub image: Option<String>,

    /// Gallery image URL (repeatable)
    #[arg(long = "gallery")]
    pub gallery: Vec<String>,
}

/// Sign in and persist the session token for later commands.
pub async fn login(username: &str, password: &str) -> Result<(), AdminError> {
    let (_, mut session) = connect()?;
    session
        .sign_in(&Credentials::new(username, password))
        .await?;
    tracing::info!("Signed in as {username}");
    Ok(())
}

/// Discard the persisted session.
pub fn logout() -> Result<(), AdminError> {
    let (_, mut session) = connect()?;
    session.sign_out();
    tracing::info!("Signed out");
    Ok(())
}

/// List one page of the admin catalog.
pub async fn products(page: u32) -> Result<(), AdminError> {
    let client = signed_in().await?;
    let mut catalog = Catalog::new(client);
    catalog.refresh(page).await;
    show_page(&catalog)
}

/// Create a product from the given fields, then show the refreshed list.
pub async fn create(fields: &ProductFields) -> Result<(), AdminError> {
    let client = signed_in().await?;
    let mut catalog = Catalog::new(client);
    let mut workflow = EditWorkflow::new();
    workflow.open_new();
    apply(&mut workflow, fields);
    workflow.confirm(&mut catalog).await?;
    tracing::info!("Product created");
    show_page(&catalog)
}

/// Update the given fields of an existing product, then show the refreshed
/// list.
pub async fn edit(id: &str, fields: &ProductFields) -> Result<(), AdminError> {
    let client = signed_in().await?;
    let product = find_product(&client, id).await?;
    let mut catalog = Catalog::new(client);
    let mut workflow = EditWorkflow::new();
    workflow.open_update(&product);
    apply(&mut workflow, fields);
    workflow.confirm(&mut catalog).await?;
    tracing::info!("Product {id} updated");
    show_page(&catalog)
}

/// Delete a product by id.
pub async fn delete(id: &str) -> Result<(), AdminError> {
    let client = signed_in().await?;
    client.delete(&ProductId::new(id)).await?;
    tracing::info!("Product {id} deleted");
    Ok(())
}

fn connect() -> Result<(StoreClient, SessionStore<StoreClient, FileTokenStore>), AdminError> {
    let config = ClientConfig::from_env()?;
    let client = StoreClient::new(&config);
    let session = SessionStore::new(client.clone(), FileTokenStore::new(&config.token_path));
    Ok((client, session))
}

/// A client with a validated session attached.
async fn signed_in() -> Result<StoreClient, AdminError> {
    let (client, mut session) = connect()?;
    session.restore().await;
    if session.is_authenticated() {
        Ok(client)
    } else {
        Err(AdminError::NotSignedIn)
    }
}

/// Render the catalog's current page.
fn show_page(catalog: &Catalog<StoreClient>) -> Result<(), AdminError> {
    match catalog.page() {
        Remote::Loaded(listed) => {
            tracing::info!(
                "{} product(s), page {}/{}",
                listed.products.len(),
                listed.pagination.current_page,
                listed.pagination.total_pages
            );
            for product in &listed.products {
                tracing::info!(
                    "  {} | {} | {} / {} | {}",
                    product.id,
                    product.title,
                    product.price,
                    product.unit,
                    if product.is_enabled { "enabled" } else { "disabled" }
                );
            }
            Ok(())
        }
        Remote::Failed(reason) => Err(AdminError::ListFailed(reason.clone())),
        Remote::NotAsked | Remote::Loading => Ok(()),
    }
}

fn apply(workflow: &mut EditWorkflow, fields: &ProductFields) {
    if let Some(title) = &fields.title {
        workflow.edit_field(Field::Title, title);
    }
    if let Some(category) = &fields.category {
        workflow.edit_field(Field::Category, category);
    }
    if let Some(unit) = &fields.unit {
        workflow.edit_field(Field::Unit, unit);
    }
    if let Some(origin_price) = fields.origin_price {
        workflow.edit_field(Field::OriginPrice, &origin_price.to_string());
    }
    if let Some(price) = fields.price {
        workflow.edit_field(Field::Price, &price.to_string());
    }
    if let Some(description) = &fields.description {
        workflow.edit_field(Field::Description, description);
    }
    if let Some(content) = &fields.content {
        workflow.edit_field(Field::Content, content);
    }
    if let Some(enabled) = fields.enabled {
        workflow.edit_field(Field::IsEnabled, if enabled { "true" } else { "false" });
    }
    if let Some(image) = &fields.image {
        workflow.edit_field(Field::ImageUrl, image);
    }
    for url in &fields.gallery {
        workflow.add_image(url);
    }
}

/// Walk the paged admin list until the id turns up.
async fn find_product(client: &StoreClient, id: &str) -> Result<Product, AdminError> {
    let mut page = 1;
    loop {
        let listed = client.list(page).await?;
        if let Some(product) = listed
            .products
            .into_iter()
            .find(|product| product.id.as_str() == id)
        {
            return Ok(product);
        }
        if !listed.pagination.has_next {
            return Err(AdminError::UnknownProduct(id.to_owned()));
        }
        page += 1;
    }
}
