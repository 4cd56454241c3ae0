//! Shopper commands: browsing, cart, and checkout.
//!
//! # Usage
//!
//! ```bash
//! mkt shop products
//! mkt shop cart add <product-id> --qty 2
//! mkt shop cart show
//! mkt shop checkout --name "..." --email "..." --tel "..." --address "..."
//! ```
//!
//! None of these require a signed-in session.

use marketstand_client::{
    AddOutcome, ApiError, CartFlow, CatalogApi, ClientConfig, ConfigError, Remote, StoreClient,
};
use marketstand_core::{Cart, OrderContact, OrderForm, ProductId};
use thiserror::Error;

/// Errors that can occur during shopper operations.
#[derive(Debug, Error)]
pub enum ShopError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The service failed or rejected a request.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// List the shopper-visible products.
pub async fn products() -> Result<(), ShopError> {
    let client = connect()?;
    let products = client.list_all().await?;
    tracing::info!("{} product(s) available", products.len());
    for product in &products {
        tracing::info!(
            "  {} | {} | {} / {}",
            product.id,
            product.title,
            product.price,
            product.unit
        );
    }
    Ok(())
}

/// Fetch and show the cart.
pub async fn cart_show() -> Result<(), ShopError> {
    let flow = CartFlow::new(connect()?);
    flow.fetch().await?;
    print_cart(&flow.view());
    Ok(())
}

/// Add a product to the cart.
pub async fn cart_add(product_id: &str, qty: u32) -> Result<(), ShopError> {
    let flow = CartFlow::new(connect()?);
    match flow.add_item(&ProductId::new(product_id), qty).await? {
        AddOutcome::Sent => tracing::info!("Added {qty} x {product_id}"),
        AddOutcome::Ignored => tracing::warn!("An add was already in flight; nothing sent"),
    }
    Ok(())
}

/// Empty the cart.
pub async fn cart_clear() -> Result<(), ShopError> {
    let flow = CartFlow::new(connect()?);
    flow.clear().await?;
    tracing::info!("Cart cleared");
    Ok(())
}

/// Place an order for the current cart.
pub async fn checkout(
    name: &str,
    email: &str,
    tel: &str,
    address: &str,
    message: &str,
) -> Result<(), ShopError> {
    let flow = CartFlow::new(connect()?);
    // Checkout only trusts a freshly fetched cart.
    flow.fetch().await?;

    let form = OrderForm {
        user: OrderContact {
            name: name.to_owned(),
            email: email.to_owned(),
            tel: tel.to_owned(),
            address: address.to_owned(),
        },
        message: message.to_owned(),
    };
    let order_id = flow.checkout(&form).await?;
    tracing::info!("Order placed: {order_id}");
    Ok(())
}

fn connect() -> Result<StoreClient, ShopError> {
    let config = ClientConfig::from_env()?;
    Ok(StoreClient::new(&config))
}

fn print_cart(view: &Remote<Cart>) {
    let Some(cart) = view.loaded() else { return };
    if cart.is_empty() {
        tracing::info!("Cart is empty");
        return;
    }
    for item in &cart.items {
        tracing::info!(
            "  {} | {} x{} = {}",
            item.id,
            item.product.title,
            item.qty,
            item.final_total
        );
    }
    tracing::info!("Total: {} (after discounts: {})", cart.total, cart.final_total);
}
