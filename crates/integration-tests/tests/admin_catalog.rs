//! Integration tests for the admin session and catalog.
//!
//! These tests require:
//! - `MARKET_API_BASE` / `MARKET_API_PATH` pointing at the live service
//! - `MARKET_USERNAME` / `MARKET_PASSWORD` for a real admin account
//!
//! Run with: cargo test -p marketstand-integration-tests -- --ignored

use marketstand_client::{
    AuthApi, Catalog, CatalogApi, EditWorkflow, Field, MemoryTokenStore, SessionStore, StoreClient,
};
use marketstand_core::Product;
use marketstand_integration_tests::{live_client, live_credentials, unique_title};

/// Sign in and return a client with the session token attached.
async fn signed_in() -> StoreClient {
    let client = live_client();
    let mut session = SessionStore::new(client.clone(), MemoryTokenStore::new());
    session
        .sign_in(&live_credentials())
        .await
        .expect("sign-in failed");
    client
}

/// Walk the paged admin list until a product with the title turns up.
async fn find_by_title(client: &StoreClient, title: &str) -> Option<Product> {
    let mut page = 1;
    loop {
        let listed = client.list(page).await.expect("list failed");
        if let Some(product) = listed
            .products
            .into_iter()
            .find(|product| product.title == title)
        {
            return Some(product);
        }
        if !listed.pagination.has_next {
            return None;
        }
        page += 1;
    }
}

// ============================================================================
// Session Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires live service and admin credentials"]
async fn test_sign_in_and_server_check() {
    let client = signed_in().await;

    // The freshly attached token must pass the server-side check.
    client.check().await.expect("token check failed");
}

#[tokio::test]
#[ignore = "Requires live service"]
async fn test_check_without_token_is_rejected() {
    let client = live_client();

    client
        .check()
        .await
        .expect_err("check without a token should be rejected");
}

// ============================================================================
// Catalog Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires live service and admin credentials"]
async fn test_paged_list_reports_pagination() {
    let client = signed_in().await;

    let listed = client.list(1).await.expect("list failed");

    assert_eq!(listed.pagination.current_page, 1);
    assert!(!listed.pagination.has_pre);
    assert!(listed.pagination.total_pages >= 1);
}

#[tokio::test]
#[ignore = "Requires live service and admin credentials"]
async fn test_product_create_update_delete_round_trip() {
    let client = signed_in().await;
    let title = unique_title("crud");
    let mut catalog = Catalog::new(client.clone());

    // Create through the edit workflow, the same path the shells use.
    let mut workflow = EditWorkflow::new();
    workflow.open_new();
    workflow.edit_field(Field::Title, &title);
    workflow.edit_field(Field::Category, "integration");
    workflow.edit_field(Field::Unit, "piece");
    workflow.edit_field(Field::OriginPrice, "500");
    workflow.edit_field(Field::Price, "300");
    workflow.edit_field(Field::IsEnabled, "false");
    workflow.confirm(&mut catalog).await.expect("create failed");
    assert!(!workflow.is_open(), "workflow should close on success");
    assert!(
        catalog.page().is_loaded(),
        "confirm should leave a freshly listed page behind"
    );

    let created = find_by_title(&client, &title)
        .await
        .expect("created product not found in the list");
    assert_eq!(created.price, 300.0);
    assert!(!created.is_enabled);

    // Update the price through the same workflow.
    let mut workflow = EditWorkflow::new();
    workflow.open_update(&created);
    workflow.edit_field(Field::Price, "250");
    workflow.confirm(&mut catalog).await.expect("update failed");

    let updated = find_by_title(&client, &title)
        .await
        .expect("updated product not found in the list");
    assert_eq!(updated.price, 250.0);
    assert_eq!(updated.id, created.id);

    client.delete(&created.id).await.expect("delete failed");
    assert!(
        find_by_title(&client, &title).await.is_none(),
        "deleted product still listed"
    );
}

#[tokio::test]
#[ignore = "Requires live service and admin credentials"]
async fn test_write_without_token_is_rejected() {
    let mut catalog = Catalog::new(live_client());

    let mut workflow = EditWorkflow::new();
    workflow.open_new();
    workflow.edit_field(Field::Title, &unique_title("unauthorized"));
    workflow
        .confirm(&mut catalog)
        .await
        .expect_err("unauthenticated create should be rejected");
    assert!(workflow.is_open(), "workflow should stay open on failure");
}
