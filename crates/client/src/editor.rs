//! The edit workflow: one editing surface serving create and update.
//!
//! The operation is resolved once, when the surface opens, into a tagged
//! mode. Confirmation dispatches on that mode; the caller never branches on
//! which operation is active.

use tracing::instrument;

use marketstand_core::{Product, ProductId, ProductInput};

use crate::catalog::{Catalog, CatalogApi};
use crate::error::ApiError;

/// Which server operation a confirmation will perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMode {
    /// Create a new record; the server assigns the key.
    New,
    /// Update the record with this key. The key never leaves the mode for
    /// the payload.
    Update {
        /// Key of the record being edited.
        id: ProductId,
    },
}

/// The in-progress edit: a mode and a draft record.
///
/// Exists only while the editing surface is open.
#[derive(Debug, Clone, PartialEq)]
pub struct EditDraft {
    mode: EditMode,
    record: ProductInput,
}

impl EditDraft {
    /// The operation this draft will perform on confirmation.
    pub const fn mode(&self) -> &EditMode {
        &self.mode
    }

    /// The draft record as it stands.
    pub const fn record(&self) -> &ProductInput {
        &self.record
    }
}

/// A field of the draft record, typed by how raw input is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Category,
    Unit,
    OriginPrice,
    Price,
    Description,
    Content,
    IsEnabled,
    ImageUrl,
}

/// The modal state machine behind the product editing surface.
#[derive(Debug, Default)]
pub struct EditWorkflow {
    draft: Option<EditDraft>,
}

impl EditWorkflow {
    /// A closed workflow.
    #[must_use]
    pub const fn new() -> Self {
        Self { draft: None }
    }

    /// True while the editing surface is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    /// The current draft, if the surface is open.
    #[must_use]
    pub const fn draft(&self) -> Option<&EditDraft> {
        self.draft.as_ref()
    }

    /// Open for creation, seeding the explicit empty defaults.
    pub fn open_new(&mut self) {
        self.draft = Some(EditDraft {
            mode: EditMode::New,
            record: ProductInput::default(),
        });
    }

    /// Open for modification, seeding the draft verbatim from the record.
    pub fn open_update(&mut self, product: &Product) {
        self.draft = Some(EditDraft {
            mode: EditMode::Update {
                id: product.id.clone(),
            },
            record: ProductInput::from(product),
        });
    }

    /// Set a field from raw input.
    ///
    /// Numeric fields coerce the input to a number (unparsable input folds
    /// to 0); the enabled flag coerces to a boolean; everything else is
    /// stored as given. A closed workflow ignores edits.
    pub fn edit_field(&mut self, field: Field, value: &str) {
        let Some(draft) = self.draft.as_mut() else {
            return;
        };
        let record = &mut draft.record;
        match field {
            Field::Title => record.title = value.to_owned(),
            Field::Category => record.category = value.to_owned(),
            Field::Unit => record.unit = value.to_owned(),
            Field::OriginPrice => record.origin_price = coerce_number(value),
            Field::Price => record.price = coerce_number(value),
            Field::Description => record.description = value.to_owned(),
            Field::Content => record.content = value.to_owned(),
            Field::IsEnabled => record.is_enabled = coerce_flag(value),
            Field::ImageUrl => record.image_url = value.to_owned(),
        }
    }

    /// Append an image URL, preserving order. A blank URL is a no-op.
    pub fn add_image(&mut self, url: &str) {
        if url.is_empty() {
            return;
        }
        if let Some(draft) = self.draft.as_mut() {
            draft.record.images_url.push(url.to_owned());
        }
    }

    /// Remove an image by position. Out-of-range is a no-op.
    pub fn remove_image(&mut self, index: usize) {
        if let Some(draft) = self.draft.as_mut()
            && index < draft.record.images_url.len()
        {
            draft.record.images_url.remove(index);
        }
    }

    /// Dispatch the draft to the backend operation picked at open time.
    ///
    /// On success the surface closes and the catalog re-lists its current
    /// page; the write is only ever observed through that fresh list, never
    /// by patching local state. On failure the draft stays exactly as it was
    /// so the user can correct and retry, and the error propagates.
    #[instrument(skip_all)]
    pub async fn confirm<A: CatalogApi>(
        &mut self,
        catalog: &mut Catalog<A>,
    ) -> Result<(), ApiError> {
        let Some(draft) = self.draft.as_ref() else {
            return Ok(());
        };

        match &draft.mode {
            EditMode::New => catalog.api().create(&draft.record).await?,
            EditMode::Update { id } => catalog.api().update(id, &draft.record).await?,
        }

        self.close();
        catalog.reload().await;
        Ok(())
    }

    /// Discard the draft, however the surface is being dismissed. Prevents
    /// stale data leaking into the next open.
    pub fn close(&mut self) {
        self.draft = None;
    }
}

/// The original surface fed number inputs through `Number()`: blank input
/// became 0 and garbage became unusable. Fold both to 0.
fn coerce_number(value: &str) -> f64 {
    value.trim().parse().unwrap_or(0.0)
}

fn coerce_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "on" | "yes"
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::remote::Remote;
    use std::sync::Mutex;

    /// Records each dispatched write; fails on demand.
    #[derive(Default)]
    struct RecordingCatalog {
        fail: bool,
        calls: Mutex<Vec<(String, serde_json::Value)>>,
    }

    impl CatalogApi for &RecordingCatalog {
        async fn list(&self, page: u32) -> Result<marketstand_core::ProductPage, ApiError> {
            self.calls
                .lock()
                .unwrap()
                .push((format!("list {page}"), serde_json::Value::Null));
            Ok(marketstand_core::ProductPage {
                products: Vec::new(),
                pagination: marketstand_core::Pagination::single_page(),
            })
        }

        async fn list_all(&self) -> Result<Vec<Product>, ApiError> {
            unreachable!("the edit workflow never lists")
        }

        async fn create(&self, input: &ProductInput) -> Result<(), ApiError> {
            if self.fail {
                return Err(ApiError::Rejected("title 必填".to_owned()));
            }
            self.calls
                .lock()
                .unwrap()
                .push(("create".to_owned(), serde_json::to_value(input).unwrap()));
            Ok(())
        }

        async fn update(&self, id: &ProductId, input: &ProductInput) -> Result<(), ApiError> {
            if self.fail {
                return Err(ApiError::Rejected("price 必填".to_owned()));
            }
            self.calls.lock().unwrap().push((
                format!("update {id}"),
                serde_json::to_value(input).unwrap(),
            ));
            Ok(())
        }

        async fn delete(&self, _id: &ProductId) -> Result<(), ApiError> {
            unreachable!("the edit workflow never deletes")
        }
    }

    fn sample_product() -> Product {
        serde_json::from_value(serde_json::json!({
            "id": "p-7",
            "title": "Chair",
            "category": "furniture",
            "unit": "piece",
            "origin_price": 500.0,
            "price": 300.0,
            "description": "",
            "content": "",
            "is_enabled": 1,
            "imageUrl": "https://example.com/chair.jpg",
            "imagesUrl": ["https://example.com/a.jpg"]
        }))
        .unwrap()
    }

    #[test]
    fn test_open_new_seeds_empty_defaults() {
        let mut workflow = EditWorkflow::new();
        assert!(!workflow.is_open());

        workflow.open_new();

        let draft = workflow.draft().unwrap();
        assert_eq!(draft.mode(), &EditMode::New);
        assert_eq!(draft.record(), &ProductInput::default());
    }

    #[test]
    fn test_open_update_seeds_verbatim_and_captures_id() {
        let mut workflow = EditWorkflow::new();
        let product = sample_product();

        workflow.open_update(&product);

        let draft = workflow.draft().unwrap();
        assert_eq!(
            draft.mode(),
            &EditMode::Update {
                id: ProductId::new("p-7")
            }
        );
        assert_eq!(draft.record().title, "Chair");
        assert_eq!(draft.record().images_url, vec!["https://example.com/a.jpg"]);
    }

    #[test]
    fn test_field_coercion() {
        let mut workflow = EditWorkflow::new();
        workflow.open_new();

        workflow.edit_field(Field::Title, "Chair");
        workflow.edit_field(Field::Price, "300");
        workflow.edit_field(Field::OriginPrice, "not a number");
        workflow.edit_field(Field::IsEnabled, "true");

        let record = workflow.draft().unwrap().record();
        assert_eq!(record.title, "Chair");
        assert!((record.price - 300.0).abs() < f64::EPSILON);
        assert!((record.origin_price - 0.0).abs() < f64::EPSILON);
        assert!(record.is_enabled);

        workflow.edit_field(Field::IsEnabled, "false");
        assert!(!workflow.draft().unwrap().record().is_enabled);
    }

    #[test]
    fn test_edits_on_a_closed_workflow_are_ignored() {
        let mut workflow = EditWorkflow::new();
        workflow.edit_field(Field::Title, "ghost");
        workflow.add_image("https://example.com/ghost.jpg");
        workflow.remove_image(0);
        assert!(workflow.draft().is_none());
    }

    #[test]
    fn test_image_list_round_trip() {
        let mut workflow = EditWorkflow::new();
        workflow.open_new();
        workflow.add_image("https://example.com/1.jpg");
        workflow.add_image("https://example.com/2.jpg");
        let before = workflow.draft().unwrap().record().images_url.clone();

        // Blank add and out-of-range remove are no-ops.
        workflow.add_image("");
        workflow.remove_image(99);
        assert_eq!(workflow.draft().unwrap().record().images_url, before);

        // Add-then-remove-last restores the prior list exactly.
        workflow.add_image("https://example.com/3.jpg");
        workflow.remove_image(2);
        assert_eq!(workflow.draft().unwrap().record().images_url, before);
    }

    #[test]
    fn test_image_order_is_preserved_through_removal() {
        let mut workflow = EditWorkflow::new();
        workflow.open_new();
        for url in ["a", "b", "c"] {
            workflow.add_image(url);
        }
        workflow.remove_image(1);
        assert_eq!(workflow.draft().unwrap().record().images_url, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_confirm_new_dispatches_create_and_closes() {
        let backend = RecordingCatalog::default();
        let mut catalog = Catalog::new(&backend);
        let mut workflow = EditWorkflow::new();
        workflow.open_new();
        workflow.edit_field(Field::Title, "Chair");

        workflow.confirm(&mut catalog).await.unwrap();

        assert!(!workflow.is_open());
        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls[0].0, "create");
        assert_eq!(calls[0].1["title"], "Chair");
    }

    #[tokio::test]
    async fn test_confirm_success_refreshes_the_catalog() {
        let backend = RecordingCatalog::default();
        let mut catalog = Catalog::new(&backend);
        catalog.refresh(2).await;
        let mut workflow = EditWorkflow::new();
        workflow.open_new();
        workflow.edit_field(Field::Title, "Chair");

        workflow.confirm(&mut catalog).await.unwrap();

        // The write is followed by a re-list of the page being viewed.
        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls[1].0, "create");
        assert_eq!(calls[2].0, "list 2");
        assert!(catalog.page().is_loaded());
    }

    #[tokio::test]
    async fn test_confirm_update_dispatches_with_url_id_only() {
        let backend = RecordingCatalog::default();
        let mut catalog = Catalog::new(&backend);
        let mut workflow = EditWorkflow::new();
        workflow.open_update(&sample_product());
        workflow.edit_field(Field::Price, "250");

        workflow.confirm(&mut catalog).await.unwrap();

        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls[0].0, "update p-7");
        // The payload body never carries the record key.
        assert!(calls[0].1.get("id").is_none());
        assert_eq!(calls[0].1["price"], 250.0);
    }

    #[tokio::test]
    async fn test_confirm_failure_keeps_the_draft_and_skips_the_refresh() {
        let backend = RecordingCatalog {
            fail: true,
            ..RecordingCatalog::default()
        };
        let mut catalog = Catalog::new(&backend);
        let mut workflow = EditWorkflow::new();
        workflow.open_new();
        workflow.edit_field(Field::Title, "Chair");

        let err = workflow.confirm(&mut catalog).await.unwrap_err();

        assert_eq!(err.reason(), "title 必填");
        assert!(workflow.is_open());
        assert_eq!(workflow.draft().unwrap().record().title, "Chair");
        // No re-list after a failed write.
        assert!(backend.calls.lock().unwrap().is_empty());
        assert_eq!(catalog.page(), &Remote::NotAsked);
    }

    #[tokio::test]
    async fn test_confirm_on_a_closed_workflow_is_a_no_op() {
        let backend = RecordingCatalog::default();
        let mut catalog = Catalog::new(&backend);
        let mut workflow = EditWorkflow::new();
        workflow.confirm(&mut catalog).await.unwrap();
        assert!(backend.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_close_discards_the_draft() {
        let mut workflow = EditWorkflow::new();
        workflow.open_update(&sample_product());
        workflow.close();
        assert!(workflow.draft().is_none());

        // The next open starts from the empty defaults, not stale data.
        workflow.open_new();
        assert_eq!(workflow.draft().unwrap().record(), &ProductInput::default());
    }
}
