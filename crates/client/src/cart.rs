//! Server-synchronized cart and checkout flow.
//!
//! Local mutation is never trusted: adds are fire-and-forget, and the view
//! only changes when a fresh fetch returns the authoritative cart with its
//! server-computed totals.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock, RwLockWriteGuard};

use reqwest::Method;
use tracing::{instrument, warn};

use marketstand_core::{Cart, OrderForm, OrderId, ProductId};

use crate::error::ApiError;
use crate::http::StoreClient;
use crate::remote::Remote;
use crate::wire::{CartAddition, CartResponse, Data, Message, OrderResponse};

/// Backend operations over the shopper's cart.
pub trait CartApi {
    /// Append an item to the server-side cart.
    async fn add_item(&self, product_id: &ProductId, qty: u32) -> Result<(), ApiError>;

    /// Fetch the authoritative cart.
    async fn fetch(&self) -> Result<Cart, ApiError>;

    /// Empty the server-side cart.
    async fn clear(&self) -> Result<(), ApiError>;

    /// Submit an order for the current cart.
    async fn submit_order(&self, form: &OrderForm) -> Result<OrderId, ApiError>;
}

impl CartApi for StoreClient {
    #[instrument(skip(self))]
    async fn add_item(&self, product_id: &ProductId, qty: u32) -> Result<(), ApiError> {
        let path = self.api("cart");
        self.send_ack(
            Method::POST,
            &path,
            Some(&Data {
                data: CartAddition { product_id, qty },
            }),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn fetch(&self) -> Result<Cart, ApiError> {
        let path = self.api("cart");
        let response: CartResponse = self.send(Method::GET, &path).await?;
        Ok(response.data)
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<(), ApiError> {
        let path = self.api("carts");
        self.send_ack::<()>(Method::DELETE, &path, None).await
    }

    #[instrument(skip_all)]
    async fn submit_order(&self, form: &OrderForm) -> Result<OrderId, ApiError> {
        let path = self.api("order");
        let response: OrderResponse = self
            .send_json(Method::POST, &path, &Data { data: form })
            .await?;
        if response.success {
            Ok(response.order_id.unwrap_or_default())
        } else {
            // A 2xx transport status can still carry a business failure.
            Err(ApiError::Rejected(response.message.map_or_else(
                || "order was not accepted".to_owned(),
                Message::into_text,
            )))
        }
    }
}

/// What happened to an add-to-cart activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The request was sent.
    Sent,
    /// Another add was already outstanding; this activation did nothing.
    Ignored,
}

/// The cart/checkout state machine over a [`CartApi`].
///
/// Methods take `&self`: the busy flag and the view carry their own
/// synchronization, so a shell can hold one flow behind an `Arc`.
pub struct CartFlow<A> {
    api: A,
    view: RwLock<Remote<Cart>>,
    busy: AtomicBool,
}

impl<A: CartApi> CartFlow<A> {
    /// Create a flow that has not asked the server anything yet.
    pub const fn new(api: A) -> Self {
        Self {
            api,
            view: RwLock::new(Remote::NotAsked),
            busy: AtomicBool::new(false),
        }
    }

    /// A snapshot of the current cart view.
    pub fn view(&self) -> Remote<Cart> {
        self.view
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// True while an add request is outstanding. Surfaces disable their
    /// add controls on this.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Append an item to the server-side cart.
    ///
    /// While one add is outstanding, further activations return
    /// [`AddOutcome::Ignored`] - the guard against duplicate submissions
    /// from rapid repeated activation. There is no de-duplication beyond
    /// this. The view is not touched either way; contents are only trusted
    /// after a fresh [`fetch`](Self::fetch).
    pub async fn add_item(&self, product_id: &ProductId, qty: u32) -> Result<AddOutcome, ApiError> {
        if self.busy.swap(true, Ordering::SeqCst) {
            return Ok(AddOutcome::Ignored);
        }
        let result = self.api.add_item(product_id, qty).await;
        self.busy.store(false, Ordering::SeqCst);

        match result {
            Ok(()) => Ok(AddOutcome::Sent),
            Err(e) => {
                warn!(error = %e, product = %product_id, "add to cart failed");
                Err(e)
            }
        }
    }

    /// Fetch the authoritative cart into the view.
    ///
    /// On failure the previous view is left untouched and the condition is
    /// logged; the error is still returned so a shell may offer a retry.
    pub async fn fetch(&self) -> Result<(), ApiError> {
        match self.api.fetch().await {
            Ok(cart) => {
                *self.view_mut() = Remote::Loaded(cart);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "cart fetch failed; keeping previous view");
                Err(e)
            }
        }
    }

    /// Empty the server-side cart. On success the view becomes a loaded
    /// empty cart ("no items"), not "not yet loaded".
    pub async fn clear(&self) -> Result<(), ApiError> {
        self.api.clear().await?;
        *self.view_mut() = Remote::Loaded(Cart::empty());
        Ok(())
    }

    /// True when checkout may proceed: a loaded, non-empty cart.
    pub fn can_checkout(&self) -> bool {
        self.view
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .loaded()
            .is_some_and(|cart| !cart.is_empty())
    }

    /// Submit the order for the current cart.
    ///
    /// Refused outright while the cart is empty or unloaded. A server-side
    /// rejection (even on a 2xx) propagates as [`ApiError::Rejected`] and
    /// leaves the view alone so the form can be corrected. On success the
    /// view resets to "not yet loaded" and the caller resets the form to
    /// [`OrderForm::default`].
    #[instrument(skip_all)]
    pub async fn checkout(&self, form: &OrderForm) -> Result<OrderId, ApiError> {
        if !self.can_checkout() {
            return Err(ApiError::EmptyCart);
        }

        let order_id = self.api.submit_order(form).await?;
        *self.view_mut() = Remote::NotAsked;
        Ok(order_id)
    }

    fn view_mut(&self) -> RwLockWriteGuard<'_, Remote<Cart>> {
        self.view.write().unwrap_or_else(PoisonError::into_inner)
    }
}
