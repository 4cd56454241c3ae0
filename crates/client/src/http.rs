//! The reqwest transport shared by every backend trait.
//!
//! One `StoreClient` is cloned into each component. It owns the only shared
//! mutable resource in the kernel: the bearer token slot, written exclusively
//! by the session store and read on every outgoing request.

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::wire::{Ack, Failure, Message};

/// Client for the remote catalog/cart REST service.
///
/// Cheap to clone; all clones share one connection pool and one token slot.
#[derive(Clone)]
pub struct StoreClient {
    inner: Arc<StoreClientInner>,
}

struct StoreClientInner {
    http: reqwest::Client,
    base: url::Url,
    api_path: String,
    token: RwLock<Option<SecretString>>,
}

impl StoreClient {
    /// Create a new client for the configured service.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            inner: Arc::new(StoreClientInner {
                http: reqwest::Client::new(),
                base: config.base_url.clone(),
                api_path: config.api_path.clone(),
                token: RwLock::new(None),
            }),
        }
    }

    /// Install the bearer token carried by subsequent requests.
    ///
    /// Only the session store calls this.
    pub(crate) fn install_token(&self, token: &str) {
        let mut slot = self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = Some(SecretString::from(token.to_owned()));
    }

    /// Remove the bearer token.
    pub(crate) fn remove_token(&self) {
        let mut slot = self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }

    /// Splice the store's path segment into an `/api/{path}/...` route.
    pub(crate) fn api(&self, rest: &str) -> String {
        format!("api/{}/{rest}", self.inner.api_path)
    }

    /// Send a bodyless request and deserialize the response.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> Result<T, ApiError> {
        self.dispatch(method, path, None::<&()>).await
    }

    /// Send a JSON-bodied request and deserialize the response.
    pub(crate) async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.dispatch(method, path, Some(body)).await
    }

    /// Send a request whose response only carries a `success` flag.
    pub(crate) async fn send_ack<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError> {
        let ack: Ack = self.dispatch(method, path, body).await?;
        if ack.success {
            Ok(())
        } else {
            // A 2xx that still reports failure.
            Err(ApiError::Rejected(
                ack.message
                    .map_or_else(|| "request reported failure".to_owned(), Message::into_text),
            ))
        }
    }

    async fn dispatch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let url = self.inner.base.join(path)?;

        let mut request = self.inner.http.request(method, url);
        {
            let token = self
                .inner
                .token
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(token) = token.as_ref() {
                // The service expects the raw token, not a "Bearer" scheme.
                request = request.header(reqwest::header::AUTHORIZATION, token.expose_secret());
            }
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        // Read the body as text first for better error diagnostics.
        let body_text = response.text().await?;

        if !status.is_success() {
            tracing::debug!(
                status = %status,
                body = %truncate(&body_text, 500),
                "service returned non-success status"
            );
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: Failure::message_from(&body_text)
                    .unwrap_or_else(|| format!("HTTP {status}")),
            });
        }

        match serde_json::from_str::<T>(&body_text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %truncate(&body_text, 500),
                    "failed to parse service response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }
}

impl std::fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreClient")
            .field("base", &self.inner.base.as_str())
            .field("api_path", &self.inner.api_path)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> StoreClient {
        let config =
            ClientConfig::new("https://api.example.com/v2", "mystore", "/tmp/token.json").unwrap();
        StoreClient::new(&config)
    }

    #[test]
    fn test_api_path_splicing() {
        let client = client();
        assert_eq!(client.api("admin/products?page=2"), "api/mystore/admin/products?page=2");
        assert_eq!(
            client.inner.base.join(&client.api("cart")).unwrap().as_str(),
            "https://api.example.com/v2/api/mystore/cart"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = client();
        client.install_token("super-secret-token");
        let output = format!("{client:?}");
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("super-secret-token"));
    }

    #[test]
    fn test_token_slot_install_and_remove() {
        let client = client();
        client.install_token("abc");
        assert!(client.inner.token.read().unwrap().is_some());
        client.remove_token();
        assert!(client.inner.token.read().unwrap().is_none());
    }
}
