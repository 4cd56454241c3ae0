//! Session lifecycle: token acquisition, persistence, validation, and
//! propagation.
//!
//! The session store is the only component allowed to install or remove the
//! bearer token on the transport. Holding a token string is not enough to be
//! authenticated - only a server-side check since the token was last set is.

use chrono::Utc;
use reqwest::Method;
use tracing::{debug, instrument, warn};

use crate::error::ApiError;
use crate::http::StoreClient;
use crate::token::{PersistedToken, TokenStore};
use crate::wire::SignInResponse;

/// Sign-in credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account name (an email address for this service).
    pub username: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Build credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// A freshly issued token and its expiry (epoch milliseconds).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    /// The raw bearer token.
    pub token: String,
    /// Expiry as epoch milliseconds.
    pub expired: i64,
}

/// Backend operations the session store needs.
///
/// `attach`/`detach` are part of the contract on purpose: installing the
/// token where outgoing calls pick it up is the session store's job, not
/// something every caller remembers to do.
pub trait AuthApi {
    /// Exchange credentials for a token.
    async fn sign_in(&self, credentials: &Credentials) -> Result<TokenGrant, ApiError>;

    /// Validate the currently attached token against the server.
    async fn check(&self) -> Result<(), ApiError>;

    /// Install the token carried by subsequent requests.
    fn attach(&self, token: &str);

    /// Remove the token from outgoing requests.
    fn detach(&self);
}

impl AuthApi for StoreClient {
    #[instrument(skip_all)]
    async fn sign_in(&self, credentials: &Credentials) -> Result<TokenGrant, ApiError> {
        #[derive(serde::Serialize)]
        struct SignInBody<'a> {
            username: &'a str,
            password: &'a str,
        }

        let response: SignInResponse = self
            .send_json(
                Method::POST,
                "admin/signin",
                &SignInBody {
                    username: &credentials.username,
                    password: &credentials.password,
                },
            )
            .await?;
        Ok(TokenGrant {
            token: response.token,
            expired: response.expired,
        })
    }

    #[instrument(skip(self))]
    async fn check(&self) -> Result<(), ApiError> {
        let path = self.api("user/check");
        self.send_ack::<()>(Method::POST, &path, None).await
    }

    fn attach(&self, token: &str) {
        self.install_token(token);
    }

    fn detach(&self) {
        self.remove_token();
    }
}

/// The session's observable state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No valid session. The only state a failure can leave behind.
    #[default]
    Unauthenticated,
    /// A restore check is in flight. Exists purely so a surface can avoid
    /// flashing the sign-in view while the check runs.
    Pending,
    /// A server-side check has succeeded since the token was last set.
    Authenticated,
}

/// Owns the session token and its lifecycle.
pub struct SessionStore<A, S> {
    api: A,
    tokens: S,
    state: SessionState,
}

impl<A: AuthApi, S: TokenStore> SessionStore<A, S> {
    /// Create a store in the `Unauthenticated` state.
    pub const fn new(api: A, tokens: S) -> Self {
        Self {
            api,
            tokens,
            state: SessionState::Unauthenticated,
        }
    }

    /// Current session state.
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// True once a server-side check has succeeded.
    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    /// Restore a persisted session, validating the token against the server.
    ///
    /// Always ends in `Authenticated` or `Unauthenticated`; a token that is
    /// absent, expired, or rejected leaves no persisted state behind.
    #[instrument(skip_all)]
    pub async fn restore(&mut self) -> SessionState {
        let Some(persisted) = self.tokens.load() else {
            self.state = SessionState::Unauthenticated;
            return self.state;
        };

        if persisted.is_expired(Utc::now().timestamp_millis()) {
            debug!("persisted token expired; discarding");
            self.discard_persisted();
            self.state = SessionState::Unauthenticated;
            return self.state;
        }

        self.api.attach(&persisted.token);
        self.state = SessionState::Pending;

        match self.api.check().await {
            Ok(()) => {
                self.state = SessionState::Authenticated;
            }
            Err(e) => {
                warn!(error = %e, "persisted token rejected by server");
                self.api.detach();
                self.discard_persisted();
                self.state = SessionState::Unauthenticated;
            }
        }
        self.state
    }

    /// Submit credentials.
    ///
    /// On success the issued token is persisted with its expiry and attached
    /// to outgoing calls. On failure the state stays `Unauthenticated`,
    /// nothing is persisted, and the error's [`ApiError::reason`] is the
    /// human-readable message to show.
    #[instrument(skip_all)]
    pub async fn sign_in(&mut self, credentials: &Credentials) -> Result<(), ApiError> {
        match self.api.sign_in(credentials).await {
            Ok(grant) => {
                let persisted = PersistedToken {
                    token: grant.token,
                    expired: grant.expired,
                };
                if let Err(e) = self.tokens.save(&persisted) {
                    // The in-memory session still works; it just won't survive
                    // a restart.
                    warn!(error = %e, "failed to persist session token");
                }
                self.api.attach(&persisted.token);
                self.state = SessionState::Authenticated;
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Unauthenticated;
                Err(e)
            }
        }
    }

    /// End the session locally: detach the token and discard persistence.
    #[instrument(skip_all)]
    pub fn sign_out(&mut self) {
        self.api.detach();
        self.discard_persisted();
        self.state = SessionState::Unauthenticated;
    }

    fn discard_persisted(&self) {
        if let Err(e) = self.tokens.clear() {
            warn!(error = %e, "failed to clear persisted token");
        }
    }
}
