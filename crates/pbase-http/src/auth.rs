//! Credential lifecycle for outgoing requests.

use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use pbase_core::error::AuthError;
use pbase_core::{AuthStrategy, AuthToken, Credential, Error, Result};

use crate::endpoints::{AuthResponse, PasswordAuthRequest};
use crate::executor::HttpExecutor;
use crate::request::RequestSpec;

/// Produces and refreshes the bearer credential of one client.
///
/// The strategy is fixed at construction. The credential is created on the
/// first [`ensure`](Self::ensure) and replaced wholesale on every refresh.
///
/// # Thread Safety
///
/// All credential state sits behind one async mutex that stays locked for
/// the whole auth round-trip: concurrent callers wait for a single refresh
/// instead of starting their own, and never see a half-written token.
///
/// # Re-authentication
///
/// A held credential is reused until [`invalidate`](Self::invalidate) marks
/// it stale. The client does this when a request is answered with HTTP 401;
/// the next `ensure` then logs in again (password strategies) or refreshes
/// the last token (external tokens).
pub struct Authenticator {
    strategy: AuthStrategy,
    state: Mutex<AuthState>,
}

#[derive(Default)]
struct AuthState {
    credential: Option<Credential>,
    stale: bool,
}

impl Authenticator {
    pub fn new(strategy: AuthStrategy) -> Self {
        Self {
            strategy,
            state: Mutex::new(AuthState::default()),
        }
    }

    pub fn strategy(&self) -> &AuthStrategy {
        &self.strategy
    }

    /// Make sure a valid credential is available for the next request.
    ///
    /// Returns the token to attach, or `None` for [`AuthStrategy::NoOp`],
    /// which never issues a request and never fails.
    ///
    /// # Errors
    ///
    /// Any failure of the auth or refresh endpoint is an [`Error::Auth`].
    #[instrument(skip(self, executor), fields(strategy = %self.strategy.kind()))]
    pub async fn ensure(&self, executor: &HttpExecutor) -> Result<Option<AuthToken>> {
        if matches!(self.strategy, AuthStrategy::NoOp) {
            return Ok(None);
        }

        let mut state = self.state.lock().await;
        if !state.stale
            && let Some(credential) = &state.credential
        {
            return Ok(Some(credential.token().clone()));
        }

        let credential = self.acquire(executor, state.credential.as_ref()).await?;
        let token = credential.token().clone();
        state.credential = Some(credential);
        state.stale = false;

        debug!("credential stored");
        Ok(Some(token))
    }

    /// Mark the held credential stale so the next `ensure` renews it.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        if state.credential.is_some() {
            debug!("credential invalidated");
            state.stale = true;
        }
    }

    /// Returns a snapshot of the current token, if one is held.
    pub async fn token(&self) -> Option<AuthToken> {
        let state = self.state.lock().await;
        state.credential.as_ref().map(|c| c.token().clone())
    }

    /// Returns the authenticated record echoed by the auth endpoint.
    pub async fn record(&self) -> Option<serde_json::Value> {
        let state = self.state.lock().await;
        state
            .credential
            .as_ref()
            .and_then(|c| c.record().cloned())
    }

    /// Returns a snapshot of the whole credential.
    pub async fn credential(&self) -> Option<Credential> {
        self.state.lock().await.credential.clone()
    }

    /// True when the next `ensure` will not contact the server.
    pub async fn is_valid(&self) -> bool {
        if matches!(self.strategy, AuthStrategy::NoOp) {
            return true;
        }
        let state = self.state.lock().await;
        state.credential.is_some() && !state.stale
    }

    async fn acquire(
        &self,
        executor: &HttpExecutor,
        previous: Option<&Credential>,
    ) -> Result<Credential> {
        let response: Result<AuthResponse> = match &self.strategy {
            AuthStrategy::NoOp => return Err(AuthError::MissingToken.into()),
            AuthStrategy::EmailPassword {
                credentials,
                endpoint,
            } => {
                info!(collection = endpoint.collection(), "authenticating with password");
                let path = endpoint.path();
                let request = PasswordAuthRequest {
                    identity: credentials.email(),
                    password: credentials.password(),
                };
                let spec = RequestSpec::post(&path).with_json(&request)?.sensitive();
                executor.send(spec).await
            }
            AuthStrategy::ExternalToken { token, refresh } => {
                info!(endpoint = refresh.path(), "refreshing token");
                let current = previous.map(Credential::token).unwrap_or(token);
                let spec = RequestSpec::post(refresh.path())
                    .with_token(Some(current.clone()))
                    .sensitive();
                executor.send(spec).await
            }
        };

        let response = response.map_err(into_auth_error)?;
        if response.token.is_empty() {
            return Err(AuthError::MissingToken.into());
        }

        Ok(Credential::new(
            AuthToken::new(response.token),
            self.strategy.kind(),
            response.record,
        ))
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("strategy", &self.strategy.kind())
            .field("state", &"[REDACTED]")
            .finish()
    }
}

/// Reclassify an executor failure on an auth endpoint.
fn into_auth_error(err: Error) -> Error {
    match err {
        Error::Transport(e) => AuthError::Unreachable(e).into(),
        Error::Server(e) => AuthError::Rejected {
            status: e.status,
            body: e.body,
        }
        .into(),
        Error::Decode(e) => AuthError::MalformedResponse {
            reason: e.to_string(),
        }
        .into(),
        other => other,
    }
}
