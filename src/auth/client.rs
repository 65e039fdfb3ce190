//! Auth sub-client — login and session inspection.

use crate::auth::{LoginParams, LoginRequest, LoginResponse};
use crate::client::NorenClient;
use crate::error::{AuthError, SdkError};
use crate::http::{accept_ok, RetryPolicy};
use crate::session::SessionState;

/// Sub-client for authentication operations.
pub struct Auth<'a> {
    pub(crate) client: &'a NorenClient,
}

impl<'a> Auth<'a> {
    /// Log in with `QuickAuth` and store the resulting session.
    ///
    /// The password is sent as its SHA-256 digest and the API secret only as
    /// the derived `appkey`. On an accepted reply the session (user id,
    /// account id, password, token) replaces any previous one, so an existing
    /// feed keeps its old token until it is restarted.
    ///
    /// A rejected login is `Ok(None)` and leaves the stored session untouched.
    pub async fn login(&self, params: &LoginParams) -> Result<Option<LoginResponse>, SdkError> {
        let request = LoginRequest::new(params);
        let reply = self
            .client
            .http
            .post(&self.client.routes().authorize, &request, None, RetryPolicy::None)
            .await?;

        let Some(response) = accept_ok::<LoginResponse>("login", reply) else {
            return Ok(None);
        };
        if response.susertoken.trim().is_empty() {
            return Err(AuthError::MissingToken.into());
        }

        let session = SessionState::new(
            &params.user_id,
            &params.user_id,
            &params.password,
            &response.susertoken,
        );
        *self.client.session.write().await = Some(session);
        tracing::info!(user_id = %params.user_id, "Logged in");

        Ok(Some(response))
    }

    /// The stored session, if any.
    pub async fn session(&self) -> Option<SessionState> {
        self.client.session.read().await.clone()
    }

    /// Whether a session with a token is stored. Does not contact the server.
    pub async fn is_authenticated(&self) -> bool {
        self.client
            .session
            .read()
            .await
            .as_ref()
            .map(SessionState::has_token)
            .unwrap_or(false)
    }
}
