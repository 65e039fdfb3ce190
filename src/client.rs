//! High-level client — `NorenClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, the shared session, and the feed entry points.

use crate::auth::client::Auth;
use crate::config::{Routes, ServiceConfig, DEFAULT_HOST, DEFAULT_WS_ENDPOINT};
use crate::domain::market::client::Markets;
use crate::domain::order::client::Orders;
use crate::domain::portfolio::client::Portfolio;
use crate::error::{AuthError, SdkError};
use crate::http::NorenHttp;
use crate::session::SessionState;

#[cfg(feature = "ws")]
use crate::ws::{Callbacks, Connector, FeedHandle, WsConfig};

use async_lock::RwLock;
use std::sync::Arc;

// Re-export sub-client types for convenience.
pub use crate::auth::client::Auth as AuthClient;
pub use crate::domain::market::client::Markets as MarketsClient;
pub use crate::domain::order::client::Orders as OrdersClient;
pub use crate::domain::portfolio::client::Portfolio as PortfolioClient;

/// The primary entry point for the Noren SDK.
///
/// Provides nested sub-client accessors for each domain:
/// `client.auth()`, `client.orders()`, etc. Clones share the session.
#[derive(Clone)]
pub struct NorenClient {
    pub(crate) http: NorenHttp,
    #[cfg(feature = "ws")]
    pub(crate) ws_config: WsConfig,
    pub(crate) session: Arc<RwLock<Option<SessionState>>>,
}

impl std::fmt::Debug for NorenClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NorenClient")
            .field("config", self.http.config())
            .finish_non_exhaustive()
    }
}

impl NorenClient {
    pub fn builder() -> NorenClientBuilder {
        NorenClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn auth(&self) -> Auth<'_> {
        Auth { client: self }
    }

    pub fn orders(&self) -> Orders<'_> {
        Orders { client: self }
    }

    pub fn markets(&self) -> Markets<'_> {
        Markets { client: self }
    }

    pub fn portfolio(&self) -> Portfolio<'_> {
        Portfolio { client: self }
    }

    // ── Configuration & session ──────────────────────────────────────────

    pub fn config(&self) -> &ServiceConfig {
        self.http.config()
    }

    pub(crate) fn routes(&self) -> &Routes {
        self.http.config().routes()
    }

    /// Install a session obtained elsewhere, e.g. a token refreshed out of band.
    /// The account id is taken to be the user id.
    pub async fn set_session(&self, user_id: &str, password: &str, session_token: &str) {
        *self.session.write().await =
            Some(SessionState::new(user_id, user_id, password, session_token));
    }

    pub async fn session(&self) -> Option<SessionState> {
        self.session.read().await.clone()
    }

    /// Snapshot of the session, failing when there is none or it has no token.
    pub(crate) async fn require_session(&self) -> Result<SessionState, SdkError> {
        match self.session.read().await.as_ref() {
            Some(session) if session.has_token() => Ok(session.clone()),
            _ => Err(AuthError::NotAuthenticated.into()),
        }
    }

    // ── Streaming feed ───────────────────────────────────────────────────

    #[cfg(feature = "ws")]
    pub fn ws_config(&self) -> &WsConfig {
        &self.ws_config
    }

    /// Start the streaming feed over `tokio-tungstenite`.
    ///
    /// The feed is not embedded in `NorenClient`; its lifetime belongs to
    /// the returned handle. The session must already carry a token.
    #[cfg(feature = "ws-native")]
    pub async fn start_websocket(&self, callbacks: Callbacks) -> Result<FeedHandle, SdkError> {
        self.start_websocket_with(Arc::new(crate::ws::native::TungsteniteConnector), callbacks)
            .await
    }

    /// Start the streaming feed over a caller-supplied transport.
    #[cfg(feature = "ws")]
    pub async fn start_websocket_with(
        &self,
        connector: Arc<dyn Connector>,
        callbacks: Callbacks,
    ) -> Result<FeedHandle, SdkError> {
        let session = self.require_session().await?;
        let url = self.config().websocket_url(session.session_token());
        FeedHandle::start(connector, url, session, self.ws_config.clone(), callbacks).await
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct NorenClientBuilder {
    host: String,
    websocket_endpoint: String,
    routes: Routes,
    #[cfg(feature = "ws")]
    ws_config: WsConfig,
    session: Option<SessionState>,
}

impl Default for NorenClientBuilder {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            websocket_endpoint: DEFAULT_WS_ENDPOINT.to_string(),
            routes: Routes::default(),
            #[cfg(feature = "ws")]
            ws_config: WsConfig::default(),
            session: None,
        }
    }
}

impl NorenClientBuilder {
    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    /// Streaming endpoint. May contain `{access_token}`.
    pub fn websocket_endpoint(mut self, endpoint: &str) -> Self {
        self.websocket_endpoint = endpoint.to_string();
        self
    }

    pub fn routes(mut self, routes: Routes) -> Self {
        self.routes = routes;
        self
    }

    #[cfg(feature = "ws")]
    pub fn ws_config(mut self, config: WsConfig) -> Self {
        self.ws_config = config;
        self
    }

    /// Pre-set a session on construction.
    pub fn session(mut self, session: SessionState) -> Self {
        self.session = Some(session);
        self
    }

    pub fn build(self) -> Result<NorenClient, SdkError> {
        let config = ServiceConfig::new(&self.host, &self.websocket_endpoint, self.routes);
        Ok(NorenClient {
            http: NorenHttp::new(config)?,
            #[cfg(feature = "ws")]
            ws_config: self.ws_config,
            session: Arc::new(RwLock::new(self.session)),
        })
    }
}
