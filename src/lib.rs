//! # Noren SDK
//!
//! A Rust client for brokerages running the Noren OMS: REST trading API plus a
//! self-healing streaming feed for market data and order updates.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Shared enums, per-client configuration, session state, domain models
//! 2. **Auth** — Credential hashing and the login flow
//! 3. **HTTP API** — `NorenHttp` with per-endpoint retry policies
//! 4. **Streaming feed** — Supervisor, dispatcher and write gate over a pluggable
//!    transport (`tokio-tungstenite` with `ws-native`)
//! 5. **High-Level Client** — `NorenClient` with nested sub-clients
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use noren_sdk::prelude::*;
//!
//! let client = NorenClient::builder()
//!     .host("https://broker.example/NorenWClientTP")
//!     .websocket_endpoint("wss://broker.example/NorenWSTP/")
//!     .build()?;
//!
//! client.auth().login(&params).await?;
//!
//! let feed = client
//!     .start_websocket(Callbacks::new().on_subscribe_data(|tick| println!("{tick}")))
//!     .await?;
//! feed.subscribe(&[SubscriptionKey::from_parts("NSE", "22")], FeedType::Touchline).await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared enums and newtypes used across all domains.
pub mod shared;

/// Per-client service configuration: host, routes, websocket endpoint.
pub mod config;

/// Session produced by login.
pub mod session;

/// Domain modules (vertical slices): types, wire types, conversions, sub-clients.
pub mod domain;

/// Unified SDK error types.
pub mod error;

// ── Layer 2: Auth ────────────────────────────────────────────────────────────

/// Authentication: hashing, login wire types, login flow.
pub mod auth;

// ── Layer 3: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: Streaming feed ──────────────────────────────────────────────────

/// Streaming feed: frames, supervisor, dispatcher, write gate, transports.
#[cfg(feature = "ws")]
pub mod ws;

// ── Layer 5: High-Level Client ───────────────────────────────────────────────

/// `NorenClient` — the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared enums and newtypes
    pub use crate::shared::{
        BuyOrSell, FeedType, PriceType, ProductType, Retention, SubscriptionKey,
    };

    // Configuration + session
    pub use crate::config::{Routes, ServiceConfig, DEFAULT_HOST, DEFAULT_WS_ENDPOINT};
    pub use crate::session::SessionState;

    // Domain types
    pub use crate::domain::market::{Candle, Instrument, SecurityInfo};
    pub use crate::domain::order::{ModifyOrder, OrderAck, OrderRecord, PlaceOrder, PlacedOrder};
    pub use crate::domain::portfolio::{Holding, HoldingScrip, Position};

    // Errors
    pub use crate::error::{AuthError, HttpError, SdkError, WsError};

    // Auth
    pub use crate::auth::{LoginParams, LoginResponse};

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{
        AuthClient, MarketsClient, NorenClient, NorenClientBuilder, OrdersClient,
        PortfolioClient,
    };
    #[cfg(feature = "http")]
    pub use crate::http::retry::{RetryConfig, RetryPolicy};

    // Streaming feed
    #[cfg(feature = "ws")]
    pub use crate::ws::{
        Callbacks, ConnectionState, Connector, FeedError, FeedHandle, MessageOut, WsConfig,
    };
    #[cfg(feature = "ws-native")]
    pub use crate::ws::native::TungsteniteConnector;
}
