//! Streaming feed — frames, connection state, supervisor, dispatch.
//!
//! The transport is abstracted behind [`transport::Connector`]:
//! - `ws-native` feature → `tokio-tungstenite` (native.rs)
//! - tests and embedders can supply their own connector.
//!
//! This module defines the wire frames and the shared configuration/state types.

pub mod dispatch;
pub mod gate;
pub mod subscriptions;
pub mod supervisor;
pub mod transport;

#[cfg(feature = "ws-native")]
pub mod native;

use serde::Serialize;
use serde_json::Value;

use crate::config::SOURCE_TAG;
use crate::error::WsError;
use crate::session::SessionState;
use crate::shared::{FeedType, SubscriptionKey};

pub use dispatch::{Callbacks, Dispatcher, FeedError, Route};
pub use gate::WriteGate;
pub use subscriptions::SubscriptionRegistry;
pub use supervisor::FeedHandle;
pub use transport::{Connector, FrameSink, FrameSource, Heartbeat, Inbound, Transport};

// ─── Outbound frames ─────────────────────────────────────────────────────────

/// Frames sent from client to server, discriminated by `t`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "t")]
pub enum MessageOut {
    #[serde(rename = "c")]
    Connect(AuthFrame),
    #[serde(rename = "t")]
    Touchline { k: String },
    #[serde(rename = "d")]
    SnapQuote { k: String },
    #[serde(rename = "u")]
    UnsubscribeTouchline { k: String },
    #[serde(rename = "ud")]
    UnsubscribeSnapQuote { k: String },
    #[serde(rename = "o")]
    OrderWatch { actid: String },
    #[serde(rename = "uo")]
    OrderUnwatch,
    #[serde(rename = "h")]
    Heartbeat,
}

/// Body of the authentication frame.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct AuthFrame {
    pub uid: String,
    pub pwd: String,
    pub actid: String,
    pub susertoken: String,
    pub source: String,
}

impl std::fmt::Debug for AuthFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthFrame")
            .field("uid", &self.uid)
            .field("actid", &self.actid)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl MessageOut {
    /// Authentication frame built from the stored session.
    pub fn auth(session: &SessionState) -> Self {
        MessageOut::Connect(AuthFrame {
            uid: session.user_id().to_string(),
            pwd: session.password().to_string(),
            actid: session.account_id().to_string(),
            susertoken: session.session_token().to_string(),
            source: SOURCE_TAG.to_string(),
        })
    }

    pub fn subscribe(keys: &[SubscriptionKey], feed: FeedType) -> Self {
        let k = SubscriptionKey::join(keys);
        match feed {
            FeedType::Touchline => MessageOut::Touchline { k },
            FeedType::SnapQuote => MessageOut::SnapQuote { k },
        }
    }

    pub fn unsubscribe(keys: &[SubscriptionKey], feed: FeedType) -> Self {
        let k = SubscriptionKey::join(keys);
        match feed {
            FeedType::Touchline => MessageOut::UnsubscribeTouchline { k },
            FeedType::SnapQuote => MessageOut::UnsubscribeSnapQuote { k },
        }
    }

    pub fn order_watch(account_id: &str) -> Self {
        MessageOut::OrderWatch {
            actid: account_id.to_string(),
        }
    }

    /// Short name for logging. Never includes frame contents.
    pub fn kind(&self) -> &'static str {
        match self {
            MessageOut::Connect(_) => "connect",
            MessageOut::Touchline { .. } => "touchline",
            MessageOut::SnapQuote { .. } => "snapquote",
            MessageOut::UnsubscribeTouchline { .. } => "unsubscribe_touchline",
            MessageOut::UnsubscribeSnapQuote { .. } => "unsubscribe_snapquote",
            MessageOut::OrderWatch { .. } => "order_watch",
            MessageOut::OrderUnwatch => "order_unwatch",
            MessageOut::Heartbeat => "heartbeat",
        }
    }

    pub fn to_json(&self) -> Result<String, WsError> {
        serde_json::to_string(self).map_err(|e| WsError::ProtocolError(e.to_string()))
    }
}

// ─── Inbound classification ──────────────────────────────────────────────────

/// Discriminator values of inbound frames.
pub mod discriminator {
    pub const TOUCHLINE_ACK: &str = "tk";
    pub const TOUCHLINE_FEED: &str = "tf";
    pub const ORDER_UPDATE: &str = "om";
    pub const CONNECT_ACK: &str = "ck";
    /// `s` value of a successful connection ack.
    pub const ACK_OK: &str = "OK";
}

/// Category of an inbound frame, decided by its `t` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundKind {
    /// `tk` (first tick after subscribing) or `tf` (subsequent ticks).
    Feed,
    /// `om`.
    OrderUpdate,
    /// `ck`; `ok` when `s == "OK"`.
    ConnectionAck { ok: bool },
    Unclassified,
}

impl InboundKind {
    pub fn of(frame: &Value) -> Self {
        let t = frame.get("t").and_then(Value::as_str).unwrap_or_default();
        match t {
            discriminator::TOUCHLINE_ACK | discriminator::TOUCHLINE_FEED => InboundKind::Feed,
            discriminator::ORDER_UPDATE => InboundKind::OrderUpdate,
            discriminator::CONNECT_ACK => {
                let status = frame.get("s").and_then(Value::as_str);
                InboundKind::ConnectionAck {
                    ok: status == Some(discriminator::ACK_OK),
                }
            }
            _ => InboundKind::Unclassified,
        }
    }
}

// ─── Connection state ────────────────────────────────────────────────────────

/// Observable health of the streaming session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Feed created, nothing attempted yet.
    #[default]
    Idle,
    Connecting,
    /// Transport open, authentication frame being written.
    Authenticating,
    /// Authentication sent; application frames flow.
    Streaming,
    /// Transport lost; a reconnect follows unless attempts are exhausted.
    Failed,
    /// Shut down or out of reconnect attempts. Terminal.
    Closed,
}

impl ConnectionState {
    /// The "connected" flag: application writes may go out.
    pub fn is_connected(&self) -> bool {
        *self == ConnectionState::Streaming
    }

    pub fn is_terminal(&self) -> bool {
        *self == ConnectionState::Closed
    }
}

// ─── Configuration ───────────────────────────────────────────────────────────

/// Configuration for the streaming feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WsConfig {
    /// Fixed delay between a lost connection and the next attempt.
    pub reconnect_delay_ms: u64,
    /// Consecutive failed connects before giving up. `0` retries forever.
    pub max_reconnect_attempts: u32,
    /// Transport heartbeat interval.
    pub ping_interval_ms: u64,
    /// Transport heartbeat payload.
    pub ping_payload: String,
    /// Timeout for opening the transport.
    pub connect_timeout_ms: u64,
    /// Replay tracked subscriptions after each re-authentication.
    pub resubscribe_on_reconnect: bool,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            reconnect_delay_ms: 100,
            max_reconnect_attempts: 0,
            ping_interval_ms: 3000,
            ping_payload: r#"{"t":"h"}"#.to_string(),
            connect_timeout_ms: 30_000,
            resubscribe_on_reconnect: false,
        }
    }
}

impl WsConfig {
    pub fn heartbeat(&self) -> Heartbeat {
        Heartbeat {
            interval: std::time::Duration::from_millis(self.ping_interval_ms),
            payload: self.ping_payload.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_auth_frame_shape() {
        let session = SessionState::new("U1", "A1", "secret", "tok123");
        let json: Value = serde_json::from_str(&MessageOut::auth(&session).to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            json!({
                "t": "c",
                "uid": "U1",
                "pwd": "secret",
                "actid": "A1",
                "susertoken": "tok123",
                "source": "API"
            })
        );
    }

    #[test]
    fn test_auth_frame_debug_hides_secrets() {
        let session = SessionState::new("U1", "A1", "secret", "tok123");
        let out = format!("{:?}", MessageOut::auth(&session));
        assert!(!out.contains("secret"));
        assert!(!out.contains("tok123"));
    }

    #[test]
    fn test_subscribe_frames() {
        let keys = vec![SubscriptionKey::from("NSE|22"), SubscriptionKey::from("NSE|2885")];
        assert_eq!(
            MessageOut::subscribe(&keys, FeedType::Touchline).to_json().unwrap(),
            r#"{"t":"t","k":"NSE|22#NSE|2885"}"#
        );
        assert_eq!(
            MessageOut::subscribe(&keys[..1], FeedType::SnapQuote).to_json().unwrap(),
            r#"{"t":"d","k":"NSE|22"}"#
        );
        assert_eq!(
            MessageOut::unsubscribe(&keys[..1], FeedType::SnapQuote).to_json().unwrap(),
            r#"{"t":"ud","k":"NSE|22"}"#
        );
    }

    #[test]
    fn test_order_frames() {
        assert_eq!(
            MessageOut::order_watch("A1").to_json().unwrap(),
            r#"{"t":"o","actid":"A1"}"#
        );
        assert_eq!(MessageOut::OrderUnwatch.to_json().unwrap(), r#"{"t":"uo"}"#);
        assert_eq!(MessageOut::Heartbeat.to_json().unwrap(), r#"{"t":"h"}"#);
    }

    #[test]
    fn test_inbound_kind() {
        assert_eq!(InboundKind::of(&json!({"t": "tk", "lp": "100"})), InboundKind::Feed);
        assert_eq!(InboundKind::of(&json!({"t": "tf"})), InboundKind::Feed);
        assert_eq!(InboundKind::of(&json!({"t": "om"})), InboundKind::OrderUpdate);
        assert_eq!(
            InboundKind::of(&json!({"t": "ck", "s": "OK"})),
            InboundKind::ConnectionAck { ok: true }
        );
        assert_eq!(
            InboundKind::of(&json!({"t": "ck", "s": "Invalid Session"})),
            InboundKind::ConnectionAck { ok: false }
        );
        assert_eq!(
            InboundKind::of(&json!({"t": "ck"})),
            InboundKind::ConnectionAck { ok: false }
        );
        assert_eq!(InboundKind::of(&json!({"t": "dk"})), InboundKind::Unclassified);
        assert_eq!(InboundKind::of(&json!({"lp": "1"})), InboundKind::Unclassified);
    }

    #[test]
    fn test_config_default() {
        let config = WsConfig::default();
        assert_eq!(config.reconnect_delay_ms, 100);
        assert_eq!(config.max_reconnect_attempts, 0);
        assert_eq!(config.ping_interval_ms, 3000);
        assert_eq!(config.ping_payload, r#"{"t":"h"}"#);
        assert!(!config.resubscribe_on_reconnect);
    }

    #[test]
    fn test_connected_flag_only_when_streaming() {
        assert!(ConnectionState::Streaming.is_connected());
        for state in [
            ConnectionState::Idle,
            ConnectionState::Connecting,
            ConnectionState::Authenticating,
            ConnectionState::Failed,
            ConnectionState::Closed,
        ] {
            assert!(!state.is_connected());
        }
    }
}
