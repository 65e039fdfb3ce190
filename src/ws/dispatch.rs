//! Inbound frame decoding and callback routing.

use serde_json::Value;
use tracing::{debug, trace};

use super::InboundKind;
use crate::error::WsError;

pub type FrameCallback = Box<dyn Fn(&Value) + Send + Sync>;
pub type EventCallback = Box<dyn Fn() + Send + Sync>;
pub type ErrorCallback = Box<dyn Fn(&FeedError) + Send + Sync>;

/// What the error callback receives.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedError {
    /// The server rejected authentication (`ck` with a non-`OK` status).
    Rejected(Value),
    /// Connect failure, transport error or undecodable frame.
    Transport(WsError),
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedError::Rejected(frame) => write!(f, "Connection rejected: {}", frame),
            FeedError::Transport(e) => write!(f, "{}", e),
        }
    }
}

/// User callbacks for the streaming feed. Every slot is optional.
///
/// Callbacks run on the supervisor task, one at a time, in frame order.
/// A slow callback delays every frame behind it.
#[derive(Default)]
pub struct Callbacks {
    on_subscribe_data: Option<FrameCallback>,
    on_order_update: Option<FrameCallback>,
    on_open: Option<EventCallback>,
    on_close: Option<EventCallback>,
    on_error: Option<ErrorCallback>,
    on_market_status: Option<FrameCallback>,
    on_exchange_message: Option<FrameCallback>,
    on_open_interest: Option<FrameCallback>,
    on_price_band: Option<FrameCallback>,
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_subscribe_data", &self.on_subscribe_data.is_some())
            .field("on_order_update", &self.on_order_update.is_some())
            .field("on_open", &self.on_open.is_some())
            .field("on_close", &self.on_close.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish_non_exhaustive()
    }
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// `tk`/`tf` market-data frames.
    pub fn on_subscribe_data(mut self, f: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        self.on_subscribe_data = Some(Box::new(f));
        self
    }

    /// `om` order-update frames.
    pub fn on_order_update(mut self, f: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        self.on_order_update = Some(Box::new(f));
        self
    }

    /// Successful connection acknowledgement.
    pub fn on_open(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_open = Some(Box::new(f));
        self
    }

    pub fn on_close(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&FeedError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    /// Accepted for API compatibility. The server's frame for this is not routed.
    pub fn on_market_status(mut self, f: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        self.on_market_status = Some(Box::new(f));
        self
    }

    /// Accepted for API compatibility. The server's frame for this is not routed.
    pub fn on_exchange_message(mut self, f: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        self.on_exchange_message = Some(Box::new(f));
        self
    }

    /// Accepted for API compatibility. The server's frame for this is not routed.
    pub fn on_open_interest(mut self, f: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        self.on_open_interest = Some(Box::new(f));
        self
    }

    /// Accepted for API compatibility. The server's frame for this is not routed.
    pub fn on_price_band(mut self, f: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        self.on_price_band = Some(Box::new(f));
        self
    }
}

/// Which callback a frame went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SubscribeData,
    Error,
    OrderUpdate,
    Open,
}

/// Routes decoded frames to the registered callbacks.
#[derive(Debug)]
pub struct Dispatcher {
    callbacks: Callbacks,
}

impl Dispatcher {
    pub fn new(callbacks: Callbacks) -> Self {
        Self { callbacks }
    }

    /// Decode a text frame. Anything but a JSON object is a protocol error.
    pub fn decode(text: &str) -> Result<Value, WsError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| WsError::DeserializationError(e.to_string()))?;
        if !value.is_object() {
            return Err(WsError::DeserializationError(format!(
                "expected a JSON object, got: {}",
                text
            )));
        }
        Ok(value)
    }

    /// Route one frame. First matching rule wins; a rule whose callback is
    /// not registered is skipped. Returns `None` when nothing was invoked.
    pub fn dispatch(&self, frame: &Value) -> Option<Route> {
        let kind = InboundKind::of(frame);
        let cb = &self.callbacks;

        if let (Some(f), InboundKind::Feed) = (&cb.on_subscribe_data, kind) {
            f(frame);
            return Some(Route::SubscribeData);
        }
        if let (Some(f), InboundKind::ConnectionAck { ok: false }) = (&cb.on_error, kind) {
            f(&FeedError::Rejected(frame.clone()));
            return Some(Route::Error);
        }
        if let (Some(f), InboundKind::OrderUpdate) = (&cb.on_order_update, kind) {
            f(frame);
            return Some(Route::OrderUpdate);
        }
        if let (Some(f), InboundKind::ConnectionAck { ok: true }) = (&cb.on_open, kind) {
            f();
            return Some(Route::Open);
        }

        trace!(kind = ?kind, "Frame not routed");
        None
    }

    pub fn notify_error(&self, error: &FeedError) {
        debug!(error = %error, "Feed error");
        if let Some(f) = &self.callbacks.on_error {
            f(error);
        }
    }

    pub fn notify_close(&self) {
        if let Some(f) = &self.callbacks.on_close {
            f();
        }
    }
}
