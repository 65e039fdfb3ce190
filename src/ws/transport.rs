//! Transport seam between the supervisor and a concrete websocket library.
//!
//! A [`Connector`] opens one connection and hands back its two halves. The
//! write half ([`FrameSink`]) is owned by the [`WriteGate`](super::WriteGate);
//! the read half ([`FrameSource`]) is owned by the supervisor's receive loop.
//! Transport-level heartbeats are the connector's job.

use std::time::Duration;

use futures_util::future::BoxFuture;

use crate::error::WsError;

/// One event read from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A text frame (binary frames are decoded as UTF-8 by the connector).
    Frame(String),
    /// The peer closed the connection or the stream ended.
    Closed { code: Option<u16>, reason: String },
}

/// Transport heartbeat settings passed to the connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heartbeat {
    pub interval: Duration,
    pub payload: String,
}

pub trait FrameSink: Send {
    fn send_frame(&mut self, frame: String) -> BoxFuture<'_, Result<(), WsError>>;

    /// Best-effort close. Errors are swallowed; the connection is going away.
    fn close(&mut self) -> BoxFuture<'_, ()>;
}

pub trait FrameSource: Send {
    fn next_frame(&mut self) -> BoxFuture<'_, Result<Inbound, WsError>>;
}

/// Both halves of an open connection.
pub struct Transport {
    pub sink: Box<dyn FrameSink>,
    pub source: Box<dyn FrameSource>,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport").finish_non_exhaustive()
    }
}

/// Opens connections for the supervisor. Called once per (re)connect.
pub trait Connector: Send + Sync + 'static {
    fn connect<'a>(
        &'a self,
        url: &'a str,
        heartbeat: &'a Heartbeat,
    ) -> BoxFuture<'a, Result<Transport, WsError>>;
}
