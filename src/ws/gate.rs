//! Outbound write gate.
//!
//! Every application frame goes through [`WriteGate::send`], which holds the
//! caller until the session is streaming and then writes under a single
//! FIFO mutex. The supervisor writes the authentication frame while holding
//! the same mutex and only then flips the state to
//! [`Streaming`](ConnectionState::Streaming), so no application frame can
//! precede authentication on a connection.

use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

use super::transport::FrameSink;
use super::{ConnectionState, MessageOut};
use crate::error::WsError;

pub struct WriteGate {
    state: watch::Sender<ConnectionState>,
    writer: Mutex<Option<Box<dyn FrameSink>>>,
}

impl Default for WriteGate {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteGate {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ConnectionState::Idle);
        Self {
            state,
            writer: Mutex::new(None),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    pub(crate) fn set_state(&self, next: ConnectionState) {
        let prev = self.state.send_replace(next);
        if prev != next {
            debug!(from = ?prev, to = ?next, "Feed state changed");
        }
    }

    /// Serialize and send one frame, waiting for the session to be streaming.
    ///
    /// Waits indefinitely while disconnected. Returns [`WsError::Shutdown`]
    /// once the feed is closed for good.
    pub async fn send(&self, message: &MessageOut) -> Result<(), WsError> {
        let frame = message.to_json()?;
        debug!(kind = message.kind(), "Queueing frame");
        self.send_text(frame).await
    }

    pub async fn send_text(&self, frame: String) -> Result<(), WsError> {
        let mut state = self.state.subscribe();
        loop {
            let current = *state
                .wait_for(|s| s.is_connected() || s.is_terminal())
                .await
                .map_err(|_| WsError::Shutdown)?;
            if current.is_terminal() {
                return Err(WsError::Shutdown);
            }

            let mut writer = self.writer.lock().await;
            // The connection may have dropped while this caller was queued.
            if !self.is_connected() {
                drop(writer);
                continue;
            }
            return match writer.as_mut() {
                Some(sink) => sink.send_frame(frame).await.inspect_err(|e| {
                    warn!(error = %e, "Frame write failed");
                }),
                None => Err(WsError::NotConnected),
            };
        }
    }

    /// Install a fresh sink: write the authentication frame and any replayed
    /// frames, then open the gate.
    pub(crate) async fn open(
        &self,
        mut sink: Box<dyn FrameSink>,
        auth: &MessageOut,
        replay: &[MessageOut],
    ) -> Result<(), WsError> {
        let mut writer = self.writer.lock().await;
        self.set_state(ConnectionState::Authenticating);

        if let Err(e) = sink.send_frame(auth.to_json()?).await {
            sink.close().await;
            return Err(e);
        }
        for message in replay {
            debug!(kind = message.kind(), "Replaying subscription");
            if let Err(e) = sink.send_frame(message.to_json()?).await {
                sink.close().await;
                return Err(e);
            }
        }

        *writer = Some(sink);
        self.set_state(ConnectionState::Streaming);
        Ok(())
    }

    /// Close the gate, then drop and close the current sink.
    pub(crate) async fn teardown(&self, next: ConnectionState) {
        self.set_state(next);
        let sink = self.writer.lock().await.take();
        if let Some(mut sink) = sink {
            sink.close().await;
        }
    }
}
