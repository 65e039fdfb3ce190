//! Connection supervisor: owns the feed's background task.
//!
//! One task per feed runs connect → authenticate → receive → reconnect until
//! shutdown or until reconnect attempts are exhausted. The public
//! [`FeedHandle`] talks to it only through the shared [`WriteGate`], the
//! subscription registry and a shutdown signal.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::dispatch::{Callbacks, Dispatcher, FeedError};
use super::gate::WriteGate;
use super::subscriptions::{Subscription, SubscriptionRegistry};
use super::transport::{Connector, Inbound, Transport};
use super::{ConnectionState, MessageOut, WsConfig};
use crate::error::{AuthError, SdkError, WsError};
use crate::session::SessionState;
use crate::shared::{FeedType, SubscriptionKey};

type SharedRegistry = Arc<Mutex<SubscriptionRegistry>>;

fn lock_registry(registry: &SharedRegistry) -> std::sync::MutexGuard<'_, SubscriptionRegistry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

// ─── How a connection ended ──────────────────────────────────────────────────

enum SessionEnd {
    /// The transport never opened.
    ConnectFailed(WsError),
    /// The transport opened, then failed (error, bad frame, failed auth write).
    Failed(WsError),
    /// The peer closed or the stream ended.
    Closed { code: Option<u16>, reason: String },
}

// ─── Public handle ───────────────────────────────────────────────────────────

struct FeedInner {
    gate: Arc<WriteGate>,
    registry: SharedRegistry,
    account_id: String,
    shutdown_tx: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for FeedInner {
    fn drop(&mut self) {
        let task = self
            .task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = task {
            handle.abort();
        }
    }
}

/// Handle to a running streaming feed.
///
/// Cheap to clone; all clones drive the same session. Dropping the last
/// clone aborts the background task.
#[derive(Clone)]
pub struct FeedHandle {
    inner: Arc<FeedInner>,
}

impl std::fmt::Debug for FeedHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedHandle")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl FeedHandle {
    /// Spawn the supervisor task and return immediately.
    ///
    /// The first connect attempt starts right away; the returned handle does
    /// not wait for it. Requires a session carrying a token.
    pub async fn start(
        connector: Arc<dyn Connector>,
        url: String,
        session: SessionState,
        config: WsConfig,
        callbacks: Callbacks,
    ) -> Result<FeedHandle, SdkError> {
        if !session.has_token() {
            return Err(AuthError::NotAuthenticated.into());
        }

        let gate = Arc::new(WriteGate::new());
        let registry: SharedRegistry = Arc::new(Mutex::new(SubscriptionRegistry::new()));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let supervisor = Supervisor {
            connector,
            url,
            auth: MessageOut::auth(&session),
            config,
            dispatcher: Dispatcher::new(callbacks),
            gate: Arc::clone(&gate),
            registry: Arc::clone(&registry),
        };
        let task = tokio::spawn(supervisor.run(shutdown_rx));

        Ok(FeedHandle {
            inner: Arc::new(FeedInner {
                gate,
                registry,
                account_id: session.account_id().to_string(),
                shutdown_tx,
                task: Mutex::new(Some(task)),
            }),
        })
    }

    /// Send a frame through the write gate.
    ///
    /// Waits while the session is not streaming. Fails with
    /// [`WsError::Shutdown`] once the feed is closed. Subscriptions are
    /// tracked only once their frame has been written.
    pub async fn send(&self, message: MessageOut) -> Result<(), WsError> {
        self.inner.gate.send(&message).await?;
        lock_registry(&self.inner.registry).track(&message);
        Ok(())
    }

    /// Subscribe to market data for one or more instruments. Duplicates are
    /// not suppressed on the wire.
    pub async fn subscribe(&self, keys: &[SubscriptionKey], feed: FeedType) -> Result<(), WsError> {
        self.send(MessageOut::subscribe(keys, feed)).await
    }

    pub async fn unsubscribe(&self, keys: &[SubscriptionKey], feed: FeedType) -> Result<(), WsError> {
        self.send(MessageOut::unsubscribe(keys, feed)).await
    }

    /// Watch order updates for the session's account.
    pub async fn subscribe_orders(&self) -> Result<(), WsError> {
        self.send(MessageOut::order_watch(&self.inner.account_id))
            .await
    }

    pub async fn unsubscribe_orders(&self) -> Result<(), WsError> {
        self.send(MessageOut::OrderUnwatch).await
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.gate.state()
    }

    /// Receiver notified on every state transition.
    pub fn state_changes(&self) -> watch::Receiver<ConnectionState> {
        self.inner.gate.subscribe_state()
    }

    /// Whether application frames are currently allowed out.
    pub fn is_connected(&self) -> bool {
        self.inner.gate.is_connected()
    }

    /// Subscriptions the feed would replay after a reconnect.
    pub fn subscriptions(&self) -> Vec<Subscription> {
        lock_registry(&self.inner.registry).active().to_vec()
    }

    /// Stop the feed: close the transport, end the task and release pending
    /// senders with [`WsError::Shutdown`]. No `on_close` is fired for a
    /// requested shutdown.
    pub async fn shutdown(&self) {
        self.inner.shutdown_tx.send_replace(true);
        let task = self
            .inner
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = task {
            if tokio::time::timeout(Duration::from_secs(5), handle).await.is_err() {
                tracing::warn!("Feed task did not stop in time");
            }
        }
        self.inner.gate.teardown(ConnectionState::Closed).await;
    }
}

// ─── Background task ─────────────────────────────────────────────────────────

struct Supervisor {
    connector: Arc<dyn Connector>,
    url: String,
    auth: MessageOut,
    config: WsConfig,
    dispatcher: Dispatcher,
    gate: Arc<WriteGate>,
    registry: SharedRegistry,
}

impl Supervisor {
    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let delay = Duration::from_millis(self.config.reconnect_delay_ms);
        let mut failed_connects: u32 = 0;

        loop {
            if *shutdown.borrow() {
                break;
            }

            // ── 1. One connection, start to finish ──────────────────────
            self.gate.set_state(ConnectionState::Connecting);
            let end = tokio::select! {
                end = self.run_connection() => end,
                _ = shutdown.changed() => break,
            };

            // ── 2. Report and clean up ──────────────────────────────────
            match end {
                SessionEnd::ConnectFailed(e) => {
                    tracing::error!("Feed connection failed: {}", e);
                    self.gate.set_state(ConnectionState::Failed);
                    self.dispatcher.notify_error(&FeedError::Transport(e));
                    self.dispatcher.notify_close();
                    failed_connects += 1;
                }
                SessionEnd::Failed(e) => {
                    tracing::error!("Feed connection lost: {}", e);
                    self.gate.teardown(ConnectionState::Failed).await;
                    self.dispatcher.notify_error(&FeedError::Transport(e));
                    self.dispatcher.notify_close();
                    failed_connects = 0;
                }
                SessionEnd::Closed { code, reason } => {
                    tracing::info!(code = ?code, reason = %reason, "Feed connection closed");
                    self.gate.teardown(ConnectionState::Failed).await;
                    self.dispatcher.notify_close();
                    failed_connects = 0;
                }
            }

            // ── 3. Reconnect decision ───────────────────────────────────
            let max = self.config.max_reconnect_attempts;
            if max > 0 && failed_connects >= max {
                tracing::warn!("Giving up after {} failed connection attempts", failed_connects);
                break;
            }

            tracing::debug!("Reconnecting in {}ms", delay.as_millis());
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown.changed() => break,
            }
        }

        self.gate.teardown(ConnectionState::Closed).await;
        tracing::debug!("Feed task stopped");
    }

    async fn run_connection(&self) -> SessionEnd {
        let heartbeat = self.config.heartbeat();
        let timeout = Duration::from_millis(self.config.connect_timeout_ms);

        let Transport { sink, mut source } =
            match tokio::time::timeout(timeout, self.connector.connect(&self.url, &heartbeat)).await
            {
                Ok(Ok(transport)) => transport,
                Ok(Err(e)) => return SessionEnd::ConnectFailed(e),
                Err(_) => {
                    return SessionEnd::ConnectFailed(WsError::ConnectionFailed(
                        "Connection timeout".into(),
                    ))
                }
            };
        tracing::info!("Feed transport open, authenticating");

        let replay = if self.config.resubscribe_on_reconnect {
            lock_registry(&self.registry).replay()
        } else {
            Vec::new()
        };
        if !replay.is_empty() {
            tracing::info!("Resubscribing {} frame(s)", replay.len());
        }
        if let Err(e) = self.gate.open(sink, &self.auth, &replay).await {
            return SessionEnd::Failed(e);
        }

        loop {
            match source.next_frame().await {
                Ok(Inbound::Frame(text)) => match Dispatcher::decode(&text) {
                    Ok(frame) => {
                        self.dispatcher.dispatch(&frame);
                    }
                    Err(e) => {
                        tracing::warn!("Undecodable feed frame: {}", e);
                        return SessionEnd::Failed(e);
                    }
                },
                Ok(Inbound::Closed { code, reason }) => {
                    return SessionEnd::Closed { code, reason };
                }
                Err(e) => return SessionEnd::Failed(e),
            }
        }
    }
}
