//! Native transport — `tokio-tungstenite`.
//!
//! Opens a websocket, splits it, and hands the halves to the supervisor.
//! The read half also drives the transport heartbeat: every
//! `ping_interval` it writes a ping frame carrying the configured payload,
//! and it answers server pings with pongs.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::Interval;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::transport::{Connector, FrameSink, FrameSource, Heartbeat, Inbound, Transport};
use crate::error::WsError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type SharedSink = Arc<Mutex<SplitSink<WsStream, Message>>>;

/// [`Connector`] backed by `tokio-tungstenite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteConnector;

impl Connector for TungsteniteConnector {
    fn connect<'a>(
        &'a self,
        url: &'a str,
        heartbeat: &'a Heartbeat,
    ) -> BoxFuture<'a, Result<Transport, WsError>> {
        Box::pin(async move {
            let (ws_stream, _) = connect_async(url)
                .await
                .map_err(|e| WsError::ConnectionFailed(e.to_string()))?;
            let (sink, stream) = ws_stream.split();
            let sink: SharedSink = Arc::new(Mutex::new(sink));

            // `interval` panics on a zero period.
            let period = heartbeat.interval.max(std::time::Duration::from_millis(1));
            let mut ping = tokio::time::interval(period);
            ping.reset(); // skip immediate first tick

            Ok(Transport {
                sink: Box::new(TungsteniteSink {
                    sink: Arc::clone(&sink),
                }),
                source: Box::new(TungsteniteSource {
                    stream,
                    sink,
                    ping,
                    ping_payload: heartbeat.payload.clone(),
                }),
            })
        })
    }
}

// ─── Write half ──────────────────────────────────────────────────────────────

struct TungsteniteSink {
    sink: SharedSink,
}

impl FrameSink for TungsteniteSink {
    fn send_frame(&mut self, frame: String) -> BoxFuture<'_, Result<(), WsError>> {
        Box::pin(async move {
            self.sink
                .lock()
                .await
                .send(Message::Text(frame.into()))
                .await
                .map_err(|e| WsError::SendFailed(e.to_string()))
        })
    }

    fn close(&mut self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            let _ = self.sink.lock().await.close().await;
        })
    }
}

// ─── Read half ───────────────────────────────────────────────────────────────

struct TungsteniteSource {
    stream: SplitStream<WsStream>,
    sink: SharedSink,
    ping: Interval,
    ping_payload: String,
}

impl FrameSource for TungsteniteSource {
    fn next_frame(&mut self) -> BoxFuture<'_, Result<Inbound, WsError>> {
        Box::pin(async move {
            loop {
                tokio::select! {
                    msg = self.stream.next() => match msg {
                        Some(Ok(Message::Text(text))) => {
                            return Ok(Inbound::Frame(text.as_str().to_owned()));
                        }
                        Some(Ok(Message::Binary(data))) => match String::from_utf8(data.to_vec()) {
                            Ok(text) => return Ok(Inbound::Frame(text)),
                            Err(e) => {
                                return Err(WsError::DeserializationError(format!(
                                    "binary frame is not UTF-8: {}",
                                    e
                                )));
                            }
                        },
                        Some(Ok(Message::Ping(data))) => {
                            let _ = self.sink.lock().await.send(Message::Pong(data)).await;
                        }
                        Some(Ok(Message::Close(frame))) => {
                            let (code, reason) = extract_close(frame.as_ref());
                            return Ok(Inbound::Closed {
                                code: Some(code),
                                reason,
                            });
                        }
                        Some(Ok(_)) => {} // Pong, raw Frame
                        Some(Err(e)) => return Err(WsError::ProtocolError(e.to_string())),
                        None => {
                            return Ok(Inbound::Closed {
                                code: None,
                                reason: "Stream ended".into(),
                            });
                        }
                    },

                    _ = self.ping.tick() => {
                        let payload = Message::Ping(self.ping_payload.clone().into_bytes().into());
                        if let Err(e) = self.sink.lock().await.send(payload).await {
                            tracing::warn!("Failed to send heartbeat: {}", e);
                        }
                    }
                }
            }
        })
    }
}

/// Extract close code and reason from an optional CloseFrame.
fn extract_close(frame: Option<&CloseFrame>) -> (u16, String) {
    match frame {
        Some(f) => (f.code.into(), f.reason.to_string()),
        None => (1006, "No close frame".into()),
    }
}
