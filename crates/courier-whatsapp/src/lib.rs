// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp bridge channel adapter for Courier.
//!
//! The WhatsApp session itself (authentication, QR pairing, reconnects)
//! lives in an external whatsapp-web bridge process; this adapter speaks
//! its websocket: JSON `message` frames in, `reply` and `typing` frames
//! out. See [`event`] for the wire format.

pub mod event;

use async_trait::async_trait;
use courier_config::model::BridgeConfig;
use courier_core::traits::channel::ChannelAdapter;
use courier_core::{CourierError, InboundEvent, MessageId, OutboundReply};
use futures::stream::{SplitSink, StreamExt};
use futures::SinkExt;
use tokio::net::TcpStream;
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use crate::event::{ParsedFrame, ReplyFrame, TypingFrame};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, WsMessage>;

/// Buffered inbound events between the reader task and `receive()`.
const INBOUND_BUFFER: usize = 64;

/// Channel adapter over a whatsapp-web bridge websocket.
pub struct BridgeChannel {
    url: String,
    writer: Mutex<Option<WsSink>>,
    inbound: Mutex<Option<mpsc::Receiver<InboundEvent>>>,
}

impl BridgeChannel {
    /// Creates a disconnected adapter for the configured bridge URL.
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            url: config.url.clone(),
            writer: Mutex::new(None),
            inbound: Mutex::new(None),
        }
    }

    async fn send_frame(&self, frame: String) -> Result<(), CourierError> {
        let mut writer = self.writer.lock().await;
        let sink = writer.as_mut().ok_or_else(|| CourierError::Channel {
            message: "bridge not connected".into(),
            source: None,
        })?;
        sink.send(WsMessage::Text(frame.into()))
            .await
            .map_err(|e| CourierError::Channel {
                message: format!("bridge send failed: {e}"),
                source: Some(Box::new(e)),
            })
    }
}

#[async_trait]
impl ChannelAdapter for BridgeChannel {
    fn name(&self) -> &str {
        "whatsapp-bridge"
    }

    async fn connect(&mut self) -> Result<(), CourierError> {
        let (stream, _response) =
            connect_async(&self.url)
                .await
                .map_err(|e| CourierError::Channel {
                    message: format!("failed to connect to bridge at {}: {e}", self.url),
                    source: Some(Box::new(e)),
                })?;
        info!(url = self.url.as_str(), "connected to whatsapp bridge");

        let (sink, mut read) = stream.split();
        let (tx, rx) = mpsc::channel(INBOUND_BUFFER);

        // Reader task: parse frames until the socket closes. Malformed
        // frames are logged and skipped, never fatal.
        tokio::spawn(async move {
            while let Some(frame) = read.next().await {
                let frame = match frame {
                    Ok(frame) => frame,
                    Err(e) => {
                        warn!(error = %e, "bridge read error");
                        break;
                    }
                };
                match frame {
                    WsMessage::Text(text) => match event::parse_frame(text.as_str()) {
                        Ok(ParsedFrame::Event(event)) => {
                            if tx.send(event).await.is_err() {
                                break;
                            }
                        }
                        Ok(ParsedFrame::State(state)) => {
                            info!(state = state.as_str(), "bridge state changed");
                        }
                        Ok(ParsedFrame::Ignored) => {
                            debug!("ignoring bridge frame");
                        }
                        Err(e) => {
                            warn!(error = %e, "skipping malformed bridge frame");
                        }
                    },
                    WsMessage::Close(_) => break,
                    // Pings are answered by tungstenite; ignore the rest.
                    _ => {}
                }
            }
            info!("bridge connection closed");
        });

        *self.writer.lock().await = Some(sink);
        *self.inbound.lock().await = Some(rx);
        Ok(())
    }

    async fn receive(&self) -> Result<InboundEvent, CourierError> {
        let mut inbound = self.inbound.lock().await;
        let rx = inbound.as_mut().ok_or_else(|| CourierError::Channel {
            message: "bridge not connected".into(),
            source: None,
        })?;
        rx.recv().await.ok_or_else(|| CourierError::Channel {
            message: "bridge connection closed".into(),
            source: None,
        })
    }

    async fn send(&self, reply: OutboundReply) -> Result<MessageId, CourierError> {
        let id = uuid::Uuid::new_v4().to_string();
        let frame = ReplyFrame {
            type_: "reply",
            id: &id,
            to: &reply.to,
            body: &reply.content,
        };
        let json = serde_json::to_string(&frame).map_err(|e| CourierError::Channel {
            message: format!("failed to encode reply frame: {e}"),
            source: Some(Box::new(e)),
        })?;
        self.send_frame(json).await?;
        Ok(MessageId(id))
    }

    async fn send_typing(&self, to: &str) -> Result<(), CourierError> {
        let frame = TypingFrame { type_: "typing", to };
        let json = serde_json::to_string(&frame).map_err(|e| CourierError::Channel {
            message: format!("failed to encode typing frame: {e}"),
            source: Some(Box::new(e)),
        })?;
        self.send_frame(json).await
    }
}
