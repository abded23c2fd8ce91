//! # Session Layer
//!
//! Binds a message transport to a [`MessageCodec`] for one negotiated version.
//!
//! The transport is external: it delivers `(code, payload)` pairs that are
//! already demultiplexed. [`MessagePipe`] is an in-memory implementation for
//! tests and local wiring.
//!
//! ## Responsibilities
//! - Reject payloads above the configured size before decoding
//! - Assign request ids to outgoing requests when the version uses them
//! - Record traffic and failure counters in per-session [`Metrics`]
//!
//! Matching responses to outstanding requests beyond a single
//! [`Session::exchange`] is left to the caller.

use std::time::Duration;

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::config::ProtocolConfig;
use crate::error::{DecodeError, ProtocolError, Result};
use crate::protocol::envelope::{Framing, MessageCodec, Packet};
use crate::protocol::message::{Message, MessageRole};
use crate::protocol::version::ProtocolVersion;
use crate::utils::metrics::{Failure, Metrics, Timer};

/// One message as seen by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    pub code: u64,
    pub payload: Bytes,
}

/// Message-oriented transport carrying `(code, payload)` pairs.
#[allow(async_fn_in_trait)]
pub trait MessageTransport {
    async fn send(&mut self, message: RawMessage) -> Result<()>;

    /// Next message, or [`ProtocolError::ConnectionClosed`] once the peer is gone
    async fn receive(&mut self) -> Result<RawMessage>;
}

/// In-memory transport endpoint backed by bounded channels.
#[derive(Debug)]
pub struct MessagePipe {
    tx: mpsc::Sender<RawMessage>,
    rx: mpsc::Receiver<RawMessage>,
}

impl MessagePipe {
    /// Two connected endpoints, each buffering up to `capacity` messages.
    /// A capacity of 0 is raised to 1.
    pub fn pair(capacity: usize) -> (Self, Self) {
        let capacity = capacity.max(1);
        let (a_tx, b_rx) = mpsc::channel(capacity);
        let (b_tx, a_rx) = mpsc::channel(capacity);
        (
            Self { tx: a_tx, rx: a_rx },
            Self { tx: b_tx, rx: b_rx },
        )
    }
}

impl MessageTransport for MessagePipe {
    async fn send(&mut self, message: RawMessage) -> Result<()> {
        self.tx
            .send(message)
            .await
            .map_err(|_| ProtocolError::ConnectionClosed)
    }

    async fn receive(&mut self) -> Result<RawMessage> {
        self.rx.recv().await.ok_or(ProtocolError::ConnectionClosed)
    }
}

/// A codec session over a transport.
pub struct Session<T> {
    transport: T,
    codec: MessageCodec,
    max_message_size: usize,
    response_timeout: Duration,
    metrics: Metrics,
}

impl<T: MessageTransport> Session<T> {
    /// Start a session for `version`, which must be enabled in `config`.
    pub fn new(transport: T, version: ProtocolVersion, config: &ProtocolConfig) -> Result<Self> {
        if !config.wire.versions.contains(&version) {
            return Err(ProtocolError::UnsupportedVersion(version.as_u32()));
        }
        info!(%version, max_message_size = config.wire.max_message_size, "Session started");
        Ok(Self {
            transport,
            codec: MessageCodec::new(version),
            max_message_size: config.wire.max_message_size,
            response_timeout: config.session.response_timeout,
            metrics: Metrics::new(),
        })
    }

    pub fn version(&self) -> ProtocolVersion {
        self.codec.version()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// End the session, logging its counters, and hand back the transport.
    pub fn into_transport(self) -> T {
        self.metrics.log_metrics();
        self.transport
    }

    /// Encode and send a fully formed packet.
    #[instrument(skip_all, fields(kind = %packet.kind()))]
    pub async fn send(&mut self, packet: &Packet) -> Result<()> {
        let (code, payload) = self.codec.encode(packet).map_err(|err| {
            self.metrics.record_failure(Failure::Encode);
            err
        })?;
        if payload.len() > self.max_message_size {
            self.metrics.record_failure(Failure::Oversized);
            return Err(ProtocolError::OversizedMessage {
                size: payload.len(),
                max: self.max_message_size,
            });
        }
        let size = payload.len();
        self.transport.send(RawMessage { code, payload }).await?;
        self.metrics.record_sent(size);
        debug!(code, size, request_id = ?packet.request_id, "Sent message");
        Ok(())
    }

    /// Send a request, attaching a fresh random id if the version uses ids.
    /// Returns the id that was attached.
    pub async fn request(&mut self, message: impl Into<Message>) -> Result<Option<u64>> {
        let message = message.into();
        if message.kind().role() != MessageRole::Request {
            return Err(ProtocolError::UnexpectedMessage);
        }
        let request_id = match self.codec.framing(message.kind()) {
            Some(Framing::RequestId) => Some(rand::random::<u64>()),
            _ => None,
        };
        self.send(&Packet {
            request_id,
            message,
        })
        .await?;
        Ok(request_id)
    }

    /// Answer a request, echoing its id.
    pub async fn respond(&mut self, request_id: Option<u64>, message: impl Into<Message>) -> Result<()> {
        let message = message.into();
        if message.kind().role() != MessageRole::Response {
            return Err(ProtocolError::UnexpectedMessage);
        }
        self.send(&Packet {
            request_id,
            message,
        })
        .await
    }

    /// Send a notification.
    pub async fn notify(&mut self, message: impl Into<Message>) -> Result<()> {
        let message = message.into();
        if message.kind().role() != MessageRole::Notification {
            return Err(ProtocolError::UnexpectedMessage);
        }
        self.send(&Packet::bare(message)).await
    }

    /// Receive and fully decode the next packet.
    #[instrument(skip_all)]
    pub async fn receive(&mut self) -> Result<Packet> {
        self.receive_with(false).await
    }

    /// Receive the next packet, keeping relayable item lists in their
    /// received encoding so they can be forwarded unchanged.
    #[instrument(skip_all)]
    pub async fn receive_relay(&mut self) -> Result<Packet> {
        self.receive_with(true).await
    }

    /// Send a request and wait for the response carrying its id.
    pub async fn exchange(&mut self, message: impl Into<Message>) -> Result<Packet> {
        let message = message.into();
        let kind = message.kind();
        let request_id = self.request(message).await?;
        let response = tokio::time::timeout(self.response_timeout, self.receive())
            .await
            .map_err(|_| ProtocolError::TransportError(format!("Timed out waiting for {kind} response")))??;
        if response.request_id != request_id || !kind.is_answered_by(response.kind()) {
            warn!(request = %kind, response = %response.kind(), "Unexpected response");
            return Err(ProtocolError::UnexpectedMessage);
        }
        Ok(response)
    }

    async fn receive_with(&mut self, relay: bool) -> Result<Packet> {
        let RawMessage { code, payload } = self.transport.receive().await?;
        let _timer = Timer::start("session.decode");

        if payload.len() > self.max_message_size {
            self.metrics.record_failure(Failure::Oversized);
            warn!(code, size = payload.len(), "Rejecting oversized message");
            return Err(ProtocolError::OversizedMessage {
                size: payload.len(),
                max: self.max_message_size,
            });
        }
        self.metrics.record_received(payload.len());

        let decoded = if relay {
            self.codec.decode_relay(code, &payload)
        } else {
            self.codec.decode(code, &payload)
        };
        match decoded {
            Ok(packet) => {
                debug!(code, kind = %packet.kind(), request_id = ?packet.request_id, "Received message");
                Ok(packet)
            }
            Err(err) => {
                match err {
                    DecodeError::UnsupportedMessageKind { .. } => {
                        self.metrics.record_failure(Failure::UnsupportedKind)
                    }
                    _ => self.metrics.record_failure(Failure::Decode),
                }
                warn!(code, error = %err, "Failed to decode message");
                Err(err.into())
            }
        }
    }
}
