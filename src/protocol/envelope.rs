//! # Version Envelope
//!
//! Attaches and strips the request id according to the negotiated version.
//!
//! ```text
//! Bare:      payload
//! RequestId: [request_id, payload]
//! ```
//!
//! A [`MessageCodec`] resolves the [`Framing`] of every kind once, from the
//! version's capability row, so per-message work is a map lookup.

use std::collections::HashMap;

use bytes::{Bytes, BytesMut};
use tracing::trace;

use crate::core::adapters::{Encodable, ListDecoder, ListEncoder};
use crate::error::{DecodeError, EncodeError};
use crate::protocol::message::{Message, MessageKind};
use crate::protocol::version::{CapabilityTable, ProtocolVersion};

/// How a kind is laid out on the wire in one version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Framing {
    /// Payload alone
    Bare,
    /// Two-field list of request id and payload
    RequestId,
}

impl Framing {
    fn encode(
        self,
        request_id: Option<u64>,
        message: &Message,
        out: &mut BytesMut,
    ) -> Result<(), EncodeError> {
        let name = message.kind().name();
        match (self, request_id) {
            (Framing::Bare, None) => message.encode(out),
            (Framing::Bare, Some(_)) => Err(EncodeError::UnexpectedRequestId(name)),
            (Framing::RequestId, None) => Err(EncodeError::MissingRequestId(name)),
            (Framing::RequestId, Some(id)) => {
                let mut list = ListEncoder::new();
                list.push(&id)?.push(message)?;
                list.finish(out);
                Ok(())
            }
        }
    }

    fn decode(self, kind: MessageKind, buf: &mut &[u8]) -> Result<Packet, DecodeError> {
        match self {
            Framing::Bare => Ok(Packet {
                request_id: None,
                message: Message::decode_kind(kind, buf)?,
            }),
            Framing::RequestId => {
                let mut fields = ListDecoder::new(buf, kind.name())?;
                let request_id = fields.field::<u64>()?;
                let message = fields.field_with(|payload| Message::decode_kind(kind, payload))?;
                fields.finish()?;
                Ok(Packet {
                    request_id: Some(request_id),
                    message,
                })
            }
        }
    }
}

/// A message together with its correlation id, if the version uses one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub request_id: Option<u64>,
    pub message: Message,
}

impl Packet {
    /// Packet without a request id (notifications, or any kind under eth/65)
    pub fn bare(message: impl Into<Message>) -> Self {
        Self {
            request_id: None,
            message: message.into(),
        }
    }

    pub fn with_id(request_id: u64, message: impl Into<Message>) -> Self {
        Self {
            request_id: Some(request_id),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> MessageKind {
        self.message.kind()
    }
}

/// Encoder/decoder bound to one negotiated version.
#[derive(Debug, Clone)]
pub struct MessageCodec {
    version: ProtocolVersion,
    framing: HashMap<MessageKind, Framing>,
}

impl MessageCodec {
    pub fn new(version: ProtocolVersion) -> Self {
        let table = CapabilityTable::for_versions(&[version]);
        let framing = table
            .row(version)
            .into_iter()
            .flatten()
            .map(|(kind, wrapped)| {
                let framing = if *wrapped {
                    Framing::RequestId
                } else {
                    Framing::Bare
                };
                (*kind, framing)
            })
            .collect();
        Self { version, framing }
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Framing of `kind`, or `None` if the version does not carry it
    pub fn framing(&self, kind: MessageKind) -> Option<Framing> {
        self.framing.get(&kind).copied()
    }

    /// Encode a packet into its wire code and payload bytes.
    pub fn encode(&self, packet: &Packet) -> Result<(u64, Bytes), EncodeError> {
        let kind = packet.kind();
        let framing = self
            .framing(kind)
            .ok_or(EncodeError::UnsupportedMessageKind {
                version: self.version.as_u32(),
                kind: kind.name(),
            })?;
        let mut out = BytesMut::new();
        framing.encode(packet.request_id, &packet.message, &mut out)?;
        trace!(kind = kind.name(), size = out.len(), "Encoded message");
        Ok((kind.code(), out.freeze()))
    }

    /// Decode a payload received under `code` into its materialized kind.
    pub fn decode(&self, code: u64, payload: &[u8]) -> Result<Packet, DecodeError> {
        let kind = self.kind_for_code(code)?;
        self.decode_as(kind, payload)
    }

    /// Decode a payload received under `code`, keeping relayable item lists
    /// in their received encoding.
    pub fn decode_relay(&self, code: u64, payload: &[u8]) -> Result<Packet, DecodeError> {
        let kind = self.kind_for_code(code)?;
        self.decode_as(kind.relay_variant(), payload)
    }

    /// Decode a payload as a specific kind. The whole payload must be consumed.
    pub fn decode_as(&self, kind: MessageKind, payload: &[u8]) -> Result<Packet, DecodeError> {
        let framing = self.framing(kind).ok_or(DecodeError::UnsupportedMessageKind {
            version: self.version.as_u32(),
            code: kind.code(),
        })?;
        let mut cursor = payload;
        let packet = framing.decode(kind, &mut cursor)?;
        if !cursor.is_empty() {
            return Err(DecodeError::TrailingData(cursor.len()));
        }
        Ok(packet)
    }

    fn kind_for_code(&self, code: u64) -> Result<MessageKind, DecodeError> {
        MessageKind::from_code(code)
            .filter(|kind| self.framing.contains_key(kind))
            .ok_or(DecodeError::UnsupportedMessageKind {
                version: self.version.as_u32(),
                code,
            })
    }
}

/// One-shot encode for callers that do not keep a codec around.
pub fn encode_message(
    version: ProtocolVersion,
    packet: &Packet,
) -> Result<(u64, Bytes), EncodeError> {
    MessageCodec::new(version).encode(packet)
}

/// One-shot decode of a payload known to be of `kind`.
pub fn decode_message(
    kind: MessageKind,
    version: ProtocolVersion,
    bytes: &[u8],
) -> Result<Packet, DecodeError> {
    MessageCodec::new(version).decode_as(kind, bytes)
}
