//! # Value Model
//!
//! The universal recursive unit of the wire format: an opaque byte string or an
//! ordered list of values. Every typed field ultimately projects onto this shape.

use bytes::{Bytes, BytesMut};

use crate::core::adapters::{Decodable, Encodable};
use crate::core::rlp::{self, Header, MAX_DEPTH};
use crate::error::{constants, DecodeError, EncodeError};

/// A decoded item with no type information attached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Opaque byte string
    Bytes(Bytes),
    /// Ordered sequence of values
    List(Vec<Value>),
}

impl Value {
    /// Build a byte-string value
    pub fn bytes(data: impl Into<Bytes>) -> Self {
        Value::Bytes(data.into())
    }

    /// Build a list value
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(items)
    }

    /// The empty list, which is also how an absent sequence is encoded
    pub fn empty_list() -> Self {
        Value::List(Vec::new())
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(data) => Some(data),
            Value::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            Value::Bytes(_) => None,
        }
    }

    /// Exact size of the canonical encoding, header included
    pub fn encoded_len(&self) -> usize {
        match self {
            Value::Bytes(data) if data.len() == 1 && data[0] < rlp::EMPTY_STRING_CODE => 1,
            Value::Bytes(data) => Header::string(data.len()).length() + data.len(),
            Value::List(_) => {
                let payload = self.payload_len();
                Header::list(payload).length() + payload
            }
        }
    }

    fn payload_len(&self) -> usize {
        match self {
            Value::Bytes(data) => data.len(),
            Value::List(items) => items.iter().map(Value::encoded_len).sum(),
        }
    }

    /// Append the canonical encoding. Encoding a value cannot fail.
    pub fn write(&self, out: &mut BytesMut) {
        match self {
            Value::Bytes(data) => rlp::encode_bytes(data, out),
            Value::List(items) => {
                Header::list(self.payload_len()).encode(out);
                for item in items {
                    item.write(out);
                }
            }
        }
    }

    /// Canonical encoding as a standalone buffer
    pub fn to_bytes(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(self.encoded_len());
        self.write(&mut out);
        out.freeze()
    }

    fn decode_at_depth(buf: &mut &[u8], depth: usize) -> Result<Self, DecodeError> {
        if depth > MAX_DEPTH {
            return Err(DecodeError::Malformed(constants::ERR_NESTING_TOO_DEEP));
        }
        let header = Header::decode(buf)?;
        let data: &[u8] = *buf;
        let (mut payload, rest) = data.split_at(header.payload_length);
        *buf = rest;

        if !header.list {
            return Ok(Value::Bytes(Bytes::copy_from_slice(payload)));
        }
        let mut items = Vec::new();
        while !payload.is_empty() {
            items.push(Self::decode_at_depth(&mut payload, depth + 1)?);
        }
        Ok(Value::List(items))
    }
}

impl Encodable for Value {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        self.write(out);
        Ok(())
    }
}

impl Decodable for Value {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        Self::decode_at_depth(buf, 0)
    }
}

impl From<Bytes> for Value {
    fn from(data: Bytes) -> Self {
        Value::Bytes(data)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}
