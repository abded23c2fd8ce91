//! # Canonical Codec
//!
//! Length-prefixed recursive encoding of byte strings and lists.
//!
//! ## Wire Format
//! ```text
//! [0x00..0x7f]                 single byte, encodes itself
//! [0x80+L] [L bytes]           string, L <= 55
//! [0xb7+N] [N len bytes] [..]  string, L > 55, N = minimal width of L
//! [0xc0+L] [L bytes]           list payload, L <= 55
//! [0xf7+N] [N len bytes] [..]  list payload, L > 55
//! ```
//!
//! ## Strictness
//! Every value has exactly one valid encoding. The decoder rejects padded
//! lengths, long forms used for short payloads and prefixed single bytes
//! instead of normalizing them, since encoded bytes feed content hashes.
//!
//! ## Security
//! - Declared lengths are checked against the remaining input before any
//!   allocation happens
//! - Length-of-length is capped at [`MAX_LENGTH_OF_LENGTH`] bytes
//! - Generic value decoding is capped at [`MAX_DEPTH`] nested lists

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::core::adapters::{Decodable, Encodable};
use crate::core::value::Value;
use crate::error::{constants, DecodeError, EncodeError};

/// Prefix of the empty byte string
pub const EMPTY_STRING_CODE: u8 = 0x80;

/// Prefix of the empty list
pub const EMPTY_LIST_CODE: u8 = 0xC0;

/// Largest payload that still uses the single-byte prefix form
pub const SHORT_PAYLOAD_MAX: usize = 55;

/// Widest accepted length-of-length (payloads up to 4 GiB)
pub const MAX_LENGTH_OF_LENGTH: usize = 4;

/// Deepest list nesting accepted by the generic [`Value`] decoder
pub const MAX_DEPTH: usize = 128;

const SHORT_STRING_OFFSET: u8 = 0xB7;
const SHORT_LIST_OFFSET: u8 = 0xF7;

/// Item prefix: kind plus declared payload length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub list: bool,
    pub payload_length: usize,
}

impl Header {
    pub const fn string(payload_length: usize) -> Self {
        Self {
            list: false,
            payload_length,
        }
    }

    pub const fn list(payload_length: usize) -> Self {
        Self {
            list: true,
            payload_length,
        }
    }

    /// Number of bytes the prefix occupies on the wire
    pub fn length(&self) -> usize {
        if self.payload_length <= SHORT_PAYLOAD_MAX {
            1
        } else {
            1 + length_of_length(self.payload_length)
        }
    }

    /// Append the prefix. Single bytes below 0x80 never get a header;
    /// [`encode_bytes`] handles that case.
    pub fn encode(&self, out: &mut BytesMut) {
        let (short_base, long_base) = if self.list {
            (EMPTY_LIST_CODE, SHORT_LIST_OFFSET)
        } else {
            (EMPTY_STRING_CODE, SHORT_STRING_OFFSET)
        };

        if self.payload_length <= SHORT_PAYLOAD_MAX {
            out.put_u8(short_base + self.payload_length as u8);
        } else {
            let width = length_of_length(self.payload_length);
            let be = self.payload_length.to_be_bytes();
            out.put_u8(long_base + width as u8);
            out.put_slice(&be[be.len() - width..]);
        }
    }

    /// Read a prefix and advance past it.
    ///
    /// For a bare single byte (< 0x80) the cursor is left in place and the
    /// header reports a one-byte string, so callers can always take
    /// `payload_length` bytes after decoding.
    pub fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let prefix = *buf.first().ok_or(DecodeError::Truncated {
            expected: 1,
            available: 0,
        })?;

        let header = match prefix {
            0x00..=0x7F => return Ok(Self::string(1)),
            0x80..=0xB7 => {
                buf.advance(1);
                let len = usize::from(prefix - EMPTY_STRING_CODE);
                if len == 1 {
                    if let Some(&byte) = buf.first() {
                        if byte < EMPTY_STRING_CODE {
                            return Err(DecodeError::NonCanonical(
                                constants::ERR_SINGLE_BYTE_PREFIXED,
                            ));
                        }
                    }
                }
                Self::string(len)
            }
            0xB8..=0xBF => {
                buf.advance(1);
                Self::string(decode_long_length(buf, usize::from(prefix - SHORT_STRING_OFFSET))?)
            }
            0xC0..=0xF7 => {
                buf.advance(1);
                Self::list(usize::from(prefix - EMPTY_LIST_CODE))
            }
            0xF8..=0xFF => {
                buf.advance(1);
                Self::list(decode_long_length(buf, usize::from(prefix - SHORT_LIST_OFFSET))?)
            }
        };

        if header.payload_length > buf.len() {
            return Err(DecodeError::Truncated {
                expected: header.payload_length,
                available: buf.len(),
            });
        }
        Ok(header)
    }
}

fn length_of_length(len: usize) -> usize {
    std::mem::size_of::<usize>() - (len.leading_zeros() as usize / 8)
}

fn decode_long_length(buf: &mut &[u8], width: usize) -> Result<usize, DecodeError> {
    if width > MAX_LENGTH_OF_LENGTH {
        return Err(DecodeError::Malformed(constants::ERR_LENGTH_TOO_WIDE));
    }
    if buf.len() < width {
        return Err(DecodeError::Truncated {
            expected: width,
            available: buf.len(),
        });
    }
    if buf[0] == 0 {
        return Err(DecodeError::NonCanonical(constants::ERR_LENGTH_LEADING_ZERO));
    }

    let len = buf[..width]
        .iter()
        .fold(0usize, |acc, &byte| (acc << 8) | usize::from(byte));
    buf.advance(width);

    if len <= SHORT_PAYLOAD_MAX {
        return Err(DecodeError::NonCanonical(
            constants::ERR_LONG_FORM_SHORT_PAYLOAD,
        ));
    }
    Ok(len)
}

/// Append a byte string in canonical form.
pub fn encode_bytes(data: &[u8], out: &mut BytesMut) {
    if data.len() == 1 && data[0] < EMPTY_STRING_CODE {
        out.put_u8(data[0]);
    } else {
        Header::string(data.len()).encode(out);
        out.put_slice(data);
    }
}

/// Append a list of homogeneous items.
pub fn encode_list<T: Encodable>(items: &[T], out: &mut BytesMut) -> Result<(), EncodeError> {
    let mut payload = BytesMut::new();
    for item in items {
        item.encode(&mut payload)?;
    }
    Header::list(payload.len()).encode(out);
    out.put_slice(&payload);
    Ok(())
}

/// Encode any typed item into a standalone buffer.
pub fn encode<T: Encodable + ?Sized>(item: &T) -> Result<Bytes, EncodeError> {
    let mut out = BytesMut::new();
    item.encode(&mut out)?;
    Ok(out.freeze())
}

/// Encode a [`Value`]. Never fails.
pub fn encode_value(value: &Value) -> Bytes {
    value.to_bytes()
}

/// Decode one value from the front of `input`, returning the unread rest.
pub fn decode_value(input: &[u8]) -> Result<(Value, &[u8]), DecodeError> {
    decode_partial(input)
}

/// Decode one typed item from the front of `input`, returning the unread rest.
pub fn decode_partial<T: Decodable>(input: &[u8]) -> Result<(T, &[u8]), DecodeError> {
    let mut cursor = input;
    let item = T::decode(&mut cursor)?;
    Ok((item, cursor))
}

/// Decode a typed item that must span the whole input.
pub fn decode_exact<T: Decodable>(input: &[u8]) -> Result<T, DecodeError> {
    let (item, rest) = decode_partial(input)?;
    if !rest.is_empty() {
        trace!(trailing = rest.len(), "Rejecting trailing bytes");
        return Err(DecodeError::TrailingData(rest.len()));
    }
    Ok(item)
}

/// Read a byte-string payload and advance past it.
pub fn decode_string<'a>(buf: &mut &'a [u8]) -> Result<&'a [u8], DecodeError> {
    let header = Header::decode(buf)?;
    if header.list {
        return Err(DecodeError::UnexpectedList);
    }
    Ok(take(buf, header.payload_length))
}

/// Read a list payload and advance past it.
pub fn decode_list_payload<'a>(buf: &mut &'a [u8]) -> Result<&'a [u8], DecodeError> {
    let header = Header::decode(buf)?;
    if !header.list {
        return Err(DecodeError::UnexpectedString);
    }
    Ok(take(buf, header.payload_length))
}

/// Size of the first item in `input`, header included, without decoding it.
pub fn item_span(input: &[u8]) -> Result<usize, DecodeError> {
    let mut cursor = input;
    let header = Header::decode(&mut cursor)?;
    Ok(input.len() - cursor.len() + header.payload_length)
}

/// Split `len` bytes off the front. Callers guarantee `len <= buf.len()`,
/// which [`Header::decode`] has already checked.
fn take<'a>(buf: &mut &'a [u8], len: usize) -> &'a [u8] {
    let data: &'a [u8] = *buf;
    let (head, rest) = data.split_at(len);
    *buf = rest;
    head
}
