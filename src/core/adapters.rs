//! # Field Adapters
//!
//! Typed projections onto the canonical encoding.
//!
//! Each adapter pairs an in-memory type with its wire rule:
//! - **Unsigned integers**: minimal big-endian, zero is the empty string,
//!   leading zero bytes and over-wide values are rejected on decode
//! - **Booleans**: `0x80` for false, `0x01` for true
//! - **Byte strings**: [`Bytes`] as-is
//! - **Sequences**: `Vec<T>` as a list; an absent sequence is the empty list
//! - **Raw passthrough**: [`RawValue`] carries an already-encoded item and is
//!   emitted verbatim
//!
//! Composite items are written with [`ListEncoder`] and read with
//! [`ListDecoder`], which keep fields in declaration order.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::core::rlp::{self, Header};
use crate::error::{constants, DecodeError, EncodeError};

/// Types with a canonical wire encoding.
pub trait Encodable {
    /// Append the canonical encoding of `self` to `out`.
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError>;
}

/// Types that can be read back from their canonical encoding.
pub trait Decodable: Sized {
    /// Decode one item from the front of `buf`, advancing past it.
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError>;
}

impl<T: Encodable + ?Sized> Encodable for &T {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        (**self).encode(out)
    }
}

impl<T: Encodable> Encodable for Box<T> {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        (**self).encode(out)
    }
}

impl<T: Decodable> Decodable for Box<T> {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        T::decode(buf).map(Box::new)
    }
}

/// Read an integer payload of at most `width` bytes, enforcing minimal form.
pub fn decode_uint_bytes<'a>(buf: &mut &'a [u8], width: usize) -> Result<&'a [u8], DecodeError> {
    let bytes = rlp::decode_string(buf)?;
    if bytes.first() == Some(&0) {
        return Err(DecodeError::NonCanonical(constants::ERR_INTEGER_LEADING_ZERO));
    }
    if bytes.len() > width {
        return Err(DecodeError::Overflow {
            max: width,
            got: bytes.len(),
        });
    }
    Ok(bytes)
}

macro_rules! impl_uint {
    ($($t:ty),*) => {$(
        impl Encodable for $t {
            fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
                let be = self.to_be_bytes();
                let skip = (self.leading_zeros() / 8) as usize;
                rlp::encode_bytes(&be[skip..], out);
                Ok(())
            }
        }

        impl Decodable for $t {
            fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
                const WIDTH: usize = std::mem::size_of::<$t>();
                let bytes = decode_uint_bytes(buf, WIDTH)?;
                let mut padded = [0u8; WIDTH];
                padded[WIDTH - bytes.len()..].copy_from_slice(bytes);
                Ok(<$t>::from_be_bytes(padded))
            }
        }
    )*};
}

impl_uint!(u8, u16, u32, u64, u128);

impl Encodable for bool {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        u8::from(*self).encode(out)
    }
}

impl Decodable for bool {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        match u8::decode(buf)? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(DecodeError::Malformed(constants::ERR_INVALID_BOOL)),
        }
    }
}

impl Encodable for Bytes {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        rlp::encode_bytes(self, out);
        Ok(())
    }
}

impl Decodable for Bytes {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        rlp::decode_string(buf).map(Bytes::copy_from_slice)
    }
}

impl Encodable for [u8] {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        rlp::encode_bytes(self, out);
        Ok(())
    }
}

impl<T: Encodable> Encodable for Vec<T> {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        rlp::encode_list(self, out)
    }
}

impl<T: Decodable> Decodable for Vec<T> {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let mut payload = rlp::decode_list_payload(buf)?;
        let mut items = Vec::new();
        while !payload.is_empty() {
            items.push(T::decode(&mut payload)?);
        }
        Ok(items)
    }
}

/// Ordered field writer for composite items.
///
/// Fields are positional: push them in exactly the order they travel.
#[derive(Debug, Default)]
pub struct ListEncoder {
    payload: BytesMut,
}

impl ListEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next positional field
    pub fn push<T: Encodable + ?Sized>(&mut self, field: &T) -> Result<&mut Self, EncodeError> {
        field.encode(&mut self.payload)?;
        Ok(self)
    }

    /// Append a trailing optional field; absent fields are omitted entirely.
    /// Only valid for fields after which nothing else is pushed.
    pub fn push_optional<T: Encodable>(&mut self, field: Option<&T>) -> Result<&mut Self, EncodeError> {
        if let Some(field) = field {
            field.encode(&mut self.payload)?;
        }
        Ok(self)
    }

    /// Write the list header followed by the collected fields
    pub fn finish(&self, out: &mut BytesMut) {
        Header::list(self.payload.len()).encode(out);
        out.put_slice(&self.payload);
    }
}

/// Ordered field reader for composite items.
///
/// Running out of fields early or finishing with fields left over is a
/// [`DecodeError::FieldCountMismatch`] naming the item being read.
#[derive(Debug)]
pub struct ListDecoder<'a> {
    payload: &'a [u8],
    item: &'static str,
}

impl<'a> ListDecoder<'a> {
    pub fn new(buf: &mut &'a [u8], item: &'static str) -> Result<Self, DecodeError> {
        let payload = rlp::decode_list_payload(buf)?;
        Ok(Self { payload, item })
    }

    /// Read the next positional field
    pub fn field<T: Decodable>(&mut self) -> Result<T, DecodeError> {
        if self.payload.is_empty() {
            return Err(DecodeError::FieldCountMismatch(self.item));
        }
        T::decode(&mut self.payload)
    }

    /// Read the next positional field with a caller-supplied decoder, for
    /// fields whose type is only known at runtime
    pub fn field_with<T, F>(&mut self, decode: F) -> Result<T, DecodeError>
    where
        F: FnOnce(&mut &'a [u8]) -> Result<T, DecodeError>,
    {
        if self.payload.is_empty() {
            return Err(DecodeError::FieldCountMismatch(self.item));
        }
        decode(&mut self.payload)
    }

    /// Read a trailing optional field, `None` if the list is exhausted
    pub fn optional_field<T: Decodable>(&mut self) -> Result<Option<T>, DecodeError> {
        if self.payload.is_empty() {
            return Ok(None);
        }
        T::decode(&mut self.payload).map(Some)
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Confirm every field was consumed
    pub fn finish(self) -> Result<(), DecodeError> {
        if self.payload.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::FieldCountMismatch(self.item))
        }
    }
}

/// An already-encoded item carried verbatim.
///
/// Used on relay paths: a response received from one peer can be forwarded to
/// another without decoding its items into typed values and encoding them
/// again. Decoding captures the item's exact byte span; encoding copies it out
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawValue(Bytes);

impl RawValue {
    /// Wrap a buffer that must hold exactly one item
    pub fn new(data: impl Into<Bytes>) -> Result<Self, DecodeError> {
        let data = data.into();
        let span = rlp::item_span(&data)?;
        if span != data.len() {
            return Err(DecodeError::TrailingData(data.len() - span));
        }
        Ok(Self(data))
    }

    /// Pre-encode a typed item
    pub fn from_encodable<T: Encodable + ?Sized>(item: &T) -> Result<Self, EncodeError> {
        rlp::encode(item).map(Self)
    }

    /// Materialize the carried item as a typed value
    pub fn decode_as<T: Decodable>(&self) -> Result<T, DecodeError> {
        rlp::decode_exact(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl AsRef<[u8]> for RawValue {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Encodable for RawValue {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        out.put_slice(&self.0);
        Ok(())
    }
}

impl Decodable for RawValue {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let span = rlp::item_span(buf)?;
        let raw = Bytes::copy_from_slice(&buf[..span]);
        buf.advance(span);
        Ok(Self(raw))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::core::rlp::{decode_exact, encode};

    #[test]
    fn test_uint_encoding() {
        assert_eq!(&encode(&0u64).unwrap()[..], &[0x80]);
        assert_eq!(&encode(&15u64).unwrap()[..], &[0x0f]);
        assert_eq!(&encode(&0x7fu8).unwrap()[..], &[0x7f]);
        assert_eq!(&encode(&0x80u8).unwrap()[..], &[0x81, 0x80]);
        assert_eq!(&encode(&1024u64).unwrap()[..], &[0x82, 0x04, 0x00]);
        assert_eq!(&encode(&1111u64).unwrap()[..], &[0x82, 0x04, 0x57]);
        assert_eq!(
            &encode(&u64::MAX).unwrap()[..],
            &[0x88, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );
    }

    #[test]
    fn test_uint_roundtrip() {
        for value in [0u64, 1, 0x7f, 0x80, 0xff, 0x100, 314, 9999, u64::MAX] {
            let encoded = encode(&value).unwrap();
            assert_eq!(decode_exact::<u64>(&encoded), Ok(value));
        }
        assert_eq!(decode_exact::<u128>(&encode(&u128::MAX).unwrap()), Ok(u128::MAX));
    }

    #[test]
    fn test_uint_rejects_leading_zero() {
        assert_eq!(
            decode_exact::<u64>(&[0x82, 0x00, 0x01]),
            Err(DecodeError::NonCanonical(constants::ERR_INTEGER_LEADING_ZERO))
        );
        assert_eq!(
            decode_exact::<u64>(&[0x00]),
            Err(DecodeError::NonCanonical(constants::ERR_INTEGER_LEADING_ZERO))
        );
    }

    #[test]
    fn test_uint_rejects_overflow() {
        assert_eq!(
            decode_exact::<u16>(&[0x83, 0x01, 0x00, 0x00]),
            Err(DecodeError::Overflow { max: 2, got: 3 })
        );
        let mut wide = vec![0x89, 0x01];
        wide.extend_from_slice(&[0u8; 8]);
        assert_eq!(
            decode_exact::<u64>(&wide),
            Err(DecodeError::Overflow { max: 8, got: 9 })
        );
    }

    #[test]
    fn test_uint_rejects_list() {
        assert_eq!(decode_exact::<u64>(&[0xc0]), Err(DecodeError::UnexpectedList));
    }

    #[test]
    fn test_bool() {
        assert_eq!(&encode(&true).unwrap()[..], &[0x01]);
        assert_eq!(&encode(&false).unwrap()[..], &[0x80]);
        assert_eq!(decode_exact::<bool>(&[0x01]), Ok(true));
        assert_eq!(decode_exact::<bool>(&[0x80]), Ok(false));
        assert_eq!(
            decode_exact::<bool>(&[0x02]),
            Err(DecodeError::Malformed(constants::ERR_INVALID_BOOL))
        );
    }

    #[test]
    fn test_vec_of_uints() {
        let items = vec![1u64, 2, 3];
        let encoded = encode(&items).unwrap();
        assert_eq!(&encoded[..], &[0xc3, 0x01, 0x02, 0x03]);
        assert_eq!(decode_exact::<Vec<u64>>(&encoded), Ok(items));
        assert_eq!(decode_exact::<Vec<u64>>(&[0xc0]), Ok(Vec::new()));
        assert_eq!(decode_exact::<Vec<u64>>(&[0x80]), Err(DecodeError::UnexpectedString));
    }

    #[test]
    fn test_list_codec_field_counts() {
        let mut list = ListEncoder::new();
        list.push(&7u64).unwrap().push(&true).unwrap();
        let mut out = BytesMut::new();
        list.finish(&mut out);
        assert_eq!(&out[..], &[0xc2, 0x07, 0x01]);

        let mut cursor = &out[..];
        let mut fields = ListDecoder::new(&mut cursor, "pair").unwrap();
        assert_eq!(fields.field::<u64>(), Ok(7));
        assert_eq!(fields.field::<bool>(), Ok(true));
        assert_eq!(
            fields.field::<u64>(),
            Err(DecodeError::FieldCountMismatch("pair"))
        );

        let mut cursor = &out[..];
        let mut fields = ListDecoder::new(&mut cursor, "single").unwrap();
        assert_eq!(fields.field::<u64>(), Ok(7));
        assert_eq!(fields.finish(), Err(DecodeError::FieldCountMismatch("single")));
    }

    #[test]
    fn test_optional_trailing_field() {
        let mut out = BytesMut::new();
        ListEncoder::new()
            .push(&1u64)
            .unwrap()
            .push_optional::<u64>(None)
            .unwrap()
            .finish(&mut out);
        assert_eq!(&out[..], &[0xc1, 0x01]);

        let mut cursor = &out[..];
        let mut fields = ListDecoder::new(&mut cursor, "optional").unwrap();
        assert_eq!(fields.field::<u64>(), Ok(1));
        assert_eq!(fields.optional_field::<u64>(), Ok(None));
        assert!(fields.finish().is_ok());
    }

    #[test]
    fn test_raw_value_passthrough() {
        let items = vec![Bytes::from_static(b"cat"), Bytes::from_static(b"dog")];
        let raw = RawValue::from_encodable(&items).unwrap();
        assert_eq!(raw.as_bytes(), &encode(&items).unwrap()[..]);
        assert_eq!(raw.decode_as::<Vec<Bytes>>(), Ok(items));

        let mut cursor = &[0xc2, 0x01, 0x02, 0x05][..];
        let captured = RawValue::decode(&mut cursor).unwrap();
        assert_eq!(captured.as_bytes(), &[0xc2, 0x01, 0x02]);
        assert_eq!(cursor, &[0x05]);
        assert_eq!(&encode(&captured).unwrap()[..], &[0xc2, 0x01, 0x02]);
    }

    #[test]
    fn test_raw_value_new_validates_span() {
        assert!(RawValue::new(vec![0xc1u8, 0x01]).is_ok());
        assert_eq!(
            RawValue::new(vec![0xc1u8, 0x01, 0x02]),
            Err(DecodeError::TrailingData(1))
        );
        assert!(matches!(
            RawValue::new(vec![0xc3u8, 0x01]),
            Err(DecodeError::Truncated { .. })
        ));
    }
}
