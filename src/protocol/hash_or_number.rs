//! Block selector that is either a hash or a number.
//!
//! No tag travels on the wire: a 32-byte string is a hash, anything else is
//! read as a number. A canonical `u64` is at most 8 bytes, so the two forms
//! never overlap.

use std::fmt;

use bytes::BytesMut;

use crate::core::adapters::{Decodable, Encodable};
use crate::core::rlp::Header;
use crate::error::{DecodeError, EncodeError};
use crate::types::primitives::Hash;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashOrNumber {
    Hash(Hash),
    Number(u64),
}

impl HashOrNumber {
    /// Build from loosely-typed parts, as produced by callers that fill in
    /// either field. Exactly one must be present.
    pub fn from_parts(hash: Option<Hash>, number: Option<u64>) -> Result<Self, EncodeError> {
        match (hash, number) {
            (Some(hash), None) => Ok(HashOrNumber::Hash(hash)),
            (None, Some(number)) => Ok(HashOrNumber::Number(number)),
            (Some(_), Some(_)) => Err(EncodeError::AmbiguousUnion),
            (None, None) => Err(EncodeError::EmptyUnion),
        }
    }

    pub fn as_hash(&self) -> Option<&Hash> {
        match self {
            HashOrNumber::Hash(hash) => Some(hash),
            HashOrNumber::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<u64> {
        match self {
            HashOrNumber::Number(number) => Some(*number),
            HashOrNumber::Hash(_) => None,
        }
    }
}

impl Default for HashOrNumber {
    fn default() -> Self {
        HashOrNumber::Number(0)
    }
}

impl From<Hash> for HashOrNumber {
    fn from(hash: Hash) -> Self {
        HashOrNumber::Hash(hash)
    }
}

impl From<u64> for HashOrNumber {
    fn from(number: u64) -> Self {
        HashOrNumber::Number(number)
    }
}

impl fmt::Debug for HashOrNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashOrNumber::Hash(hash) => write!(f, "Hash({hash})"),
            HashOrNumber::Number(number) => write!(f, "Number({number})"),
        }
    }
}

impl Encodable for HashOrNumber {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        match self {
            HashOrNumber::Hash(hash) => hash.encode(out),
            HashOrNumber::Number(number) => number.encode(out),
        }
    }
}

impl Decodable for HashOrNumber {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let mut peek = *buf;
        let header = Header::decode(&mut peek)?;
        if header.list {
            return Err(DecodeError::UnexpectedList);
        }
        if header.payload_length == 32 {
            return Hash::decode(buf).map(HashOrNumber::Hash);
        }
        u64::decode(buf).map(HashOrNumber::Number)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::core::rlp::{decode_exact, encode};

    fn sequential_hash() -> Hash {
        let mut bytes = [0u8; 32];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8;
        }
        Hash::new(bytes)
    }

    #[test]
    fn test_number_and_hash_roundtrip() {
        for selector in [
            HashOrNumber::Number(314),
            HashOrNumber::Number(0),
            HashOrNumber::Hash(sequential_hash()),
            HashOrNumber::Hash(Hash::ZERO),
        ] {
            let encoded = encode(&selector).unwrap();
            assert_eq!(decode_exact::<HashOrNumber>(&encoded), Ok(selector));
        }
    }

    #[test]
    fn test_from_parts_exclusivity() {
        let hash = sequential_hash();
        assert_eq!(
            HashOrNumber::from_parts(Some(hash), Some(314)),
            Err(EncodeError::AmbiguousUnion)
        );
        assert_eq!(HashOrNumber::from_parts(None, None), Err(EncodeError::EmptyUnion));
        assert_eq!(
            HashOrNumber::from_parts(None, Some(0)),
            Ok(HashOrNumber::Number(0))
        );
        assert_eq!(
            HashOrNumber::from_parts(Some(Hash::ZERO), None),
            Ok(HashOrNumber::Hash(Hash::ZERO))
        );
    }

    #[test]
    fn test_decode_picks_variant_by_length() {
        assert_eq!(
            decode_exact::<HashOrNumber>(&[0x82, 0x27, 0x0f]),
            Ok(HashOrNumber::Number(9999))
        );
        // Anything that is neither 32 bytes nor a valid u64 is rejected.
        let mut sixteen = vec![0x90];
        sixteen.extend_from_slice(&[1u8; 16]);
        assert_eq!(
            decode_exact::<HashOrNumber>(&sixteen),
            Err(DecodeError::Overflow { max: 8, got: 16 })
        );
        assert_eq!(
            decode_exact::<HashOrNumber>(&[0xc0]),
            Err(DecodeError::UnexpectedList)
        );
    }
}
