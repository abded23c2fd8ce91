//! Fixed-width byte arrays and the 256-bit unsigned integer.

use std::fmt;

use bytes::BytesMut;

use crate::core::adapters::{decode_uint_bytes, Decodable, Encodable};
use crate::core::rlp;
use crate::error::{DecodeError, EncodeError};

/// Exactly `N` bytes, encoded as a byte string of length `N`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FixedBytes<const N: usize>(pub [u8; N]);

pub type Hash = FixedBytes<32>;
pub type Address = FixedBytes<20>;
pub type Bloom = FixedBytes<256>;
pub type BlockNonce = FixedBytes<8>;
pub type ForkHash = FixedBytes<4>;
/// Compressed BLS12-381 public key
pub type BlsPublicKey = FixedBytes<48>;
pub type BlsSignature = FixedBytes<96>;

impl<const N: usize> FixedBytes<N> {
    pub const ZERO: Self = Self([0u8; N]);

    pub const fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// Copy from a slice that must be exactly `N` bytes long
    pub fn from_slice(data: &[u8]) -> Result<Self, EncodeError> {
        let bytes: [u8; N] = data.try_into().map_err(|_| EncodeError::WidthExceeded {
            expected: N,
            got: data.len(),
        })?;
        Ok(Self(bytes))
    }

    /// Right-align a shorter slice, zero-filling on the left.
    ///
    /// `Hash::left_padding_from(&[0xde, 0xad])` is `0x00..00dead`.
    pub fn left_padding_from(data: &[u8]) -> Result<Self, EncodeError> {
        if data.len() > N {
            return Err(EncodeError::WidthExceeded {
                expected: N,
                got: data.len(),
            });
        }
        let mut bytes = [0u8; N];
        bytes[N - data.len()..].copy_from_slice(data);
        Ok(Self(bytes))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl<const N: usize> Default for FixedBytes<N> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const N: usize> From<[u8; N]> for FixedBytes<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}

impl<const N: usize> AsRef<[u8]> for FixedBytes<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> fmt::Display for FixedBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl<const N: usize> fmt::Debug for FixedBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<const N: usize> Encodable for FixedBytes<N> {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        rlp::encode_bytes(&self.0, out);
        Ok(())
    }
}

impl<const N: usize> Decodable for FixedBytes<N> {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let data = rlp::decode_string(buf)?;
        let bytes: [u8; N] = data.try_into().map_err(|_| DecodeError::UnexpectedLength {
            expected: N,
            got: data.len(),
        })?;
        Ok(Self(bytes))
    }
}

/// 256-bit unsigned integer held as 32 big-endian bytes.
///
/// Only the wire form matters here, so no arithmetic is provided.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct U256([u8; 32]);

impl U256 {
    pub const ZERO: Self = Self([0u8; 32]);

    pub const fn from_be_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a big-endian slice of at most 32 bytes. Leading zeros are allowed.
    pub fn from_be_slice(data: &[u8]) -> Result<Self, EncodeError> {
        FixedBytes::<32>::left_padding_from(data).map(|fixed| Self(fixed.0))
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Minimal big-endian form, empty for zero
    pub fn trimmed(&self) -> &[u8] {
        let skip = self.0.iter().take_while(|b| **b == 0).count();
        &self.0[skip..]
    }

    pub fn is_zero(&self) -> bool {
        self.trimmed().is_empty()
    }

    /// The value as a `u64`, or `None` if it does not fit
    pub fn to_u64(&self) -> Option<u64> {
        let trimmed = self.trimmed();
        if trimmed.len() > 8 {
            return None;
        }
        let mut padded = [0u8; 8];
        padded[8 - trimmed.len()..].copy_from_slice(trimmed);
        Some(u64::from_be_bytes(padded))
    }
}

impl From<u64> for U256 {
    fn from(value: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }
}

impl From<u128> for U256 {
    fn from(value: u128) -> Self {
        let mut bytes = [0u8; 32];
        bytes[16..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_u64() {
            Some(small) => write!(f, "{small}"),
            None => write!(f, "0x{}", hex::encode(self.trimmed())),
        }
    }
}

impl fmt::Debug for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U256({self})")
    }
}

impl Encodable for U256 {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        rlp::encode_bytes(self.trimmed(), out);
        Ok(())
    }
}

impl Decodable for U256 {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let data = decode_uint_bytes(buf, 32)?;
        let mut bytes = [0u8; 32];
        bytes[32 - data.len()..].copy_from_slice(data);
        Ok(Self(bytes))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::core::rlp::{decode_exact, encode};

    #[test]
    fn test_hash_encoding_is_fixed_width() {
        let hash = Hash::left_padding_from(&[0xde, 0xad, 0xc0, 0xde]).unwrap();
        let encoded = encode(&hash).unwrap();
        assert_eq!(encoded.len(), 33);
        assert_eq!(encoded[0], 0xa0);
        assert_eq!(&encoded[29..], &[0xde, 0xad, 0xc0, 0xde]);
        assert_eq!(decode_exact::<Hash>(&encoded), Ok(hash));

        // Zero hashes keep all their bytes.
        assert_eq!(encode(&Hash::ZERO).unwrap().len(), 33);
    }

    #[test]
    fn test_fixed_width_rejects_wrong_length() {
        assert_eq!(
            decode_exact::<Address>(&[0x82, 0x01, 0x02]),
            Err(DecodeError::UnexpectedLength {
                expected: 20,
                got: 2
            })
        );
        assert_eq!(
            Hash::from_slice(&[0u8; 33]),
            Err(EncodeError::WidthExceeded {
                expected: 32,
                got: 33
            })
        );
        assert!(Address::left_padding_from(&[1u8; 21]).is_err());
    }

    #[test]
    fn test_u256_encoding() {
        assert_eq!(&encode(&U256::ZERO).unwrap()[..], &[0x80]);
        assert_eq!(&encode(&U256::from(2222u64)).unwrap()[..], &[0x82, 0x08, 0xae]);
        assert_eq!(&encode(&U256::from(1u64)).unwrap()[..], &[0x01]);

        let big = U256::from_be_bytes([0xff; 32]);
        let encoded = encode(&big).unwrap();
        assert_eq!(encoded[0], 0xa0);
        assert_eq!(decode_exact::<U256>(&encoded), Ok(big));
    }

    #[test]
    fn test_u256_rejects_leading_zero_and_overflow() {
        assert!(matches!(
            decode_exact::<U256>(&[0x82, 0x00, 0x05]),
            Err(DecodeError::NonCanonical(_))
        ));
        let mut wide = vec![0xa1, 0x01];
        wide.extend_from_slice(&[0u8; 32]);
        assert_eq!(
            decode_exact::<U256>(&wide),
            Err(DecodeError::Overflow { max: 32, got: 33 })
        );
    }

    #[test]
    fn test_u256_conversions() {
        assert_eq!(U256::from(3333u64).to_u64(), Some(3333));
        assert_eq!(U256::from(u128::MAX).to_u64(), None);
        assert_eq!(U256::from_be_slice(&[0x0d, 0x05]).unwrap(), U256::from(3333u64));
        assert_eq!(U256::from(3333u64).to_string(), "3333");
    }

    #[test]
    fn test_display_is_hex() {
        let addr = Address::left_padding_from(&[0x11]).unwrap();
        assert_eq!(
            addr.to_string(),
            "0x0000000000000000000000000000000000000011"
        );
    }
}
