//! Transaction receipts and event logs.

use bytes::{Bytes, BytesMut};

use crate::core::adapters::{Decodable, Encodable, ListDecoder, ListEncoder};
use crate::core::rlp;
use crate::error::{constants, DecodeError, EncodeError};
use crate::types::primitives::{Address, Bloom, Hash};
use crate::types::transaction::{decode_typed_envelope, encode_typed_envelope, peek_header};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<Hash>,
    pub data: Bytes,
}

impl Encodable for Log {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        let mut list = ListEncoder::new();
        list.push(&self.address)?
            .push(&self.topics)?
            .push(&self.data)?;
        list.finish(out);
        Ok(())
    }
}

impl Decodable for Log {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let mut fields = ListDecoder::new(buf, "log")?;
        let log = Self {
            address: fields.field()?,
            topics: fields.field()?,
            data: fields.field()?,
        };
        fields.finish()?;
        Ok(log)
    }
}

/// Outcome field of a receipt.
///
/// Pre-Byzantium receipts carry an intermediate state root instead of a
/// status flag; the encoded length tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReceiptStatus {
    /// Encoded as the empty string
    #[default]
    Failed,
    /// Encoded as `0x01`
    Success,
    PostState(Hash),
}

impl Encodable for ReceiptStatus {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        match self {
            ReceiptStatus::Failed => rlp::encode_bytes(&[], out),
            ReceiptStatus::Success => rlp::encode_bytes(&[0x01], out),
            ReceiptStatus::PostState(root) => return root.encode(out),
        }
        Ok(())
    }
}

impl Decodable for ReceiptStatus {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let data = rlp::decode_string(buf)?;
        match data {
            [] => Ok(ReceiptStatus::Failed),
            [0x01] => Ok(ReceiptStatus::Success),
            root if root.len() == 32 => {
                let mut bytes = [0u8; 32];
                bytes.copy_from_slice(root);
                Ok(ReceiptStatus::PostState(Hash::new(bytes)))
            }
            _ => Err(DecodeError::Malformed(constants::ERR_INVALID_RECEIPT_STATUS)),
        }
    }
}

/// Consensus form of a receipt.
///
/// `tx_type` 0 encodes as a plain list; any other type encodes as a byte
/// string holding `type || list`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Receipt {
    pub tx_type: u8,
    pub status: ReceiptStatus,
    pub cumulative_gas_used: u64,
    pub bloom: Bloom,
    pub logs: Vec<Log>,
}

impl Receipt {
    fn encode_fields(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        let mut list = ListEncoder::new();
        list.push(&self.status)?
            .push(&self.cumulative_gas_used)?
            .push(&self.bloom)?
            .push(&self.logs)?;
        list.finish(out);
        Ok(())
    }

    fn decode_fields(tx_type: u8, buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let mut fields = ListDecoder::new(buf, "receipt")?;
        let receipt = Self {
            tx_type,
            status: fields.field()?,
            cumulative_gas_used: fields.field()?,
            bloom: fields.field()?,
            logs: fields.field()?,
        };
        fields.finish()?;
        Ok(receipt)
    }
}

impl Encodable for Receipt {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        if self.tx_type == 0 {
            return self.encode_fields(out);
        }
        let mut inner = BytesMut::new();
        self.encode_fields(&mut inner)?;
        encode_typed_envelope(self.tx_type, &inner, out)
    }
}

impl Decodable for Receipt {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        if peek_header(buf)?.list {
            return Self::decode_fields(0, buf);
        }
        let (tx_type, payload) = decode_typed_envelope(buf)?;
        let mut inner = &payload[..];
        let receipt = Self::decode_fields(tx_type, &mut inner)?;
        if !inner.is_empty() {
            return Err(DecodeError::TrailingData(inner.len()));
        }
        Ok(receipt)
    }
}
