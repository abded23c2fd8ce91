//! Transactions as carried inside blocks and pool messages.
//!
//! Legacy transactions travel as a nine-field list. Typed transactions
//! travel as a single byte string holding `type || payload`; the payload is
//! kept opaque.

use bytes::{BufMut, Bytes, BytesMut};

use crate::core::adapters::{Decodable, Encodable, ListDecoder, ListEncoder};
use crate::core::rlp::{self, Header};
use crate::error::{constants, DecodeError, EncodeError};
use crate::types::primitives::{Address, U256};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LegacyTransaction {
    pub nonce: u64,
    pub gas_price: U256,
    pub gas: u64,
    /// `None` for contract creation, encoded as the empty string
    pub to: Option<Address>,
    pub value: U256,
    pub data: Bytes,
    pub v: U256,
    pub r: U256,
    pub s: U256,
}

impl Encodable for LegacyTransaction {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        let mut list = ListEncoder::new();
        list.push(&self.nonce)?.push(&self.gas_price)?.push(&self.gas)?;
        match &self.to {
            Some(to) => list.push(to)?,
            None => list.push(&Bytes::new())?,
        };
        list.push(&self.value)?
            .push(&self.data)?
            .push(&self.v)?
            .push(&self.r)?
            .push(&self.s)?;
        list.finish(out);
        Ok(())
    }
}

impl Decodable for LegacyTransaction {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let mut fields = ListDecoder::new(buf, "legacy transaction")?;
        let nonce = fields.field()?;
        let gas_price = fields.field()?;
        let gas = fields.field()?;
        let to_bytes: Bytes = fields.field()?;
        let to = if to_bytes.is_empty() {
            None
        } else {
            Some(
                Address::from_slice(&to_bytes).map_err(|_| DecodeError::UnexpectedLength {
                    expected: 20,
                    got: to_bytes.len(),
                })?,
            )
        };
        let tx = Self {
            nonce,
            gas_price,
            gas,
            to,
            value: fields.field()?,
            data: fields.field()?,
            v: fields.field()?,
            r: fields.field()?,
            s: fields.field()?,
        };
        fields.finish()?;
        Ok(tx)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    Legacy(LegacyTransaction),
    /// Typed envelope. `tx_type` is below 0x80; `payload` is the encoded body.
    Typed { tx_type: u8, payload: Bytes },
}

impl Transaction {
    pub fn tx_type(&self) -> u8 {
        match self {
            Transaction::Legacy(_) => 0,
            Transaction::Typed { tx_type, .. } => *tx_type,
        }
    }
}

impl From<LegacyTransaction> for Transaction {
    fn from(tx: LegacyTransaction) -> Self {
        Transaction::Legacy(tx)
    }
}

impl Encodable for Transaction {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        match self {
            Transaction::Legacy(tx) => tx.encode(out),
            Transaction::Typed { tx_type, payload } => {
                encode_typed_envelope(*tx_type, payload, out)
            }
        }
    }
}

impl Decodable for Transaction {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let header = peek_header(buf)?;
        if header.list {
            return LegacyTransaction::decode(buf).map(Transaction::Legacy);
        }
        let (tx_type, payload) = decode_typed_envelope(buf)?;
        Ok(Transaction::Typed { tx_type, payload })
    }
}

pub(crate) fn peek_header(buf: &[u8]) -> Result<Header, DecodeError> {
    let mut cursor = buf;
    Header::decode(&mut cursor)
}

/// Write `type || payload` as one byte string. The type byte must be below 0x80.
pub(crate) fn encode_typed_envelope(
    tx_type: u8,
    payload: &[u8],
    out: &mut BytesMut,
) -> Result<(), EncodeError> {
    if tx_type >= rlp::EMPTY_STRING_CODE {
        return Err(EncodeError::InvalidEnvelopeType(tx_type));
    }
    if payload.is_empty() {
        rlp::encode_bytes(&[tx_type], out);
        return Ok(());
    }
    Header::string(payload.len() + 1).encode(out);
    out.put_u8(tx_type);
    out.put_slice(payload);
    Ok(())
}

pub(crate) fn decode_typed_envelope(buf: &mut &[u8]) -> Result<(u8, Bytes), DecodeError> {
    let data = rlp::decode_string(buf)?;
    let (tx_type, payload) = data
        .split_first()
        .ok_or(DecodeError::Malformed(constants::ERR_EMPTY_TYPED_ENVELOPE))?;
    if *tx_type >= rlp::EMPTY_STRING_CODE {
        return Err(DecodeError::Malformed(constants::ERR_INVALID_ENVELOPE_TYPE));
    }
    Ok((*tx_type, Bytes::copy_from_slice(payload)))
}
