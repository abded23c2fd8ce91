//! Block headers, bodies and full blocks.

use bytes::{Bytes, BytesMut};

use crate::core::adapters::{Decodable, Encodable, ListDecoder, ListEncoder};
use crate::error::{DecodeError, EncodeError};
use crate::types::primitives::{Address, BlockNonce, Bloom, Hash, U256};
use crate::types::transaction::Transaction;

/// Block header in wire field order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockHeader {
    pub parent_hash: Hash,
    pub uncle_hash: Hash,
    pub coinbase: Address,
    pub state_root: Hash,
    pub transactions_root: Hash,
    pub receipts_root: Hash,
    pub logs_bloom: Bloom,
    pub difficulty: U256,
    pub number: U256,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub timestamp: u64,
    pub extra_data: Bytes,
    pub mix_hash: Hash,
    pub nonce: BlockNonce,
    /// Present only after the base-fee fork; omitted from the list when `None`
    pub base_fee: Option<U256>,
}

impl Encodable for BlockHeader {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        let mut list = ListEncoder::new();
        list.push(&self.parent_hash)?
            .push(&self.uncle_hash)?
            .push(&self.coinbase)?
            .push(&self.state_root)?
            .push(&self.transactions_root)?
            .push(&self.receipts_root)?
            .push(&self.logs_bloom)?
            .push(&self.difficulty)?
            .push(&self.number)?
            .push(&self.gas_limit)?
            .push(&self.gas_used)?
            .push(&self.timestamp)?
            .push(&self.extra_data)?
            .push(&self.mix_hash)?
            .push(&self.nonce)?
            .push_optional(self.base_fee.as_ref())?;
        list.finish(out);
        Ok(())
    }
}

impl Decodable for BlockHeader {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let mut fields = ListDecoder::new(buf, "block header")?;
        let header = Self {
            parent_hash: fields.field()?,
            uncle_hash: fields.field()?,
            coinbase: fields.field()?,
            state_root: fields.field()?,
            transactions_root: fields.field()?,
            receipts_root: fields.field()?,
            logs_bloom: fields.field()?,
            difficulty: fields.field()?,
            number: fields.field()?,
            gas_limit: fields.field()?,
            gas_used: fields.field()?,
            timestamp: fields.field()?,
            extra_data: fields.field()?,
            mix_hash: fields.field()?,
            nonce: fields.field()?,
            base_fee: fields.optional_field()?,
        };
        fields.finish()?;
        Ok(header)
    }
}

/// Transactions and uncles of one block, without its header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockBody {
    pub transactions: Vec<Transaction>,
    pub uncles: Vec<BlockHeader>,
}

impl Encodable for BlockBody {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        let mut list = ListEncoder::new();
        list.push(&self.transactions)?.push(&self.uncles)?;
        list.finish(out);
        Ok(())
    }
}

impl Decodable for BlockBody {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let mut fields = ListDecoder::new(buf, "block body")?;
        let body = Self {
            transactions: fields.field()?,
            uncles: fields.field()?,
        };
        fields.finish()?;
        Ok(body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
    pub uncles: Vec<BlockHeader>,
}

impl Encodable for Block {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        let mut list = ListEncoder::new();
        list.push(&self.header)?
            .push(&self.transactions)?
            .push(&self.uncles)?;
        list.finish(out);
        Ok(())
    }
}

impl Decodable for Block {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let mut fields = ListDecoder::new(buf, "block")?;
        let block = Self {
            header: fields.field()?,
            transactions: fields.field()?,
            uncles: fields.field()?,
        };
        fields.finish()?;
        Ok(block)
    }
}
