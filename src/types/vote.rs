//! Fast-finality vote records.
//!
//! Signatures and keys are opaque blobs here; nothing is verified.

use bytes::BytesMut;

use crate::core::adapters::{Decodable, Encodable, ListDecoder, ListEncoder};
use crate::error::{DecodeError, EncodeError};
use crate::types::primitives::{BlsPublicKey, BlsSignature, Hash};

/// Source and target checkpoints a validator attests to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VoteData {
    pub source_number: u64,
    pub source_hash: Hash,
    pub target_number: u64,
    pub target_hash: Hash,
}

impl Encodable for VoteData {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        let mut list = ListEncoder::new();
        list.push(&self.source_number)?
            .push(&self.source_hash)?
            .push(&self.target_number)?
            .push(&self.target_hash)?;
        list.finish(out);
        Ok(())
    }
}

impl Decodable for VoteData {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let mut fields = ListDecoder::new(buf, "vote data")?;
        let data = Self {
            source_number: fields.field()?,
            source_hash: fields.field()?,
            target_number: fields.field()?,
            target_hash: fields.field()?,
        };
        fields.finish()?;
        Ok(data)
    }
}

/// A signed vote as relayed between peers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VoteEnvelope {
    pub vote_address: BlsPublicKey,
    pub signature: BlsSignature,
    pub data: VoteData,
}

impl Encodable for VoteEnvelope {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        let mut list = ListEncoder::new();
        list.push(&self.vote_address)?
            .push(&self.signature)?
            .push(&self.data)?;
        list.finish(out);
        Ok(())
    }
}

impl Decodable for VoteEnvelope {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let mut fields = ListDecoder::new(buf, "vote envelope")?;
        let envelope = Self {
            vote_address: fields.field()?,
            signature: fields.field()?,
            data: fields.field()?,
        };
        fields.finish()?;
        Ok(envelope)
    }
}
