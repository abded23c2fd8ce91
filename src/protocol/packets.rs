//! Payload shapes of every message in the catalog.
//!
//! Fields are positional and travel in declaration order. Sequence packets
//! are thin newtypes over `Vec<T>`; an empty response is the empty list.

use std::ops::Deref;

use bytes::{Bytes, BytesMut};

use crate::core::adapters::{Decodable, Encodable, ListDecoder, ListEncoder, RawValue};
use crate::error::{DecodeError, EncodeError};
use crate::protocol::hash_or_number::HashOrNumber;
use crate::types::{
    Block, BlockBody, BlockHeader, ForkHash, Hash, Receipt, Transaction, VoteEnvelope, U256,
};

/// Declare a packet that is a bare list of items.
macro_rules! sequence_packet {
    ($(#[$doc:meta])* $name:ident, $item:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Default)]
        pub struct $name(pub Vec<$item>);

        impl $name {
            pub fn new(items: Vec<$item>) -> Self {
                Self(items)
            }

            pub fn into_inner(self) -> Vec<$item> {
                self.0
            }
        }

        impl Deref for $name {
            type Target = [$item];

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl From<Vec<$item>> for $name {
            fn from(items: Vec<$item>) -> Self {
                Self(items)
            }
        }

        impl Encodable for $name {
            fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
                self.0.encode(out)
            }
        }

        impl Decodable for $name {
            fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
                Vec::<$item>::decode(buf).map(Self)
            }
        }
    };
}

sequence_packet!(
    /// Announced transactions
    Transactions,
    Transaction
);
sequence_packet!(BlockHeaders, BlockHeader);
sequence_packet!(GetBlockBodies, Hash);
sequence_packet!(BlockBodies, BlockBody);
sequence_packet!(
    /// Bodies kept in their received encoding, for relaying
    BlockBodiesRaw,
    RawValue
);
sequence_packet!(NewPooledTransactionHashes, Hash);
sequence_packet!(GetPooledTransactions, Hash);
sequence_packet!(PooledTransactions, Transaction);
sequence_packet!(
    /// Pooled transactions kept in their received encoding
    PooledTransactionsRaw,
    RawValue
);
sequence_packet!(GetNodeData, Hash);
sequence_packet!(
    /// State trie nodes; opaque byte strings on both sides
    NodeData,
    Bytes
);
sequence_packet!(GetReceipts, Hash);
sequence_packet!(
    /// Receipts grouped per requested block
    Receipts,
    Vec<Receipt>
);
sequence_packet!(
    /// Per-block receipt lists kept in their received encoding
    ReceiptsRaw,
    RawValue
);
sequence_packet!(NewBlockHashes, BlockHashNumber);

/// Header query: a starting block plus pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GetBlockHeaders {
    pub origin: HashOrNumber,
    pub amount: u64,
    pub skip: u64,
    pub reverse: bool,
}

impl Encodable for GetBlockHeaders {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        let mut list = ListEncoder::new();
        list.push(&self.origin)?
            .push(&self.amount)?
            .push(&self.skip)?
            .push(&self.reverse)?;
        list.finish(out);
        Ok(())
    }
}

impl Decodable for GetBlockHeaders {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let mut fields = ListDecoder::new(buf, "GetBlockHeaders")?;
        let request = Self {
            origin: fields.field()?,
            amount: fields.field()?,
            skip: fields.field()?,
            reverse: fields.field()?,
        };
        fields.finish()?;
        Ok(request)
    }
}

/// One entry of a block hash announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockHashNumber {
    pub hash: Hash,
    pub number: u64,
}

impl Encodable for BlockHashNumber {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        let mut list = ListEncoder::new();
        list.push(&self.hash)?.push(&self.number)?;
        list.finish(out);
        Ok(())
    }
}

impl Decodable for BlockHashNumber {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let mut fields = ListDecoder::new(buf, "block hash announcement")?;
        let entry = Self {
            hash: fields.field()?,
            number: fields.field()?,
        };
        fields.finish()?;
        Ok(entry)
    }
}

/// Fork identifier: checksum of past forks plus the next scheduled one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ForkId {
    pub hash: ForkHash,
    pub next: u64,
}

impl Encodable for ForkId {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        let mut list = ListEncoder::new();
        list.push(&self.hash)?.push(&self.next)?;
        list.finish(out);
        Ok(())
    }
}

impl Decodable for ForkId {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let mut fields = ListDecoder::new(buf, "fork id")?;
        let id = Self {
            hash: fields.field()?,
            next: fields.field()?,
        };
        fields.finish()?;
        Ok(id)
    }
}

/// Chain handshake sent by both sides right after the connection is up.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Status {
    pub protocol_version: u32,
    pub network_id: u64,
    pub total_difficulty: U256,
    pub head: Hash,
    pub genesis: Hash,
    pub fork_id: ForkId,
}

impl Encodable for Status {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        let mut list = ListEncoder::new();
        list.push(&self.protocol_version)?
            .push(&self.network_id)?
            .push(&self.total_difficulty)?
            .push(&self.head)?
            .push(&self.genesis)?
            .push(&self.fork_id)?;
        list.finish(out);
        Ok(())
    }
}

impl Decodable for Status {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let mut fields = ListDecoder::new(buf, "Status")?;
        let status = Self {
            protocol_version: fields.field()?,
            network_id: fields.field()?,
            total_difficulty: fields.field()?,
            head: fields.field()?,
            genesis: fields.field()?,
            fork_id: fields.field()?,
        };
        fields.finish()?;
        Ok(status)
    }
}

/// Full block propagation with the sender's total difficulty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewBlock {
    pub block: Block,
    pub total_difficulty: U256,
}

impl Encodable for NewBlock {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        let mut list = ListEncoder::new();
        list.push(&self.block)?.push(&self.total_difficulty)?;
        list.finish(out);
        Ok(())
    }
}

impl Decodable for NewBlock {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let mut fields = ListDecoder::new(buf, "NewBlock")?;
        let announcement = Self {
            block: fields.field()?,
            total_difficulty: fields.field()?,
        };
        fields.finish()?;
        Ok(announcement)
    }
}

/// Vote broadcast. The envelope list is wrapped in a one-field record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Votes {
    pub votes: Vec<VoteEnvelope>,
}

impl Encodable for Votes {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        let mut list = ListEncoder::new();
        list.push(&self.votes)?;
        list.finish(out);
        Ok(())
    }
}

impl Decodable for Votes {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let mut fields = ListDecoder::new(buf, "Votes")?;
        let votes = Self {
            votes: fields.field()?,
        };
        fields.finish()?;
        Ok(votes)
    }
}
