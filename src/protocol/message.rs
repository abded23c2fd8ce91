//! # Message Catalog
//!
//! The closed set of messages exchanged with peers and their static
//! properties: wire code, role and request/response pairing.
//!
//! Raw relay kinds share the wire code of their materialized kind. Which one
//! a receiver decodes into is a local choice; both produce the same bytes.

use std::fmt;

use bytes::BytesMut;

use crate::core::adapters::{Decodable, Encodable};
use crate::error::{DecodeError, EncodeError};
use crate::protocol::packets::*;

/// Whether a message opens an exchange, answers one, or stands alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageRole {
    Request,
    Response,
    Notification,
}

/// Payload-free tag of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageKind {
    Status,
    NewBlockHashes,
    Transactions,
    GetBlockHeaders,
    BlockHeaders,
    GetBlockBodies,
    BlockBodies,
    BlockBodiesRaw,
    NewBlock,
    NewPooledTransactionHashes,
    GetPooledTransactions,
    PooledTransactions,
    PooledTransactionsRaw,
    GetNodeData,
    NodeData,
    GetReceipts,
    Receipts,
    ReceiptsRaw,
    Votes,
}

impl MessageKind {
    pub const ALL: [MessageKind; 19] = [
        MessageKind::Status,
        MessageKind::NewBlockHashes,
        MessageKind::Transactions,
        MessageKind::GetBlockHeaders,
        MessageKind::BlockHeaders,
        MessageKind::GetBlockBodies,
        MessageKind::BlockBodies,
        MessageKind::BlockBodiesRaw,
        MessageKind::NewBlock,
        MessageKind::NewPooledTransactionHashes,
        MessageKind::GetPooledTransactions,
        MessageKind::PooledTransactions,
        MessageKind::PooledTransactionsRaw,
        MessageKind::GetNodeData,
        MessageKind::NodeData,
        MessageKind::GetReceipts,
        MessageKind::Receipts,
        MessageKind::ReceiptsRaw,
        MessageKind::Votes,
    ];

    /// Wire code, relative to the protocol's offset
    pub const fn code(self) -> u64 {
        match self {
            MessageKind::Status => 0x00,
            MessageKind::NewBlockHashes => 0x01,
            MessageKind::Transactions => 0x02,
            MessageKind::GetBlockHeaders => 0x03,
            MessageKind::BlockHeaders => 0x04,
            MessageKind::GetBlockBodies => 0x05,
            MessageKind::BlockBodies | MessageKind::BlockBodiesRaw => 0x06,
            MessageKind::NewBlock => 0x07,
            MessageKind::NewPooledTransactionHashes => 0x08,
            MessageKind::GetPooledTransactions => 0x09,
            MessageKind::PooledTransactions | MessageKind::PooledTransactionsRaw => 0x0a,
            MessageKind::GetNodeData => 0x0d,
            MessageKind::NodeData => 0x0e,
            MessageKind::GetReceipts => 0x0f,
            MessageKind::Receipts | MessageKind::ReceiptsRaw => 0x10,
            MessageKind::Votes => 0x11,
        }
    }

    /// The materialized kind a code decodes to by default
    pub fn from_code(code: u64) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| !kind.is_raw() && kind.code() == code)
    }

    pub const fn name(self) -> &'static str {
        match self {
            MessageKind::Status => "Status",
            MessageKind::NewBlockHashes => "NewBlockHashes",
            MessageKind::Transactions => "Transactions",
            MessageKind::GetBlockHeaders => "GetBlockHeaders",
            MessageKind::BlockHeaders => "BlockHeaders",
            MessageKind::GetBlockBodies => "GetBlockBodies",
            MessageKind::BlockBodies => "BlockBodies",
            MessageKind::BlockBodiesRaw => "BlockBodiesRaw",
            MessageKind::NewBlock => "NewBlock",
            MessageKind::NewPooledTransactionHashes => "NewPooledTransactionHashes",
            MessageKind::GetPooledTransactions => "GetPooledTransactions",
            MessageKind::PooledTransactions => "PooledTransactions",
            MessageKind::PooledTransactionsRaw => "PooledTransactionsRaw",
            MessageKind::GetNodeData => "GetNodeData",
            MessageKind::NodeData => "NodeData",
            MessageKind::GetReceipts => "GetReceipts",
            MessageKind::Receipts => "Receipts",
            MessageKind::ReceiptsRaw => "ReceiptsRaw",
            MessageKind::Votes => "Votes",
        }
    }

    pub const fn role(self) -> MessageRole {
        match self {
            MessageKind::GetBlockHeaders
            | MessageKind::GetBlockBodies
            | MessageKind::GetPooledTransactions
            | MessageKind::GetNodeData
            | MessageKind::GetReceipts => MessageRole::Request,
            MessageKind::BlockHeaders
            | MessageKind::BlockBodies
            | MessageKind::BlockBodiesRaw
            | MessageKind::PooledTransactions
            | MessageKind::PooledTransactionsRaw
            | MessageKind::NodeData
            | MessageKind::Receipts
            | MessageKind::ReceiptsRaw => MessageRole::Response,
            MessageKind::Status
            | MessageKind::NewBlockHashes
            | MessageKind::Transactions
            | MessageKind::NewBlock
            | MessageKind::NewPooledTransactionHashes
            | MessageKind::Votes => MessageRole::Notification,
        }
    }

    pub const fn is_raw(self) -> bool {
        matches!(
            self,
            MessageKind::BlockBodiesRaw
                | MessageKind::PooledTransactionsRaw
                | MessageKind::ReceiptsRaw
        )
    }

    /// The kind to decode into when the payload will only be forwarded.
    /// Kinds without a raw form map to themselves.
    pub const fn relay_variant(self) -> Self {
        match self {
            MessageKind::BlockBodies => MessageKind::BlockBodiesRaw,
            MessageKind::PooledTransactions => MessageKind::PooledTransactionsRaw,
            MessageKind::Receipts => MessageKind::ReceiptsRaw,
            other => other,
        }
    }

    /// The materialized kind sharing this kind's code
    pub const fn materialized(self) -> Self {
        match self {
            MessageKind::BlockBodiesRaw => MessageKind::BlockBodies,
            MessageKind::PooledTransactionsRaw => MessageKind::PooledTransactions,
            MessageKind::ReceiptsRaw => MessageKind::Receipts,
            other => other,
        }
    }

    /// The response paired with a request kind
    pub const fn response_kind(self) -> Option<Self> {
        match self {
            MessageKind::GetBlockHeaders => Some(MessageKind::BlockHeaders),
            MessageKind::GetBlockBodies => Some(MessageKind::BlockBodies),
            MessageKind::GetPooledTransactions => Some(MessageKind::PooledTransactions),
            MessageKind::GetNodeData => Some(MessageKind::NodeData),
            MessageKind::GetReceipts => Some(MessageKind::Receipts),
            _ => None,
        }
    }

    /// Whether `response` answers a request of this kind, in either form
    pub fn is_answered_by(self, response: MessageKind) -> bool {
        self.response_kind() == Some(response.materialized())
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed message payload, without any request id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Status(Status),
    NewBlockHashes(NewBlockHashes),
    Transactions(Transactions),
    GetBlockHeaders(GetBlockHeaders),
    BlockHeaders(BlockHeaders),
    GetBlockBodies(GetBlockBodies),
    BlockBodies(BlockBodies),
    BlockBodiesRaw(BlockBodiesRaw),
    NewBlock(Box<NewBlock>),
    NewPooledTransactionHashes(NewPooledTransactionHashes),
    GetPooledTransactions(GetPooledTransactions),
    PooledTransactions(PooledTransactions),
    PooledTransactionsRaw(PooledTransactionsRaw),
    GetNodeData(GetNodeData),
    NodeData(NodeData),
    GetReceipts(GetReceipts),
    Receipts(Receipts),
    ReceiptsRaw(ReceiptsRaw),
    Votes(Votes),
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Status(_) => MessageKind::Status,
            Message::NewBlockHashes(_) => MessageKind::NewBlockHashes,
            Message::Transactions(_) => MessageKind::Transactions,
            Message::GetBlockHeaders(_) => MessageKind::GetBlockHeaders,
            Message::BlockHeaders(_) => MessageKind::BlockHeaders,
            Message::GetBlockBodies(_) => MessageKind::GetBlockBodies,
            Message::BlockBodies(_) => MessageKind::BlockBodies,
            Message::BlockBodiesRaw(_) => MessageKind::BlockBodiesRaw,
            Message::NewBlock(_) => MessageKind::NewBlock,
            Message::NewPooledTransactionHashes(_) => MessageKind::NewPooledTransactionHashes,
            Message::GetPooledTransactions(_) => MessageKind::GetPooledTransactions,
            Message::PooledTransactions(_) => MessageKind::PooledTransactions,
            Message::PooledTransactionsRaw(_) => MessageKind::PooledTransactionsRaw,
            Message::GetNodeData(_) => MessageKind::GetNodeData,
            Message::NodeData(_) => MessageKind::NodeData,
            Message::GetReceipts(_) => MessageKind::GetReceipts,
            Message::Receipts(_) => MessageKind::Receipts,
            Message::ReceiptsRaw(_) => MessageKind::ReceiptsRaw,
            Message::Votes(_) => MessageKind::Votes,
        }
    }

    /// Decode one payload item as the given kind
    pub fn decode_kind(kind: MessageKind, buf: &mut &[u8]) -> Result<Self, DecodeError> {
        Ok(match kind {
            MessageKind::Status => Message::Status(Decodable::decode(buf)?),
            MessageKind::NewBlockHashes => Message::NewBlockHashes(Decodable::decode(buf)?),
            MessageKind::Transactions => Message::Transactions(Decodable::decode(buf)?),
            MessageKind::GetBlockHeaders => Message::GetBlockHeaders(Decodable::decode(buf)?),
            MessageKind::BlockHeaders => Message::BlockHeaders(Decodable::decode(buf)?),
            MessageKind::GetBlockBodies => Message::GetBlockBodies(Decodable::decode(buf)?),
            MessageKind::BlockBodies => Message::BlockBodies(Decodable::decode(buf)?),
            MessageKind::BlockBodiesRaw => Message::BlockBodiesRaw(Decodable::decode(buf)?),
            MessageKind::NewBlock => Message::NewBlock(Decodable::decode(buf)?),
            MessageKind::NewPooledTransactionHashes => {
                Message::NewPooledTransactionHashes(Decodable::decode(buf)?)
            }
            MessageKind::GetPooledTransactions => {
                Message::GetPooledTransactions(Decodable::decode(buf)?)
            }
            MessageKind::PooledTransactions => Message::PooledTransactions(Decodable::decode(buf)?),
            MessageKind::PooledTransactionsRaw => {
                Message::PooledTransactionsRaw(Decodable::decode(buf)?)
            }
            MessageKind::GetNodeData => Message::GetNodeData(Decodable::decode(buf)?),
            MessageKind::NodeData => Message::NodeData(Decodable::decode(buf)?),
            MessageKind::GetReceipts => Message::GetReceipts(Decodable::decode(buf)?),
            MessageKind::Receipts => Message::Receipts(Decodable::decode(buf)?),
            MessageKind::ReceiptsRaw => Message::ReceiptsRaw(Decodable::decode(buf)?),
            MessageKind::Votes => Message::Votes(Decodable::decode(buf)?),
        })
    }

    fn payload(&self) -> &dyn Encodable {
        match self {
            Message::Status(p) => p,
            Message::NewBlockHashes(p) => p,
            Message::Transactions(p) => p,
            Message::GetBlockHeaders(p) => p,
            Message::BlockHeaders(p) => p,
            Message::GetBlockBodies(p) => p,
            Message::BlockBodies(p) => p,
            Message::BlockBodiesRaw(p) => p,
            Message::NewBlock(p) => p,
            Message::NewPooledTransactionHashes(p) => p,
            Message::GetPooledTransactions(p) => p,
            Message::PooledTransactions(p) => p,
            Message::PooledTransactionsRaw(p) => p,
            Message::GetNodeData(p) => p,
            Message::NodeData(p) => p,
            Message::GetReceipts(p) => p,
            Message::Receipts(p) => p,
            Message::ReceiptsRaw(p) => p,
            Message::Votes(p) => p,
        }
    }
}

impl Encodable for Message {
    fn encode(&self, out: &mut BytesMut) -> Result<(), EncodeError> {
        self.payload().encode(out)
    }
}

macro_rules! impl_from_packet {
    ($($variant:ident),* $(,)?) => {$(
        impl From<$variant> for Message {
            fn from(packet: $variant) -> Self {
                Message::$variant(packet)
            }
        }
    )*};
}

impl_from_packet!(
    Status,
    NewBlockHashes,
    Transactions,
    GetBlockHeaders,
    BlockHeaders,
    GetBlockBodies,
    BlockBodies,
    BlockBodiesRaw,
    NewPooledTransactionHashes,
    GetPooledTransactions,
    PooledTransactions,
    PooledTransactionsRaw,
    GetNodeData,
    NodeData,
    GetReceipts,
    Receipts,
    ReceiptsRaw,
    Votes,
);

impl From<NewBlock> for Message {
    fn from(packet: NewBlock) -> Self {
        Message::NewBlock(Box::new(packet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique_per_materialized_kind() {
        let mut seen = std::collections::HashSet::new();
        for kind in MessageKind::ALL.iter().filter(|k| !k.is_raw()) {
            assert!(seen.insert(kind.code()), "duplicate code for {kind}");
        }
        assert_eq!(seen.len(), 16);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(MessageKind::from_code(0x06), Some(MessageKind::BlockBodies));
        assert_eq!(MessageKind::from_code(0x11), Some(MessageKind::Votes));
        assert_eq!(MessageKind::from_code(0x0b), None);
        assert_eq!(MessageKind::from_code(0x12), None);
    }

    #[test]
    fn test_raw_pairs() {
        for kind in MessageKind::ALL {
            let relay = kind.relay_variant();
            assert_eq!(relay.code(), kind.code());
            assert_eq!(relay.materialized(), kind.materialized());
        }
        assert_eq!(
            MessageKind::Receipts.relay_variant(),
            MessageKind::ReceiptsRaw
        );
        assert_eq!(MessageKind::NodeData.relay_variant(), MessageKind::NodeData);
    }

    #[test]
    fn test_request_response_pairing() {
        for kind in MessageKind::ALL {
            match kind.role() {
                MessageRole::Request => {
                    let response = kind.response_kind();
                    assert!(response.is_some(), "{kind} has no response");
                    assert!(response.is_some_and(|r| r.role() == MessageRole::Response));
                }
                _ => assert_eq!(kind.response_kind(), None),
            }
        }
        assert!(MessageKind::GetBlockBodies.is_answered_by(MessageKind::BlockBodiesRaw));
        assert!(!MessageKind::GetBlockBodies.is_answered_by(MessageKind::Receipts));
    }

    #[test]
    fn test_message_kind_matches_variant() {
        let message = Message::from(GetReceipts::default());
        assert_eq!(message.kind(), MessageKind::GetReceipts);
        let message = Message::from(NewBlock::default());
        assert_eq!(message.kind(), MessageKind::NewBlock);
    }
}
