//! # Chain Data Types
//!
//! Encode/decode targets carried by the message catalog. Only their wire
//! layout is modelled; no chain rules are checked.

pub mod block;
pub mod primitives;
pub mod receipt;
pub mod transaction;
pub mod vote;

pub use block::{Block, BlockBody, BlockHeader};
pub use primitives::{
    Address, BlockNonce, Bloom, BlsPublicKey, BlsSignature, FixedBytes, ForkHash, Hash, U256,
};
pub use receipt::{Log, Receipt, ReceiptStatus};
pub use transaction::{LegacyTransaction, Transaction};
pub use vote::{VoteData, VoteEnvelope};
