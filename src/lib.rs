//! # eth-wire
//!
//! Canonical length-prefixed codec and the versioned peer-to-peer message
//! catalog used to exchange headers, bodies, receipts, transactions and
//! fast-finality votes between full nodes.
//!
//! ## Layers
//! - [`core`]: the canonical codec, the value model and typed field adapters
//! - [`types`]: chain data carried by messages (headers, bodies, receipts, votes)
//! - [`protocol`]: message catalog, version envelope, dispatcher and session
//! - [`config`] / [`utils`]: configuration, logging and metrics
//!
//! ## Example
//! ```rust
//! use eth_wire::protocol::packets::GetBlockHeaders;
//! use eth_wire::protocol::{HashOrNumber, MessageCodec, Packet, ProtocolVersion};
//!
//! let codec = MessageCodec::new(ProtocolVersion::Eth66);
//! let request = GetBlockHeaders {
//!     origin: HashOrNumber::Number(9999),
//!     amount: 5,
//!     skip: 5,
//!     reverse: false,
//! };
//! let (code, bytes) = codec.encode(&Packet::with_id(1111, request)).unwrap();
//! assert_eq!(code, 0x03);
//! assert_eq!(codec.decode(code, &bytes).unwrap().request_id, Some(1111));
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod types;
pub mod utils;

pub use crate::core::adapters::{Decodable, Encodable, RawValue};
pub use crate::core::value::Value;
pub use error::{DecodeError, EncodeError, ProtocolError, Result};
