//! # Core Codec Components
//!
//! The canonical encoding and the typed adapters built on it.
//!
//! ## Components
//! - **rlp**: item headers, strict prefix decoding, top-level encode/decode helpers
//! - **value**: the recursive value model (byte string or list of values)
//! - **adapters**: `Encodable`/`Decodable` and the per-type wire rules
//!
//! ## Wire Format
//! ```text
//! [0x00..0x7f]                   single byte, itself
//! [0x80+L] [L bytes]             string, L <= 55
//! [0xb7+N] [L: N bytes] [L]      string, L > 55
//! [0xc0+L] [L bytes of items]    list, L <= 55
//! [0xf7+N] [L: N bytes] [items]  list, L > 55
//! ```
//!
//! ## Security
//! - Declared lengths are checked against the remaining input before allocation
//! - Length-of-length is capped at 4 bytes
//! - Generic value decoding is bounded to 128 levels of nesting

pub mod adapters;
pub mod rlp;
pub mod value;
