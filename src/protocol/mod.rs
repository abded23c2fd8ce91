//! # Protocol Layer
//!
//! The message catalog and everything that moves it between peers.
//!
//! ## Components
//! - **Packets / Message**: payload shapes and the closed message set
//! - **Version / Envelope**: per-version catalog and request-id framing
//! - **Dispatcher**: routes requests to handlers by kind
//! - **Session**: codec bound to a transport for one negotiated version
//!
//! ## Message Flow
//! ```text
//! transport (code, bytes) -> envelope (strip id) -> catalog (typed payload)
//! ```

pub mod dispatcher;
pub mod envelope;
pub mod hash_or_number;
pub mod message;
pub mod packets;
pub mod session;
pub mod version;

#[cfg(test)]
mod tests;

pub use envelope::{decode_message, encode_message, Framing, MessageCodec, Packet};
pub use hash_or_number::HashOrNumber;
pub use message::{Message, MessageKind, MessageRole};
pub use version::{CapabilityTable, ProtocolVersion};
