//! # Error Types
//!
//! Error handling for the codec, the message catalog and the session layer.
//!
//! ## Error Categories
//! - **Encode errors**: construction mistakes caught while producing bytes
//!   (ambiguous union field, value wider than its adapter, kind not valid for
//!   the negotiated version). Never retried.
//! - **Decode errors**: classification of malformed peer input. Each failure is
//!   local to one message; whether the peer gets dropped is the caller's call.
//! - **Protocol errors**: transport, configuration and session failures, wrapping
//!   the two codec error types.
//!
//! ## Example Usage
//! ```rust
//! use eth_wire::core::rlp;
//! use eth_wire::error::DecodeError;
//!
//! // A single byte below 0x80 must never carry a string prefix.
//! let result = rlp::decode_value(&[0x81, 0x05]);
//! assert!(matches!(result, Err(DecodeError::NonCanonical(_))));
//! ```

use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Dispatcher-related error messages
    pub const ERR_DISPATCHER_WRITE_LOCK: &str = "Failed to acquire write lock on dispatcher";
    pub const ERR_DISPATCHER_READ_LOCK: &str = "Failed to acquire read lock on dispatcher";

    /// Canonical form violations
    pub const ERR_SINGLE_BYTE_PREFIXED: &str = "single byte below 0x80 carries a string prefix";
    pub const ERR_LENGTH_LEADING_ZERO: &str = "length prefix has a leading zero byte";
    pub const ERR_LONG_FORM_SHORT_PAYLOAD: &str = "long length form used for a payload of 55 bytes or less";
    pub const ERR_INTEGER_LEADING_ZERO: &str = "integer has a leading zero byte";

    /// Structural problems
    pub const ERR_LENGTH_TOO_WIDE: &str = "length of length exceeds 4 bytes";
    pub const ERR_NESTING_TOO_DEEP: &str = "list nesting exceeds the decoder depth bound";
    pub const ERR_INVALID_BOOL: &str = "boolean must encode as 0x80 or 0x01";
    pub const ERR_INVALID_RECEIPT_STATUS: &str = "receipt status must be empty, 0x01 or a 32-byte root";
    pub const ERR_EMPTY_TYPED_ENVELOPE: &str = "typed envelope is empty";
    pub const ERR_INVALID_ENVELOPE_TYPE: &str = "typed envelope type byte must be below 0x80";
}

/// Failures raised while encoding a typed value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Both alternatives of a union field were supplied.
    #[error("ambiguous union field: both hash and number are set")]
    AmbiguousUnion,

    /// Neither alternative of a union field was supplied.
    #[error("empty union field: neither hash nor number is set")]
    EmptyUnion,

    /// A value does not fit the width its adapter declares.
    #[error("value is {got} bytes wide, adapter allows {expected}")]
    WidthExceeded { expected: usize, got: usize },

    /// The message kind is not part of the negotiated protocol version.
    #[error("message {kind} is not supported by eth/{version}")]
    UnsupportedMessageKind { version: u32, kind: &'static str },

    /// A request-id-wrapped kind was encoded without a request id.
    #[error("message {0} requires a request id in this protocol version")]
    MissingRequestId(&'static str),

    /// A typed transaction or receipt declared a type byte of 0x80 or above.
    #[error("typed envelope type {0:#04x} must be below 0x80")]
    InvalidEnvelopeType(u8),

    /// A request id was supplied for a kind that is never wrapped.
    #[error("message {0} does not carry a request id in this protocol version")]
    UnexpectedRequestId(&'static str),
}

/// Failures raised while decoding peer input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The declared length exceeds the remaining input.
    #[error("input truncated: need {expected} bytes, {available} available")]
    Truncated { expected: usize, available: usize },

    /// The input is decodable but not in its unique canonical form.
    #[error("non-canonical encoding: {0}")]
    NonCanonical(&'static str),

    /// Bytes remain after a complete top-level item.
    #[error("{0} trailing bytes after top-level item")]
    TrailingData(usize),

    /// Structurally invalid input.
    #[error("malformed input: {0}")]
    Malformed(&'static str),

    /// The message code is not valid for the negotiated protocol version.
    #[error("message code {code:#04x} is not supported by eth/{version}")]
    UnsupportedMessageKind { version: u32, code: u64 },

    /// A positional item had too few or too many fields.
    #[error("wrong number of fields for {0}")]
    FieldCountMismatch(&'static str),

    /// A list appeared where a byte string was expected.
    #[error("expected byte string, found list")]
    UnexpectedList,

    /// A byte string appeared where a list was expected.
    #[error("expected list, found byte string")]
    UnexpectedString,

    /// A fixed-width field had the wrong length.
    #[error("expected {expected} bytes, found {got}")]
    UnexpectedLength { expected: usize, got: usize },

    /// An integer is wider than its target type.
    #[error("integer of {got} bytes overflows a {max}-byte target")]
    Overflow { max: usize, got: usize },
}

/// ProtocolError is the primary error type for session-level operations.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Unsupported protocol version: {0}")]
    UnsupportedVersion(u32),

    #[error("Message too large: {size} bytes (max {max})")]
    OversizedMessage { size: usize, max: usize },

    #[error("Unexpected message type")]
    UnexpectedMessage,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Custom error: {0}")]
    Custom(String),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
