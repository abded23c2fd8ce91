//! # Protocol Versions
//!
//! Which message kinds each negotiated version carries and which of them are
//! wrapped with a request id.
//!
//! | version | wrapping                       | changes            |
//! |---------|--------------------------------|--------------------|
//! | eth/65  | none                           | base catalog       |
//! | eth/66  | requests and responses         | request ids        |
//! | eth/67  | requests and responses         | node data removed  |
//! | eth/68  | requests and responses         | votes added        |
//!
//! Notifications are never wrapped.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::protocol::message::{MessageKind, MessageRole};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub enum ProtocolVersion {
    Eth65,
    Eth66,
    Eth67,
    Eth68,
}

impl ProtocolVersion {
    pub const ALL: [ProtocolVersion; 4] = [
        ProtocolVersion::Eth65,
        ProtocolVersion::Eth66,
        ProtocolVersion::Eth67,
        ProtocolVersion::Eth68,
    ];

    pub const LATEST: ProtocolVersion = ProtocolVersion::Eth68;

    pub const fn as_u32(self) -> u32 {
        match self {
            ProtocolVersion::Eth65 => 65,
            ProtocolVersion::Eth66 => 66,
            ProtocolVersion::Eth67 => 67,
            ProtocolVersion::Eth68 => 68,
        }
    }

    /// Whether requests and responses carry a request id
    pub const fn uses_request_ids(self) -> bool {
        !matches!(self, ProtocolVersion::Eth65)
    }

    /// Whether `kind` is part of this version's catalog
    pub const fn supports(self, kind: MessageKind) -> bool {
        match kind {
            MessageKind::GetNodeData | MessageKind::NodeData => {
                matches!(self, ProtocolVersion::Eth65 | ProtocolVersion::Eth66)
            }
            MessageKind::Votes => matches!(self, ProtocolVersion::Eth68),
            _ => true,
        }
    }

    /// Whether `kind` travels as `[request_id, payload]` in this version
    pub const fn wraps(self, kind: MessageKind) -> bool {
        self.uses_request_ids() && !matches!(kind.role(), MessageRole::Notification)
    }
}

impl TryFrom<u32> for ProtocolVersion {
    type Error = ProtocolError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            65 => Ok(ProtocolVersion::Eth65),
            66 => Ok(ProtocolVersion::Eth66),
            67 => Ok(ProtocolVersion::Eth67),
            68 => Ok(ProtocolVersion::Eth68),
            other => Err(ProtocolError::UnsupportedVersion(other)),
        }
    }
}

impl From<ProtocolVersion> for u32 {
    fn from(version: ProtocolVersion) -> Self {
        version.as_u32()
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "eth/{}", self.as_u32())
    }
}

/// Kind-to-wrapping map of one version.
pub type CapabilityRow = BTreeMap<MessageKind, bool>;

/// `{version -> {kind -> wrapped}}` for a set of enabled versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityTable {
    rows: BTreeMap<ProtocolVersion, CapabilityRow>,
}

impl CapabilityTable {
    /// Table covering every known version
    pub fn new() -> Self {
        Self::for_versions(&ProtocolVersion::ALL)
    }

    pub fn for_versions(versions: &[ProtocolVersion]) -> Self {
        let rows = versions
            .iter()
            .map(|version| (*version, Self::row_for(*version)))
            .collect();
        Self { rows }
    }

    fn row_for(version: ProtocolVersion) -> CapabilityRow {
        MessageKind::ALL
            .iter()
            .filter(|kind| version.supports(**kind))
            .map(|kind| (*kind, version.wraps(*kind)))
            .collect()
    }

    pub fn row(&self, version: ProtocolVersion) -> Option<&CapabilityRow> {
        self.rows.get(&version)
    }

    /// `Some(wrapped)` if the kind is valid for the version, `None` otherwise
    pub fn lookup(&self, version: ProtocolVersion, kind: MessageKind) -> Option<bool> {
        self.rows.get(&version)?.get(&kind).copied()
    }

    pub fn versions(&self) -> impl Iterator<Item = ProtocolVersion> + '_ {
        self.rows.keys().copied()
    }

    /// Highest version present in both this table and `remote`
    pub fn negotiate(&self, remote: &[ProtocolVersion]) -> Option<ProtocolVersion> {
        self.rows
            .keys()
            .rev()
            .find(|version| remote.contains(version))
            .copied()
    }
}

impl Default for CapabilityTable {
    fn default() -> Self {
        Self::new()
    }
}
