//! Session observability.
//!
//! Traffic and codec-failure counters kept per [`Session`](crate::protocol::session::Session).
//! Counters are atomics so a shared reference can be read from another task
//! while the session runs. There is no process-wide collector.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Why a message never made it through the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Encode,
    Decode,
    /// Code not carried by the negotiated version
    UnsupportedKind,
    /// Payload above the configured size limit
    Oversized,
}

impl Failure {
    const COUNT: usize = 4;

    fn slot(self) -> usize {
        match self {
            Failure::Encode => 0,
            Failure::Decode => 1,
            Failure::UnsupportedKind => 2,
            Failure::Oversized => 3,
        }
    }
}

/// Message and byte totals for one direction.
#[derive(Debug, Default)]
struct Traffic {
    messages: AtomicU64,
    bytes: AtomicU64,
}

impl Traffic {
    fn record(&self, bytes: usize) {
        self.messages.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    fn read(&self) -> (u64, u64) {
        (
            self.messages.load(Ordering::Relaxed),
            self.bytes.load(Ordering::Relaxed),
        )
    }
}

#[derive(Debug)]
pub struct Metrics {
    sent: Traffic,
    received: Traffic,
    failures: [AtomicU64; Failure::COUNT],
    opened_at: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            sent: Traffic::default(),
            received: Traffic::default(),
            failures: Default::default(),
            opened_at: Instant::now(),
        }
    }

    /// Count one outgoing payload of `bytes` length
    pub fn record_sent(&self, bytes: usize) {
        self.sent.record(bytes);
    }

    /// Count one incoming payload, whether or not it later decodes
    pub fn record_received(&self, bytes: usize) {
        self.received.record(bytes);
    }

    pub fn record_failure(&self, failure: Failure) {
        self.failures[failure.slot()].fetch_add(1, Ordering::Relaxed);
    }

    pub fn failures(&self, failure: Failure) -> u64 {
        self.failures[failure.slot()].load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let (messages_sent, bytes_sent) = self.sent.read();
        let (messages_received, bytes_received) = self.received.read();
        MetricsSnapshot {
            messages_sent,
            messages_received,
            bytes_sent,
            bytes_received,
            encode_failures: self.failures(Failure::Encode),
            decode_failures: self.failures(Failure::Decode),
            unsupported_kinds: self.failures(Failure::UnsupportedKind),
            oversized_messages: self.failures(Failure::Oversized),
            uptime_seconds: self.opened_at.elapsed().as_secs(),
        }
    }

    /// Emit the current totals as one structured `info` event
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            sent = snapshot.messages_sent,
            received = snapshot.messages_received,
            bytes_out = snapshot.bytes_sent,
            bytes_in = snapshot.bytes_received,
            failures = snapshot.total_failures(),
            uptime_s = snapshot.uptime_seconds,
            "{snapshot}"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of a session's counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub messages_sent: u64,
    pub messages_received: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub encode_failures: u64,
    pub decode_failures: u64,
    pub unsupported_kinds: u64,
    pub oversized_messages: u64,
    pub uptime_seconds: u64,
}

impl MetricsSnapshot {
    pub fn total_failures(&self) -> u64 {
        self.encode_failures + self.decode_failures + self.unsupported_kinds + self.oversized_messages
    }
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} out / {} in, failures: encode={} decode={} unsupported={} oversized={}",
            self.messages_sent,
            self.messages_received,
            self.encode_failures,
            self.decode_failures,
            self.unsupported_kinds,
            self.oversized_messages
        )
    }
}

/// Drop guard that logs how long its scope took at `debug` level.
pub struct Timer {
    label: &'static str,
    started: Instant,
}

impl Timer {
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            started: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        debug!(label = self.label, elapsed = ?self.started.elapsed(), "timed");
    }
}
