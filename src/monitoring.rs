//! Per-shard status reporting
//!
//! Shard readers fail independently and never stop the rest of the
//! tail, so their lifecycle is reported on an optional channel instead
//! of being propagated as errors.

use chrono::{DateTime, Utc};

/// Configuration for the shard status channel
#[derive(Debug, Clone)]
pub struct MonitoringConfig {
    /// Whether status events are emitted
    pub enabled: bool,
    /// Size of the status channel buffer
    pub channel_size: usize,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            channel_size: 100,
        }
    }
}

/// Lifecycle transitions of a single shard reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShardEventType {
    /// Reader started polling
    Started,
    /// Shard closed and was fully consumed
    Completed,
    /// Reader stopped because shutdown was requested
    Interrupted,
    /// Reader stopped after a fatal error
    Error,
}

/// One status event from a shard reader
#[derive(Debug, Clone)]
pub struct ShardEvent {
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// ID of the shard this event relates to
    pub shard_id: String,
    /// The lifecycle transition
    pub event_type: ShardEventType,
    /// Error detail, set for `Error` events
    pub error: Option<String>,
}

impl ShardEvent {
    pub fn new(shard_id: String, event_type: ShardEventType, error: Option<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            shard_id,
            event_type,
            error,
        }
    }
}
