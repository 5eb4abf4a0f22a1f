//! kin - command line tools for AWS Kinesis Data Streams
//!
//! The library behind the `kin` binary. Its core is the tail pipeline:
//! shard discovery, per-shard iterator management, continuous polling,
//! payload decoding, and fan-in of all shards onto one output sink.

pub mod client;
pub mod error;
pub mod monitoring;
pub mod options;
pub mod record;
pub mod shard;
pub mod tail;

// Make test utilities available for integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test;

pub use client::KinesisClientTrait;
pub use error::{Result, TailError};
pub use monitoring::{MonitoringConfig, ShardEvent, ShardEventType};
pub use options::TailOptions;
pub use record::{Payload, RecordEvent};
pub use tail::{RecordSink, StreamTailer, TailConfig};
