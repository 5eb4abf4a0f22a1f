//! Test utilities and mock implementations for the tail pipeline


use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_kinesis::types::{Record, Shard};
use tokio::sync::Mutex;

use crate::record::RecordEvent;
use crate::tail::RecordSink;

/// Helper functions for creating test data
pub struct TestUtils;

impl TestUtils {
    /// Create a test record with given sequence number and data
    pub fn create_test_record(sequence_number: &str, data: &[u8]) -> Record {
        Record::builder()
            .sequence_number(sequence_number)
            .data(aws_smithy_types::Blob::new(data.to_vec()))
            .partition_key("test-partition-key")
            .approximate_arrival_timestamp(aws_smithy_types::DateTime::from_secs(1_631_271_133))
            .build()
            .expect("Failed to build test record")
    }

    /// Create a test shard with given ID
    pub fn create_test_shard(shard_id: &str) -> Shard {
        Shard::builder()
            .shard_id(shard_id)
            .build()
            .expect("Failed to build test shard")
    }

    /// Create `count` records with sequence numbers `{prefix}-0..count`
    pub fn create_test_records(prefix: &str, count: usize) -> Vec<Record> {
        (0..count)
            .map(|i| {
                Self::create_test_record(
                    &format!("{}-{}", prefix, i),
                    format!("{{\"n\":{}}}", i).as_bytes(),
                )
            })
            .collect()
    }
}

/// Sink that collects every emitted event, for asserting on output
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    events: Arc<Mutex<Vec<RecordEvent>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<RecordEvent> {
        self.events.lock().await.clone()
    }

    /// Events from one shard, in receipt order
    pub async fn events_for_shard(&self, shard_id: &str) -> Vec<RecordEvent> {
        self.events
            .lock()
            .await
            .iter()
            .filter(|e| e.shard_id == shard_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RecordSink for CollectingSink {
    async fn emit(&mut self, event: RecordEvent) -> anyhow::Result<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_record() {
        let record = TestUtils::create_test_record("seq-1", b"test-data");
        assert_eq!(record.sequence_number(), "seq-1");
        assert_eq!(record.data().as_ref(), b"test-data");
        assert_eq!(record.partition_key(), "test-partition-key");
    }

    #[test]
    fn test_create_test_records() {
        let records = TestUtils::create_test_records("shard-1", 3);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].sequence_number(), "shard-1-0");
        assert_eq!(records[2].sequence_number(), "shard-1-2");
    }
}
