use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_kinesis::{
    types::{Record, Shard, ShardIteratorType},
    Client,
};
use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// Minimal Kinesis surface the tail pipeline needs. Implemented by the
/// real SDK client and by the mock client used in tests.
#[async_trait]
pub trait KinesisClientTrait: Send + Sync {
    /// List the shards of a stream, in the order the service returns them.
    async fn list_shards(&self, stream_name: &str) -> Result<Vec<Shard>>;

    /// Request an iterator positioned according to `iterator_type`.
    /// `timestamp` is only consulted for `AtTimestamp` iterators.
    async fn get_shard_iterator(
        &self,
        stream_name: &str,
        shard_id: &str,
        iterator_type: ShardIteratorType,
        timestamp: Option<&DateTime<Utc>>,
    ) -> Result<String>;

    /// Fetch the next batch of records. Returns the records in service
    /// order plus the follow-up iterator, or `None` when the shard is
    /// closed and fully consumed.
    async fn get_records(&self, iterator: &str, limit: i32)
        -> Result<(Vec<Record>, Option<String>)>;
}

#[async_trait]
impl KinesisClientTrait for Client {
    async fn list_shards(&self, stream_name: &str) -> Result<Vec<Shard>> {
        let response = self.list_shards().stream_name(stream_name).send().await?;
        Ok(response.shards.unwrap_or_default())
    }

    async fn get_shard_iterator(
        &self,
        stream_name: &str,
        shard_id: &str,
        iterator_type: ShardIteratorType,
        timestamp: Option<&DateTime<Utc>>,
    ) -> Result<String> {
        let mut req = self
            .get_shard_iterator()
            .stream_name(stream_name)
            .shard_id(shard_id)
            .shard_iterator_type(iterator_type);

        if let Some(ts) = timestamp {
            let ts: chrono::DateTime<Utc> = *ts;
            let system_time: SystemTime = ts.into();
            let smithy_dt = aws_smithy_types::DateTime::from(system_time);
            req = req.timestamp(smithy_dt);
        }

        let response = req.send().await?;
        Ok(response.shard_iterator.unwrap_or_default())
    }

    async fn get_records(
        &self,
        iterator: &str,
        limit: i32,
    ) -> Result<(Vec<Record>, Option<String>)> {
        let response = self
            .get_records()
            .shard_iterator(iterator)
            .limit(limit)
            .send()
            .await?;

        Ok((
            response.records().to_vec(),
            response.next_shard_iterator().map(String::from),
        ))
    }
}
