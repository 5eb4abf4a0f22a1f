//! Per-shard polling loop
//!
//! Each reader owns its shard iterator exclusively and shares nothing
//! with its siblings except the output channel. A reader that fails is
//! logged and reported on the status channel, then terminates for the
//! remainder of the process; other shards are unaffected.

use std::sync::Arc;
use std::time::Duration;

use aws_sdk_kinesis::types::ShardIteratorType;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::client::KinesisClientTrait;
use crate::error::TailError;
use crate::monitoring::{ShardEvent, ShardEventType};
use crate::options::TailOptions;
use crate::record::RecordEvent;

/// Pause between GetRecords calls, throttling poll frequency to stay
/// inside the service's per-shard rate limits.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default GetRecords batch limit.
pub const DEFAULT_BATCH_SIZE: i32 = 1000;

pub struct ShardReader<C> {
    client: Arc<C>,
    stream_name: String,
    shard_id: String,
    options: TailOptions,
    batch_size: i32,
    poll_interval: Duration,
    events_tx: mpsc::Sender<RecordEvent>,
    status_tx: Option<mpsc::Sender<ShardEvent>>,
}

impl<C> ShardReader<C>
where
    C: KinesisClientTrait + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        client: Arc<C>,
        stream_name: String,
        shard_id: String,
        options: TailOptions,
        batch_size: i32,
        poll_interval: Duration,
        events_tx: mpsc::Sender<RecordEvent>,
        status_tx: Option<mpsc::Sender<ShardEvent>>,
    ) -> Self {
        Self {
            client,
            stream_name,
            shard_id,
            options,
            batch_size,
            poll_interval,
            events_tx,
            status_tx,
        }
    }

    /// Drive the read-iterate-sleep loop until the shard closes, a
    /// fatal error occurs, or shutdown is requested.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(shard_id = %self.shard_id, "Starting shard reader");
        self.send_status(ShardEventType::Started, None).await;

        let mut iterator = match self.initial_iterator().await {
            Ok(it) => it,
            Err(e) => {
                error!(
                    shard_id = %self.shard_id,
                    error = %e,
                    "Failed to get initial iterator"
                );
                self.send_status(ShardEventType::Error, Some(e.to_string()))
                    .await;
                return;
            }
        };

        loop {
            let fetch = tokio::select! {
                result = self.client.get_records(&iterator, self.batch_size) => result,
                _ = shutdown.changed() => {
                    info!(shard_id = %self.shard_id, "Shutdown received, stopping shard reader");
                    self.send_status(ShardEventType::Interrupted, None).await;
                    return;
                }
            };

            let (records, next_iterator) = match fetch {
                Ok(batch) => batch,
                Err(e) => {
                    let e = TailError::GetRecordsFailed(e.to_string());
                    error!(shard_id = %self.shard_id, error = %e, "Failed to get records");
                    self.send_status(ShardEventType::Error, Some(e.to_string()))
                        .await;
                    return;
                }
            };

            debug!(
                shard_id = %self.shard_id,
                count = records.len(),
                "Fetched record batch"
            );

            for record in &records {
                let event = RecordEvent::from_record(&self.shard_id, record);
                if self.events_tx.send(event).await.is_err() {
                    debug!(
                        shard_id = %self.shard_id,
                        "Output channel closed, stopping shard reader"
                    );
                    self.send_status(ShardEventType::Interrupted, None).await;
                    return;
                }
            }

            match next_iterator {
                Some(next) => iterator = next,
                None => {
                    info!(shard_id = %self.shard_id, "Shard closed, reader finished");
                    self.send_status(ShardEventType::Completed, None).await;
                    return;
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = shutdown.changed() => {
                    info!(shard_id = %self.shard_id, "Shutdown received while idle");
                    self.send_status(ShardEventType::Interrupted, None).await;
                    return;
                }
            }
        }
    }

    /// Obtain the starting iterator: at-timestamp when a start instant
    /// was resolved, trim-horizon otherwise.
    async fn initial_iterator(&self) -> crate::error::Result<String> {
        let (iterator_type, timestamp) = match self.options.at_timestamp.as_ref() {
            Some(ts) => (ShardIteratorType::AtTimestamp, Some(ts)),
            None => (ShardIteratorType::TrimHorizon, None),
        };

        self.client
            .get_shard_iterator(&self.stream_name, &self.shard_id, iterator_type, timestamp)
            .await
            .map_err(|e| TailError::GetIteratorFailed(e.to_string()))
    }

    async fn send_status(&self, event_type: ShardEventType, error: Option<String>) {
        if let Some(tx) = &self.status_tx {
            let event = ShardEvent::new(self.shard_id.clone(), event_type, error);
            if tx.send(event).await.is_err() {
                warn!(shard_id = %self.shard_id, "Failed to send shard status event");
            }
        }
    }
}
