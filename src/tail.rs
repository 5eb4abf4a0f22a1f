//! Top-level tail orchestration
//!
//! The tailer resolves the shard set once, spawns one reader task per
//! shard, and drains their merged output into a [`RecordSink`]. Events
//! are delivered in arrival order: each shard's records keep the
//! service's order, cross-shard interleaving is arbitrary.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tracing::info;

use crate::client::KinesisClientTrait;
use crate::error::{Result, TailError};
use crate::monitoring::{MonitoringConfig, ShardEvent};
use crate::options::TailOptions;
use crate::record::RecordEvent;
use crate::shard::{ShardReader, DEFAULT_BATCH_SIZE, DEFAULT_POLL_INTERVAL};

/// Consumer of decoded records, one event at a time.
///
/// The CLI uses a sink that prints one JSON line per event; tests use
/// a collecting sink.
#[async_trait]
pub trait RecordSink: Send {
    async fn emit(&mut self, event: RecordEvent) -> anyhow::Result<()>;
}

/// Configuration for a tail invocation
#[derive(Debug, Clone)]
pub struct TailConfig {
    /// Name of the stream to tail
    pub stream_name: String,
    /// Tail only this shard instead of enumerating the stream
    pub shard_id: Option<String>,
    /// Resolved start position
    pub options: TailOptions,
    /// Maximum number of records per GetRecords call
    pub batch_size: i32,
    /// Pause between GetRecords calls on each shard
    pub poll_interval: Duration,
    /// Capacity of the shared output channel
    pub channel_size: usize,
    /// Shard status reporting
    pub monitoring: MonitoringConfig,
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            stream_name: String::new(),
            shard_id: None,
            options: TailOptions::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            poll_interval: DEFAULT_POLL_INTERVAL,
            channel_size: 1000,
            monitoring: MonitoringConfig::default(),
        }
    }
}

/// Tails every shard of a stream (or one pinned shard) concurrently.
pub struct StreamTailer<C>
where
    C: KinesisClientTrait + 'static,
{
    client: Arc<C>,
    config: TailConfig,
    status_tx: Option<mpsc::Sender<ShardEvent>>,
}

impl<C> StreamTailer<C>
where
    C: KinesisClientTrait + 'static,
{
    /// Create a tailer. When monitoring is enabled, the returned
    /// receiver carries one [`ShardEvent`] per reader lifecycle
    /// transition, including the per-shard failures the tailer itself
    /// swallows.
    pub fn new(config: TailConfig, client: C) -> (Self, Option<mpsc::Receiver<ShardEvent>>) {
        let (status_tx, status_rx) = if config.monitoring.enabled {
            let (tx, rx) = mpsc::channel(config.monitoring.channel_size);
            (Some(tx), Some(rx))
        } else {
            (None, None)
        };

        (
            Self {
                client: Arc::new(client),
                config,
                status_tx,
            },
            status_rx,
        )
    }

    /// Run the tail to completion: until every shard closes, or until
    /// shutdown is signalled and all readers have stopped.
    ///
    /// Shard enumeration failure is fatal and returns before any
    /// reader is spawned. Per-shard failures only stop that shard.
    pub async fn run<S: RecordSink>(
        &self,
        sink: &mut S,
        shutdown: watch::Receiver<bool>,
    ) -> Result<()> {
        let shard_ids = self.resolve_shards().await?;

        info!(
            stream = %self.config.stream_name,
            shards = shard_ids.len(),
            "Starting tail"
        );

        let (events_tx, mut events_rx) = mpsc::channel(self.config.channel_size);

        for shard_id in shard_ids {
            let reader = ShardReader::new(
                self.client.clone(),
                self.config.stream_name.clone(),
                shard_id,
                self.config.options.clone(),
                self.config.batch_size,
                self.config.poll_interval,
                events_tx.clone(),
                self.status_tx.clone(),
            );
            tokio::spawn(reader.run(shutdown.clone()));
        }

        // Readers hold the only remaining senders; the receive loop
        // ends when the last one stops.
        drop(events_tx);

        while let Some(event) = events_rx.recv().await {
            sink.emit(event).await?;
        }

        info!(stream = %self.config.stream_name, "All shard readers finished");
        Ok(())
    }

    /// The single user-pinned shard, or the full service-ordered
    /// listing. A listing failure aborts the invocation: tailing an
    /// unknown subset of shards is not acceptable.
    async fn resolve_shards(&self) -> Result<Vec<String>> {
        if let Some(shard_id) = &self.config.shard_id {
            return Ok(vec![shard_id.clone()]);
        }

        match self.client.list_shards(&self.config.stream_name).await {
            Ok(shards) => Ok(shards
                .iter()
                .map(|shard| shard.shard_id().to_string())
                .collect()),
            Err(e) => Err(TailError::ListShardsFailed(e.to_string())),
        }
    }
}
