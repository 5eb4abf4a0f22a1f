//! kin - command line tools for AWS Kinesis Data Streams
//!
//! # Usage
//!
//! ```bash
//! # Tail every shard from the oldest retained record
//! kin tail --stream-name my-stream
//!
//! # Tail a single shard starting one hour ago
//! kin tail --stream-name my-stream --shard shardId-000000000000 --from 1h
//!
//! # Start from an exact instant
//! kin tail --stream-name my-stream --timestamp 2021-09-10T11:12:13Z
//! ```

use anyhow::Result;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use clap::{Args, Parser, Subcommand};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use kin::{RecordEvent, RecordSink, StreamTailer, TailConfig, TailOptions};

#[derive(Parser, Debug)]
#[command(name = "kin")]
#[command(version, about = "Command line tools for AWS Kinesis Data Streams")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tail records from a Kinesis Data Stream
    ///
    /// Continuously reads records from the target stream. Each record's
    /// payload is deserialized as JSON if possible; otherwise it is
    /// printed as a base64-encoded string.
    Tail(TailArgs),
}

#[derive(Args, Debug)]
struct TailArgs {
    /// Stream name
    #[arg(short = 'n', long = "stream-name")]
    stream_name: String,

    /// Shard id; if not specified, all shards will be tailed
    #[arg(short, long)]
    shard: Option<String>,

    /// Timestamp at which to begin consuming records (ex: 2021-09-10T11:12:13Z)
    #[arg(short, long, conflicts_with = "from")]
    timestamp: Option<String>,

    /// Start tailing records from this long ago (ex: 1h)
    #[arg(long)]
    from: Option<String>,
}

/// Prints one JSON object per record event. Logging goes to stderr so
/// stdout carries nothing but records.
struct JsonLineSink;

#[async_trait]
impl RecordSink for JsonLineSink {
    async fn emit(&mut self, event: RecordEvent) -> Result<()> {
        println!("{}", serde_json::to_string(&event)?);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Tail(args) => run_tail(args).await,
    }
}

async fn run_tail(args: TailArgs) -> Result<()> {
    let options = TailOptions::resolve(args.timestamp.as_deref(), args.from.as_deref())?;

    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let client = aws_sdk_kinesis::Client::new(&aws_config);

    let config = TailConfig {
        stream_name: args.stream_name,
        shard_id: args.shard,
        options,
        ..Default::default()
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    let (tailer, _status_rx) = StreamTailer::new(config, client);
    let mut sink = JsonLineSink;
    tailer.run(&mut sink, shutdown_rx).await?;

    Ok(())
}
