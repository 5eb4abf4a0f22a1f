//! Decoded record output
//!
//! One `RecordEvent` is emitted per fetched record and printed as a
//! single JSON line. Payload decoding never fails: anything that is
//! not valid JSON is carried through as the original bytes and
//! rendered as base64 at serialization time.

use aws_sdk_kinesis::types::Record;
use aws_smithy_types_convert::date_time::DateTimeExt;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// A record payload after decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Payload that parsed as structured JSON
    Json(serde_json::Value),
    /// Everything else, kept as the original bytes
    Raw(Vec<u8>),
}

impl Payload {
    /// Decode a raw payload as JSON, falling back to the unmodified
    /// bytes when parsing fails.
    pub fn decode(data: &[u8]) -> Self {
        match serde_json::from_slice(data) {
            Ok(value) => Payload::Json(value),
            Err(_) => Payload::Raw(data.to_vec()),
        }
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Payload::Json(value) => value.serialize(serializer),
            Payload::Raw(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
        }
    }
}

/// One decoded record, ready for line-oriented JSON output.
///
/// Field names serialize in PascalCase, matching the shapes the
/// Kinesis APIs use on the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordEvent {
    pub shard_id: String,
    pub partition_key: String,
    pub sequence_number: String,
    pub approximate_arrival_timestamp: Option<DateTime<Utc>>,
    pub encryption_type: Option<String>,
    pub data: Payload,
}

impl RecordEvent {
    /// Build an event from a fetched record and the shard it came from.
    pub fn from_record(shard_id: &str, record: &Record) -> Self {
        Self {
            shard_id: shard_id.to_string(),
            partition_key: record.partition_key().to_string(),
            sequence_number: record.sequence_number().to_string(),
            approximate_arrival_timestamp: record
                .approximate_arrival_timestamp()
                .and_then(|ts| ts.to_chrono_utc().ok()),
            encryption_type: record.encryption_type().map(|e| e.as_str().to_string()),
            data: Payload::decode(record.data().as_ref()),
        }
    }
}
