//! Start-position resolution for a tail invocation

use chrono::{DateTime, Duration, Utc};

use crate::error::{Result, TailError};

/// Where to begin reading, resolved once per invocation so every shard
/// starts from the same point in time.
#[derive(Debug, Clone, Default)]
pub struct TailOptions {
    /// Absolute starting instant. `None` means read from the trim
    /// horizon (oldest retained record).
    pub at_timestamp: Option<DateTime<Utc>>,
}

impl TailOptions {
    /// Resolve the start position from the raw CLI inputs.
    ///
    /// An explicit `timestamp` (RFC3339) wins over `from` (a relative
    /// duration such as `1h` or `30m`, resolved against the current
    /// time). With neither, records are read from the trim horizon.
    pub fn resolve(timestamp: Option<&str>, from: Option<&str>) -> Result<Self> {
        Self::resolve_at(timestamp, from, Utc::now())
    }

    fn resolve_at(
        timestamp: Option<&str>,
        from: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        if let Some(raw) = timestamp {
            let parsed = DateTime::parse_from_rfc3339(raw)
                .map_err(|e| TailError::InvalidTimestamp(format!("{}: {}", raw, e)))?;
            return Ok(Self {
                at_timestamp: Some(parsed.with_timezone(&Utc)),
            });
        }

        if let Some(raw) = from {
            let offset = humantime::parse_duration(raw)
                .map_err(|e| TailError::InvalidDuration(format!("{}: {}", raw, e)))?;
            let offset = Duration::from_std(offset)
                .map_err(|e| TailError::InvalidDuration(format!("{}: {}", raw, e)))?;
            let at_timestamp = now.checked_sub_signed(offset).ok_or_else(|| {
                TailError::InvalidDuration(format!("{}: out of range for a timestamp", raw))
            })?;
            return Ok(Self {
                at_timestamp: Some(at_timestamp),
            });
        }

        Ok(Self { at_timestamp: None })
    }
}
