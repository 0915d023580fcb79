//! Schedule snapshot documents

use std::io;

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entry::RawEntry;

/// A fetched broadcast schedule
///
/// The schedule fetcher writes one JSON document per fetch:
///
/// ```json
/// {
///   "source_file": "sked-a25.csv",
///   "fetched_at_utc": "2025-06-01T12:00:00+00:00",
///   "entries": [ { "frequency_khz": 9410, "time_on": "0600", ... } ]
/// }
/// ```
///
/// Every field is optional. A document without `entries` is an
/// empty schedule.
///
/// ```
/// use swlsked::ScheduleSnapshot;
///
/// let snap = ScheduleSnapshot::from_str(
///     r#"{"fetched_at_utc": "2025-06-01T12:05:09+00:00", "entries": [{"station": "BBC"}]}"#
/// ).unwrap();
/// assert_eq!(1, snap.entries.len());
/// assert_eq!(Some("2025-06-01 12:05 UTC".to_owned()), snap.fetched_at_display());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSnapshot {
    /// Name of the upstream file
    pub source_file: Option<String>,

    /// Fetch time, as RFC 3339 text
    pub fetched_at_utc: Option<String>,

    /// Raw schedule rows
    pub entries: Vec<RawEntry>,
}

/// Error loading a snapshot
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Unable to read the snapshot
    #[error("unable to read schedule: {0}")]
    Io(#[from] io::Error),

    /// Not a valid snapshot document
    #[error("malformed schedule snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScheduleSnapshot {
    /// Snapshot with the given rows and no metadata
    pub fn new(entries: Vec<RawEntry>) -> Self {
        Self {
            entries,
            ..Default::default()
        }
    }

    /// Load from JSON text
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load from a JSON stream
    pub fn from_reader<R: io::Read>(rdr: R) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_reader(io::BufReader::new(rdr))?)
    }

    /// Human-readable fetch time
    ///
    /// Formatted like "`2025-06-01 12:05 UTC`." If the fetch
    /// time cannot be parsed, it is returned as-is.
    pub fn fetched_at_display(&self) -> Option<String> {
        let raw = self.fetched_at_utc.as_deref()?;
        Some(match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(when) => when
                .with_timezone(&chrono::Utc)
                .format("%Y-%m-%d %H:%M UTC")
                .to_string(),
            Err(_) => raw.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        let snap = ScheduleSnapshot::from_str(
            r#"{
                "source_file": "sked-a25.csv",
                "fetched_at_utc": "2025-06-01T14:05:09+02:00",
                "count": 2,
                "entries": [
                    {"frequency_khz": 9410, "time_on": "0600", "station": "BBC"},
                    {"frequency_khz": "bogus"}
                ]
            }"#,
        )
        .expect("decode failed");

        assert_eq!(Some("sked-a25.csv"), snap.source_file.as_deref());
        assert_eq!(2, snap.entries.len());
        assert_eq!("BBC", snap.entries[0].station);
        assert_eq!(
            Some("2025-06-01 12:05 UTC".to_owned()),
            snap.fetched_at_display()
        );
    }

    #[test]
    fn test_empty_document() {
        let snap = ScheduleSnapshot::from_str("{}").expect("decode failed");
        assert_eq!(ScheduleSnapshot::default(), snap);
        assert_eq!(None, snap.fetched_at_display());

        let snap = ScheduleSnapshot::from_reader(&b"{\"entries\": null}"[..]);
        assert!(snap.is_err());
    }

    #[test]
    fn test_fetched_at_passthrough() {
        let snap = ScheduleSnapshot {
            fetched_at_utc: Some("yesterday".to_owned()),
            ..Default::default()
        };
        assert_eq!(Some("yesterday".to_owned()), snap.fetched_at_display());
    }

    #[test]
    fn test_malformed() {
        match ScheduleSnapshot::from_str("[1, 2") {
            Err(SnapshotError::Json(_)) => {}
            other => panic!("expected JSON error, got {:?}", other),
        }
    }
}
