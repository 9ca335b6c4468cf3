use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;
use std::fmt;

use crate::record::RawRecord;

/// A quarter-hour window of the day, `HH:MM-HH:MM`.
///
/// The calendar date is discarded: the same time of day on different days
/// lands in the same bucket. Zero padding makes the lexical order of labels
/// equal to their chronological order within a day.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct BucketLabel(String);

impl BucketLabel {
    /// Label for a wall-clock `hour` (0-23) and `minute` (0-59), both UTC.
    pub fn from_hour_minute(hour: u32, minute: u32) -> Self {
        let label = match minute {
            0..=14 => format!("{hour:02}:00-{hour:02}:15"),
            15..=29 => format!("{hour:02}:15-{hour:02}:30"),
            30..=44 => format!("{hour:02}:30-{hour:02}:45"),
            _ if hour == 23 => format!("{hour:02}:45-00:00"),
            _ => format!("{hour:02}:45-{:02}:00", hour + 1),
        };
        Self(label)
    }

    pub fn from_datetime(at: &DateTime<Utc>) -> Self {
        Self::from_hour_minute(at.hour(), at.minute())
    }

    /// Returns `None` when the timestamp is outside the representable range.
    pub fn from_epoch_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(|at| Self::from_datetime(&at))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pair every record's exception text with its quarter-hour bucket.
pub fn bucket_records(records: Vec<RawRecord>) -> Vec<(BucketLabel, String)> {
    records
        .into_iter()
        .map(|record| (BucketLabel::from_datetime(&record.timestamp), record.text))
        .collect()
}
