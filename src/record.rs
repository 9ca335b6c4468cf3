use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::MalformedPolicy;
use crate::error::PipelineError;
use crate::fetch::FetchedLog;

/// One log line: `<id> <epoch_ms> <free text...>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

/// A line dropped under [`MalformedPolicy::SkipLine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedLine {
    pub target: String,
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct SplitOutput {
    pub records: Vec<RawRecord>,
    pub rejected: Vec<RejectedLine>,
}

const SHAPE: &str = "expected '<id> <epoch_ms> <text>'";

/// Parse a single non-blank line. Only the first two whitespace runs split
/// fields; the text keeps inner whitespace and loses trailing whitespace.
pub fn parse_line(line: &str) -> Result<RawRecord, String> {
    let line = line.trim();
    let (id, rest) = line
        .split_once(char::is_whitespace)
        .ok_or_else(|| SHAPE.to_string())?;
    let (timestamp, text) = rest
        .trim_start()
        .split_once(char::is_whitespace)
        .ok_or_else(|| SHAPE.to_string())?;

    let millis = timestamp
        .parse::<i64>()
        .map_err(|e| format!("invalid timestamp '{timestamp}': {e}"))?;
    let timestamp = DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| format!("timestamp {millis} out of range"))?;

    Ok(RawRecord {
        id: id.to_string(),
        timestamp,
        text: text.trim_start().to_string(),
    })
}

/// Flatten fetched bodies into records, in target order then line order.
pub fn split_records(
    logs: &[FetchedLog],
    policy: MalformedPolicy,
) -> Result<SplitOutput, PipelineError> {
    let mut out = SplitOutput::default();

    for log in logs {
        for (index, line) in log.body.split('\n').enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            match parse_line(line) {
                Ok(record) => out.records.push(record),
                Err(reason) => {
                    let line = index + 1;
                    match policy {
                        MalformedPolicy::RejectBatch => {
                            return Err(PipelineError::MalformedLine {
                                target: log.target.clone(),
                                line,
                                reason,
                            });
                        }
                        MalformedPolicy::SkipLine => {
                            warn!(action = "skip", component = "line_splitter", url = %log.target, line, reason = %reason, "Skipping malformed log line");
                            out.rejected.push(RejectedLine {
                                target: log.target.clone(),
                                line,
                                reason,
                            });
                        }
                    }
                }
            }
        }
    }

    debug!(
        action = "complete",
        component = "line_splitter",
        record_count = out.records.len(),
        rejected_count = out.rejected.len(),
        "Split log bodies into records"
    );
    Ok(out)
}
