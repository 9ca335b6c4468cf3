use serde::Serialize;
use std::collections::BTreeMap;

use crate::aggregate::AggregateTable;
use crate::bucket::BucketLabel;
use crate::fetch::FetchFailure;
use crate::record::RejectedLine;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExceptionCount {
    pub exception: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub timestamp: BucketLabel,
    pub logs: Vec<ExceptionCount>,
}

/// Buckets in time-of-day order, exceptions sorted within each bucket.
pub type Report = Vec<ReportEntry>;

/// Success payload returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub response: Report,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fetch_failures: Vec<FetchFailure>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected_lines: Vec<RejectedLine>,
}

/// Impose the total order on an aggregate table. Labels are fixed-width, so
/// string order is chronological order.
pub fn build_report(table: AggregateTable) -> Report {
    let sorted: BTreeMap<BucketLabel, BTreeMap<String, u32>> = table
        .buckets
        .into_iter()
        .map(|(bucket, counts)| (bucket, counts.into_iter().collect()))
        .collect();

    sorted
        .into_iter()
        .map(|(timestamp, counts)| ReportEntry {
            timestamp,
            logs: counts
                .into_iter()
                .map(|(exception, count)| ExceptionCount { exception, count })
                .collect(),
        })
        .collect()
}
