use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

use crate::aggregate::aggregate;
use crate::bucket::bucket_records;
use crate::config::{PipelineConfig, MAX_WORKERS};
use crate::error::PipelineError;
use crate::fetch::{fetch_all, Fetch, HttpFetcher};
use crate::record::split_records;
use crate::report::{build_report, ReportResponse};

/// Body of a log processing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRequest {
    pub parallel_file_processing_count: i64,
    pub log_files: Vec<String>,
}

/// Check a request without touching the network. Returns the worker count.
pub fn validate(request: &LogRequest) -> Result<usize, PipelineError> {
    let requested = request.parallel_file_processing_count;
    let workers = usize::try_from(requested)
        .ok()
        .filter(|w| (1..=MAX_WORKERS).contains(w))
        .ok_or(PipelineError::InvalidWorkerCount { requested })?;

    if request.log_files.is_empty() {
        return Err(PipelineError::EmptyTargetList);
    }

    Ok(workers)
}

/// Validate, fetch, split, bucket, aggregate and report.
pub fn run_pipeline<F: Fetch>(
    request: &LogRequest,
    config: &PipelineConfig,
    fetcher: &F,
) -> Result<ReportResponse, PipelineError> {
    let start_time = Instant::now();
    let workers = validate(request)?;
    info!(
        action = "start",
        component = "pipeline",
        workers,
        log_files = request.log_files.len(),
        failure_policy = ?config.failure_policy,
        malformed_policy = ?config.malformed_policy,
        "Starting log processing"
    );

    let fetched = fetch_all(
        fetcher,
        &request.log_files,
        workers,
        config.failure_policy,
    )?;
    let split = split_records(&fetched.logs, config.malformed_policy)?;
    let record_count = split.records.len();
    let table = aggregate(bucket_records(split.records));
    let report = build_report(table);

    info!(
        action = "complete",
        component = "pipeline",
        records = record_count,
        buckets = report.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Log processing completed"
    );

    Ok(ReportResponse {
        response: report,
        fetch_failures: fetched.failures,
        rejected_lines: split.rejected,
    })
}

/// Run the pipeline against real HTTP endpoints.
pub fn process_logs(
    request: &LogRequest,
    config: &PipelineConfig,
) -> Result<ReportResponse, PipelineError> {
    // No client (and no connection pool) before the request is known to be valid.
    validate(request)?;
    let fetcher = HttpFetcher::new(config.fetch_timeout)?;
    run_pipeline(request, config, &fetcher)
}
