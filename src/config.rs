use std::time::Duration;

/// Upper bound on `parallelFileProcessingCount`.
pub const MAX_WORKERS: usize = 30;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// What to do when a single log file cannot be fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Any failed fetch fails the whole request.
    #[default]
    Strict,
    /// Failed fetches are skipped and reported next to the result.
    BestEffort,
}

/// What to do with a line that does not parse as `<id> <epoch_ms> <text>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    #[default]
    RejectBatch,
    SkipLine,
}

/// Per-invocation pipeline settings. Nothing here is process-wide, so two
/// pipelines with different settings can run side by side.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub fetch_timeout: Duration,
    pub failure_policy: FailurePolicy,
    pub malformed_policy: MalformedPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            failure_policy: FailurePolicy::default(),
            malformed_policy: MalformedPolicy::default(),
        }
    }
}

/// Worker count used when the caller does not pick one.
pub fn default_workers() -> usize {
    std::cmp::min(num_cpus::get(), MAX_WORKERS)
}
