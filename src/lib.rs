pub mod aggregate;
pub mod args;
pub mod bucket;
pub mod config;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod settle;
pub mod utils;

pub use args::Args;
pub use bucket::BucketLabel;
pub use config::{FailurePolicy, MalformedPolicy, PipelineConfig};
pub use error::{Failure, FetchError, PipelineError, SettleError};
pub use fetch::{Fetch, HttpFetcher};
pub use pipeline::{process_logs, run_pipeline, LogRequest};
pub use report::{Report, ReportEntry, ReportResponse};
