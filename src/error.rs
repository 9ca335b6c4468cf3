use serde::Serialize;
use thiserror::Error;

/// Failure to retrieve a single log file.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid log file url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("timed out fetching {url}")]
    Timeout { url: String },

    #[error("failed to fetch {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("fetching {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("log file {url} is not valid UTF-8")]
    Decode { url: String },
}

impl FetchError {
    pub fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if let Some(status) = source.status() {
            Self::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else {
            Self::Transport {
                url: url.to_string(),
                source,
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    // Validation
    #[error("Parallel Processing Count out of expected bounds")]
    InvalidWorkerCount { requested: i64 },

    #[error("No log files provided in request")]
    EmptyTargetList,

    // Infrastructure
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to start fetch workers: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    // Data quality
    #[error("malformed log line {line} in {target}: {reason}")]
    MalformedLine {
        target: String,
        line: usize,
        reason: String,
    },
}

impl PipelineError {
    /// Validation errors are raised before any network access and map to a
    /// client error at the transport layer.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidWorkerCount { .. } | Self::EmptyTargetList
        )
    }

    pub fn failure(&self) -> Failure {
        Failure {
            status: "failure",
            reason: self.to_string(),
        }
    }
}

/// Caller-facing failure payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub status: &'static str,
    pub reason: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettleError {
    #[error("balances do not net to zero (off by {residual})")]
    Unbalanced { residual: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_reasons_match_wire_strings() {
        let err = PipelineError::InvalidWorkerCount { requested: 31 };
        assert!(err.is_validation());
        assert_eq!(
            err.failure().reason,
            "Parallel Processing Count out of expected bounds"
        );

        let err = PipelineError::EmptyTargetList;
        assert!(err.is_validation());
        assert_eq!(err.failure().reason, "No log files provided in request");
        assert_eq!(err.failure().status, "failure");
    }

    #[test]
    fn malformed_line_is_not_validation() {
        let err = PipelineError::MalformedLine {
            target: "http://logs/a.txt".into(),
            line: 3,
            reason: "expected 3 fields".into(),
        };
        assert!(!err.is_validation());
        assert_eq!(
            err.to_string(),
            "malformed log line 3 in http://logs/a.txt: expected 3 fields"
        );
    }
}
