use rayon::prelude::*;
use reqwest::blocking::Client;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::FailurePolicy;
use crate::error::{FetchError, PipelineError};

/// Source of raw log file bodies.
pub trait Fetch: Sync {
    fn fetch(&self, target: &str) -> Result<String, FetchError>;
}

/// Fetches log files over HTTP(S) with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, target: &str) -> Result<String, FetchError> {
        let url = Url::parse(target).map_err(|source| FetchError::InvalidUrl {
            url: target.to_string(),
            source,
        })?;

        let bytes = self
            .client
            .get(url)
            .send()
            .and_then(|res| res.error_for_status())
            .and_then(|res| res.bytes())
            .map_err(|e| FetchError::from_reqwest(target, e))?;

        String::from_utf8(bytes.to_vec()).map_err(|_| FetchError::Decode {
            url: target.to_string(),
        })
    }
}

/// Body of one successfully fetched log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedLog {
    pub target: String,
    pub body: String,
}

/// A target skipped under [`FailurePolicy::BestEffort`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchFailure {
    pub target: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct FetchOutput {
    pub logs: Vec<FetchedLog>,
    pub failures: Vec<FetchFailure>,
}

/// Fetch every target on a dedicated pool of `min(workers, targets.len())`
/// threads. Returns only after every fetch has finished.
pub fn fetch_all<F: Fetch>(
    fetcher: &F,
    targets: &[String],
    workers: usize,
    policy: FailurePolicy,
) -> Result<FetchOutput, PipelineError> {
    let start_time = Instant::now();
    let pool_size = workers.min(targets.len()).max(1);
    info!(
        action = "start",
        component = "fetcher",
        target_count = targets.len(),
        workers = pool_size,
        "Starting log file fetch"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(pool_size)
        .thread_name(|i| format!("logtally-fetch-{i}"))
        .build()?;

    let results: Vec<(&String, Result<String, FetchError>)> = pool.install(|| {
        targets
            .par_iter()
            .map(|target| {
                let fetch_start = Instant::now();
                let result = fetcher.fetch(target);
                debug!(
                    action = "fetched",
                    component = "fetcher",
                    url = %target,
                    ok = result.is_ok(),
                    duration_ms = fetch_start.elapsed().as_millis(),
                    "Fetch finished"
                );
                (target, result)
            })
            .collect()
    });

    let mut out = FetchOutput::default();
    for (target, result) in results {
        match result {
            Ok(body) => out.logs.push(FetchedLog {
                target: target.clone(),
                body,
            }),
            Err(e) => match policy {
                FailurePolicy::Strict => return Err(e.into()),
                FailurePolicy::BestEffort => {
                    warn!(action = "skip", component = "fetcher", url = %target, error = %e, "Skipping log file that failed to fetch");
                    out.failures.push(FetchFailure {
                        target: target.clone(),
                        reason: e.to_string(),
                    });
                }
            },
        }
    }

    info!(
        action = "complete",
        component = "fetcher",
        fetched = out.logs.len(),
        failed = out.failures.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Log file fetch completed"
    );
    Ok(out)
}
