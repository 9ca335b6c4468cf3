use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};

use logtally::args::{Command, LogsArgs, SettleArgs};
use logtally::config::default_workers;
use logtally::settle::{net_balances, settle, Share};
use logtally::utils::{read_json, setup_logging};
use logtally::{process_logs, Args, FailurePolicy, LogRequest, MalformedPolicy, PipelineConfig};

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

fn build_request(args: &LogsArgs) -> Result<LogRequest> {
    let mut request = match &args.request {
        Some(path) => read_json::<LogRequest>(path)?,
        None => LogRequest {
            parallel_file_processing_count: default_workers() as i64,
            log_files: args.urls.clone(),
        },
    };

    if let Some(workers) = args.workers {
        request.parallel_file_processing_count = workers;
    }
    Ok(request)
}

fn run_logs(args: &LogsArgs) -> Result<ExitCode> {
    let request = build_request(args)?;
    let config = PipelineConfig {
        fetch_timeout: Duration::from_secs(args.timeout_secs),
        failure_policy: if args.best_effort {
            FailurePolicy::BestEffort
        } else {
            FailurePolicy::Strict
        },
        malformed_policy: if args.skip_malformed {
            MalformedPolicy::SkipLine
        } else {
            MalformedPolicy::RejectBatch
        },
    };

    match process_logs(&request, &config) {
        Ok(response) => {
            print_json(&response, args.pretty)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            print_json(&e.failure(), args.pretty)?;
            if e.is_validation() {
                Ok(ExitCode::from(2))
            } else {
                error!(action = "abort", component = "pipeline", error = %e, "Log processing failed");
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

fn run_settle(args: &SettleArgs) -> Result<ExitCode> {
    let shares: Vec<Share> = read_json(&args.shares)?;
    let balances = net_balances(&shares);
    info!(
        action = "start",
        component = "settlement",
        shares = shares.len(),
        participants = balances.len(),
        "Settling balances"
    );

    let transfers = settle(&balances)?;
    print_json(&transfers, true)?;
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(args.verbose);

    let result = match &args.command {
        Command::Logs(logs) => run_logs(logs),
        Command::Settle(settle_args) => run_settle(settle_args),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
