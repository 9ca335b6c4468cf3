use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "logtally",
    about = "Aggregate exception counts from remote log files into quarter-hour buckets",
    version,
    long_about = None
)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch log files and print the per-bucket exception report as JSON
    Logs(LogsArgs),
    /// Net expense shares into a minimal list of transfers
    Settle(SettleArgs),
}

#[derive(ClapArgs, Debug)]
pub struct LogsArgs {
    /// Log file URLs
    pub urls: Vec<String>,

    /// JSON request file with `parallelFileProcessingCount` and `logFiles`
    #[arg(short, long, conflicts_with = "urls")]
    pub request: Option<PathBuf>,

    /// Number of parallel fetch workers (1-30)
    #[arg(short, long, allow_negative_numbers = true)]
    pub workers: Option<i64>,

    /// Per-file fetch timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Skip log files that fail to fetch instead of failing the request
    #[arg(long)]
    pub best_effort: bool,

    /// Skip malformed log lines instead of failing the request
    #[arg(long)]
    pub skip_malformed: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(ClapArgs, Debug)]
pub struct SettleArgs {
    /// JSON file holding a list of `{user, lent, owed}` shares
    pub shares: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_logs_command() {
        let args = Args::parse_from([
            "logtally",
            "-v",
            "logs",
            "-w",
            "4",
            "--best-effort",
            "http://logs/a.txt",
            "http://logs/b.txt",
        ]);
        assert!(args.verbose);
        match args.command {
            Command::Logs(logs) => {
                assert_eq!(logs.workers, Some(4));
                assert_eq!(logs.urls.len(), 2);
                assert!(logs.best_effort);
                assert!(!logs.skip_malformed);
                assert_eq!(logs.timeout_secs, 10);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn request_file_conflicts_with_urls() {
        let res = Args::try_parse_from([
            "logtally",
            "logs",
            "--request",
            "req.json",
            "http://logs/a.txt",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn parses_settle_command() {
        let args = Args::parse_from(["logtally", "settle", "shares.json"]);
        assert!(matches!(args.command, Command::Settle(s) if s.shares == PathBuf::from("shares.json")));
    }
}
