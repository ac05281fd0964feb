// Prints the lines of a log file that contain the given level.
//
//    cargo run --bin logfilter
//    cargo run --bin logfilter -- --level DEBUG --file ./log.txt
//    cargo run --bin logfilter -- -level DEBUG

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use fundamentals::logfilter::{normalize_level_flag, FilterStats, LogFilter};
use fundamentals::{telemetry, AppConfig};

#[derive(Parser, Debug)]
#[command(about = "Print log lines containing a level")]
struct Args {
    /// Log level to filter for
    #[arg(short, long)]
    level: Option<String>,

    /// Log file to scan
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Optional TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

fn run(args: Args) -> fundamentals::Result<FilterStats> {
    let config = AppConfig::load(args.config.as_deref())?;

    let level = args.level.unwrap_or(config.log_filter.level);
    let file = args.file.unwrap_or(config.log_filter.file);
    tracing::debug!(%level, file = %file.display(), "filtering");

    let stdout = io::stdout();
    let stats = LogFilter::new(level)
        .filter_file(&file, stdout.lock())
        .map_err(|err| io::Error::new(err.kind(), format!("{}: {}", file.display(), err)))?;
    Ok(stats)
}

fn main() -> ExitCode {
    let args = Args::parse_from(normalize_level_flag(std::env::args_os()));
    telemetry::init(args.verbose);

    match run(args) {
        Ok(stats) => {
            tracing::debug!(read = stats.lines_read, matched = stats.lines_matched, "done");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
