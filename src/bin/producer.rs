// Sends a batch of messages and prints a delivery report for each.
//
//    cargo run --bin producer -- --in-memory
//    cargo run --features kafka --bin producer

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use fundamentals::config::QueueConfig;
use fundamentals::queue::memory::MemoryQueue;
use fundamentals::queue::{producer, QueueError};
use fundamentals::{telemetry, AppConfig, Error};

#[derive(Parser, Debug)]
#[command(about = "Message-queue producer sample")]
struct Args {
    /// Optional TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the in-process queue instead of a broker
    #[arg(long)]
    in_memory: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[cfg(feature = "kafka")]
async fn run_against_broker(config: &QueueConfig) -> Result<producer::ProducerSummary, QueueError> {
    let (client, reports) = fundamentals::queue::kafka::producer(config)?;
    producer::run(client, reports, config).await
}

#[cfg(not(feature = "kafka"))]
async fn run_against_broker(_config: &QueueConfig) -> Result<producer::ProducerSummary, QueueError> {
    Err(QueueError::Client(
        "built without the `kafka` feature; rebuild with --features kafka or pass --in-memory"
            .to_string(),
    ))
}

async fn run(args: &Args) -> fundamentals::Result<producer::ProducerSummary> {
    let config = AppConfig::load(args.config.as_deref())?.queue;

    let summary = if args.in_memory {
        let (client, reports) = MemoryQueue::from_config(&config).producer();
        producer::run(client, reports, &config).await?
    } else {
        run_against_broker(&config).await?
    };
    Ok(summary)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    telemetry::init(args.verbose);

    match run(&args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(Error::Queue(err)) => {
            tracing::error!("Failed to create producer: {}", err);
            ExitCode::FAILURE
        }
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
