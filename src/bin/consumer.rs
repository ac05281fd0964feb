// Consumes the sample topic until Ctrl+C or SIGTERM.
//
//    cargo run --features kafka --bin consumer
//    cargo run --bin consumer -- --in-memory

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use fundamentals::config::QueueConfig;
use fundamentals::queue::memory::MemoryQueue;
use fundamentals::queue::{consumer, producer, MessageConsumer, QueueError};
use fundamentals::shutdown::{self, Signal};
use fundamentals::{telemetry, AppConfig, Error};

#[derive(Parser, Debug)]
#[command(about = "Message-queue consumer sample")]
struct Args {
    /// Optional TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the in-process queue, seeded with one producer run
    #[arg(long)]
    in_memory: bool,

    #[arg(short, long)]
    verbose: bool,
}

async fn wait_for_signal() -> Signal {
    match shutdown::signal().await {
        Ok(signal) => signal,
        Err(err) => {
            tracing::error!(error = %err, "cannot listen for signals");
            std::future::pending().await
        }
    }
}

async fn in_memory_client(config: &QueueConfig) -> Result<Box<dyn MessageConsumer>, QueueError> {
    // The queue only lives in this process, so fill it before consuming.
    let queue = MemoryQueue::from_config(config);
    let (client, reports) = queue.producer();
    producer::run(client, reports, config).await?;
    Ok(Box::new(queue.consumer(
        config.group_id.as_str(),
        config.auto_offset_reset,
    )))
}

#[cfg(feature = "kafka")]
fn broker_client(config: &QueueConfig) -> Result<Box<dyn MessageConsumer>, QueueError> {
    Ok(Box::new(fundamentals::queue::kafka::consumer(config)?))
}

#[cfg(not(feature = "kafka"))]
fn broker_client(_config: &QueueConfig) -> Result<Box<dyn MessageConsumer>, QueueError> {
    Err(QueueError::Client(
        "built without the `kafka` feature; rebuild with --features kafka or pass --in-memory"
            .to_string(),
    ))
}

async fn run(args: &Args) -> fundamentals::Result<usize> {
    let config = AppConfig::load(args.config.as_deref())?.queue;

    let client = if args.in_memory {
        in_memory_client(&config).await
    } else {
        broker_client(&config)
    };
    let client = client.inspect_err(|err| tracing::error!("Failed to create consumer: {}", err))?;

    let received = consumer::run(client.as_ref(), &config, wait_for_signal())
        .await
        .inspect_err(|err| tracing::error!("Failed to subscribe to topic {}: {}", config.topic, err))?;
    Ok(received)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    telemetry::init(args.verbose);

    match run(&args).await {
        Ok(received) => {
            tracing::info!(received, "consumer stopped");
            ExitCode::SUCCESS
        }
        // Already reported with its context.
        Err(Error::Queue(_)) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
