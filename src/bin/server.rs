#![deny(warnings)]

use std::path::PathBuf;

use clap::Parser;
use fundamentals::web::{self, Site};
use fundamentals::{shutdown, telemetry, AppConfig};
use tokio::net::TcpListener;

#[derive(Parser, Debug)]
#[command(about = "Serve /, /home and /about")]
struct Args {
    /// Optional TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    telemetry::init(args.verbose);

    let config = AppConfig::load(args.config.as_deref())?;
    let addr = config.server.addr;

    // Bind to the port and listen for incoming TCP connections
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);

    let shutdown = async {
        match shutdown::signal().await {
            Ok(signal) => tracing::info!(%signal, "shutdown requested"),
            Err(err) => {
                tracing::error!(error = %err, "cannot listen for signals");
                std::future::pending::<()>().await
            }
        }
    };

    web::serve(listener, Site::from_config(&config.server), shutdown).await?;
    Ok(())
}
