use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. `RUST_LOG` wins over the built-in filter.
///
/// Diagnostics go to stderr; stdout is left to the samples' own output.
pub fn init(verbose: bool) {
    let fallback = if verbose {
        "fundamentals=debug,info"
    } else {
        "fundamentals=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // try_init so a second call (tests, embedding) is a no-op
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}
