//! Process shutdown signal shared by the long-running samples.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Interrupt,
    Terminate,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Interrupt => write!(f, "interrupt"),
            Signal::Terminate => write!(f, "terminated"),
        }
    }
}

/// Resolves on SIGINT or SIGTERM (Ctrl-C only on non-unix targets).
#[cfg(unix)]
pub async fn signal() -> std::io::Result<Signal> {
    use tokio::signal::unix::{signal as unix_signal, SignalKind};

    let mut interrupt = unix_signal(SignalKind::interrupt())?;
    let mut terminate = unix_signal(SignalKind::terminate())?;

    tokio::select! {
        _ = interrupt.recv() => Ok(Signal::Interrupt),
        _ = terminate.recv() => Ok(Signal::Terminate),
    }
}

#[cfg(not(unix))]
pub async fn signal() -> std::io::Result<Signal> {
    tokio::signal::ctrl_c().await?;
    Ok(Signal::Interrupt)
}
