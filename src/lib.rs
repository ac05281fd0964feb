//! # Fundamentals
//!
//! Small runnable samples, each backed by a library module so the printed
//! behaviour can be tested.
//!
//! ## Samples
//!
//! ```bash
//! # Language basics
//! cargo run --bin primitives
//! cargo run --bin control_structures
//! cargo run --bin complex_types
//! cargo run --bin maps
//! cargo run --bin slices
//!
//! # Log filter (prints lines of ./log.txt containing the level)
//! cargo run --bin logfilter -- --level DEBUG
//!
//! # Web server on http://127.0.0.1:3000
//! cargo run --bin server
//!
//! # Message queue (in-process queue, or a real broker with --features kafka)
//! cargo run --bin producer -- --in-memory
//! cargo run --features kafka --bin consumer
//! ```
//!
//! ## Key Dependencies
//!
//! - `tokio`, `hyper`, `hyper-util` - async runtime and HTTP/1 server
//! - `rdkafka` - message-queue client (optional `kafka` feature)
//! - `serde`, `toml` - configuration file
//! - `thiserror` - error enums
//! - `tracing`, `tracing-subscriber` - diagnostics

pub mod basics;
pub mod collections;
pub mod config;
pub mod error;
pub mod logfilter;
pub mod queue;
pub mod shutdown;
pub mod telemetry;
pub mod web;

pub use config::AppConfig;
pub use error::{Error, Result};
