use thiserror::Error;

use crate::config::ConfigError;
use crate::queue::QueueError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Queue(#[from] QueueError),
}

pub type Result<T> = std::result::Result<T, Error>;
