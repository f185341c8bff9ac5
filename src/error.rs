use std::io;

use tokio::task::JoinError;

use crate::seq::Seq;

/// An error which ends a [`Sender`][crate::Sender].
///
/// None of these are retried: a failed connection or write is fatal to the
/// send loop.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to send message {seq}: {source}")]
    Write {
        seq: Seq,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("send task failed: {0}")]
    Task(#[from] JoinError),
}

/// An invalid [`Config`][crate::Config] value.
#[derive(thiserror::Error, PartialEq, Eq, Clone, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("host must not be empty")]
    EmptyHost,
    #[error("invalid port {0:?} (expected 1-65535)")]
    Port(String),
    #[error("send interval must be greater than zero")]
    Interval,
}
