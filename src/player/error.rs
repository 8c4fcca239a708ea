use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::backend::ChannelId;

/// Failures reported by an audio backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("no audio output device: {0}")]
    Device(String),

    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("invalid raw sample buffer: {0}")]
    RawBuffer(String),

    #[error("audio output is not initialised")]
    NotInitialized,

    #[error("no such output channel: {0}")]
    NoSuchChannel(ChannelId),
}

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("track {0:?} not preloaded")]
    NotPreloaded(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}
