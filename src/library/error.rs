use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while discovering a library on disk.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("audio library folder not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("audio library path is not a folder: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to read transcript {}: {source}", path.display())]
    Transcript {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
