use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy for the sampling pipeline
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum Error {
    /// Input archive does not exist.
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Archive exists but its contents are not what we expect.
    #[error("{}: {message}", path.display())]
    Format { path: PathBuf, message: String },

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid parameter `{name}`: {message}")]
    InvalidParameter { name: &'static str, message: String },

    #[error("latent sample set is empty, cannot choose a mean")]
    EmptyLatentSet,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Format {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}
