//! Error types for the sieve engine
//!
//! Only resource-acquisition failures are errors. Per-entry decode problems
//! are recovered in place and never surface here.

use std::io;
use std::path::PathBuf;

/// Fatal engine errors
#[derive(Debug, thiserror::Error)]
pub enum SieveError {
    #[error("input file not found: {path:?}")]
    InputNotFound { path: PathBuf },

    #[error("cannot read input {path:?}")]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write output {path:?}")]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid regex pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl SieveError {
    /// Classify an error raised while opening or reading an input path
    pub(crate) fn input(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::InputNotFound { path }
        } else {
            Self::InputUnreadable { path, source }
        }
    }

    pub(crate) fn output(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::OutputUnwritable {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SieveError>;
