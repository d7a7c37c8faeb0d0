//! Library error type.
//!
//! Every failure is fatal for the call that produced it: nothing in this crate
//! catches or retries, and a compiled dataset is either complete or absent.
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::IndexRange;

/// Errors raised while reading, slicing, stacking or writing data.
#[derive(Debug, Error)]
pub enum Error {
    /// The file could not be opened, read or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file does not decode (bad header, truncated element, unsupported
    /// class) or lacks an expected variable, field or tensor.
    #[error("malformed file{}: {reason}", fmt_path(.path))]
    FileFormat {
        path: Option<PathBuf>,
        reason: String,
    },

    /// A configured index range runs past the windows available.
    #[error("{context}: rows {range} requested but only {available} available")]
    IndexRange {
        context: String,
        range: IndexRange,
        available: usize,
    },

    /// Two arrays could not be stacked or aligned.
    #[error("shape mismatch in {context}: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        context: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// A caller-supplied parameter is outside its accepted domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a [`Error::FileFormat`] not yet tied to a file.
    pub(crate) fn format(reason: impl Into<String>) -> Self {
        Error::FileFormat { path: None, reason: reason.into() }
    }

    /// Attach `path` to a format error that was raised on an in-memory buffer.
    pub(crate) fn at_path(self, path: &Path) -> Self {
        match self {
            Error::FileFormat { path: None, reason } => Error::FileFormat {
                path: Some(path.to_path_buf()),
                reason,
            },
            other => other,
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Error::Io { path: path.to_path_buf(), source }
    }
}

fn fmt_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" {}", p.display()),
        None => String::new(),
    }
}
