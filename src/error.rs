//! Errors that abort a whole collection run.

use std::path::PathBuf;
use thiserror::Error;

/// A fatal collection error.
///
/// Per-file problems (decode failures, unreadable files) never show up here:
/// they are written into the output and reported through the sink instead.
#[derive(Debug, Error)]
pub enum CollectError {
    /// The root path does not exist or is not a directory.
    #[error("directory '{0}' not found")]
    DirectoryNotFound(PathBuf),

    /// The output file could not be created, written or flushed.
    #[error("could not write output file {1}: {0}")]
    OutputWrite(#[source] std::io::Error, PathBuf),
}
