//! Error types for image loading and output writing.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to load an input image. Fatal: the run never starts.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The file could not be read.
    #[error("{}: {source}", path.display())]
    Io {
        /// Offending file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A line did not hold a value in the expected format.
    #[error("{}:{line}: malformed value {text:?}", path.display())]
    Parse {
        /// Offending file.
        path: PathBuf,
        /// 1-indexed line number.
        line: usize,
        /// The trimmed line text.
        text: String,
    },
}

/// Failure to write an output file.
#[derive(Debug, Error)]
#[error("{}: {source}", path.display())]
pub struct OutputError {
    /// File being written.
    pub path: PathBuf,
    /// Underlying I/O error.
    #[source]
    pub source: io::Error,
}

/// Anything that stops a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    /// An input image failed to load.
    #[error("failed to load input: {0}")]
    Image(#[from] ImageError),
    /// An output file failed to write.
    #[error("failed to write output: {0}")]
    Output(#[from] OutputError),
}
