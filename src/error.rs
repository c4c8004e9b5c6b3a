//! Error types for scanning and extracting tar archives.
//!
//! Header-level problems are [`HeaderError`]s. The walker never returns them
//! as `Err`; they end the scan and are reported through
//! [`ScanStop::CorruptHeader`](crate::tar::ScanStop::CorruptHeader) so that
//! anything found before the corrupt block survives.
//!
//! Everything that aborts an operation is a [`TarError`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a 512-byte block could not be read as a header.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    #[error("size field is not an octal number: {field:?}")]
    InvalidSize { field: String },

    #[error("size field does not fit in 64 bits")]
    SizeOverflow,

    #[error("size field is a negative base-256 number")]
    NegativeSize,
}

#[derive(Error, Debug)]
pub enum TarError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The archive ends before the selected entry's content does.
    #[error(
        "source truncated: need {length} bytes at offset {offset}, archive has {available} bytes"
    )]
    TruncatedSource {
        offset: u64,
        length: u64,
        available: u64,
    },

    #[error("cannot create {}: {source}", .path.display())]
    CreateDestination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("archive corrupt at offset {offset}: {reason}")]
    CorruptArchive { offset: u64, reason: String },
}

pub type Result<T> = std::result::Result<T, TarError>;
