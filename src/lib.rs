//! # tarpick
//!
//! Scan a tar archive and extract its largest regular file.
//!
//! The archive is read in a single pass: one header block per entry, with
//! entry content skipped rather than read. The largest regular file found
//! is then copied out as raw bytes, with no archive framing.
//!
//! ## Features
//!
//! - Single-pass scan that reads headers only
//! - Stops cleanly at the double zero-block terminator, a truncated block or
//!   a corrupt header, keeping whatever was found before the damage
//! - GNU base-256 size fields for entries of 8 GiB and up
//! - Archives from local files or from stdin
//!
//! ## Example
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//! use std::sync::Arc;
//! use tarpick::{CorruptionPolicy, Destination, LocalFileReader, Outcome, TarExtractor};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let reader = Arc::new(LocalFileReader::new(Path::new("backup.tar"))?);
//!     let extractor = TarExtractor::new(reader);
//!
//!     let destination = Destination::File(PathBuf::from("largest.bin"));
//!     let result = extractor
//!         .extract_largest(&destination, CorruptionPolicy::KeepPartial)
//!         .await?;
//!
//!     if let Outcome::Extracted { entry, bytes } = result.outcome {
//!         println!("{} ({} bytes)", entry.name, bytes);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod tar;

pub use cli::Cli;
pub use error::{HeaderError, TarError};
pub use io::{LocalFileReader, MemoryReader, ReadAt};
pub use tar::{
    CandidateEntry, CorruptionPolicy, Destination, Extraction, Outcome, ScanStop, ScanSummary,
    TarExtractor, WalkedEntry,
};
