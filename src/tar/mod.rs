//! Tar archive scanning and extraction.
//!
//! ## Architecture
//!
//! - [`structures`]: block layout constants and the entry types passed around
//! - [`parser`]: reading name, size and type flag out of a header block
//! - [`walker`]: single-pass walk over the headers of an archive
//! - [`selector`]: fold step picking the largest regular file
//! - [`extractor`]: byte-range copies and the scan-then-extract pipeline
//! - [`builder`]: writing headers and archives
//!
//! ## Tar Format Overview
//!
//! An archive is a run of 512-byte blocks. Each entry is one header block
//! followed by its content, zero-padded to a block boundary. Two all-zero
//! blocks mark the end; anything after them is padding.
//!
//! Only the classic header fields are interpreted: the 100-byte name at
//! offset 0, the octal size at offset 124 and the type flag at offset 156.
//! Checksums, long-name extensions and PAX records are not.

pub mod builder;
mod extractor;
mod parser;
mod selector;
mod structures;
mod walker;

pub use builder::{ArchiveBuilder, encode_header};
pub use extractor::{CorruptionPolicy, Destination, Extraction, LargestScan, Outcome, TarExtractor};
pub use parser::{parse_header, parse_size};
pub use selector::keep_largest;
pub use structures::*;
pub use walker::{ArchiveWalker, ScanStop, ScanSummary};
