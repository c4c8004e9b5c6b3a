//! Single-pass archive walker.
//!
//! ## Walking Strategy
//!
//! A tar archive is a sequence of 512-byte header blocks, each followed by
//! its content padded to a block boundary. The walker reads a header, then
//! jumps the cursor over the content without reading it, so a scan touches
//! one block per entry no matter how large the entries are.
//!
//! Two consecutive zero blocks end the archive. After a zero block the
//! walker peeks one block ahead without moving the cursor; whatever it
//! finds there, the walk stops, so the peeked block only decides how.
//!
//! The walk ends (never errors) on a short block, a terminator, a corrupt
//! header or a stray zero block. Only I/O failures on the source are
//! returned as errors. Stops are logged at debug level; reporting them to
//! the user is left to the caller.

use std::sync::Arc;

use tracing::debug;

use crate::error::{HeaderError, Result};
use crate::io::ReadAt;

use super::parser::parse_header;
use super::structures::*;

/// Why a walk stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanStop {
    /// Two zero blocks, or a single zero block right before end of data.
    EndOfArchive,
    /// Fewer than 512 bytes were left at the cursor.
    EndOfData,
    /// The header at `offset` has an unreadable size field.
    CorruptHeader { offset: u64, reason: HeaderError },
    /// A zero block at `offset` was followed by a non-zero block.
    StrayZeroBlock { offset: u64 },
}

impl ScanStop {
    /// Whether the walk ended on damaged data rather than a normal end.
    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            ScanStop::CorruptHeader { .. } | ScanStop::StrayZeroBlock { .. }
        )
    }

    /// Offset of the block that made the walk abort, if it aborted.
    pub fn corrupt_offset(&self) -> Option<u64> {
        match self {
            ScanStop::CorruptHeader { offset, .. } | ScanStop::StrayZeroBlock { offset } => {
                Some(*offset)
            }
            _ => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ScanStop::EndOfArchive => "end of archive".to_string(),
            ScanStop::EndOfData => "end of data without terminator".to_string(),
            ScanStop::CorruptHeader { reason, .. } => reason.to_string(),
            ScanStop::StrayZeroBlock { .. } => "zero block followed by data".to_string(),
        }
    }
}

/// Outcome of a complete walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    pub stop: ScanStop,
    /// Number of headers walked.
    pub entries: usize,
    /// Cursor position when the walk stopped.
    pub position: u64,
}

/// Lazily yields the entries of an archive, front to back.
///
/// Not restartable: create a new walker to scan again.
pub struct ArchiveWalker<R: ReadAt> {
    reader: Arc<R>,
    position: u64,
    entries: usize,
    stop: Option<ScanStop>,
}

impl<R: ReadAt> ArchiveWalker<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            reader,
            position: 0,
            entries: 0,
            stop: None,
        }
    }

    /// Current cursor position.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Why the walk ended, once [`next_entry`](Self::next_entry) has
    /// returned `None`.
    pub fn stop_reason(&self) -> Option<&ScanStop> {
        self.stop.as_ref()
    }

    /// Advance to the next entry.
    ///
    /// Returns `Ok(None)` once the walk has ended; every later call returns
    /// `Ok(None)` as well.
    ///
    /// # Errors
    ///
    /// Only I/O failures reading the source.
    pub async fn next_entry(&mut self) -> Result<Option<WalkedEntry>> {
        if self.stop.is_some() {
            return Ok(None);
        }

        let offset = self.position;
        let Some(block) = self.read_block(offset).await? else {
            debug!(offset, "short block, stopping");
            return Ok(self.finish(ScanStop::EndOfData));
        };

        if is_zero_block(&block) {
            // One block of lookahead, read without moving the cursor. Every
            // outcome ends the walk, so the block is never consumed.
            let lookahead = self.read_block(offset + BLOCK_SIZE as u64).await?;
            let stop = match lookahead.as_deref() {
                Some(next) if !is_zero_block(next) => {
                    debug!(offset, "zero block followed by a header, aborting scan");
                    ScanStop::StrayZeroBlock { offset }
                }
                Some(_) => ScanStop::EndOfArchive,
                None => {
                    debug!(offset, "single zero block at end of data");
                    ScanStop::EndOfArchive
                }
            };
            return Ok(self.finish(stop));
        }

        let header = match parse_header(&block) {
            Ok(header) => header,
            Err(reason) => {
                debug!(offset, %reason, "corrupt header, stopping");
                return Ok(self.finish(ScanStop::CorruptHeader { offset, reason }));
            }
        };

        let entry = WalkedEntry {
            header,
            header_offset: offset,
            content_offset: offset + BLOCK_SIZE as u64,
        };

        let Some(next) = entry.next_offset() else {
            debug!(offset, size = entry.header.size, "entry runs past addressable range");
            return Ok(self.finish(ScanStop::CorruptHeader {
                offset,
                reason: HeaderError::SizeOverflow,
            }));
        };

        debug!(
            offset,
            size = entry.header.size,
            kind = entry.header.entry_type.label(),
            name = %entry.header.name,
            "found entry"
        );

        self.position = next;
        self.entries += 1;
        Ok(Some(entry))
    }

    /// Consume the walker, threading `init` through `f` for every entry.
    ///
    /// # Errors
    ///
    /// Only I/O failures reading the source. Corruption ends the fold and is
    /// reported in the returned [`ScanSummary`].
    pub async fn fold<B, F>(mut self, init: B, mut f: F) -> Result<(B, ScanSummary)>
    where
        F: FnMut(B, &WalkedEntry) -> B,
    {
        let mut acc = init;
        while let Some(entry) = self.next_entry().await? {
            acc = f(acc, &entry);
        }
        Ok((acc, self.summary()))
    }

    /// Read the block at `offset`; `None` when fewer than 512 bytes remain.
    async fn read_block(&self, offset: u64) -> Result<Option<Box<Block>>> {
        let mut block = Box::new([0u8; BLOCK_SIZE]);
        let n = self.reader.read_full_at(offset, &mut block[..]).await?;
        Ok((n == BLOCK_SIZE).then_some(block))
    }

    fn finish(&mut self, stop: ScanStop) -> Option<WalkedEntry> {
        self.stop = Some(stop);
        None
    }

    fn summary(&self) -> ScanSummary {
        ScanSummary {
            stop: self.stop.clone().unwrap_or(ScanStop::EndOfData),
            entries: self.entries,
            position: self.position,
        }
    }
}
