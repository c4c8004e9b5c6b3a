use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::error::{Result, TarError};
use crate::io::ReadAt;

use super::selector::keep_largest;
use super::structures::{CandidateEntry, WalkedEntry};
use super::walker::{ArchiveWalker, ScanSummary};

/// Chunk size for copying entry content.
const COPY_CHUNK: usize = 64 * 1024;

/// What to do with a candidate found before the archive turned out corrupt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CorruptionPolicy {
    /// Extract whatever was found before the damage.
    #[default]
    KeepPartial,
    /// Refuse to extract anything.
    Abort,
}

/// Where extracted bytes go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    File(PathBuf),
    Stdout,
}

/// Result of scanning for the largest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LargestScan {
    pub candidate: Option<CandidateEntry>,
    pub summary: ScanSummary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Extracted { entry: CandidateEntry, bytes: u64 },
    NothingToExtract,
}

/// Result of the full scan-and-extract pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub summary: ScanSummary,
    pub outcome: Outcome,
}

/// Tar archive scanner and extractor
pub struct TarExtractor<R: ReadAt> {
    reader: Arc<R>,
}

impl<R: ReadAt> TarExtractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self { reader }
    }

    /// Walk the whole archive and collect every entry.
    pub async fn list_entries(&self) -> Result<(Vec<WalkedEntry>, ScanSummary)> {
        ArchiveWalker::new(self.reader.clone())
            .fold(Vec::new(), |mut entries, entry| {
                entries.push(entry.clone());
                entries
            })
            .await
    }

    /// Find the largest regular file in one pass.
    pub async fn scan_largest(&self) -> Result<LargestScan> {
        let (candidate, summary) = ArchiveWalker::new(self.reader.clone())
            .fold(None, keep_largest)
            .await?;
        Ok(LargestScan { candidate, summary })
    }

    /// Copy `length` bytes starting at `start` into `out`.
    ///
    /// Never reads past `start + length - 1`.
    pub async fn copy_range<W>(&self, start: u64, length: u64, out: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        self.check_range(start, length)?;

        let mut buf = vec![0u8; chunk_len(length)];
        let mut copied = 0u64;
        while copied < length {
            let want = (length - copied).min(buf.len() as u64) as usize;
            let n = self
                .reader
                .read_full_at(start + copied, &mut buf[..want])
                .await?;
            if n < want {
                // The source shrank after the bounds check.
                return Err(TarError::TruncatedSource {
                    offset: start,
                    length,
                    available: start + copied + n as u64,
                });
            }
            out.write_all(&buf[..n]).await?;
            copied += n as u64;
        }
        out.flush().await?;

        Ok(copied)
    }

    /// Copy a byte range into a file, replacing any existing content.
    ///
    /// The parent directory must already exist.
    pub async fn extract_range(&self, start: u64, length: u64, output_path: &Path) -> Result<u64> {
        // Check before creating so a truncated source leaves no file behind.
        self.check_range(start, length)?;

        let mut file =
            fs::File::create(output_path)
                .await
                .map_err(|source| TarError::CreateDestination {
                    path: output_path.to_path_buf(),
                    source,
                })?;
        self.copy_range(start, length, &mut file).await
    }

    /// Scan for the largest regular file and extract it.
    pub async fn extract_largest(
        &self,
        destination: &Destination,
        policy: CorruptionPolicy,
    ) -> Result<Extraction> {
        debug!("scanning");
        let LargestScan { candidate, summary } = self.scan_largest().await?;

        if let Some(offset) = summary.stop.corrupt_offset() {
            if policy == CorruptionPolicy::Abort {
                debug!("failed");
                return Err(TarError::CorruptArchive {
                    offset,
                    reason: summary.stop.describe(),
                });
            }
            debug!(
                offset,
                reason = %summary.stop.describe(),
                "archive corrupt, using entries found before the damage"
            );
        }

        let Some(entry) = candidate else {
            debug!(entries = summary.entries, "done, nothing to extract");
            return Ok(Extraction {
                summary,
                outcome: Outcome::NothingToExtract,
            });
        };

        debug!(
            name = %entry.name,
            size = entry.size,
            offset = entry.content_offset,
            "extracting"
        );
        let bytes = match destination {
            Destination::File(path) => {
                self.extract_range(entry.content_offset, entry.size, path)
                    .await?
            }
            Destination::Stdout => {
                let mut stdout = tokio::io::stdout();
                self.copy_range(entry.content_offset, entry.size, &mut stdout)
                    .await?
            }
        };
        debug!(name = %entry.name, bytes, "done");

        Ok(Extraction {
            summary,
            outcome: Outcome::Extracted { entry, bytes },
        })
    }

    fn check_range(&self, start: u64, length: u64) -> Result<()> {
        let available = self.reader.size();
        match start.checked_add(length) {
            Some(end) if end <= available => Ok(()),
            _ => Err(TarError::TruncatedSource {
                offset: start,
                length,
                available,
            }),
        }
    }
}

/// Copy buffer size for a range of `length` bytes, clamped in `u64` so a
/// huge length cannot wrap to a zero-sized buffer on 32-bit targets.
fn chunk_len(length: u64) -> usize {
    length.min(COPY_CHUNK as u64) as usize
}
