//! Main entry point for the tarpick CLI application.
//!
//! Scans a tar archive from a local file or stdin and either lists its
//! entries or extracts the largest regular file.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use tarpick::{
    Cli, Destination, LocalFileReader, MemoryReader, Outcome, ReadAt, ScanSummary, TarError,
    TarExtractor,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    if cli.is_stdin() {
        let mut data = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut data)
            .await
            .context("failed to read archive from stdin")?;
        process_tar(Arc::new(MemoryReader::new(data)), &cli).await
    } else {
        let reader = LocalFileReader::new(Path::new(&cli.archive))
            .with_context(|| format!("cannot open archive {}", cli.archive))?;
        process_tar(Arc::new(reader), &cli).await
    }
}

/// Log to stderr so that pipe mode keeps stdout for entry content.
/// `RUST_LOG` overrides the level picked from `-q`.
fn init_logging(cli: &Cli) {
    let filter = EnvFilter::builder()
        .with_default_directive(cli.log_level().into())
        .from_env_lossy();

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

async fn process_tar<R: ReadAt + 'static>(reader: Arc<R>, cli: &Cli) -> Result<()> {
    let extractor = TarExtractor::new(reader);

    if cli.list || cli.verbose {
        return list_entries(&extractor, cli.verbose).await;
    }

    let destination = match (cli.pipe, &cli.output) {
        (true, _) => Destination::Stdout,
        (false, Some(path)) => Destination::File(PathBuf::from(path)),
        (false, None) => anyhow::bail!("no OUTPUT given"),
    };

    if let Destination::File(path) = &destination
        && cli.never_overwrite
        && path.exists()
    {
        info!("Skipping: {} (file exists)", path.display());
        return Ok(());
    }

    let extraction = match extractor
        .extract_largest(&destination, cli.corruption_policy())
        .await
    {
        Ok(extraction) => extraction,
        Err(e @ TarError::CorruptArchive { .. }) => return Err(e.into()),
        Err(e) => return Err(anyhow::Error::new(e).context("extraction failed")),
    };

    match extraction.outcome {
        Outcome::Extracted { entry, bytes } => {
            let target = match &destination {
                Destination::File(path) => path.display().to_string(),
                Destination::Stdout => "stdout".to_string(),
            };
            info!(
                "Extracted {} ({} bytes, offset {}) to {}",
                entry.name, bytes, entry.content_offset, target
            );
        }
        Outcome::NothingToExtract => info!("No file found to extract."),
    }
    report_stop(&extraction.summary);

    Ok(())
}

/// List archive entries.
///
/// - Short format (`-l`): names only
/// - Verbose format (`-v`): offset, size, type and name, plus a totals line
async fn list_entries<R: ReadAt + 'static>(extractor: &TarExtractor<R>, verbose: bool) -> Result<()> {
    let (entries, summary) = extractor.list_entries().await?;

    if verbose {
        println!("{:>12}  {:>12}  {:<8}  Name", "Offset", "Size", "Type");
        println!("{}", "-".repeat(60));
    }

    let mut total_size = 0u64;
    let mut file_count = 0usize;

    for entry in &entries {
        if verbose {
            println!(
                "{:>12}  {:>12}  {:<8}  {}",
                entry.header_offset,
                entry.header.size,
                entry.header.entry_type.label(),
                entry.header.name
            );
            if entry.header.entry_type.is_regular() {
                total_size += entry.header.size;
                file_count += 1;
            }
        } else {
            println!("{}", entry.header.name);
        }
    }

    if verbose {
        println!("{}", "-".repeat(60));
        println!(
            "{:>12}  {:>12}  {:<8}  {} files",
            "",
            format_size(total_size),
            "",
            file_count
        );
    }

    report_stop(&summary);
    Ok(())
}

fn report_stop(summary: &ScanSummary) {
    if let Some(offset) = summary.stop.corrupt_offset() {
        warn!(
            "archive corrupt at offset {}: {} ({} entries read)",
            offset,
            summary.stop.describe(),
            summary.entries
        );
    }
}

/// Format a byte size into a human-readable string.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
