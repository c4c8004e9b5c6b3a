//! End-to-end extraction against archives on disk.

use std::path::Path;
use std::sync::Arc;

use tarpick::tar::{ArchiveBuilder, EntryType, encode_header};
use tarpick::{
    CorruptionPolicy, Destination, LocalFileReader, Outcome, ScanStop, TarError, TarExtractor,
};

fn content(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| (i % 251) as u8 ^ seed)
        .collect()
}

fn write_archive(dir: &Path, data: &[u8]) -> Arc<LocalFileReader> {
    let path = dir.join("input.tar");
    std::fs::write(&path, data).unwrap();
    Arc::new(LocalFileReader::new(&path).unwrap())
}

#[tokio::test]
async fn extracts_largest_of_three_entries() {
    let dir = tempfile::tempdir().unwrap();
    let large = content(5000, 0x5a);

    let mut builder = ArchiveBuilder::new();
    builder
        .append("a.txt", EntryType::Regular, &content(100, 1))
        .append("b.zip", EntryType::Regular, &large)
        .append("c.txt", EntryType::Regular, &content(200, 2));
    let archive = builder.finish();

    let extractor = TarExtractor::new(write_archive(dir.path(), &archive));
    let output = dir.path().join("out.bin");
    let result = extractor
        .extract_largest(&Destination::File(output.clone()), CorruptionPolicy::KeepPartial)
        .await
        .unwrap();

    let Outcome::Extracted { entry, bytes } = result.outcome else {
        panic!("expected an extraction");
    };
    assert_eq!(entry.name, "b.zip");
    assert_eq!(bytes, 5000);

    let written = std::fs::read(&output).unwrap();
    let start = entry.content_offset as usize;
    assert_eq!(written, large);
    assert_eq!(written, &archive[start..start + 5000]);
}

#[tokio::test]
async fn overwrites_existing_destination() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = ArchiveBuilder::new();
    builder.append("only", EntryType::Regular, b"fresh");

    let extractor = TarExtractor::new(write_archive(dir.path(), &builder.finish()));
    let output = dir.path().join("out.bin");
    std::fs::write(&output, vec![b'x'; 10_000]).unwrap();

    extractor
        .extract_largest(&Destination::File(output.clone()), CorruptionPolicy::KeepPartial)
        .await
        .unwrap();

    assert_eq!(std::fs::read(&output).unwrap(), b"fresh");
}

#[tokio::test]
async fn empty_archive_creates_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = TarExtractor::new(write_archive(dir.path(), &ArchiveBuilder::new().finish()));
    let output = dir.path().join("out.bin");

    let result = extractor
        .extract_largest(&Destination::File(output.clone()), CorruptionPolicy::KeepPartial)
        .await
        .unwrap();

    assert_eq!(result.outcome, Outcome::NothingToExtract);
    assert_eq!(result.summary.stop, ScanStop::EndOfArchive);
    assert!(!output.exists());
}

#[tokio::test]
async fn zero_size_files_are_not_extracted() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = ArchiveBuilder::new();
    builder
        .append("empty-1", EntryType::Regular, &[])
        .append("empty-2", EntryType::Regular, &[]);

    let extractor = TarExtractor::new(write_archive(dir.path(), &builder.finish()));
    let output = dir.path().join("out.bin");
    let result = extractor
        .extract_largest(&Destination::File(output.clone()), CorruptionPolicy::KeepPartial)
        .await
        .unwrap();

    assert_eq!(result.outcome, Outcome::NothingToExtract);
    assert_eq!(result.summary.entries, 2);
    assert_eq!(result.summary.position, 1024);
    assert!(!output.exists());
}

#[tokio::test]
async fn corrupt_header_still_extracts_earlier_candidate() {
    let dir = tempfile::tempdir().unwrap();
    let early = content(3000, 7);

    let mut bad = encode_header("broken", 0, EntryType::Regular);
    bad[124..136].copy_from_slice(b"0x1f-garbage");

    let mut builder = ArchiveBuilder::new();
    builder.append("early.bin", EntryType::Regular, &early);
    let bad_offset = builder.len();
    builder
        .append_raw(&bad)
        .append("later.bin", EntryType::Regular, &content(9000, 8));

    let extractor = TarExtractor::new(write_archive(dir.path(), &builder.finish()));
    let output = dir.path().join("out.bin");
    let result = extractor
        .extract_largest(&Destination::File(output.clone()), CorruptionPolicy::KeepPartial)
        .await
        .unwrap();

    assert_eq!(result.summary.stop.corrupt_offset(), Some(bad_offset));
    assert_eq!(result.summary.position, bad_offset);
    assert!(matches!(result.outcome, Outcome::Extracted { bytes: 3000, .. }));
    assert_eq!(std::fs::read(&output).unwrap(), early);
}

#[tokio::test]
async fn truncated_archive_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = ArchiveBuilder::new();
    builder.append("cut.bin", EntryType::Regular, &content(4000, 3));
    let mut archive = builder.into_inner();
    archive.truncate(512 + 1000);

    let extractor = TarExtractor::new(write_archive(dir.path(), &archive));
    let output = dir.path().join("out.bin");
    let err = extractor
        .extract_largest(&Destination::File(output.clone()), CorruptionPolicy::KeepPartial)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TarError::TruncatedSource {
            offset: 512,
            length: 4000,
            available: 1512
        }
    ));
    assert!(!output.exists());
}

#[tokio::test]
async fn missing_parent_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = ArchiveBuilder::new();
    builder.append("a", EntryType::Regular, b"abc");

    let extractor = TarExtractor::new(write_archive(dir.path(), &builder.finish()));
    let output = dir.path().join("missing").join("out.bin");
    let err = extractor
        .extract_largest(&Destination::File(output.clone()), CorruptionPolicy::KeepPartial)
        .await
        .unwrap_err();

    assert!(matches!(err, TarError::CreateDestination { ref path, .. } if *path == output));
}

#[tokio::test]
async fn rewrapping_extracted_entry_reproduces_blocks() {
    let dir = tempfile::tempdir().unwrap();
    let body = content(1234, 0x11);

    let mut builder = ArchiveBuilder::new();
    builder.append("payload.dat", EntryType::Regular, &body);
    let archive = builder.finish();

    let extractor = TarExtractor::new(write_archive(dir.path(), &archive));
    let output = dir.path().join("payload.dat");
    let result = extractor
        .extract_largest(&Destination::File(output.clone()), CorruptionPolicy::KeepPartial)
        .await
        .unwrap();
    let Outcome::Extracted { entry, .. } = result.outcome else {
        panic!("expected an extraction");
    };

    let extracted = std::fs::read(&output).unwrap();
    let mut rewrapped = ArchiveBuilder::new();
    rewrapped.append(&entry.name, EntryType::Regular, &extracted);

    assert_eq!(rewrapped.finish(), archive);
}
