//! Writing ustar headers and whole archives.
//!
//! The inverse of [`parse_header`](super::parse_header): an entry
//! extracted by the scanner can be wrapped back into a block-identical
//! archive entry.

use super::structures::*;

/// Largest size that fits in the 11 octal digits of the size field.
const MAX_OCTAL_SIZE: u64 = (1 << 33) - 1;

/// Encode a ustar header block for `name`, `size` and `entry_type`.
///
/// Names longer than 100 bytes are cut at 100 bytes. Sizes too large for
/// octal are written in GNU base-256 form.
pub fn encode_header(name: &str, size: u64, entry_type: EntryType) -> Block {
    let mut block = [0u8; BLOCK_SIZE];

    let name = name.as_bytes();
    let name_len = name.len().min(NAME_RANGE.len());
    block[..name_len].copy_from_slice(&name[..name_len]);

    block[100..108].copy_from_slice(b"0000644\0");
    block[108..116].copy_from_slice(b"0000000\0");
    block[116..124].copy_from_slice(b"0000000\0");
    write_size(&mut block[SIZE_RANGE], size);
    block[136..148].copy_from_slice(b"00000000000\0");
    block[TYPE_FLAG_OFFSET] = entry_type.as_byte();
    block[257..263].copy_from_slice(b"ustar\0");
    block[263..265].copy_from_slice(b"00");

    // Checksum is computed with its own field read as spaces.
    block[CHECKSUM_RANGE].fill(b' ');
    let sum: u32 = block.iter().map(|&b| u32::from(b)).sum();
    let checksum = format!("{:06o}\0 ", sum);
    block[CHECKSUM_RANGE].copy_from_slice(checksum.as_bytes());

    block
}

fn write_size(field: &mut [u8], size: u64) {
    if size <= MAX_OCTAL_SIZE {
        let text = format!("{:011o}\0", size);
        field.copy_from_slice(text.as_bytes());
    } else {
        field.fill(0);
        field[0] = 0x80;
        let bytes = size.to_be_bytes();
        let start = field.len() - bytes.len();
        field[start..].copy_from_slice(&bytes);
    }
}

/// Builds an in-memory tar archive entry by entry.
#[derive(Debug, Default)]
pub struct ArchiveBuilder {
    data: Vec<u8>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header followed by `content`, zero-padded to a block boundary.
    pub fn append(&mut self, name: &str, entry_type: EntryType, content: &[u8]) -> &mut Self {
        let header = encode_header(name, content.len() as u64, entry_type);
        self.append_raw(&header);
        self.data.extend_from_slice(content);
        self.pad();
        self
    }

    /// Append bytes verbatim, e.g. a hand-corrupted header.
    pub fn append_raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.data.extend_from_slice(bytes);
        self
    }

    /// Current length, which is the offset of the next appended block.
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append the two zero blocks that end an archive.
    pub fn finish(mut self) -> Vec<u8> {
        self.pad();
        self.data.extend_from_slice(&[0u8; 2 * BLOCK_SIZE]);
        self.data
    }

    /// Return the bytes without a terminator.
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    fn pad(&mut self) {
        let rem = self.data.len() % BLOCK_SIZE;
        if rem != 0 {
            self.data.resize(self.data.len() + BLOCK_SIZE - rem, 0);
        }
    }
}
