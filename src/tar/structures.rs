/// Size of a header block and the unit content is padded to.
pub const BLOCK_SIZE: usize = 512;

/// One raw archive block.
pub type Block = [u8; BLOCK_SIZE];

/// Name field: bytes 0..100.
pub const NAME_RANGE: std::ops::Range<usize> = 0..100;
/// Octal size field: bytes 124..136.
pub const SIZE_RANGE: std::ops::Range<usize> = 124..136;
/// Header checksum field: bytes 148..156.
pub const CHECKSUM_RANGE: std::ops::Range<usize> = 148..156;
/// Type flag byte.
pub const TYPE_FLAG_OFFSET: usize = 156;

/// Tar entry types, as encoded in the type flag byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    Regular,
    HardLink,
    Symlink,
    CharDevice,
    BlockDevice,
    Directory,
    Fifo,
    Other(u8),
}

impl EntryType {
    pub fn from_byte(value: u8) -> Self {
        match value {
            b'0' | 0 => EntryType::Regular,
            b'1' => EntryType::HardLink,
            b'2' => EntryType::Symlink,
            b'3' => EntryType::CharDevice,
            b'4' => EntryType::BlockDevice,
            b'5' => EntryType::Directory,
            b'6' => EntryType::Fifo,
            other => EntryType::Other(other),
        }
    }

    pub fn as_byte(&self) -> u8 {
        match self {
            EntryType::Regular => b'0',
            EntryType::HardLink => b'1',
            EntryType::Symlink => b'2',
            EntryType::CharDevice => b'3',
            EntryType::BlockDevice => b'4',
            EntryType::Directory => b'5',
            EntryType::Fifo => b'6',
            EntryType::Other(v) => *v,
        }
    }

    pub fn is_regular(&self) -> bool {
        matches!(self, EntryType::Regular)
    }

    /// Short label used in listings
    pub fn label(&self) -> &'static str {
        match self {
            EntryType::Regular => "file",
            EntryType::HardLink => "link",
            EntryType::Symlink => "symlink",
            EntryType::CharDevice => "chardev",
            EntryType::BlockDevice => "blockdev",
            EntryType::Directory => "dir",
            EntryType::Fifo => "fifo",
            EntryType::Other(_) => "other",
        }
    }
}

/// Fields read from one header block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderFields {
    pub name: String,
    pub size: u64,
    pub entry_type: EntryType,
}

/// A header together with where it sits in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedEntry {
    pub header: HeaderFields,
    pub header_offset: u64,
    pub content_offset: u64,
}

impl WalkedEntry {
    /// Offset of the next header: this header plus padded content.
    pub fn next_offset(&self) -> Option<u64> {
        self.content_offset.checked_add(padded_len(self.header.size)?)
    }
}

/// The largest regular file seen so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateEntry {
    pub name: String,
    pub size: u64,
    pub header_offset: u64,
    pub content_offset: u64,
}

impl From<&WalkedEntry> for CandidateEntry {
    fn from(entry: &WalkedEntry) -> Self {
        Self {
            name: entry.header.name.clone(),
            size: entry.header.size,
            header_offset: entry.header_offset,
            content_offset: entry.content_offset,
        }
    }
}

/// Round `size` up to a whole number of blocks.
pub fn padded_len(size: u64) -> Option<u64> {
    let block = BLOCK_SIZE as u64;
    size.div_ceil(block).checked_mul(block)
}

pub fn is_zero_block(block: &Block) -> bool {
    block.iter().all(|&b| b == 0)
}
