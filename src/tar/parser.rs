//! Header block parsing.
//!
//! Only three fields matter for scanning: the name, the size and the type
//! flag. Everything else in the block (mode, owner, mtime, checksum, ustar
//! extensions) is ignored.

use crate::error::HeaderError;

use super::structures::*;

/// Parse one 512-byte block as a header.
///
/// # Errors
///
/// Returns a [`HeaderError`] if the size field cannot be read as a
/// non-negative integer. Nothing else in the block can fail.
pub fn parse_header(block: &Block) -> Result<HeaderFields, HeaderError> {
    let name = parse_name(&block[NAME_RANGE]);
    let size = parse_size(&block[SIZE_RANGE])?;
    let entry_type = EntryType::from_byte(block[TYPE_FLAG_OFFSET]);

    Ok(HeaderFields {
        name,
        size,
        entry_type,
    })
}

/// Drop every NUL, then trim whitespace. Non-UTF-8 bytes are replaced.
fn parse_name(field: &[u8]) -> String {
    let bytes: Vec<u8> = field.iter().copied().filter(|&b| b != 0).collect();
    String::from_utf8_lossy(&bytes).trim().to_string()
}

/// Parse the size field.
///
/// Normally NUL/space padded octal text. GNU tar writes sizes that do not
/// fit in 11 octal digits as big-endian binary, flagged by the high bit of
/// the first byte.
pub fn parse_size(field: &[u8]) -> Result<u64, HeaderError> {
    match field.first() {
        Some(&first) if first & 0x80 != 0 => parse_base256(field),
        _ => parse_octal(field),
    }
}

fn parse_octal(field: &[u8]) -> Result<u64, HeaderError> {
    let stripped: Vec<u8> = field.iter().copied().filter(|&b| b != 0).collect();
    let text = stripped.trim_ascii();

    if text.is_empty() || !text.iter().all(|b| (b'0'..=b'7').contains(b)) {
        return Err(HeaderError::InvalidSize {
            field: String::from_utf8_lossy(text).into_owned(),
        });
    }

    text.iter().try_fold(0u64, |acc, &digit| {
        acc.checked_mul(8)
            .and_then(|v| v.checked_add(u64::from(digit - b'0')))
            .ok_or(HeaderError::SizeOverflow)
    })
}

fn parse_base256(field: &[u8]) -> Result<u64, HeaderError> {
    // Bit 6 of the first byte is the sign in two's complement.
    if field[0] & 0x40 != 0 {
        return Err(HeaderError::NegativeSize);
    }

    let first = u64::from(field[0] & 0x3f);
    field[1..].iter().try_fold(first, |acc, &byte| {
        if acc > u64::MAX >> 8 {
            return Err(HeaderError::SizeOverflow);
        }
        Ok((acc << 8) | u64::from(byte))
    })
}
