use super::structures::{CandidateEntry, WalkedEntry};

/// Fold step that keeps the largest regular file.
///
/// A candidate is replaced only by a strictly larger one, so ties keep the
/// earliest entry and zero-size files are never selected.
pub fn keep_largest(best: Option<CandidateEntry>, entry: &WalkedEntry) -> Option<CandidateEntry> {
    if !entry.header.entry_type.is_regular() {
        return best;
    }

    let current = best.as_ref().map_or(0, |c| c.size);
    if entry.header.size > current {
        Some(CandidateEntry::from(entry))
    } else {
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tar::structures::{EntryType, HeaderFields};

    fn entry(offset: u64, size: u64, entry_type: EntryType) -> WalkedEntry {
        WalkedEntry {
            header: HeaderFields {
                name: format!("e{offset}"),
                size,
                entry_type,
            },
            header_offset: offset,
            content_offset: offset + 512,
        }
    }

    fn select(entries: &[WalkedEntry]) -> Option<CandidateEntry> {
        entries.iter().fold(None, keep_largest)
    }

    #[test]
    fn picks_maximum_regardless_of_order() {
        let sizes = [100, 5000, 200];
        let forward: Vec<_> = sizes
            .iter()
            .enumerate()
            .map(|(i, &s)| entry(i as u64 * 10_240, s, EntryType::Regular))
            .collect();
        let mut reversed = forward.clone();
        reversed.reverse();

        assert_eq!(select(&forward).unwrap().size, 5000);
        assert_eq!(select(&reversed).unwrap().size, 5000);
    }

    #[test]
    fn ties_keep_earliest() {
        let entries = [
            entry(0, 300, EntryType::Regular),
            entry(1024, 300, EntryType::Regular),
        ];
        assert_eq!(select(&entries).unwrap().header_offset, 0);
    }

    #[test]
    fn ignores_non_regular_entries() {
        let entries = [
            entry(0, 10, EntryType::Regular),
            entry(1024, 9000, EntryType::Directory),
            entry(10_752, 9000, EntryType::Symlink),
        ];
        assert_eq!(select(&entries).unwrap().header_offset, 0);
    }

    #[test]
    fn zero_size_entries_are_never_selected() {
        let entries = [
            entry(0, 0, EntryType::Regular),
            entry(512, 0, EntryType::Regular),
        ];
        assert_eq!(select(&entries), None);
    }
}
