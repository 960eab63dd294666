use xxhash_rust::xxh3::xxh3_64;

use super::MediaItem;

/// Lists at or below this length are doubled so the scroll loop has enough
/// content to look continuous.
pub const DEFAULT_DUPLICATE_THRESHOLD: usize = 20;

/// Derive the rendered sequence from the host-supplied list.
///
/// `None` stands for input that was not a usable list and yields an empty
/// sequence. Lists of length `<= threshold` are concatenated with themselves;
/// longer lists pass through unchanged.
pub fn build_display_sequence(items: Option<&[MediaItem]>, threshold: usize) -> Vec<MediaItem> {
    let Some(items) = items else {
        return Vec::new();
    };

    if items.len() > threshold {
        return items.to_vec();
    }

    let mut sequence = Vec::with_capacity(items.len() * 2);
    sequence.extend_from_slice(items);
    sequence.extend_from_slice(items);
    sequence
}

/// Hash of the URL list in order. `None` hashes differently from an empty list.
pub fn compute_list_hash(items: Option<&[MediaItem]>) -> u64 {
    let Some(items) = items else {
        return xxh3_64(b"\xff-absent");
    };

    let mut hasher_input = Vec::with_capacity(items.len() * 64 + 8);
    hasher_input.extend_from_slice(&(items.len() as u64).to_le_bytes());
    for item in items {
        hasher_input.extend_from_slice(item.url().as_bytes());
        // Separator so ["ab", "c"] and ["a", "bc"] differ
        hasher_input.push(0);
    }

    xxh3_64(&hasher_input)
}

/// Memoised display sequence: rebuilt only when the list content changes.
#[derive(Debug)]
pub struct DisplaySequenceMemo {
    threshold: usize,
    list_hash: Option<u64>,
    sequence: Vec<MediaItem>,
}

impl DisplaySequenceMemo {
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            list_hash: None,
            sequence: Vec::new(),
        }
    }

    /// Update from the current list. Returns `true` when the sequence was rebuilt.
    pub fn update(&mut self, items: Option<&[MediaItem]>) -> bool {
        let hash = compute_list_hash(items);
        if self.list_hash == Some(hash) {
            return false;
        }

        self.sequence = build_display_sequence(items, self.threshold);
        self.list_hash = Some(hash);
        tracing::debug!(
            source_len = items.map(<[MediaItem]>::len),
            display_len = self.sequence.len(),
            "Rebuilt display sequence"
        );
        true
    }

    pub fn sequence(&self) -> &[MediaItem] {
        &self.sequence
    }
}

impl Default for DisplaySequenceMemo {
    fn default() -> Self {
        Self::new(DEFAULT_DUPLICATE_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_items(names: &[&str]) -> Vec<MediaItem> {
        names.iter().map(|n| MediaItem::new(*n)).collect()
    }

    fn urls(items: &[MediaItem]) -> Vec<&str> {
        items.iter().map(MediaItem::url).collect()
    }

    #[test]
    fn test_short_list_is_doubled() {
        let items = make_items(&["a", "b", "c"]);
        let sequence = build_display_sequence(Some(&items), 10);
        assert_eq!(urls(&sequence), vec!["a", "b", "c", "a", "b", "c"]);
    }

    #[test]
    fn test_list_at_threshold_is_doubled() {
        let names: Vec<String> = (0..20).map(|i| format!("v{i}.mp4")).collect();
        let items: Vec<MediaItem> = names.iter().map(MediaItem::new).collect();
        let sequence = build_display_sequence(Some(&items), DEFAULT_DUPLICATE_THRESHOLD);
        assert_eq!(sequence.len(), 40);
        assert_eq!(&sequence[..20], &items[..]);
        assert_eq!(&sequence[20..], &items[..]);
    }

    #[test]
    fn test_long_list_passes_through() {
        let names: Vec<String> = (0..25).map(|i| format!("v{i}.mp4")).collect();
        let items: Vec<MediaItem> = names.iter().map(MediaItem::new).collect();

        for threshold in [10, 20] {
            let sequence = build_display_sequence(Some(&items), threshold);
            assert_eq!(sequence, items);
        }
    }

    #[test]
    fn test_absent_list_is_empty() {
        assert!(build_display_sequence(None, 20).is_empty());
    }

    #[test]
    fn test_empty_list_is_empty() {
        assert!(build_display_sequence(Some(&[]), 20).is_empty());
    }

    #[test]
    fn test_list_hash_changes_on_order() {
        let a = make_items(&["a", "b"]);
        let b = make_items(&["b", "a"]);
        assert_ne!(compute_list_hash(Some(&a)), compute_list_hash(Some(&b)));
    }

    #[test]
    fn test_list_hash_separates_entries() {
        let a = make_items(&["ab", "c"]);
        let b = make_items(&["a", "bc"]);
        assert_ne!(compute_list_hash(Some(&a)), compute_list_hash(Some(&b)));
    }

    #[test]
    fn test_list_hash_absent_vs_empty() {
        assert_ne!(compute_list_hash(None), compute_list_hash(Some(&[])));
    }

    #[test]
    fn test_memo_only_rebuilds_on_change() {
        let mut memo = DisplaySequenceMemo::new(10);
        let items = make_items(&["a", "b"]);

        assert!(memo.update(Some(&items)));
        assert_eq!(memo.sequence().len(), 4);

        // Same content in a fresh allocation
        let same = make_items(&["a", "b"]);
        assert!(!memo.update(Some(&same)));

        let changed = make_items(&["a", "b", "c"]);
        assert!(memo.update(Some(&changed)));
        assert_eq!(memo.sequence().len(), 6);

        assert!(memo.update(None));
        assert!(memo.sequence().is_empty());
    }
}
