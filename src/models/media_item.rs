use std::path::Path;

use gtk4::gio;
use gtk4::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Unknown,
}

impl MediaKind {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "webm" | "mp4" | "mkv" | "avi" | "mov" | "m4v" | "ogv" => Self::Video,
            _ => Self::Unknown,
        }
    }
}

/// A playable media resource identified by its URL.
///
/// Items are immutable once handed to the carousel; equality is by URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaItem {
    url: String,
}

impl MediaItem {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Build an item from a local path, converting it to a `file://` URI.
    pub fn from_path(path: &Path) -> Self {
        Self::from_file(&gio::File::for_path(path))
    }

    pub fn from_file(file: &gio::File) -> Self {
        Self::new(file.uri().to_string())
    }

    /// Parse a playlist entry. Entries with a URI scheme are kept verbatim,
    /// anything else is treated as a filesystem path.
    pub fn from_entry(entry: &str) -> Option<Self> {
        let entry = entry.trim();
        if entry.is_empty() {
            return None;
        }
        if has_uri_scheme(entry) {
            Some(Self::new(entry))
        } else {
            Some(Self::from_path(Path::new(entry)))
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// A `gio::File` handle suitable for `gtk4::MediaFile`.
    pub fn to_file(&self) -> gio::File {
        gio::File::for_uri(&self.url)
    }
}

fn has_uri_scheme(entry: &str) -> bool {
    match entry.split_once("://") {
        Some((scheme, _)) => {
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(MediaKind::from_extension("MP4"), MediaKind::Video);
        assert_eq!(MediaKind::from_extension("webm"), MediaKind::Video);
        assert_eq!(MediaKind::from_extension("jpg"), MediaKind::Unknown);
    }

    #[test]
    fn test_entry_with_scheme_kept_verbatim() {
        let item = MediaItem::from_entry("  https://example.com/a.webm ").unwrap();
        assert_eq!(item.url(), "https://example.com/a.webm");
    }

    #[test]
    fn test_entry_path_becomes_file_uri() {
        let item = MediaItem::from_entry("/tmp/clip.mp4").unwrap();
        assert_eq!(item.url(), "file:///tmp/clip.mp4");
    }

    #[test]
    fn test_blank_entry_rejected() {
        assert!(MediaItem::from_entry("   ").is_none());
    }
}
