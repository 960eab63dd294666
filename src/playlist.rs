use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::models::MediaItem;

#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("failed to read playlist {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Parse playlist text: one URL or path per line, `#` starts a comment line.
pub fn parse_playlist(text: &str) -> Vec<MediaItem> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .filter_map(MediaItem::from_entry)
        .collect()
}

/// Read a playlist file. A missing file is `Ok(None)`: the host simply has
/// nothing to show.
pub fn read_playlist(path: &Path) -> Result<Option<Vec<MediaItem>>, PlaylistError> {
    match std::fs::read_to_string(path) {
        Ok(text) => {
            let items = parse_playlist(&text);
            tracing::info!("Loaded {} items from playlist {}", items.len(), path.display());
            Ok(Some(items))
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(PlaylistError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Video files directly inside `dir`, sorted by path. Hidden entries are skipped.
pub fn scan_video_dir(dir: &Path) -> Vec<MediaItem> {
    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_entry(|entry| {
            entry
                .file_name()
                .to_str()
                .map(|name| !name.starts_with('.'))
                .unwrap_or(true)
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::debug!(error = %err, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| {
                    crate::models::MediaKind::from_extension(ext) == crate::models::MediaKind::Video
                })
        })
        .collect();

    paths.sort();
    paths.iter().map(|path| MediaItem::from_path(path)).collect()
}
