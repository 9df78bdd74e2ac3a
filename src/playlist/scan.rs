use std::path::{Path, PathBuf};

use lofty::prelude::{Accessor, TaggedFileExt};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::{Playlist, PlaylistError, Track};

const UNKNOWN_ARTIST: &str = "Unknown Artist";
const ARTWORK_STEMS: [&str; 4] = ["cover", "folder", "front", "album"];
const ARTWORK_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

fn has_extension(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Look for a `cover.jpg`-style image next to `audio`.
fn sibling_artwork(audio: &Path) -> Option<PathBuf> {
    let dir = audio.parent()?;
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            let stem = p
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_ascii_lowercase);
            let ext = p
                .extension()
                .and_then(|s| s.to_str())
                .map(str::to_ascii_lowercase);
            matches!((stem, ext), (Some(s), Some(e))
                if ARTWORK_STEMS.contains(&s.as_str()) && ARTWORK_EXTENSIONS.contains(&e.as_str()))
        })
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

fn read_tags(path: &Path) -> (Option<String>, Option<String>) {
    let Ok(tagged) = lofty::read_from_path(path) else {
        return (None, None);
    };
    let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
        return (None, None);
    };

    let non_empty = |v: Option<std::borrow::Cow<'_, str>>| {
        v.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
    };
    (non_empty(tag.title()), non_empty(tag.artist()))
}

/// Build a playlist from the audio files under `dir`.
///
/// Tracks are ordered case-insensitively by `artist - title` and numbered from 1.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Result<Playlist, PlaylistError> {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut tracks: Vec<Track> = Vec::new();
    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file() || !has_extension(path, &exts) {
            continue;
        }

        let (title, artist) = read_tags(path);
        let title = title.unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("UNKNOWN")
                .to_string()
        });

        tracks.push(Track {
            id: 0,
            title,
            artist: artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
            album_art: sibling_artwork(path),
            audio_src: path.to_path_buf(),
        });
    }

    if tracks.is_empty() {
        return Err(PlaylistError::NoAudioFiles(dir.to_path_buf()));
    }

    tracks.sort_by_cached_key(|t| format!("{} - {}", t.artist, t.title).to_lowercase());
    for (n, track) in tracks.iter_mut().enumerate() {
        track.id = n as u32 + 1;
    }
    debug!(dir = %dir.display(), count = tracks.len(), "scanned playlist directory");

    Playlist::new(tracks)
}
