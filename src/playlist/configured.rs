use std::path::{Path, PathBuf};

use crate::config::{PlaylistSettings, TrackEntry};

use super::model::{Playlist, PlaylistError, Track};

/// Build the playlist from `[[playlist.tracks]]`, resolving relative paths against `root`.
pub fn from_settings(settings: &PlaylistSettings) -> Result<Playlist, PlaylistError> {
    let tracks = settings
        .tracks
        .iter()
        .map(|entry| resolve_entry(&settings.root, entry))
        .collect();
    Playlist::new(tracks)
}

fn resolve_entry(root: &Path, entry: &TrackEntry) -> Track {
    Track {
        id: entry.id,
        title: entry.title.clone(),
        artist: entry.artist.clone(),
        album_art: entry.album_art.as_deref().map(|p| resolve(root, p)),
        audio_src: resolve(root, &entry.audio_src),
    }
}

// Web-style references ("/music/a.mp3") are rooted at `root`, not at `/`.
fn resolve(root: &Path, reference: &Path) -> PathBuf {
    if reference.is_absolute() && reference.exists() {
        return reference.to_path_buf();
    }
    let relative = reference.strip_prefix("/").unwrap_or(reference);
    root.join(relative)
}
