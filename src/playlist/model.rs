use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A static descriptor of one playable audio item.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: u32,
    pub title: String,
    pub artist: String,
    pub album_art: Option<PathBuf>,
    pub audio_src: PathBuf,
}

#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("playlist has no tracks")]
    Empty,

    #[error("duplicate track id {0}")]
    DuplicateId(u32),

    #[error("no audio files found under {}", .0.display())]
    NoAudioFiles(PathBuf),
}

/// Non-empty ordered list of tracks with unique ids.
#[derive(Debug, Clone)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Result<Self, PlaylistError> {
        if tracks.is_empty() {
            return Err(PlaylistError::Empty);
        }

        let mut seen = HashSet::with_capacity(tracks.len());
        for track in &tracks {
            if !seen.insert(track.id) {
                return Err(PlaylistError::DuplicateId(track.id));
            }
        }

        Ok(Self { tracks })
    }

    /// Number of tracks; always at least one.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}

impl std::ops::Index<usize> for Playlist {
    type Output = Track;

    fn index(&self, index: usize) -> &Track {
        &self.tracks[index]
    }
}

/// Short label for an artwork reference: its file name, or a placeholder.
pub fn artwork_label(art: Option<&Path>) -> String {
    art.and_then(|p| p.file_name())
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| "no artwork".to_string())
}
