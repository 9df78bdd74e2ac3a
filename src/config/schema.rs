use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/tocata/config.toml` or `~/.config/tocata/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TOCATA__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub player: PlayerSettings,
    pub controls: ControlsSettings,
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub playlist: PlaylistSettings,
    pub library: LibrarySettings,
    pub logging: LoggingSettings,
    pub mpris: MprisSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Volume applied to the media element at startup, in `[0.0, 1.0]`.
    pub initial_volume: f64,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            initial_volume: 0.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to skip when pressing `H` / `L` or the rewind/forward buttons.
    pub skip_seconds: f64,
    /// Volume change applied by `+` / `-`.
    pub volume_step: f64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            skip_seconds: crate::player::SKIP_SECONDS,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
    /// Interval between position updates emitted by the audio thread (milliseconds).
    pub tick_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            quit_fade_out_ms: 300,
            tick_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Title of the playlist panel.
    pub playlist_title: String,
    /// Whether mouse clicks are captured and mapped to controls.
    pub mouse: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ tocata ~ ".to_string(),
            playlist_title: "Playlist".to_string(),
            mouse: true,
        }
    }
}

/// One configured playlist entry. Relative paths resolve against `PlaylistSettings::root`.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackEntry {
    pub id: u32,
    pub title: String,
    pub artist: String,
    pub album_art: Option<PathBuf>,
    pub audio_src: PathBuf,
}

impl TrackEntry {
    fn new(id: u32, title: &str, artist: &str, album_art: &str, audio_src: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            artist: artist.to_string(),
            album_art: Some(PathBuf::from(album_art)),
            audio_src: PathBuf::from(audio_src),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaylistSettings {
    /// Directory that relative `album_art` / `audio_src` paths are resolved against.
    pub root: PathBuf,
    pub tracks: Vec<TrackEntry>,
}

impl Default for PlaylistSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("public"),
            tracks: vec![
                TrackEntry::new(
                    1,
                    "Body Splash",
                    "Rey Vaqueiro",
                    "foto.jpg",
                    "music/Body-Splash.mp3",
                ),
                TrackEntry::new(
                    2,
                    "Centímetro",
                    "Rey Vaqueiro",
                    "foto2.jpg",
                    "music/Centimetro.mp3",
                ),
                TrackEntry::new(
                    3,
                    "Nino Abravanel",
                    "Rey Vaqueiro",
                    "foto3.jpg",
                    "music/Nino-Abravanel.mp3",
                ),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is not set, e.g. `"info"` or `"tocata=debug"`.
    pub level: String,
    /// Log file. Defaults to `$XDG_STATE_HOME/tocata/tocata.log`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MprisSettings {
    /// Register `org.mpris.MediaPlayer2.tocata` on the session bus.
    pub enabled: bool,
}

impl Default for MprisSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}
