//! MPRIS (D-Bus) control surface.
//!
//! Exposes `org.mpris.MediaPlayer2.tocata` on the session bus. Incoming calls
//! become `ControlCmd`s for the event loop; the loop pushes state back through
//! `MprisHandle`, which wakes the bus thread to emit `PropertiesChanged`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_io::{Timer, block_on};
use tracing::{debug, warn};
use zbus::{Connection, interface, object_server::InterfaceRef};
use zvariant::{OwnedObjectPath, OwnedValue, Value};

use crate::playlist::Track;


const BUS_NAME: &str = "org.mpris.MediaPlayer2.tocata";
const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const NOTIFY_POLL: Duration = Duration::from_millis(100);

#[derive(Clone, Debug, PartialEq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
    /// Relative seek in microseconds.
    SeekBy(i64),
}

#[derive(Debug, Default)]
struct SharedState {
    is_playing: bool,
    title: Option<String>,
    artist: Vec<String>,
    url: Option<String>,
    art_url: Option<String>,
    length_micros: Option<i64>,
    track_id: Option<OwnedObjectPath>,
    volume: f64,
    position_micros: i64,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
}

fn file_url(path: &Path) -> String {
    let abs = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    format!("file://{}", abs.display())
}

fn micros(seconds: f64) -> i64 {
    (seconds.max(0.0) * 1_000_000.0).round() as i64
}

impl MprisHandle {
    /// Publish `track` as the current one. A `duration` of 0 means unknown.
    pub fn set_track_metadata(&self, track: &Track, duration: f64) {
        if let Ok(mut s) = self.state.lock() {
            s.title = Some(track.title.clone());
            s.artist = vec![track.artist.clone()];
            s.url = Some(file_url(&track.audio_src));
            s.art_url = track.album_art.as_deref().map(file_url);
            s.length_micros = (duration > 0.0).then(|| micros(duration));
            s.track_id =
                OwnedObjectPath::try_from(format!("{OBJECT_PATH}/track/{}", track.id)).ok();
        }
        let _ = self.notify.send(());
    }

    pub fn set_playback(&self, is_playing: bool, volume: f64) {
        if let Ok(mut s) = self.state.lock() {
            s.is_playing = is_playing;
            s.volume = volume;
        }
        let _ = self.notify.send(());
    }

    /// Position is polled by clients, so this never emits a change signal.
    pub fn set_position(&self, seconds: f64) {
        if let Ok(mut s) = self.state.lock() {
            s.position_micros = micros(seconds);
        }
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "tocata"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

fn owned<'a>(value: impl Into<Value<'a>>) -> Option<OwnedValue> {
    OwnedValue::try_from(value.into()).ok()
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    fn seek(&self, offset: i64) {
        let _ = self.tx.send(ControlCmd::SeekBy(offset));
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        if s.is_playing { "Playing" } else { "Paused" }
    }

    #[zbus(property)]
    fn volume(&self) -> f64 {
        self.state.lock().map(|s| s.volume).unwrap_or(0.0)
    }

    #[zbus(property)]
    fn position(&self) -> i64 {
        self.state.lock().map(|s| s.position_micros).unwrap_or(0)
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let mut entries: Vec<(&str, Option<OwnedValue>)> = Vec::new();
        if let Some(id) = &s.track_id {
            entries.push(("mpris:trackid", owned(id.clone().into_inner())));
        }
        if let Some(title) = &s.title {
            entries.push(("xesam:title", owned(title.as_str())));
        }
        if !s.artist.is_empty() {
            entries.push(("xesam:artist", owned(s.artist.clone())));
        }
        if let Some(url) = &s.url {
            entries.push(("xesam:url", owned(url.as_str())));
        }
        if let Some(art) = &s.art_url {
            entries.push(("mpris:artUrl", owned(art.as_str())));
        }
        if let Some(len) = s.length_micros {
            entries.push(("mpris:length", owned(len)));
        }

        for (key, value) in entries {
            if let Some(v) = value {
                map.insert(key.to_string(), v);
            }
        }
        map
    }
}

async fn emit_changes(iface: &InterfaceRef<PlayerIface>) {
    let emitter = iface.signal_emitter();
    let player = iface.get().await;
    let results = [
        player.playback_status_changed(emitter).await,
        player.metadata_changed(emitter).await,
        player.volume_changed(emitter).await,
    ];
    for err in results.into_iter().filter_map(Result::err) {
        debug!(error = %err, "failed to emit MPRIS property change");
    }
}

async fn serve(
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
    notify: Receiver<()>,
) -> zbus::Result<()> {
    let connection = Connection::session().await?;
    connection.request_name(BUS_NAME).await?;

    let object_server = connection.object_server();
    object_server
        .at(OBJECT_PATH, RootIface { tx: tx.clone() })
        .await?;
    object_server
        .at(OBJECT_PATH, PlayerIface { tx, state })
        .await?;
    let player = object_server
        .interface::<_, PlayerIface>(OBJECT_PATH)
        .await?;
    debug!(name = BUS_NAME, "MPRIS service registered");

    loop {
        Timer::after(NOTIFY_POLL).await;
        let mut changed = false;
        loop {
            match notify.try_recv() {
                Ok(()) => changed = true,
                Err(mpsc::TryRecvError::Empty) => break,
                // The event loop is gone; stop serving.
                Err(mpsc::TryRecvError::Disconnected) => return Ok(()),
            }
        }
        if changed {
            emit_changes(&player).await;
        }
    }
}

/// Start the MPRIS service on its own thread. Failing to reach the session
/// bus is logged and leaves the player fully usable without it.
pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel();

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        if let Err(e) = block_on(serve(tx, state_for_thread, notify_rx)) {
            warn!(error = %e, "MPRIS unavailable");
        }
    });

    MprisHandle {
        state,
        notify: notify_tx,
    }
}
