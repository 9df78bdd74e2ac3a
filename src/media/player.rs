use std::path::Path;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::warn;

use crate::config::AudioSettings;

use super::thread::{MediaCmd, PositionHandle, PositionInfo, spawn_audio_thread};
use super::types::{MediaElement, MediaError, SourceEvent, SourceId};

/// `MediaElement` backed by a `rodio` sink living on a dedicated audio thread.
///
/// Commands are fire-and-forget; position reads come from a shared handle the
/// audio thread keeps up to date.
pub struct RodioMedia {
    tx: Sender<MediaCmd>,
    position: PositionHandle,
    source: SourceId,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl RodioMedia {
    pub fn new(audio_settings: &AudioSettings) -> Self {
        let (tx, rx) = mpsc::channel::<MediaCmd>();
        let position: PositionHandle = Arc::new(Mutex::new(PositionInfo::default()));

        let audio_handle = spawn_audio_thread(
            rx,
            position.clone(),
            Duration::from_millis(audio_settings.tick_ms.max(1)),
        );

        Self {
            tx,
            position,
            source: SourceId::default(),
            join: Mutex::new(Some(audio_handle)),
        }
    }

    fn send(&self, cmd: MediaCmd) -> Result<(), MediaError> {
        self.tx.send(cmd).map_err(|_| MediaError::Disconnected)
    }

    /// Position info, ignoring what the audio thread published for an older source.
    fn current_info(&self) -> PositionInfo {
        self.position
            .lock()
            .ok()
            .filter(|info| info.source == self.source)
            .map(|info| (*info).clone())
            .unwrap_or_default()
    }

    fn send_or_warn(&self, cmd: MediaCmd) {
        if let Err(e) = self.send(cmd) {
            warn!(error = %e, "dropped media command");
        }
    }

    /// Stop playback (fading out over `fade_out`) and wait for the audio thread.
    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(MediaCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Drop for RodioMedia {
    fn drop(&mut self) {
        self.quit_softly(Duration::ZERO);
    }
}

impl MediaElement for RodioMedia {
    fn load(&mut self, src: &Path) -> SourceId {
        self.source = self.source.next();
        if let Ok(mut info) = self.position.lock() {
            *info = PositionInfo {
                source: self.source,
                ..PositionInfo::default()
            };
        }
        self.send_or_warn(MediaCmd::Load(src.to_path_buf(), self.source));
        self.source
    }

    fn play(&mut self) -> Result<(), MediaError> {
        self.send(MediaCmd::Play)
    }

    fn pause(&mut self) {
        self.send_or_warn(MediaCmd::Pause);
    }

    fn seek(&mut self, seconds: f64) {
        let to = if seconds.is_finite() && seconds > 0.0 {
            Duration::from_secs_f64(seconds)
        } else {
            Duration::ZERO
        };
        if let Ok(mut info) = self.position.lock() {
            if info.source == self.source {
                info.elapsed = to;
            }
        }
        self.send_or_warn(MediaCmd::Seek(to));
    }

    fn set_volume(&mut self, volume: f64) {
        self.send_or_warn(MediaCmd::SetVolume(volume.clamp(0.0, 1.0) as f32));
    }

    fn current_time(&self) -> f64 {
        self.current_info().elapsed.as_secs_f64()
    }

    fn duration(&self) -> Option<f64> {
        self.current_info().duration.map(|d| d.as_secs_f64())
    }

    fn subscribe(&mut self, listener: Sender<SourceEvent>) {
        self.send_or_warn(MediaCmd::Subscribe(listener));
    }
}
