use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, warn};

use super::sink::create_sink_at;
use super::types::{MediaError, MediaEvent, SourceEvent, SourceId, broadcast};

/// Commands accepted by the audio thread.
#[derive(Debug)]
pub(super) enum MediaCmd {
    Load(PathBuf, SourceId),
    Play,
    Pause,
    Seek(Duration),
    SetVolume(f32),
    Subscribe(Sender<SourceEvent>),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Position information shared with the element handle so reads never block
/// on the audio thread.
#[derive(Debug, Clone, Default)]
pub(super) struct PositionInfo {
    /// Source the numbers below belong to.
    pub source: SourceId,
    pub elapsed: Duration,
    pub duration: Option<Duration>,
}

pub(super) type PositionHandle = std::sync::Arc<std::sync::Mutex<PositionInfo>>;

struct AudioThread {
    stream: Result<OutputStream, String>,
    sink: Option<Sink>,
    src: Option<PathBuf>,
    source: SourceId,
    load_error: Option<MediaError>,
    duration: Option<Duration>,
    volume: f32,

    // Track start time and accumulated elapsed when paused.
    paused: bool,
    started_at: Option<Instant>,
    accumulated: Duration,

    listeners: Vec<Sender<SourceEvent>>,
    position: PositionHandle,
}

impl AudioThread {
    fn new(stream: Result<OutputStream, String>, position: PositionHandle) -> Self {
        Self {
            stream,
            sink: None,
            src: None,
            source: SourceId::default(),
            load_error: None,
            duration: None,
            volume: 1.0,
            paused: true,
            started_at: None,
            accumulated: Duration::ZERO,
            listeners: Vec::new(),
            position,
        }
    }

    fn emit(&mut self, event: MediaEvent) {
        broadcast(&mut self.listeners, self.source, &event);
    }

    fn elapsed(&self) -> Duration {
        let elapsed = self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed());
        match self.duration {
            Some(total) => elapsed.min(total),
            None => elapsed,
        }
    }

    fn publish(&self) {
        if let Ok(mut info) = self.position.lock() {
            info.source = self.source;
            info.elapsed = self.elapsed();
            info.duration = self.duration;
        }
    }

    fn handle(&mut self, cmd: MediaCmd) {
        match cmd {
            MediaCmd::Load(path, source) => self.load(path, source),
            MediaCmd::Play => self.play(),
            MediaCmd::Pause => self.pause(),
            MediaCmd::Seek(to) => self.seek(to),
            MediaCmd::SetVolume(v) => {
                self.volume = v;
                if let Some(s) = self.sink.as_ref() {
                    s.set_volume(v);
                }
            }
            MediaCmd::Subscribe(tx) => self.listeners.push(tx),
            // Handled by the thread loop.
            MediaCmd::Quit { .. } => {}
        }
    }

    /// Build a fresh paused sink for the current source at `start_at`.
    fn open_at(&mut self, start_at: Duration) -> Result<(), MediaError> {
        let Some(path) = self.src.clone() else {
            return Err(MediaError::NothingLoaded);
        };
        let stream = self
            .stream
            .as_ref()
            .map_err(|reason| MediaError::NoOutputDevice(reason.clone()))?;

        let loaded = create_sink_at(stream, &path, start_at, self.volume)?;
        if let Some(old) = self.sink.replace(loaded.sink) {
            old.stop();
        }
        if loaded.duration.is_some() {
            self.duration = loaded.duration;
        }
        Ok(())
    }

    fn load(&mut self, path: PathBuf, source: SourceId) {
        debug!(src = %path.display(), source = source.0, "loading source");
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.src = Some(path);
        self.source = source;
        self.load_error = None;
        self.duration = None;
        self.paused = true;
        self.started_at = None;
        self.accumulated = Duration::ZERO;

        match self.open_at(Duration::ZERO) {
            Ok(()) => {
                if let Some(total) = self.duration {
                    self.emit(MediaEvent::MetadataLoaded(total.as_secs_f64()));
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to load source");
                self.load_error = Some(e);
            }
        }
        self.publish();
    }

    fn play(&mut self) {
        if let Some(err) = self.load_error.clone() {
            self.emit(MediaEvent::PlayFailed(err));
            return;
        }
        if !self.paused {
            return;
        }

        // Playing an ended source starts it over.
        let ended = self.sink.as_ref().map(Sink::empty).unwrap_or(true);
        if ended {
            if let Err(e) = self.open_at(Duration::ZERO) {
                self.emit(MediaEvent::PlayFailed(e));
                return;
            }
            self.accumulated = Duration::ZERO;
        }

        if let Some(s) = self.sink.as_ref() {
            s.play();
            self.paused = false;
            self.started_at = Some(Instant::now());
        }
        self.publish();
    }

    fn pause(&mut self) {
        if self.paused {
            return;
        }
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
        self.paused = true;
        self.publish();
    }

    fn seek(&mut self, to: Duration) {
        if self.src.is_none() || self.load_error.is_some() {
            return;
        }
        let to = match self.duration {
            Some(total) => to.min(total),
            None => to,
        };

        // Scrubbing: rebuild the current sink and skip into the file.
        match self.open_at(to) {
            Ok(()) => {
                if let Some(s) = self.sink.as_ref() {
                    if self.paused {
                        s.pause();
                    } else {
                        s.play();
                    }
                }
                self.accumulated = to;
                self.started_at = (!self.paused).then(Instant::now);
            }
            Err(e) => warn!(error = %e, "seek failed"),
        }
        self.publish();
    }

    fn tick(&mut self) {
        if self.paused {
            return;
        }
        let Some(ended) = self.sink.as_ref().map(Sink::empty) else {
            return;
        };

        if ended {
            let end = self.duration.unwrap_or_else(|| self.elapsed());
            self.accumulated = end;
            self.started_at = None;
            self.paused = true;
            self.publish();
            self.emit(MediaEvent::Ended);
        } else {
            self.publish();
            let secs = self.elapsed().as_secs_f64();
            self.emit(MediaEvent::TimeUpdate(secs));
        }
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(s) = self.sink.take() {
            if !self.paused {
                // Fade out gently before stopping.
                fade_out_sink(&s, self.volume, fade_out_ms);
            }
            s.stop();
        }
        self.paused = true;
        self.publish();
    }
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<MediaCmd>,
    position: PositionHandle,
    tick: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped, which
                // would scribble over the TUI.
                stream.log_on_drop(false);
                Ok(stream)
            }
            Err(e) => {
                error!(error = %e, "failed to open default audio output");
                Err(e.to_string())
            }
        };

        let mut state = AudioThread::new(stream, position);
        let mut last_tick = Instant::now();

        loop {
            let wait = tick.saturating_sub(last_tick.elapsed());
            match rx.recv_timeout(wait) {
                Ok(MediaCmd::Quit { fade_out_ms }) => {
                    state.quit(fade_out_ms);
                    break;
                }
                Ok(cmd) => state.handle(cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    state.quit(0);
                    break;
                }
            }

            if last_tick.elapsed() >= tick {
                state.tick();
                last_tick = Instant::now();
            }
        }
        debug!("audio thread finished");
    })
}
