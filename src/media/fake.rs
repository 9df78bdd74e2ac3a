//! Recording `MediaElement` used by tests.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use super::types::{MediaElement, MediaError, MediaEvent, SourceEvent, SourceId, broadcast};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load(PathBuf),
    Play,
    Pause,
    Seek(f64),
    SetVolume(f64),
}

#[derive(Debug, Default)]
pub struct FakeMedia {
    pub calls: Vec<Call>,
    pub position: f64,
    pub duration: Option<f64>,
    /// When set, every `play()` fails synchronously with this error.
    pub fail_play: Option<MediaError>,
    /// Id handed out by the most recent `load`.
    pub source: SourceId,
    listeners: Vec<Sender<SourceEvent>>,
}

impl FakeMedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event for the current source to subscribers as the platform would.
    pub fn emit(&mut self, event: MediaEvent) {
        broadcast(&mut self.listeners, self.source, &event);
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn plays(&self) -> usize {
        self.count(&Call::Play)
    }

    pub fn pauses(&self) -> usize {
        self.count(&Call::Pause)
    }

    pub fn loads(&self) -> Vec<&Path> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Load(p) => Some(p.as_path()),
                _ => None,
            })
            .collect()
    }

    pub fn last_volume(&self) -> Option<f64> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::SetVolume(v) => Some(*v),
            _ => None,
        })
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl MediaElement for FakeMedia {
    fn load(&mut self, src: &Path) -> SourceId {
        self.calls.push(Call::Load(src.to_path_buf()));
        self.position = 0.0;
        self.duration = None;
        self.source = self.source.next();
        self.source
    }

    fn play(&mut self) -> Result<(), MediaError> {
        self.calls.push(Call::Play);
        match self.fail_play.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
    }

    fn seek(&mut self, seconds: f64) {
        self.calls.push(Call::Seek(seconds));
        self.position = seconds;
    }

    fn set_volume(&mut self, volume: f64) {
        self.calls.push(Call::SetVolume(volume));
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn subscribe(&mut self, listener: Sender<SourceEvent>) {
        self.listeners.push(listener);
    }
}
