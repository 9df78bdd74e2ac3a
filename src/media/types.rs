//! Media boundary types: the element trait, the events it emits and its errors.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use thiserror::Error;

/// Events emitted by a media element, delivered in the order they happen.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Periodic position report, in seconds.
    TimeUpdate(f64),
    /// Duration of the loaded source became known, in seconds.
    MetadataLoaded(f64),
    /// Playback reached the end of the source.
    Ended,
    /// A play request could not be honoured.
    PlayFailed(MediaError),
}

/// Identifies one `load` on a media element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceId(pub u64);

impl SourceId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// A `MediaEvent` tagged with the source that produced it. Events queued
/// before a `load` keep the old id, so listeners can tell them apart.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEvent {
    pub source: SourceId,
    pub event: MediaEvent,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MediaError {
    #[error("failed to open {}: {kind}", path.display())]
    Open { path: PathBuf, kind: io::ErrorKind },

    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("no audio output device: {0}")]
    NoOutputDevice(String),

    #[error("no source loaded")]
    NothingLoaded,

    #[error("media backend is gone")]
    Disconnected,
}

/// Property-bag-plus-event-source view of a playback primitive.
pub trait MediaElement {
    /// Replace the source. The element is left paused at position 0, and
    /// every later event carries the returned id.
    fn load(&mut self, src: &Path) -> SourceId;

    /// Start or resume playback. Failure may also be reported later as
    /// `MediaEvent::PlayFailed`.
    fn play(&mut self) -> Result<(), MediaError>;

    fn pause(&mut self);

    fn seek(&mut self, seconds: f64);

    /// Output volume in `[0.0, 1.0]`.
    fn set_volume(&mut self, volume: f64);

    /// Current position in seconds.
    fn current_time(&self) -> f64;

    /// Duration of the loaded source, when known.
    fn duration(&self) -> Option<f64>;

    /// Register a listener. Listeners whose receiver is gone are dropped.
    fn subscribe(&mut self, listener: Sender<SourceEvent>);
}

/// Deliver `event` to every live listener, dropping disconnected ones.
pub(crate) fn broadcast(
    listeners: &mut Vec<Sender<SourceEvent>>,
    source: SourceId,
    event: &MediaEvent,
) {
    listeners.retain(|tx| {
        tx.send(SourceEvent {
            source,
            event: event.clone(),
        })
        .is_ok()
    });
}
