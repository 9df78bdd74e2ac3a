use std::sync::mpsc::{self, Receiver, TryRecvError};

use thiserror::Error;
use tracing::{debug, warn};

use crate::media::{MediaElement, MediaEvent, SourceEvent, SourceId};
use crate::playlist::{Playlist, Track};

use super::state::{PlayerState, clamp_volume, sanitize_seconds};

/// Default step for `skip_forward` / `skip_backward`, in seconds.
pub const SKIP_SECONDS: f64 = 10.0;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("track index {index} out of range (playlist has {count} tracks)")]
    TrackOutOfRange { index: usize, count: usize },
}

/// Owns `PlayerState` and the media element, and keeps the two in sync.
pub struct PlayerController<M: MediaElement> {
    playlist: Playlist,
    state: PlayerState,
    media: M,
    events: Receiver<SourceEvent>,

    /// Index whose source the media element currently holds.
    loaded: Option<usize>,
    /// Id of the last `load`; events tagged with anything else are dropped.
    source: SourceId,
    /// Last playing/paused condition pushed to the media element.
    applied_playing: bool,
}

impl<M: MediaElement> PlayerController<M> {
    /// Subscribe to `media`, apply `initial_volume` and load the first track (paused).
    pub fn new(playlist: Playlist, mut media: M, initial_volume: f64) -> Self {
        let (tx, rx) = mpsc::channel();
        media.subscribe(tx);

        let state = PlayerState::new(initial_volume);
        media.set_volume(state.volume);

        let mut player = Self {
            playlist,
            state,
            media,
            events: rx,
            loaded: None,
            source: SourceId::default(),
            applied_playing: false,
        };
        player.reconcile();
        player
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn current_track(&self) -> &Track {
        &self.playlist[self.state.current_track_index]
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    #[cfg(test)]
    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn track_count(&self) -> usize {
        self.playlist.len()
    }

    pub fn toggle_play_pause(&mut self) {
        self.state.is_playing = !self.state.is_playing;
        self.reconcile();
    }

    /// Advance to the following track, wrapping to the first, and play it.
    pub fn next(&mut self) {
        let next = (self.state.current_track_index + 1) % self.track_count();
        self.change_track(next);
    }

    /// Go back to the preceding track, wrapping to the last, and play it.
    pub fn previous(&mut self) {
        let count = self.track_count();
        let prev = (self.state.current_track_index + count - 1) % count;
        self.change_track(prev);
    }

    pub fn select_track(&mut self, index: usize) -> Result<(), PlayerError> {
        let count = self.track_count();
        if index >= count {
            return Err(PlayerError::TrackOutOfRange { index, count });
        }
        self.change_track(index);
        Ok(())
    }

    /// Auto-advance when the loaded source finishes.
    pub fn on_track_ended(&mut self) {
        self.next();
    }

    /// Move to `seconds`, clamped to `[0, duration]`.
    pub fn seek_to(&mut self, seconds: f64) {
        let target = sanitize_seconds(seconds).min(self.known_duration());
        self.apply_position(target);
    }

    pub fn skip_forward(&mut self, delta: f64) {
        let target = (self.media.current_time() + delta).min(self.known_duration());
        self.apply_position(target.max(0.0));
    }

    pub fn skip_backward(&mut self, delta: f64) {
        let target = (self.media.current_time() - delta).max(0.0);
        self.apply_position(target);
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.state.volume = clamp_volume(volume);
        self.media.set_volume(self.state.volume);
    }

    /// Apply every pending media event in arrival order.
    pub fn pump_events(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(SourceEvent { source, event }) if source == self.source => {
                    self.handle_event(event)
                }
                Ok(SourceEvent { source, event }) => {
                    debug!(source = source.0, ?event, "dropping event from a replaced source");
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("media element stopped delivering events");
                    break;
                }
            }
        }
    }

    fn handle_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::TimeUpdate(t) => self.state.current_time = sanitize_seconds(t),
            MediaEvent::MetadataLoaded(d) => {
                self.state.duration = sanitize_seconds(d);
                debug!(duration = self.state.duration, "metadata loaded");
            }
            MediaEvent::Ended => {
                debug!(index = self.state.current_track_index, "track ended");
                self.on_track_ended();
            }
            MediaEvent::PlayFailed(err) => {
                warn!(error = %err, track = %self.current_track().title, "playback failed to start");
                self.applied_playing = false;
            }
        }
    }

    /// Duration from the last metadata event, or straight from the element
    /// when that event has not been pumped yet. 0 when neither knows.
    fn known_duration(&self) -> f64 {
        if self.state.duration > 0.0 {
            self.state.duration
        } else {
            self.media.duration().map_or(0.0, sanitize_seconds)
        }
    }

    fn apply_position(&mut self, seconds: f64) {
        self.media.seek(seconds);
        self.state.current_time = seconds;
    }

    fn change_track(&mut self, index: usize) {
        debug!(from = self.state.current_track_index, to = index, "track change");
        self.state.current_track_index = index;
        self.state.is_playing = true;
        self.state.current_time = 0.0;
        self.state.duration = 0.0;
        // Re-selecting the loaded track restarts it.
        self.loaded = None;
        self.reconcile();
    }

    /// Make the media element match the selected track and `is_playing`.
    ///
    /// Loads first when the selected track is not the loaded one, then issues
    /// at most one `play` or `pause`.
    fn reconcile(&mut self) {
        let index = self.state.current_track_index;
        if self.loaded != Some(index) {
            let src = self.playlist[index].audio_src.clone();
            self.source = self.media.load(&src);
            self.loaded = Some(index);
            self.applied_playing = false;
        }

        if self.state.is_playing == self.applied_playing {
            return;
        }

        if self.state.is_playing {
            match self.media.play() {
                Ok(()) => self.applied_playing = true,
                Err(err) => {
                    warn!(error = %err, track = %self.playlist[index].title, "playback failed to start");
                }
            }
        } else {
            self.media.pause();
            self.applied_playing = false;
        }
    }
}
