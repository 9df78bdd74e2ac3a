/// Mutable player state, owned by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    /// Always indexes a valid track.
    pub current_track_index: usize,
    pub is_playing: bool,
    /// In `[0.0, 1.0]`; independent of track selection.
    pub volume: f64,
    /// Seconds; `0` until the loaded source reports its duration.
    pub duration: f64,
    /// Seconds.
    pub current_time: f64,
}

impl PlayerState {
    pub fn new(volume: f64) -> Self {
        Self {
            current_track_index: 0,
            is_playing: false,
            volume: clamp_volume(volume),
            duration: 0.0,
            current_time: 0.0,
        }
    }

    /// Playback progress in `[0.0, 1.0]`, `0` while the duration is unknown.
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Volume as a whole percentage, as shown in the `Volume: NN%` label.
    pub fn volume_percent(&self) -> u8 {
        (self.volume * 100.0).round() as u8
    }
}

pub(crate) fn clamp_volume(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Durations and positions reported by the platform may be NaN or negative
/// before metadata loads.
pub(crate) fn sanitize_seconds(secs: f64) -> f64 {
    if secs.is_finite() && secs > 0.0 { secs } else { 0.0 }
}
