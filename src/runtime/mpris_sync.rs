use crate::app::App;
use crate::media::MediaElement;
use crate::mpris::MprisHandle;

/// What was last pushed to MPRIS, to avoid signalling unchanged state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Published {
    index: usize,
    duration: f64,
    is_playing: bool,
    volume: f64,
}

pub fn update_mpris<M: MediaElement>(
    mpris: &MprisHandle,
    app: &App<M>,
    last: &mut Option<Published>,
) {
    let player = app.player();
    let state = player.state();
    mpris.set_position(state.current_time);

    let now = Published {
        index: state.current_track_index,
        duration: state.duration,
        is_playing: state.is_playing,
        volume: state.volume,
    };
    let track_changed = last.is_none_or(|l| l.index != now.index || l.duration != now.duration);
    if track_changed {
        mpris.set_track_metadata(player.current_track(), state.duration);
    }
    if last.is_none_or(|l| l.is_playing != now.is_playing || l.volume != now.volume) {
        mpris.set_playback(state.is_playing, state.volume);
    }
    *last = Some(now);
}
