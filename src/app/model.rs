//! View model for the terminal UI: `App` and the `Action`s it understands.
//!
//! `App` wraps the `PlayerController` and adds what only the screen cares
//! about: the playlist cursor, the pending `gg` prefix and the clickable
//! regions recorded by the last draw.

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use crate::config::ControlsSettings;
use crate::media::MediaElement;
use crate::player::PlayerController;

/// A user intent, produced from keys, mouse clicks or remote control.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    TogglePlay,
    Play,
    Pause,
    Next,
    Previous,
    SkipForward,
    SkipBackward,
    /// Relative seek in seconds; negative goes backward.
    SeekBy(f64),
    /// Seek to a fraction of the current track's duration.
    SeekToRatio(f64),
    VolumeUp,
    VolumeDown,
    SetVolume(f64),
    CursorDown,
    CursorUp,
    CursorTop,
    CursorBottom,
    PlayCursor,
    Select(usize),
    Quit,
}

/// Screen regions that react to a left click, as laid out by the last draw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Hitboxes {
    pub seek_bar: Rect,
    pub volume_bar: Rect,
    pub previous: Rect,
    pub skip_backward: Rect,
    pub play_pause: Rect,
    pub skip_forward: Rect,
    pub next: Rect,
    /// Inner area of the playlist, one row per visible track.
    pub playlist: Rect,
    /// Playlist index rendered on the first row of `playlist`.
    pub playlist_offset: usize,
}

pub struct App<M: MediaElement> {
    player: PlayerController<M>,
    cursor: usize,
    pending_gg: bool,
    /// Track index the cursor last followed.
    followed: usize,
    hitboxes: Hitboxes,
    skip_seconds: f64,
    volume_step: f64,
}

impl<M: MediaElement> App<M> {
    pub fn new(player: PlayerController<M>, controls: &ControlsSettings) -> Self {
        let followed = player.state().current_track_index;
        Self {
            player,
            cursor: followed,
            pending_gg: false,
            followed,
            hitboxes: Hitboxes::default(),
            skip_seconds: controls.skip_seconds,
            volume_step: controls.volume_step,
        }
    }

    pub fn player(&self) -> &PlayerController<M> {
        &self.player
    }

    #[cfg(test)]
    pub fn player_mut(&mut self) -> &mut PlayerController<M> {
        &mut self.player
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn skip_seconds(&self) -> f64 {
        self.skip_seconds
    }

    pub fn set_hitboxes(&mut self, hitboxes: Hitboxes) {
        self.hitboxes = hitboxes;
    }

    /// Apply pending media events and move the cursor onto the playing track
    /// if it changed since the last call.
    pub fn sync(&mut self) {
        self.player.pump_events();
        self.follow_playing();
    }

    fn follow_playing(&mut self) {
        let index = self.player.state().current_track_index;
        if index != self.followed {
            self.followed = index;
            self.cursor = index;
        }
    }

    /// Map a key press to an action. Handles the two-key `gg` prefix.
    pub fn action_for_key(&mut self, key: KeyEvent) -> Option<Action> {
        let KeyCode::Char(c) = key.code else {
            self.pending_gg = false;
            return match key.code {
                KeyCode::Enter => Some(Action::PlayCursor),
                KeyCode::Down => Some(Action::CursorDown),
                KeyCode::Up => Some(Action::CursorUp),
                _ => None,
            };
        };

        if c == 'g' {
            self.pending_gg = !self.pending_gg;
            return (!self.pending_gg).then_some(Action::CursorTop);
        }
        self.pending_gg = false;

        match c {
            ' ' | 'p' => Some(Action::TogglePlay),
            'l' => Some(Action::Next),
            'h' => Some(Action::Previous),
            'L' => Some(Action::SkipForward),
            'H' => Some(Action::SkipBackward),
            '+' | '=' => Some(Action::VolumeUp),
            '-' => Some(Action::VolumeDown),
            'j' => Some(Action::CursorDown),
            'k' => Some(Action::CursorUp),
            'G' => Some(Action::CursorBottom),
            'q' => Some(Action::Quit),
            _ => None,
        }
    }

    /// Map a left click to an action using the regions of the last draw.
    pub fn action_for_mouse(&self, mouse: MouseEvent) -> Option<Action> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        let at = Position::new(mouse.column, mouse.row);
        let h = &self.hitboxes;

        if h.seek_bar.contains(at) {
            return Some(Action::SeekToRatio(ratio_at(h.seek_bar, at.x)));
        }
        if h.volume_bar.contains(at) {
            let v = (ratio_at(h.volume_bar, at.x) * 100.0).round() / 100.0;
            return Some(Action::SetVolume(v));
        }
        if h.playlist.contains(at) {
            let index = h.playlist_offset + usize::from(at.y - h.playlist.y);
            return (index < self.player.track_count()).then_some(Action::Select(index));
        }

        let buttons = [
            (h.previous, Action::Previous),
            (h.skip_backward, Action::SkipBackward),
            (h.play_pause, Action::TogglePlay),
            (h.skip_forward, Action::SkipForward),
            (h.next, Action::Next),
        ];
        // Shuffle and repeat are rendered but have no hitbox.
        buttons
            .into_iter()
            .find(|(area, _)| area.contains(at))
            .map(|(_, action)| action)
    }

    /// Run `action`. Returns `true` when the app should quit.
    pub fn apply(&mut self, action: Action) -> bool {
        let volume = self.player.state().volume;
        let last = self.player.track_count() - 1;

        match action {
            Action::TogglePlay => self.player.toggle_play_pause(),
            Action::Play => {
                if !self.player.state().is_playing {
                    self.player.toggle_play_pause();
                }
            }
            Action::Pause => {
                if self.player.state().is_playing {
                    self.player.toggle_play_pause();
                }
            }
            Action::Next => self.player.next(),
            Action::Previous => self.player.previous(),
            Action::SkipForward => self.player.skip_forward(self.skip_seconds),
            Action::SkipBackward => self.player.skip_backward(self.skip_seconds),
            Action::SeekBy(delta) if delta >= 0.0 => self.player.skip_forward(delta),
            Action::SeekBy(delta) => self.player.skip_backward(-delta),
            Action::SeekToRatio(ratio) => {
                let duration = self.player.state().duration;
                self.player.seek_to(ratio.clamp(0.0, 1.0) * duration);
            }
            Action::VolumeUp => self.player.set_volume(volume + self.volume_step),
            Action::VolumeDown => self.player.set_volume(volume - self.volume_step),
            Action::SetVolume(v) => self.player.set_volume(v),
            Action::CursorDown => self.cursor = (self.cursor + 1).min(last),
            Action::CursorUp => self.cursor = self.cursor.saturating_sub(1),
            Action::CursorTop => self.cursor = 0,
            Action::CursorBottom => self.cursor = last,
            Action::PlayCursor => self.select(self.cursor),
            Action::Select(index) => self.select(index),
            Action::Quit => return true,
        }

        self.follow_playing();
        false
    }

    fn select(&mut self, index: usize) {
        if let Err(err) = self.player.select_track(index) {
            tracing::warn!(error = %err, "ignoring selection");
            return;
        }
        // Selecting always moves the cursor, even when re-selecting the same track.
        self.cursor = index;
    }
}

/// Fraction of `area`'s width at column `x`, in `[0.0, 1.0]`.
fn ratio_at(area: Rect, x: u16) -> f64 {
    if area.width <= 1 {
        return 0.0;
    }
    let offset = f64::from(x.saturating_sub(area.x));
    (offset / f64::from(area.width - 1)).clamp(0.0, 1.0)
}
