use super::*;
use crate::config::ControlsSettings;
use crate::media::MediaEvent;
use crate::media::fake::{Call, FakeMedia};
use crate::player::PlayerController;
use crate::playlist::{Playlist, Track};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::path::PathBuf;

fn t(id: u32, title: &str) -> Track {
    Track {
        id,
        title: title.into(),
        artist: "Artist".into(),
        album_art: None,
        audio_src: PathBuf::from(format!("/music/{title}.mp3")),
    }
}

fn app_with(n: u32) -> App<FakeMedia> {
    let tracks = (1..=n).map(|i| t(i, &format!("song{i}"))).collect();
    let player = PlayerController::new(Playlist::new(tracks).unwrap(), FakeMedia::new(), 0.5);
    App::new(player, &ControlsSettings::default())
}

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

#[test]
fn keys_map_to_actions() {
    let mut app = app_with(3);
    let cases = [
        (' ', Action::TogglePlay),
        ('p', Action::TogglePlay),
        ('l', Action::Next),
        ('h', Action::Previous),
        ('L', Action::SkipForward),
        ('H', Action::SkipBackward),
        ('+', Action::VolumeUp),
        ('=', Action::VolumeUp),
        ('-', Action::VolumeDown),
        ('j', Action::CursorDown),
        ('k', Action::CursorUp),
        ('G', Action::CursorBottom),
        ('q', Action::Quit),
    ];
    for (c, action) in cases {
        assert_eq!(app.action_for_key(key(c)), Some(action), "key {c:?}");
    }
    assert_eq!(
        app.action_for_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
        Some(Action::PlayCursor)
    );
    assert_eq!(app.action_for_key(key('x')), None);
}

#[test]
fn gg_requires_two_presses_and_is_cancelled_by_other_keys() {
    let mut app = app_with(3);
    assert_eq!(app.action_for_key(key('g')), None);
    assert_eq!(app.action_for_key(key('g')), Some(Action::CursorTop));

    assert_eq!(app.action_for_key(key('g')), None);
    assert_eq!(app.action_for_key(key('j')), Some(Action::CursorDown));
    assert_eq!(app.action_for_key(key('g')), None);
}

#[test]
fn cursor_moves_within_bounds_without_touching_playback() {
    let mut app = app_with(3);
    app.player_mut().media_mut().clear_calls();

    app.apply(Action::CursorUp);
    assert_eq!(app.cursor(), 0);
    app.apply(Action::CursorDown);
    app.apply(Action::CursorDown);
    app.apply(Action::CursorDown);
    assert_eq!(app.cursor(), 2);
    app.apply(Action::CursorTop);
    assert_eq!(app.cursor(), 0);
    app.apply(Action::CursorBottom);
    assert_eq!(app.cursor(), 2);

    assert!(app.player().media().calls.is_empty());
    assert_eq!(app.player().state().current_track_index, 0);
}

#[test]
fn enter_plays_the_cursor_track() {
    let mut app = app_with(3);
    app.apply(Action::CursorBottom);
    app.apply(Action::PlayCursor);

    let state = app.player().state();
    assert_eq!(state.current_track_index, 2);
    assert!(state.is_playing);
    assert_eq!(app.cursor(), 2);
}

#[test]
fn cursor_follows_track_changes() {
    let mut app = app_with(4);
    app.apply(Action::CursorBottom);
    app.apply(Action::Next);
    assert_eq!(app.cursor(), 1);

    // Auto-advance observed through sync.
    app.player_mut().media_mut().emit(MediaEvent::Ended);
    app.sync();
    assert_eq!(app.player().state().current_track_index, 2);
    assert_eq!(app.cursor(), 2);

    // Without a track change the cursor is left alone.
    app.apply(Action::CursorTop);
    app.sync();
    assert_eq!(app.cursor(), 0);
}

#[test]
fn volume_steps_clamp() {
    let mut app = app_with(2);
    for _ in 0..30 {
        app.apply(Action::VolumeUp);
    }
    assert_eq!(app.player().state().volume, 1.0);
    app.apply(Action::SetVolume(0.02));
    app.apply(Action::VolumeDown);
    assert_eq!(app.player().state().volume, 0.0);
    assert_eq!(app.player().media().last_volume(), Some(0.0));
}

#[test]
fn play_and_pause_are_idempotent() {
    let mut app = app_with(2);
    app.player_mut().media_mut().clear_calls();

    app.apply(Action::Play);
    app.apply(Action::Play);
    assert_eq!(app.player().media().calls, vec![Call::Play]);

    app.apply(Action::Pause);
    app.apply(Action::Pause);
    assert_eq!(app.player().media().calls, vec![Call::Play, Call::Pause]);
}

#[test]
fn seek_actions_use_duration_and_configured_step() {
    let mut app = app_with(2);
    app.player_mut()
        .media_mut()
        .emit(MediaEvent::MetadataLoaded(200.0));
    app.sync();

    app.apply(Action::SeekToRatio(0.25));
    assert_eq!(app.player().state().current_time, 50.0);
    app.apply(Action::SkipForward);
    assert_eq!(app.player().state().current_time, 60.0);
    app.apply(Action::SeekBy(-25.0));
    assert_eq!(app.player().state().current_time, 35.0);
    app.apply(Action::SeekBy(500.0));
    assert_eq!(app.player().state().current_time, 200.0);
    app.apply(Action::SeekToRatio(-3.0));
    assert_eq!(app.player().state().current_time, 0.0);
}

#[test]
fn quit_is_reported_to_the_caller() {
    let mut app = app_with(1);
    assert!(!app.apply(Action::TogglePlay));
    assert!(app.apply(Action::Quit));
}

#[test]
fn mouse_ignores_everything_but_left_clicks() {
    let mut app = app_with(3);
    app.set_hitboxes(Hitboxes {
        next: Rect::new(10, 10, 5, 1),
        ..Hitboxes::default()
    });

    let mut ev = MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Right),
        column: 11,
        row: 10,
        modifiers: KeyModifiers::NONE,
    };
    assert_eq!(app.action_for_mouse(ev), None);

    ev.kind = MouseEventKind::Down(MouseButton::Left);
    assert_eq!(app.action_for_mouse(ev), Some(Action::Next));

    ev.row = 11;
    assert_eq!(app.action_for_mouse(ev), None);
}

#[test]
fn playlist_clicks_account_for_scroll_offset() {
    let mut app = app_with(40);
    app.set_hitboxes(Hitboxes {
        playlist: Rect::new(1, 20, 30, 8),
        playlist_offset: 12,
        ..Hitboxes::default()
    });

    let ev = MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: 3,
        row: 23,
        modifiers: KeyModifiers::NONE,
    };
    assert_eq!(app.action_for_mouse(ev), Some(Action::Select(15)));
}

#[test]
fn volume_bar_clicks_round_to_hundredths() {
    let mut app = app_with(1);
    app.set_hitboxes(Hitboxes {
        volume_bar: Rect::new(0, 0, 8, 1),
        ..Hitboxes::default()
    });

    let ev = MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: 3,
        row: 0,
        modifiers: KeyModifiers::NONE,
    };
    // 3 / 7 = 0.428...
    assert_eq!(app.action_for_mouse(ev), Some(Action::SetVolume(0.43)));
}
