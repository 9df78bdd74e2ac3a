use super::*;
use crate::app::Action;
use crate::config::{ControlsSettings, Settings};
use crate::media::MediaEvent;
use crate::media::fake::FakeMedia;
use crate::player::PlayerController;
use crate::playlist::from_settings;
use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{Terminal, backend::TestBackend};

fn default_app() -> App<FakeMedia> {
    let settings = Settings::default();
    let playlist = from_settings(&settings.playlist).unwrap();
    let player = PlayerController::new(playlist, FakeMedia::new(), 0.5);
    App::new(player, &ControlsSettings::default())
}

fn render(terminal: &mut Terminal<TestBackend>, app: &mut App<FakeMedia>) -> String {
    let ui = UiSettings::default();
    let mut hitboxes = Hitboxes::default();
    terminal
        .draw(|f| hitboxes = draw(f, app, &ui))
        .unwrap();
    app.set_hitboxes(hitboxes);

    let buf = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buf.area.height {
        for x in 0..buf.area.width {
            out.push_str(buf[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

fn click(column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn center(r: Rect) -> (u16, u16) {
    (r.x + r.width / 2, r.y + r.height / 2)
}

#[test]
fn controls_text_includes_skip_seconds() {
    let text = controls_text(15.0);
    assert!(text.contains("[H/L] skip -/+15s"));
    assert!(text.starts_with("[space/p] play/pause"));
    assert!(text.ends_with("[q] quit"));
}

#[test]
fn renders_now_playing_volume_and_playlist() {
    let mut terminal = Terminal::new(TestBackend::new(90, 30)).unwrap();
    let mut app = default_app();
    let screen = render(&mut terminal, &mut app);

    assert!(screen.contains("~ tocata ~"));
    assert!(screen.contains("foto.jpg"));
    assert!(screen.contains("Body Splash"));
    assert!(screen.contains("Volume: 50%"));
    assert!(screen.contains("00:00"));
    assert!(screen.contains("> play"));
    assert!(screen.contains("shuffle"));
    assert!(screen.contains("repeat"));
    assert!(screen.contains(">  1. Body Splash - Rey Vaqueiro"));
    assert!(screen.contains(" 2. Centímetro - Rey Vaqueiro"));
    assert!(screen.contains(" 3. Nino Abravanel - Rey Vaqueiro"));
}

#[test]
fn renders_time_labels_and_pause_button_while_playing() {
    let mut terminal = Terminal::new(TestBackend::new(90, 30)).unwrap();
    let mut app = default_app();
    app.apply(Action::TogglePlay);
    app.player_mut()
        .media_mut()
        .emit(MediaEvent::MetadataLoaded(125.0));
    app.player_mut().media_mut().emit(MediaEvent::TimeUpdate(61.0));
    app.sync();

    let screen = render(&mut terminal, &mut app);
    assert!(screen.contains("01:01"));
    assert!(screen.contains("02:05"));
    assert!(screen.contains("|| pause"));
}

#[test]
fn clicks_map_to_actions_through_hitboxes() {
    let mut terminal = Terminal::new(TestBackend::new(90, 30)).unwrap();
    let mut app = default_app();
    render(&mut terminal, &mut app);

    // The playlist's inner area starts one row below its border.
    let list = app_hitboxes(&mut terminal, &mut app).playlist;
    assert_eq!(
        app.action_for_mouse(click(list.x + 4, list.y + 2)),
        Some(Action::Select(2))
    );
    // Rows below the last track do nothing.
    assert_eq!(app.action_for_mouse(click(list.x + 4, list.y + 5)), None);

    let h = app_hitboxes(&mut terminal, &mut app);
    let (x, y) = center(h.next);
    assert_eq!(app.action_for_mouse(click(x, y)), Some(Action::Next));
    let (x, y) = center(h.play_pause);
    assert_eq!(app.action_for_mouse(click(x, y)), Some(Action::TogglePlay));
    let (x, y) = center(h.skip_backward);
    assert_eq!(app.action_for_mouse(click(x, y)), Some(Action::SkipBackward));

    let v = h.volume_bar;
    assert_eq!(
        app.action_for_mouse(click(v.x + v.width - 1, v.y)),
        Some(Action::SetVolume(1.0))
    );
    assert_eq!(
        app.action_for_mouse(click(v.x, v.y)),
        Some(Action::SetVolume(0.0))
    );

    let s = h.seek_bar;
    assert_eq!(
        app.action_for_mouse(click(s.x + s.width - 1, s.y)),
        Some(Action::SeekToRatio(1.0))
    );
}

#[test]
fn clicking_a_playlist_row_selects_and_plays_it() {
    let mut terminal = Terminal::new(TestBackend::new(90, 30)).unwrap();
    let mut app = default_app();
    let h = app_hitboxes(&mut terminal, &mut app);

    let action = app
        .action_for_mouse(click(h.playlist.x + 6, h.playlist.y + 1))
        .unwrap();
    app.apply(action);

    let state = app.player().state();
    assert_eq!(state.current_track_index, 1);
    assert!(state.is_playing);
    let screen = render(&mut terminal, &mut app);
    assert!(screen.contains(">  2. Centímetro - Rey Vaqueiro"));
    assert!(screen.contains("foto2.jpg"));
}

#[test]
fn tiny_terminal_does_not_panic() {
    let mut terminal = Terminal::new(TestBackend::new(12, 6)).unwrap();
    let mut app = default_app();
    render(&mut terminal, &mut app);
}

fn app_hitboxes(terminal: &mut Terminal<TestBackend>, app: &mut App<FakeMedia>) -> Hitboxes {
    let ui = UiSettings::default();
    let mut hitboxes = Hitboxes::default();
    terminal.draw(|f| hitboxes = draw(f, app, &ui)).unwrap();
    app.set_hitboxes(hitboxes);
    hitboxes
}
