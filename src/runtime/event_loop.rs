use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{Action, App, Hitboxes};
use crate::config;
use crate::media::MediaElement;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::{Published, update_mpris};
use crate::ui;

/// Main terminal event loop: applies media events, draws, and handles
/// keyboard, mouse and MPRIS input. Returns `Ok(())` when quit is requested.
pub fn run<M: MediaElement>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<M>,
    mpris: Option<&MprisHandle>,
    control_rx: &Receiver<ControlCmd>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut published: Option<Published> = None;

    loop {
        app.sync();

        // Keep MPRIS in sync even when changes come from auto-advance.
        if let Some(mpris) = mpris {
            update_mpris(mpris, app, &mut published);
        }

        let mut hitboxes = Hitboxes::default();
        terminal.draw(|f| hitboxes = ui::draw(f, app, &settings.ui))?;
        app.set_hitboxes(hitboxes);

        while let Ok(cmd) = control_rx.try_recv() {
            if app.apply(control_action(cmd)) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            let action = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.action_for_key(key),
                Event::Mouse(mouse) => app.action_for_mouse(mouse),
                _ => None,
            };
            if let Some(action) = action {
                if app.apply(action) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn control_action(cmd: ControlCmd) -> Action {
    match cmd {
        ControlCmd::Quit => Action::Quit,
        ControlCmd::Play => Action::Play,
        // There is no stopped state; stop pauses.
        ControlCmd::Pause | ControlCmd::Stop => Action::Pause,
        ControlCmd::PlayPause => Action::TogglePlay,
        ControlCmd::Next => Action::Next,
        ControlCmd::Prev => Action::Previous,
        ControlCmd::SeekBy(micros) => Action::SeekBy(micros as f64 / 1_000_000.0),
    }
}
