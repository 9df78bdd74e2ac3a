use std::env;
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::media::RodioMedia;
use crate::mpris::ControlCmd;
use crate::player::PlayerController;
use crate::playlist::{from_settings, scan};

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_warning) = settings::load_settings();
    let log_path = logging::init_logging(&settings.logging);
    if let Some(msg) = config_warning {
        warn!("{msg}");
    }
    info!(log = ?log_path, "starting tocata");

    // An optional directory argument replaces the configured playlist.
    let playlist = match env::args_os().nth(1) {
        Some(dir) => scan(Path::new(&dir), &settings.library)?,
        None => from_settings(&settings.playlist)?,
    };
    info!(tracks = playlist.len(), "playlist ready");

    let media = RodioMedia::new(&settings.audio);
    let player = PlayerController::new(playlist, media, settings.player.initial_volume);
    let mut app = App::new(player, &settings.controls);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = settings
        .mpris
        .enabled
        .then(|| crate::mpris::spawn_mpris(control_tx));

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if settings.ui.mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        mpris.as_ref(),
        &control_rx,
    );

    app.player()
        .media()
        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));

    if settings.ui.mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("exiting");
    run_result
}
