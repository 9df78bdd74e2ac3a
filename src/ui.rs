//! UI rendering helpers for the terminal user interface.
//!
//! `draw` renders the whole player with `ratatui` and reports where the
//! clickable parts ended up, so mouse input can be mapped back to actions.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, LineGauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, Hitboxes};
use crate::config::UiSettings;
use crate::media::MediaElement;
use crate::player::format_time;
use crate::playlist::artwork_label;

#[cfg(test)]
mod tests;

const CONTROLS: [(&str, &str); 8] = [
    ("space/p", "play/pause"),
    ("h/l", "prev/next"),
    ("H/L", ""),
    ("+/-", "volume"),
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter", "play selected"),
    ("q", "quit"),
];

/// Render the controls help text, incorporating the skip step.
fn controls_text(skip_seconds: f64) -> String {
    CONTROLS
        .iter()
        .map(|(keys, what)| {
            if *keys == "H/L" {
                format!("[H/L] skip -/+{skip_seconds}s")
            } else {
                format!("[{keys}] {what}")
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

fn left_padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 1,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI into `frame` and return the clickable regions.
pub fn draw<M: MediaElement>(frame: &mut Frame, app: &App<M>, ui_settings: &UiSettings) -> Hitboxes {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Min(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    draw_now_playing(frame, app, chunks[1]);
    let mut hitboxes = draw_transport(frame, app, chunks[2]);
    let (playlist, offset) = draw_playlist(frame, app, ui_settings, chunks[3]);
    hitboxes.playlist = playlist;
    hitboxes.playlist_offset = offset;

    let footer = Paragraph::new(controls_text(app.skip_seconds()))
        .block(left_padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);

    hitboxes
}

fn draw_now_playing<M: MediaElement>(frame: &mut Frame, app: &App<M>, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" now playing ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(1)])
        .split(inner);

    let track = app.player().current_track();
    let artwork = Paragraph::new(artwork_label(track.album_art.as_deref()))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" artwork "));
    frame.render_widget(artwork, cols[0]);

    let details = Paragraph::new(vec![
        Line::from(track.title.as_str().bold()),
        Line::from(track.artist.as_str().dim()),
    ])
    .block(Block::default().padding(Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }))
    .wrap(Wrap { trim: true });
    frame.render_widget(details, cols[1]);
}

fn gauge(ratio: f64) -> LineGauge<'static> {
    LineGauge::default()
        .ratio(ratio.clamp(0.0, 1.0))
        .label("")
        .filled_style(Style::default().add_modifier(Modifier::BOLD))
        .unfilled_style(Style::default().add_modifier(Modifier::DIM))
}

/// Seek bar, transport buttons and volume bar.
fn draw_transport<M: MediaElement>(frame: &mut Frame, app: &App<M>, area: Rect) -> Hitboxes {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);
    let state = app.player().state();

    // Seek bar with elapsed/total labels.
    let seek = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(7),
            Constraint::Min(1),
            Constraint::Length(7),
        ])
        .split(rows[0]);
    frame.render_widget(Paragraph::new(format_time(state.current_time)), seek[0]);
    frame.render_widget(gauge(state.progress()), seek[1]);
    frame.render_widget(
        Paragraph::new(format_time(state.duration)).alignment(Alignment::Right),
        seek[2],
    );

    // Transport buttons.
    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 7); 7])
        .split(rows[1]);
    let skip = app.skip_seconds();
    let play_pause = if state.is_playing { "|| pause" } else { "> play" };
    let labels = [
        "shuffle".to_string(),
        "|< prev".to_string(),
        format!("<< -{skip}s"),
        play_pause.to_string(),
        format!("+{skip}s >>"),
        "next >|".to_string(),
        "repeat".to_string(),
    ];
    for (i, label) in labels.into_iter().enumerate() {
        let mut button = Paragraph::new(label).alignment(Alignment::Center);
        if i == 0 || i == 6 {
            button = button.dim();
        }
        frame.render_widget(button, buttons[i]);
    }

    // Volume label and bar.
    let volume = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(13), Constraint::Min(1)])
        .split(rows[2]);
    frame.render_widget(
        Paragraph::new(format!("Volume: {}%", state.volume_percent())),
        volume[0],
    );
    frame.render_widget(gauge(state.volume), volume[1]);

    Hitboxes {
        seek_bar: seek[1],
        volume_bar: volume[1],
        previous: buttons[1],
        skip_backward: buttons[2],
        play_pause: buttons[3],
        skip_forward: buttons[4],
        next: buttons[5],
        ..Hitboxes::default()
    }
}

/// Returns the inner list area and the index of its first visible row.
fn draw_playlist<M: MediaElement>(
    frame: &mut Frame,
    app: &App<M>,
    ui_settings: &UiSettings,
    area: Rect,
) -> (Rect, usize) {
    let title = format!(" {} ", ui_settings.playlist_title);
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);

    let player = app.player();
    let active = player.state().current_track_index;

    // Keep the cursor roughly centered once the playlist outgrows the panel,
    // and only build items for the visible window.
    let total = player.track_count();
    let height = inner.height as usize;
    let cursor = app.cursor();
    let (start, end) = if total <= height || height == 0 {
        (0, total)
    } else {
        let half = height / 2;
        let start = cursor.saturating_sub(half).min(total - height);
        (start, start + height)
    };

    let items: Vec<ListItem> = player.playlist().tracks()[start..end]
        .iter()
        .enumerate()
        .map(|(offset, track)| {
            let index = start + offset;
            let item = ListItem::new(format!("{:>2}. {} - {}", index + 1, track.title, track.artist));
            if index == active {
                item.style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                item
            }
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if (start..end).contains(&cursor) {
        state.select(Some(cursor - start));
    }
    frame.render_stateful_widget(list, area, &mut state);

    (inner, start)
}
