//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, PlaybackState};
use crate::config::{ControlsSettings, UiSettings};

const LEFT_PADDING: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    let scrub = format!("-/+{scrub_seconds}s");
    [
        ("j/k", "up/down"),
        ("g/G", "top/bottom"),
        ("enter", "play"),
        ("space/p", "pause/resume"),
        ("s", "stop"),
        ("h/l", scrub.as_str()),
        ("+/-", "volume"),
        ("t", "transcript"),
        ("q", "quit"),
    ]
    .iter()
    .map(|(key, action)| format!("[{key}] {action}"))
    .collect::<Vec<_>>()
    .join(" | ")
}

/// Format seconds as `M:SS`, or `H:MM:SS` from one hour up.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() {
        seconds.max(0.0) as u64
    } else {
        0
    };
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

fn state_label(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Stopped => "Stopped",
        PlaybackState::Playing => "Playing",
        PlaybackState::Paused => "Paused",
        PlaybackState::Ended => "Ended",
    }
}

/// One-line summary of what the player is doing.
fn status_text(app: &App) -> String {
    let mut parts: Vec<String> = vec![state_label(app.playback).to_string()];

    if let Some(track) = app.now_playing_track() {
        parts.push(format!(
            "{} [{} / {}]",
            track.title,
            format_time(app.position),
            format_time(app.length)
        ));
        if !app.can_seek {
            parts.push("no seeking".to_string());
        }
    }
    parts.push(format!("Vol: {:.0}%", app.volume * 100.0));

    if let Some(dir) = &app.current_dir {
        parts.push(format!("Dir: {dir}"));
    }
    if let Some(msg) = &app.status_message {
        parts.push(msg.clone());
    }
    parts.join(" • ")
}

/// Window of `total` list rows of height `height` keeping `selected` centred.
///
/// Returns `(start, end, selected_in_window)`.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

fn draw_track_list(frame: &mut Frame, app: &App, area: Rect) {
    // Only build items for the rows that fit.
    let total = app.tracks.len();
    let height = area.height.saturating_sub(2) as usize;
    let (start, end, selected_in_window) = visible_window(total, height, app.selected);

    let items: Vec<ListItem> = app.tracks[start..end]
        .iter()
        .enumerate()
        .map(|(offset, track)| {
            let marker = if app.now_playing == Some(start + offset) {
                "♪ "
            } else {
                "  "
            };
            let note = if track.has_transcript() { "" } else { " (no transcript)" };
            ListItem::new(format!("{marker}{}{note}", track.title))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" tracks "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(selected_in_window));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_transcript(frame: &mut Frame, app: &App, area: Rect) {
    let track = app.now_playing_track().or_else(|| app.selected_track());
    let (title, body) = match track {
        Some(track) => (
            format!(" transcript: {} ", track.title),
            track
                .transcript
                .clone()
                .unwrap_or_else(|| "No transcript for this track.".to_string()),
        ),
        None => (" transcript ".to_string(), String::new()),
    };

    let paragraph = Paragraph::new(body)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .padding(LEFT_PADDING)
                .title(title),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" readaloud ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_text(app))
        .block(Block::bordered().padding(LEFT_PADDING).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    if app.show_transcript {
        let main = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[2]);
        draw_track_list(frame, app, main[0]);
        draw_transcript(frame, app, main[1]);
    } else {
        draw_track_list(frame, app, chunks[2]);
    }

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" progress "))
        .ratio(app.progress_fraction())
        .label(format!(
            "{} / {}",
            format_time(app.position),
            format_time(app.length)
        ));
    frame.render_widget(gauge, chunks[3]);

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(LEFT_PADDING),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}
