use std::io::Stdout;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, warn};

use crate::app::App;
use crate::config;
use crate::player::{AudioBackend, Clock, PlayerError, TrackPlayer};
use crate::ui;

/// What a key press asks the application to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    First,
    Last,
    Play,
    TogglePause,
    Stop,
    ScrubBack,
    ScrubForward,
    VolumeUp,
    VolumeDown,
    ToggleTranscript,
    Quit,
}

/// Map a key event to an action. Releases and repeats are ignored.
pub fn action_for(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let action = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('k') | KeyCode::Up => Action::Up,
        KeyCode::Char('j') | KeyCode::Down => Action::Down,
        KeyCode::Char('g') | KeyCode::Home => Action::First,
        KeyCode::Char('G') | KeyCode::End => Action::Last,
        KeyCode::Enter => Action::Play,
        KeyCode::Char(' ') | KeyCode::Char('p') => Action::TogglePause,
        KeyCode::Char('s') => Action::Stop,
        KeyCode::Char('h') | KeyCode::Left => Action::ScrubBack,
        KeyCode::Char('l') | KeyCode::Right => Action::ScrubForward,
        KeyCode::Char('+') | KeyCode::Char('=') => Action::VolumeUp,
        KeyCode::Char('-') => Action::VolumeDown,
        KeyCode::Char('t') => Action::ToggleTranscript,
        _ => return None,
    };
    Some(action)
}

/// Apply `action` to the app and player. Returns true when shutdown is requested.
///
/// Player failures are logged and shown in the status line.
pub fn apply<B: AudioBackend, C: Clock>(
    action: Action,
    app: &mut App,
    player: &mut TrackPlayer<B, C>,
    controls: &config::ControlsSettings,
) -> bool {
    let scrub = controls.scrub_seconds as f64;
    let result: Result<(), PlayerError> = match action {
        Action::Quit => return true,
        Action::Up => {
            app.prev();
            Ok(())
        }
        Action::Down => {
            app.next();
            Ok(())
        }
        Action::First => {
            app.first();
            Ok(())
        }
        Action::Last => {
            app.last();
            Ok(())
        }
        Action::Play => app.play_selected(player),
        Action::TogglePause => app.toggle_pause(player),
        Action::Stop => {
            app.stop(player);
            Ok(())
        }
        Action::ScrubBack => app.scrub(player, -scrub),
        Action::ScrubForward => app.scrub(player, scrub),
        Action::VolumeUp => {
            app.adjust_volume(player, controls.volume_step);
            Ok(())
        }
        Action::VolumeDown => {
            app.adjust_volume(player, -controls.volume_step);
            Ok(())
        }
        Action::ToggleTranscript => {
            app.toggle_transcript();
            Ok(())
        }
    };

    if let Err(err) = result {
        warn!(?action, error = %err, "action failed");
        app.status_message = Some(format!("Error: {err}"));
    }
    false
}

/// Main terminal event loop: ticks the player, draws the UI and handles
/// input. Returns `Ok(())` when shutdown is requested.
pub fn run<B: AudioBackend, C: Clock>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &mut TrackPlayer<B, C>,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick = Duration::from_millis(settings.ui.tick_ms.max(1));
    loop {
        app.tick(player);
        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                if let Some(action) = action_for(key) {
                    debug!(?action, "key");
                    if apply(action, app, player, &settings.controls) {
                        break;
                    }
                }
            }
        }
    }
    Ok(())
}
