use std::env;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::RodioBackend;
use crate::config;
use crate::library::load_tracks;
use crate::player::{MonotonicClock, TrackPlayer};

mod cli;
mod event_loop;
mod headless;
mod logging;
mod settings;

pub use cli::Args;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let (mut settings, config_warning) = settings::load_settings();
    if args.recursive {
        settings.library.recursive = true;
    }
    if let Some(path) = &args.log_file {
        settings.logging.file = Some(path.clone());
    }

    if args.print_config {
        print!("{}", toml::to_string_pretty(&settings)?);
        return Ok(());
    }

    logging::init(&settings.logging, args.headless)?;
    if let Some(msg) = config_warning {
        warn!("{msg}");
    }

    if args.headless {
        // clap guarantees a folder in headless mode.
        let folder = args.folder.unwrap_or_default();
        let tracks = load_tracks(&folder, &settings.library)?;
        headless::print_tracks(&tracks, &mut io::stdout().lock(), settings.ui.preview_chars)?;
        return Ok(());
    }

    let folder = match args.folder {
        Some(folder) => folder,
        None => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    run_interactive(&settings, folder)
}

fn run_interactive(
    settings: &config::Settings,
    folder: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let tracks = load_tracks(&folder, &settings.library)?;
    info!(folder = %folder.display(), tracks = tracks.len(), "library loaded");

    let backend = RodioBackend::from_settings(&settings.audio);
    let mut player = TrackPlayer::new(
        backend,
        MonotonicClock::default(),
        settings.audio.mixer_channels,
    )?;
    player.set_volume(settings.audio.initial_volume);
    player.preload(&tracks)?;

    let mut app = App::new(tracks);
    app.show_transcript = settings.ui.show_transcript;
    app.set_current_dir(folder.display().to_string());
    app.sync_volume(&player);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, settings, &mut app, &mut player);

    player.close();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
