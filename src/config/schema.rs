use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/readaloud/config.toml`
/// or `~/.config/readaloud/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `READALOUD__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub audio: AudioSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Extension of the sidecar transcript sharing the audio file's base name.
    pub transcript_extension: String,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["wav".into(), "mp3".into(), "ogg".into()],
            transcript_extension: "txt".to_string(),
            recursive: false,
            follow_links: true,
            include_hidden: false,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Mixer sample rate every sound is converted to (Hz).
    pub sample_rate: u32,
    /// Number of interleaved output channels (1 = mono, 2 = stereo).
    pub output_channels: u16,
    /// Size of the playback channel pool.
    pub mixer_channels: usize,
    /// Volume applied at startup, between 0.0 and 1.0.
    pub initial_volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            output_channels: 2,
            mixer_channels: 4,
            initial_volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `h` / `l`.
    pub scrub_seconds: u64,
    /// Volume change applied by `+` / `-`.
    pub volume_step: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 5,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// How often the UI polls the player for position updates (milliseconds).
    pub tick_ms: u64,
    /// Whether the transcript pane starts visible.
    pub show_transcript: bool,
    /// Number of transcript characters shown in listings.
    pub preview_chars: usize,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ read it aloud ~ ".to_string(),
            tick_ms: 100,
            show_transcript: true,
            preview_chars: 80,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default `tracing` filter directive, overridden by `READALOUD_LOG`.
    pub level: String,
    /// Append log lines to this file instead of the default sink.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
