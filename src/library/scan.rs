use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::error::LibraryError;
use super::model::Track;
use super::title::title_from_stem;

fn normalized_extensions(settings: &LibrarySettings) -> Vec<String> {
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn is_audio_file(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn sort_key(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Locate and read the sidecar transcript for `audio_path`.
///
/// Returns the sidecar path whenever the file exists, and its trimmed text
/// only when that text is non-empty.
fn read_sidecar(
    audio_path: &Path,
    transcript_ext: &str,
) -> Result<(Option<PathBuf>, Option<String>), LibraryError> {
    let transcript_ext = transcript_ext.trim().trim_start_matches('.');
    let same_as_audio = audio_path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(transcript_ext));
    if transcript_ext.is_empty() || same_as_audio {
        return Ok((None, None));
    }

    let transcript_path = audio_path.with_extension(transcript_ext);
    if !transcript_path.is_file() {
        return Ok((None, None));
    }

    let text = fs::read_to_string(&transcript_path).map_err(|source| LibraryError::Transcript {
        path: transcript_path.clone(),
        source,
    })?;
    let text = text.trim();
    let transcript = (!text.is_empty()).then(|| text.to_string());

    Ok((Some(transcript_path), transcript))
}

/// Discover the audio files under `root` and pair each with its transcript.
///
/// Tracks come back sorted case-insensitively by file name.
pub fn load_tracks(root: &Path, settings: &LibrarySettings) -> Result<Vec<Track>, LibraryError> {
    if !root.exists() {
        return Err(LibraryError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(LibraryError::NotADirectory(root.to_path_buf()));
    }

    let exts = normalized_extensions(settings);
    let mut walker = WalkDir::new(root)
        .follow_links(settings.follow_links)
        .sort_by_file_name();

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut audio_files: Vec<PathBuf> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "skipping unreadable library entry");
                None
            }
        })
        .filter(|entry| entry.path().is_file() && is_audio_file(entry.path(), &exts))
        .map(|entry| entry.into_path())
        .collect();

    audio_files.sort_by_cached_key(|p| sort_key(p));

    let mut tracks = Vec::with_capacity(audio_files.len());
    for audio_path in audio_files {
        let (transcript_path, transcript) =
            read_sidecar(&audio_path, &settings.transcript_extension)?;

        let identifier = audio_path
            .strip_prefix(root)
            .unwrap_or(&audio_path)
            .to_string_lossy()
            .into_owned();
        let title = audio_path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(title_from_stem)
            .unwrap_or_else(|| identifier.clone());

        debug!(%identifier, has_transcript = transcript.is_some(), "discovered track");
        tracks.push(Track {
            identifier,
            title,
            audio_path,
            transcript_path,
            transcript,
        });
    }

    Ok(tracks)
}
