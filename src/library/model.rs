use std::path::PathBuf;

/// An audio asset plus its optional sidecar transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Path relative to the library root; unique within one library.
    pub identifier: String,
    pub title: String,
    pub audio_path: PathBuf,
    pub transcript_path: Option<PathBuf>,
    pub transcript: Option<String>,
}

impl Track {
    /// Return true when transcript text is available.
    pub fn has_transcript(&self) -> bool {
        self.transcript.is_some()
    }

    /// First `max_chars` characters of the transcript, with `…` appended when cut short.
    pub fn transcript_preview(&self, max_chars: usize) -> Option<String> {
        let text = self.transcript.as_deref()?;
        let mut preview: String = text.chars().take(max_chars).collect();
        if text.chars().count() > max_chars {
            preview.push('…');
        }
        Some(preview)
    }
}
