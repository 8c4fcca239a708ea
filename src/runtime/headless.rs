use std::io::{self, Write};

use crate::library::Track;

/// Write a numbered listing of `tracks` with a transcript preview under each.
pub fn print_tracks<W: Write>(
    tracks: &[Track],
    out: &mut W,
    preview_chars: usize,
) -> io::Result<()> {
    if tracks.is_empty() {
        return writeln!(out, "No tracks found.");
    }
    for (index, track) in tracks.iter().enumerate() {
        writeln!(out, "{}. {} [{}]", index + 1, track.title, track.identifier)?;
        if let Some(preview) = track
            .transcript_preview(preview_chars)
            .filter(|p| !p.is_empty())
        {
            writeln!(out, "   {preview}")?;
        }
    }
    Ok(())
}
