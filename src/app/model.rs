//! Application model types: `App` and `PlaybackState`.
//!
//! The `App` struct holds the track list, the selection and a mirror of the
//! player's state that the UI renders from. Every operation that touches
//! audio takes the player explicitly.

use tracing::debug;

use crate::library::Track;
use crate::player::{AudioBackend, Clock, PlayerError, TrackPlayer};

/// The playback state of the application.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
    /// The track played to its end, or a scrub went past it.
    Ended,
}

/// The main application model.
pub struct App {
    pub tracks: Vec<Track>,
    pub selected: usize,
    pub now_playing: Option<usize>,
    pub playback: PlaybackState,

    /// Offset the paused track resumes from.
    pub resume_at: f64,
    pub position: f64,
    pub length: f64,
    pub volume: f32,
    pub can_seek: bool,

    pub show_transcript: bool,
    pub current_dir: Option<String>,
    pub status_message: Option<String>,
}

impl App {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            selected: 0,
            now_playing: None,
            playback: PlaybackState::Stopped,
            resume_at: 0.0,
            position: 0.0,
            length: 0.0,
            volume: 1.0,
            can_seek: false,
            show_transcript: true,
            current_dir: None,
            status_message: None,
        }
    }

    /// Record the current directory in the app state.
    pub fn set_current_dir(&mut self, dir: String) {
        self.current_dir = Some(dir);
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.tracks.get(self.selected)
    }

    pub fn now_playing_track(&self) -> Option<&Track> {
        self.now_playing.and_then(|i| self.tracks.get(i))
    }

    pub fn toggle_transcript(&mut self) {
        self.show_transcript = !self.show_transcript;
    }

    /// Move the selection down, wrapping to the top.
    pub fn next(&mut self) {
        if self.has_tracks() {
            self.selected = (self.selected + 1) % self.tracks.len();
        }
    }

    /// Move the selection up, wrapping to the bottom.
    pub fn prev(&mut self) {
        if self.has_tracks() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.tracks.len() - 1);
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        self.selected = self.tracks.len().saturating_sub(1);
    }

    /// Mirror the player's volume, e.g. after applying the configured default.
    pub fn sync_volume<B: AudioBackend, C: Clock>(&mut self, player: &TrackPlayer<B, C>) {
        self.volume = player.volume();
    }

    /// Start the selected track from the beginning.
    pub fn play_selected<B: AudioBackend, C: Clock>(
        &mut self,
        player: &mut TrackPlayer<B, C>,
    ) -> Result<(), PlayerError> {
        if !self.has_tracks() {
            return Ok(());
        }
        self.start(player, self.selected, 0.0)
    }

    /// Pause by remembering the position and stopping; resume by playing
    /// from the remembered offset.
    pub fn toggle_pause<B: AudioBackend, C: Clock>(
        &mut self,
        player: &mut TrackPlayer<B, C>,
    ) -> Result<(), PlayerError> {
        match (self.playback, self.now_playing) {
            (PlaybackState::Playing, Some(_)) => {
                let position = player.get_current_position();
                player.stop();
                self.resume_at = position;
                self.position = position;
                self.playback = PlaybackState::Paused;
                debug!(position, "paused");
                Ok(())
            }
            (PlaybackState::Paused, Some(index)) => self.start(player, index, self.resume_at),
            (PlaybackState::Ended, Some(index)) => self.start(player, index, 0.0),
            _ => self.play_selected(player),
        }
    }

    pub fn stop<B: AudioBackend, C: Clock>(&mut self, player: &mut TrackPlayer<B, C>) {
        if self.now_playing.is_none() {
            return;
        }
        let stopped_at = match self.playback {
            PlaybackState::Playing => player.get_current_position(),
            _ => self.position,
        };
        player.stop();
        self.status_message = Some(format!("Stopped at {stopped_at:.1}s"));
        self.now_playing = None;
        self.playback = PlaybackState::Stopped;
        self.resume_at = 0.0;
        self.position = 0.0;
    }

    /// Move the playback position by `delta` seconds.
    ///
    /// Seeks while playing, shifts the resume offset while paused and
    /// restarts from the shifted offset once the track has ended.
    pub fn scrub<B: AudioBackend, C: Clock>(
        &mut self,
        player: &mut TrackPlayer<B, C>,
        delta: f64,
    ) -> Result<(), PlayerError> {
        let Some(index) = self.now_playing else {
            return Ok(());
        };
        match self.playback {
            PlaybackState::Playing => {
                if !self.can_seek {
                    self.status_message = Some("Seeking unavailable for this track".to_string());
                    return Ok(());
                }
                let target = (player.get_current_position() + delta).max(0.0);
                player.seek(target)?;
                self.position = player.get_current_position();
                if !player.is_playing() {
                    self.playback = PlaybackState::Ended;
                }
            }
            PlaybackState::Paused => {
                self.resume_at = self.clamp_to_length(self.resume_at + delta);
                self.position = self.resume_at;
            }
            PlaybackState::Ended => {
                let start = self.clamp_to_length(self.position + delta);
                if self.length <= 0.0 || start < self.length {
                    self.start(player, index, start)?;
                }
            }
            PlaybackState::Stopped => {}
        }
        Ok(())
    }

    pub fn adjust_volume<B: AudioBackend, C: Clock>(
        &mut self,
        player: &mut TrackPlayer<B, C>,
        delta: f32,
    ) {
        player.set_volume(self.volume + delta);
        self.volume = player.volume();
        self.status_message = Some(format!("Volume {:.0}%", self.volume * 100.0));
    }

    /// Refresh the position and notice tracks that finished on their own.
    pub fn tick<B: AudioBackend, C: Clock>(&mut self, player: &mut TrackPlayer<B, C>) {
        match self.playback {
            PlaybackState::Playing => {
                if player.poll_end_of_track() {
                    self.playback = PlaybackState::Ended;
                }
                self.position = player.get_current_position();
            }
            PlaybackState::Paused => self.position = self.resume_at,
            PlaybackState::Stopped | PlaybackState::Ended => {}
        }
    }

    /// Fraction of the current track already played, in `0.0..=1.0`.
    pub fn progress_fraction(&self) -> f64 {
        if self.length > 0.0 {
            (self.position / self.length).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    fn clamp_to_length(&self, position: f64) -> f64 {
        if self.length > 0.0 {
            position.clamp(0.0, self.length)
        } else {
            position.max(0.0)
        }
    }

    fn start<B: AudioBackend, C: Clock>(
        &mut self,
        player: &mut TrackPlayer<B, C>,
        index: usize,
        start: f64,
    ) -> Result<(), PlayerError> {
        let Some(track) = self.tracks.get(index) else {
            return Ok(());
        };
        player.play(&track.identifier, start)?;

        self.length = player.get_track_length(&track.identifier).unwrap_or(0.0);
        self.can_seek = player.supports_seeking(&track.identifier);
        self.now_playing = Some(index);
        self.position = player.get_current_position();
        self.resume_at = 0.0;
        self.status_message = None;
        self.playback = if player.is_playing() {
            PlaybackState::Playing
        } else {
            PlaybackState::Ended
        };
        Ok(())
    }
}
