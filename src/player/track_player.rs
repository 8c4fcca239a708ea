use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::library::Track;

use super::backend::{AudioBackend, ChannelId, FALLBACK_CHANNEL, MixerFormat, Sound};
use super::clock::{Clock, MonotonicClock};
use super::error::PlayerError;
use super::segment::{SegmentPlan, plan_segment};

/// Transient state of the track currently in play.
struct Session<S> {
    track: Option<String>,
    channel: Option<ChannelId>,
    /// Partial sound built for a seek, kept alive while the channel plays it.
    segment: Option<S>,
    /// Logical position (seconds) at which the running segment starts.
    offset: f64,
    /// Clock reading taken when the running segment started.
    started_at: Option<f64>,
    last_position: f64,
}

impl<S> Default for Session<S> {
    fn default() -> Self {
        Self {
            track: None,
            channel: None,
            segment: None,
            offset: 0.0,
            started_at: None,
            last_position: 0.0,
        }
    }
}

/// What to hand the backend for a given start time.
enum Prepared<S> {
    Full,
    Partial { sound: S, start: f64 },
    PastEnd { position: f64 },
}

/// Preloads tracks and plays one at a time with seekable positions.
///
/// Position tracking prefers what the output channel reports and falls back
/// to the injected clock when the channel cannot tell.
pub struct TrackPlayer<B: AudioBackend, C: Clock = MonotonicClock> {
    backend: B,
    clock: C,
    format: Option<MixerFormat>,
    sounds: HashMap<String, B::Sound>,
    lengths: HashMap<String, f64>,
    raw_audio: HashMap<String, Vec<u8>>,
    session: Session<B::Sound>,
    volume: f32,
    closed: bool,
}

impl<B: AudioBackend, C: Clock> TrackPlayer<B, C> {
    /// Take ownership of `backend`, initialising it and growing its channel
    /// pool to at least `num_channels`.
    pub fn new(mut backend: B, clock: C, num_channels: usize) -> Result<Self, PlayerError> {
        if !backend.is_initialized() {
            backend.init()?;
        }
        let wanted = backend.num_channels().max(num_channels);
        backend.set_num_channels(wanted);

        let format = backend.format();
        match format {
            Some(f) => info!(
                sample_rate = f.sample_rate,
                bits = f.bits_per_sample,
                channels = f.channels,
                pool = wanted,
                "audio output ready"
            ),
            None => warn!("audio output reports no sample format; seeking disabled"),
        }

        Ok(Self {
            backend,
            clock,
            format,
            sounds: HashMap::new(),
            lengths: HashMap::new(),
            raw_audio: HashMap::new(),
            session: Session::default(),
            volume: 1.0,
            closed: false,
        })
    }

    /// Load sounds into memory for instant playback.
    ///
    /// Tracks that were already preloaded are skipped.
    pub fn preload<'a, I>(&mut self, tracks: I) -> Result<(), PlayerError>
    where
        I: IntoIterator<Item = &'a Track>,
    {
        for track in tracks {
            if self.sounds.contains_key(&track.identifier) {
                continue;
            }

            let mut sound = self.backend.load(&track.audio_path)?;
            sound.set_volume(self.volume);

            let length = sound.length().unwrap_or(0.0);
            let raw = sound.raw().filter(|r| !r.is_empty());
            debug!(
                identifier = %track.identifier,
                length,
                raw_bytes = raw.as_ref().map_or(0, Vec::len),
                "preloaded track"
            );

            self.lengths.insert(track.identifier.clone(), length);
            if let Some(raw) = raw {
                self.raw_audio.insert(track.identifier.clone(), raw);
            }
            self.sounds.insert(track.identifier.clone(), sound);
        }
        Ok(())
    }

    /// Play `track_id` from `start` seconds, stopping whatever was playing.
    pub fn play(&mut self, track_id: &str, start: f64) -> Result<(), PlayerError> {
        if !self.sounds.contains_key(track_id) {
            return Err(PlayerError::NotPreloaded(track_id.to_string()));
        }

        self.stop();
        match self.prepare_segment(track_id, start) {
            Prepared::PastEnd { position } => {
                debug!(identifier = %track_id, position, "start lies past the playable end");
                self.park_at(track_id, position);
                Ok(())
            }
            prepared => {
                let channel = self.backend.find_channel().unwrap_or(FALLBACK_CHANNEL);
                self.start_segment(channel, track_id, prepared)
            }
        }
    }

    /// Stop playback if a track is active and forget the session.
    pub fn stop(&mut self) {
        if let Some(channel) = self.session.channel {
            if self.backend.is_busy(channel) {
                self.backend.stop(channel);
            }
        }
        self.session = Session::default();
    }

    pub fn is_playing(&self) -> bool {
        self.session
            .channel
            .is_some_and(|channel| self.backend.is_busy(channel))
    }

    /// Set the volume (clamped to `0.0..=1.0`) on the active channel and on
    /// every preloaded sound.
    pub fn set_volume(&mut self, volume: f32) {
        let clamped = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.volume = clamped;

        if let Some(channel) = self.session.channel {
            self.backend.set_channel_volume(channel, clamped);
        }
        for sound in self.sounds.values_mut() {
            sound.set_volume(clamped);
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn current_track(&self) -> Option<&str> {
        self.session.track.as_deref()
    }

    /// Position computed by the most recent `get_current_position` call.
    pub fn last_position(&self) -> f64 {
        self.session.last_position
    }

    /// Duration of the sound the channel is playing: the seek segment when
    /// one is running, else the whole track.
    pub fn segment_length(&self) -> Option<f64> {
        self.session.channel?;
        match &self.session.segment {
            Some(segment) => segment.length(),
            None => self.get_track_length(self.session.track.as_deref()?),
        }
    }

    /// Elapsed seconds into the current track, clamped to its known length.
    ///
    /// Uses the channel's own report while it is playing and has a position;
    /// otherwise derives the position from the clock.
    pub fn get_current_position(&mut self) -> f64 {
        let Some(track) = self.session.track.as_deref() else {
            return 0.0;
        };
        let length = self.lengths.get(track).copied().unwrap_or(0.0);

        let position = match self.reported_elapsed() {
            Some(elapsed) => self.session.offset + elapsed,
            None => match self.session.started_at {
                Some(started_at) => {
                    self.session.offset + (self.clock.now() - started_at).max(0.0)
                }
                None => self.session.offset,
            },
        };
        let position = if length > 0.0 {
            position.min(length)
        } else {
            position
        };

        self.session.last_position = position;
        position
    }

    /// Elapsed time the channel reports for the running segment, if usable.
    ///
    /// A zero report right after a segment starts is treated as missing.
    fn reported_elapsed(&self) -> Option<f64> {
        let channel = self.session.channel?;
        if !self.backend.is_busy(channel) {
            return None;
        }
        self.backend
            .position(channel)
            .map(|d| d.as_secs_f64())
            .filter(|secs| *secs > 0.0)
    }

    /// Move the current track to `position` seconds.
    ///
    /// Does nothing when no track is current.
    pub fn seek(&mut self, position: f64) -> Result<(), PlayerError> {
        let Some(track_id) = self.session.track.clone() else {
            return Ok(());
        };

        let position = match self.get_track_length(&track_id) {
            Some(length) if length > 0.0 => position.clamp(0.0, length),
            _ => position.max(0.0),
        };

        match self.prepare_segment(&track_id, position) {
            Prepared::PastEnd { position } => {
                debug!(identifier = %track_id, position, "seek lies past the playable end");
                self.stop();
                self.park_at(&track_id, position);
                Ok(())
            }
            prepared => {
                let channel = self
                    .session
                    .channel
                    .or_else(|| self.backend.find_channel())
                    .unwrap_or(FALLBACK_CHANNEL);
                self.start_segment(channel, &track_id, prepared)
            }
        }
    }

    pub fn get_track_length(&self, track_id: &str) -> Option<f64> {
        self.lengths.get(track_id).copied()
    }

    /// True when raw data and the sample layout are known for `track_id`.
    pub fn supports_seeking(&self, track_id: &str) -> bool {
        self.raw_audio.contains_key(track_id)
            && self
                .format
                .is_some_and(|f| f.sample_rate > 0 && f.bytes_per_frame() > 0)
    }

    /// Detect a segment that finished on its own.
    ///
    /// Returns true once when the channel goes idle; the track stays current,
    /// positioned at its end.
    pub fn poll_end_of_track(&mut self) -> bool {
        let Some(channel) = self.session.channel else {
            return false;
        };
        if self.backend.is_busy(channel) {
            return false;
        }

        let position = self.get_current_position();
        if let Some(track) = self.session.track.take() {
            debug!(identifier = %track, position, "track finished");
            self.session = Session::default();
            self.park_at(&track, position);
        }
        true
    }

    /// Stop playback and release the backend. Later calls do nothing.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.stop();
        self.backend.quit();
        self.closed = true;
        info!("audio output closed");
    }

    /// Record `track_id` as current at `position` without anything audible.
    fn park_at(&mut self, track_id: &str, position: f64) {
        self.session.track = Some(track_id.to_string());
        self.session.channel = None;
        self.session.segment = None;
        self.session.offset = position;
        self.session.last_position = position;
        self.session.started_at = None;
    }

    fn prepare_segment(&mut self, track_id: &str, start: f64) -> Prepared<B::Sound> {
        if start <= 0.0 || !self.supports_seeking(track_id) {
            return Prepared::Full;
        }
        let (Some(raw), Some(format)) = (self.raw_audio.get(track_id), self.format) else {
            return Prepared::Full;
        };

        let plan = plan_segment(
            start,
            raw.len(),
            format.sample_rate,
            format.bytes_per_frame(),
            self.lengths.get(track_id).copied(),
        );
        match plan {
            SegmentPlan::Full => Prepared::Full,
            SegmentPlan::PastEnd { position } => Prepared::PastEnd { position },
            SegmentPlan::Partial {
                byte_offset,
                actual_start,
            } => match self.backend.sound_from_raw(&raw[byte_offset..]) {
                Ok(mut sound) => {
                    sound.set_volume(self.volume);
                    debug!(
                        identifier = %track_id,
                        requested = start,
                        actual = actual_start,
                        "built partial segment"
                    );
                    Prepared::Partial {
                        sound,
                        start: actual_start,
                    }
                }
                Err(err) => {
                    warn!(
                        identifier = %track_id,
                        error = %err,
                        "could not build seek segment, playing from the start"
                    );
                    Prepared::Full
                }
            },
        }
    }

    fn start_segment(
        &mut self,
        channel: ChannelId,
        track_id: &str,
        prepared: Prepared<B::Sound>,
    ) -> Result<(), PlayerError> {
        let (segment, offset) = match prepared {
            Prepared::Full => {
                let sound = self
                    .sounds
                    .get(track_id)
                    .ok_or_else(|| PlayerError::NotPreloaded(track_id.to_string()))?;
                self.backend.play(channel, sound)?;
                (None, 0.0)
            }
            Prepared::Partial { sound, start } => {
                self.backend.play(channel, &sound)?;
                (Some(sound), start.max(0.0))
            }
            Prepared::PastEnd { position } => {
                self.park_at(track_id, position);
                return Ok(());
            }
        };
        self.backend.set_channel_volume(channel, self.volume);

        debug!(identifier = %track_id, channel, offset, "segment started");
        self.session = Session {
            track: Some(track_id.to_string()),
            channel: Some(channel),
            segment,
            offset,
            started_at: Some(self.clock.now()),
            last_position: offset,
        };
        Ok(())
    }
}

impl<B: AudioBackend, C: Clock> Drop for TrackPlayer<B, C> {
    fn drop(&mut self) {
        self.close();
    }
}
