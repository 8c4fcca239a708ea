//! The narrow audio-output boundary the track player drives.
//!
//! A backend owns the output device, turns files or raw PCM bytes into
//! playable sounds, and leases a small fixed pool of output channels
//! addressed by index.

use std::path::Path;
use std::time::Duration;

use super::error::BackendError;

/// Index of an output channel in the backend's pool.
pub type ChannelId = usize;

/// Channel reused when `find_channel` reports the pool as fully busy.
pub const FALLBACK_CHANNEL: ChannelId = 0;

/// Fixed sample layout the output device was initialised with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixerFormat {
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub channels: u16,
}

impl MixerFormat {
    /// Bytes occupied by one sample period across all channels.
    pub fn bytes_per_frame(&self) -> usize {
        (usize::from(self.bits_per_sample) / 8).max(1) * usize::from(self.channels).max(1)
    }
}

/// A loaded, playable sound.
pub trait Sound {
    /// Duration in seconds, when the backend can tell.
    fn length(&self) -> Option<f64>;

    /// Interleaved sample bytes in the mixer format, when exposed.
    fn raw(&self) -> Option<Vec<u8>>;

    fn volume(&self) -> f32;

    fn set_volume(&mut self, volume: f32);
}

pub trait AudioBackend {
    type Sound: Sound;

    fn is_initialized(&self) -> bool;

    /// Open the output device.
    fn init(&mut self) -> Result<(), BackendError>;

    /// Sample layout of the opened device; `None` before `init`.
    fn format(&self) -> Option<MixerFormat>;

    fn num_channels(&self) -> usize;

    fn set_num_channels(&mut self, count: usize);

    fn load(&mut self, path: &Path) -> Result<Self::Sound, BackendError>;

    /// Build a sound from interleaved sample bytes in the mixer format.
    fn sound_from_raw(&mut self, raw: &[u8]) -> Result<Self::Sound, BackendError>;

    /// First idle channel, if any.
    fn find_channel(&mut self) -> Option<ChannelId>;

    /// Start `sound` on `channel`, replacing whatever it was playing.
    fn play(&mut self, channel: ChannelId, sound: &Self::Sound) -> Result<(), BackendError>;

    fn stop(&mut self, channel: ChannelId);

    fn is_busy(&self, channel: ChannelId) -> bool;

    /// Time the channel has spent playing its current sound.
    fn position(&self, channel: ChannelId) -> Option<Duration>;

    fn set_channel_volume(&mut self, channel: ChannelId, volume: f32);

    /// Stop everything and release the device.
    fn quit(&mut self);
}
