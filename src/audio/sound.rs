use std::sync::Arc;
use std::time::Duration;

use rodio::Source;

use crate::player::Sound;

use super::pcm::samples_to_bytes;

/// A fully decoded sound held in memory in the mixer format.
#[derive(Debug, Clone)]
pub struct RodioSound {
    samples: Arc<[f32]>,
    channels: u16,
    sample_rate: u32,
    volume: f32,
}

impl RodioSound {
    pub(super) fn new(samples: Vec<f32>, channels: u16, sample_rate: u32) -> Self {
        Self {
            samples: samples.into(),
            channels: channels.max(1),
            sample_rate,
            volume: 1.0,
        }
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels)
    }

    /// A fresh source over the samples, scaled by the sound's volume.
    pub(super) fn source(&self) -> impl Source + Send + 'static {
        SharedSamples {
            samples: Arc::clone(&self.samples),
            next: 0,
            channels: self.channels,
            sample_rate: self.sample_rate,
        }
        .amplify(self.volume)
    }
}

/// Plays a sound's samples without copying them out of the sound.
struct SharedSamples {
    samples: Arc<[f32]>,
    next: usize,
    channels: u16,
    sample_rate: u32,
}

impl Iterator for SharedSamples {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let sample = self.samples.get(self.next).copied()?;
        self.next += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.samples.len().saturating_sub(self.next);
        (left, Some(left))
    }
}

impl Source for SharedSamples {
    fn current_span_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        if self.sample_rate == 0 {
            return None;
        }
        let frames = self.samples.len() / usize::from(self.channels);
        Some(Duration::from_secs_f64(
            frames as f64 / f64::from(self.sample_rate),
        ))
    }
}

impl Sound for RodioSound {
    fn length(&self) -> Option<f64> {
        (self.sample_rate > 0).then(|| self.frames() as f64 / f64::from(self.sample_rate))
    }

    fn raw(&self) -> Option<Vec<u8>> {
        Some(samples_to_bytes(&self.samples))
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }
}
