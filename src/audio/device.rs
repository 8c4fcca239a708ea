use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::source::UniformSourceIterator;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info};

use crate::config::AudioSettings;
use crate::player::{AudioBackend, BackendError, ChannelId, MixerFormat};

use super::pcm::bytes_to_samples;
use super::sound::RodioSound;

/// One entry of the channel pool.
struct Slot {
    sink: Option<Sink>,
    volume: f32,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            sink: None,
            volume: 1.0,
        }
    }
}

impl Slot {
    fn is_busy(&self) -> bool {
        self.sink.as_ref().is_some_and(|sink| !sink.empty())
    }
}

/// Audio output on the default device through `rodio`.
///
/// Every sound is decoded up front and converted to `format`, so raw sample
/// bytes are always available for seeking.
pub struct RodioBackend {
    format: MixerFormat,
    stream: Option<OutputStream>,
    slots: Vec<Slot>,
}

impl RodioBackend {
    pub fn new(format: MixerFormat) -> Self {
        Self {
            format,
            stream: None,
            slots: vec![Slot::default()],
        }
    }

    pub fn from_settings(settings: &AudioSettings) -> Self {
        Self::new(MixerFormat {
            sample_rate: settings.sample_rate,
            bits_per_sample: 16,
            channels: settings.output_channels,
        })
    }
}

impl AudioBackend for RodioBackend {
    type Sound = RodioSound;

    fn is_initialized(&self) -> bool {
        self.stream.is_some()
    }

    fn init(&mut self) -> Result<(), BackendError> {
        if self.stream.is_some() {
            return Ok(());
        }
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|err| BackendError::Device(err.to_string()))?;
        // rodio prints to stderr when the stream is dropped, which garbles the TUI.
        stream.log_on_drop(false);
        self.stream = Some(stream);
        info!("opened default audio output");
        Ok(())
    }

    fn format(&self) -> Option<MixerFormat> {
        self.stream.as_ref().map(|_| self.format)
    }

    fn num_channels(&self) -> usize {
        self.slots.len()
    }

    fn set_num_channels(&mut self, count: usize) {
        if count > self.slots.len() {
            self.slots.resize_with(count, Slot::default);
        }
    }

    fn load(&mut self, path: &Path) -> Result<Self::Sound, BackendError> {
        let file = File::open(path).map_err(|source| BackendError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|err| BackendError::Decode {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        let samples: Vec<f32> =
            UniformSourceIterator::new(decoder, self.format.channels, self.format.sample_rate)
                .collect();
        debug!(path = %path.display(), samples = samples.len(), "decoded");
        Ok(RodioSound::new(
            samples,
            self.format.channels,
            self.format.sample_rate,
        ))
    }

    fn sound_from_raw(&mut self, raw: &[u8]) -> Result<Self::Sound, BackendError> {
        let samples = bytes_to_samples(raw, self.format.channels)?;
        Ok(RodioSound::new(
            samples,
            self.format.channels,
            self.format.sample_rate,
        ))
    }

    fn find_channel(&mut self) -> Option<ChannelId> {
        self.slots.iter().position(|slot| !slot.is_busy())
    }

    fn play(&mut self, channel: ChannelId, sound: &Self::Sound) -> Result<(), BackendError> {
        let stream = self.stream.as_ref().ok_or(BackendError::NotInitialized)?;
        let slot = self
            .slots
            .get_mut(channel)
            .ok_or(BackendError::NoSuchChannel(channel))?;

        if let Some(old) = slot.sink.take() {
            old.stop();
        }
        let sink = Sink::connect_new(stream.mixer());
        sink.set_volume(slot.volume);
        sink.append(sound.source());
        sink.play();
        slot.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self, channel: ChannelId) {
        if let Some(sink) = self.slots.get_mut(channel).and_then(|slot| slot.sink.take()) {
            sink.stop();
        }
    }

    fn is_busy(&self, channel: ChannelId) -> bool {
        self.slots.get(channel).is_some_and(Slot::is_busy)
    }

    fn position(&self, channel: ChannelId) -> Option<Duration> {
        let slot = self.slots.get(channel)?;
        if !slot.is_busy() {
            return None;
        }
        slot.sink.as_ref().map(Sink::get_pos)
    }

    fn set_channel_volume(&mut self, channel: ChannelId, volume: f32) {
        if let Some(slot) = self.slots.get_mut(channel) {
            slot.volume = volume;
            if let Some(sink) = &slot.sink {
                sink.set_volume(volume);
            }
        }
    }

    fn quit(&mut self) {
        for slot in &mut self.slots {
            if let Some(sink) = slot.sink.take() {
                sink.stop();
            }
        }
        if self.stream.take().is_some() {
            info!("released audio output");
        }
    }
}
