//! In-memory audio backend and clock driven by one simulated time source.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use super::backend::{AudioBackend, ChannelId, MixerFormat, Sound};
use super::clock::Clock;
use super::error::BackendError;

pub(crate) const SAMPLE_RATE: u32 = 22_050;
/// Mono, 16-bit.
pub(crate) const BYTES_PER_FRAME: usize = 2;

/// How a fake channel answers position queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PositionReport {
    /// Milliseconds elapsed since the channel started its sound.
    Elapsed,
    /// A constant value, regardless of elapsed time.
    Fixed(u64),
    /// The channel never reports a position.
    Missing,
}

#[derive(Debug)]
pub(crate) struct SoundState {
    pub label: String,
    pub length: f64,
    pub volume: Cell<f32>,
}

#[derive(Debug, Default)]
pub(crate) struct ChannelState {
    busy: bool,
    started_ms: f64,
    current: Option<Rc<SoundState>>,
    volume: f32,
    plays: usize,
}

#[derive(Debug)]
struct MixerState {
    initialized: bool,
    now_ms: f64,
    channels: Vec<ChannelState>,
    sounds: Vec<Rc<SoundState>>,
    lengths: HashMap<PathBuf, f64>,
    loads: usize,
    quits: usize,
    expose_raw: bool,
    report_length: bool,
    has_format: bool,
    fail_raw: bool,
    fail_load: bool,
    pool_exhausted: bool,
    report: PositionReport,
}

impl MixerState {
    fn channel_busy(&self, channel: ChannelId) -> bool {
        let Some(ch) = self.channels.get(channel) else {
            return false;
        };
        match (&ch.current, ch.busy) {
            (Some(sound), true) => (self.now_ms - ch.started_ms).max(0.0) / 1000.0 < sound.length,
            _ => false,
        }
    }
}

pub(crate) struct FakeSound {
    state: Rc<SoundState>,
    raw_len: Option<usize>,
}

impl Sound for FakeSound {
    fn length(&self) -> Option<f64> {
        (self.state.length >= 0.0).then_some(self.state.length)
    }

    fn raw(&self) -> Option<Vec<u8>> {
        self.raw_len.map(|len| vec![b'x'; len])
    }

    fn volume(&self) -> f32 {
        self.state.volume.get()
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.volume.set(volume);
    }
}

/// Shared handle onto the simulated mixer; clones observe the same state.
#[derive(Clone)]
pub(crate) struct FakeMixer {
    state: Rc<RefCell<MixerState>>,
}

impl FakeMixer {
    /// Uninitialised mixer with one channel where every file lasts `length` seconds
    /// unless listed in `lengths`.
    pub fn new(lengths: &[(&str, f64)]) -> Self {
        let state = MixerState {
            initialized: false,
            now_ms: 0.0,
            channels: vec![ChannelState::default()],
            sounds: Vec::new(),
            lengths: lengths
                .iter()
                .map(|(path, len)| (PathBuf::from(path), *len))
                .collect(),
            loads: 0,
            quits: 0,
            expose_raw: true,
            report_length: true,
            has_format: true,
            fail_raw: false,
            fail_load: false,
            pool_exhausted: false,
            report: PositionReport::Elapsed,
        };
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    pub fn clock(&self) -> FakeClock {
        FakeClock {
            state: Rc::clone(&self.state),
        }
    }

    pub fn tick(&self, milliseconds: f64) {
        self.state.borrow_mut().now_ms += milliseconds;
    }

    pub fn set_report(&self, report: PositionReport) {
        self.state.borrow_mut().report = report;
    }

    pub fn set_expose_raw(&self, expose: bool) {
        self.state.borrow_mut().expose_raw = expose;
    }

    pub fn set_report_length(&self, report: bool) {
        self.state.borrow_mut().report_length = report;
    }

    pub fn set_has_format(&self, has_format: bool) {
        self.state.borrow_mut().has_format = has_format;
    }

    pub fn set_fail_raw(&self, fail: bool) {
        self.state.borrow_mut().fail_raw = fail;
    }

    pub fn set_fail_load(&self, fail: bool) {
        self.state.borrow_mut().fail_load = fail;
    }

    pub fn set_pool_exhausted(&self, exhausted: bool) {
        self.state.borrow_mut().pool_exhausted = exhausted;
    }

    pub fn is_initialized_now(&self) -> bool {
        self.state.borrow().initialized
    }

    pub fn channel_count(&self) -> usize {
        self.state.borrow().channels.len()
    }

    pub fn loads(&self) -> usize {
        self.state.borrow().loads
    }

    pub fn quits(&self) -> usize {
        self.state.borrow().quits
    }

    /// Every sound built so far, preloaded or partial.
    pub fn sounds(&self) -> Vec<Rc<SoundState>> {
        self.state.borrow().sounds.clone()
    }

    /// Sounds loaded from files, in load order.
    pub fn file_sounds(&self) -> Vec<Rc<SoundState>> {
        self.sounds()
            .into_iter()
            .filter(|s| s.label != "<buffer>")
            .collect()
    }

    pub fn channel_busy(&self, channel: ChannelId) -> bool {
        self.state.borrow().channel_busy(channel)
    }

    pub fn channel_volume(&self, channel: ChannelId) -> f32 {
        self.state.borrow().channels[channel].volume
    }

    pub fn channel_plays(&self, channel: ChannelId) -> usize {
        self.state.borrow().channels[channel].plays
    }

    /// Length of the sound the channel is playing, if it is busy.
    pub fn channel_sound_length(&self, channel: ChannelId) -> Option<f64> {
        let state = self.state.borrow();
        if !state.channel_busy(channel) {
            return None;
        }
        state.channels[channel].current.as_ref().map(|s| s.length)
    }

    fn register(
        state: &mut MixerState,
        label: String,
        length: f64,
        raw_len: Option<usize>,
    ) -> FakeSound {
        let sound = Rc::new(SoundState {
            label,
            length,
            volume: Cell::new(1.0),
        });
        state.sounds.push(Rc::clone(&sound));
        FakeSound {
            state: sound,
            raw_len,
        }
    }
}

impl AudioBackend for FakeMixer {
    type Sound = FakeSound;

    fn is_initialized(&self) -> bool {
        self.state.borrow().initialized
    }

    fn init(&mut self) -> Result<(), BackendError> {
        self.state.borrow_mut().initialized = true;
        Ok(())
    }

    fn format(&self) -> Option<MixerFormat> {
        let state = self.state.borrow();
        (state.initialized && state.has_format).then_some(MixerFormat {
            sample_rate: SAMPLE_RATE,
            bits_per_sample: 16,
            channels: 1,
        })
    }

    fn num_channels(&self) -> usize {
        self.state.borrow().channels.len()
    }

    fn set_num_channels(&mut self, count: usize) {
        let mut state = self.state.borrow_mut();
        while state.channels.len() < count {
            state.channels.push(ChannelState::default());
        }
    }

    fn load(&mut self, path: &Path) -> Result<Self::Sound, BackendError> {
        let mut state = self.state.borrow_mut();
        if !state.initialized {
            return Err(BackendError::NotInitialized);
        }
        if state.fail_load {
            return Err(BackendError::Decode {
                path: path.to_path_buf(),
                reason: "simulated decode failure".to_string(),
            });
        }
        state.loads += 1;

        let length = state.lengths.get(path).copied().unwrap_or(1.0);
        let frames = (length * f64::from(SAMPLE_RATE)).round() as usize;
        let raw_len = state
            .expose_raw
            .then_some((frames * BYTES_PER_FRAME).max(1));
        let reported = if state.report_length { length } else { -1.0 };
        Ok(Self::register(
            &mut state,
            path.display().to_string(),
            reported,
            raw_len,
        ))
    }

    fn sound_from_raw(&mut self, raw: &[u8]) -> Result<Self::Sound, BackendError> {
        let mut state = self.state.borrow_mut();
        if state.fail_raw {
            return Err(BackendError::RawBuffer("simulated rejection".to_string()));
        }
        let length = raw.len() as f64 / (BYTES_PER_FRAME as f64 * f64::from(SAMPLE_RATE));
        Ok(Self::register(
            &mut state,
            "<buffer>".to_string(),
            length,
            Some(raw.len()),
        ))
    }

    fn find_channel(&mut self) -> Option<ChannelId> {
        let state = self.state.borrow();
        if state.pool_exhausted {
            return None;
        }
        (0..state.channels.len()).find(|&ch| !state.channel_busy(ch))
    }

    fn play(&mut self, channel: ChannelId, sound: &Self::Sound) -> Result<(), BackendError> {
        let mut state = self.state.borrow_mut();
        let now = state.now_ms;
        let ch = state
            .channels
            .get_mut(channel)
            .ok_or(BackendError::NoSuchChannel(channel))?;
        ch.busy = true;
        ch.started_ms = now;
        ch.current = Some(Rc::clone(&sound.state));
        ch.plays += 1;
        Ok(())
    }

    fn stop(&mut self, channel: ChannelId) {
        if let Some(ch) = self.state.borrow_mut().channels.get_mut(channel) {
            ch.busy = false;
            ch.current = None;
        }
    }

    fn is_busy(&self, channel: ChannelId) -> bool {
        self.state.borrow().channel_busy(channel)
    }

    fn position(&self, channel: ChannelId) -> Option<Duration> {
        let state = self.state.borrow();
        if !state.channel_busy(channel) {
            return None;
        }
        match state.report {
            PositionReport::Elapsed => {
                let elapsed = (state.now_ms - state.channels[channel].started_ms).max(0.0);
                Some(Duration::from_millis(elapsed as u64))
            }
            PositionReport::Fixed(ms) => Some(Duration::from_millis(ms)),
            PositionReport::Missing => None,
        }
    }

    fn set_channel_volume(&mut self, channel: ChannelId, volume: f32) {
        if let Some(ch) = self.state.borrow_mut().channels.get_mut(channel) {
            ch.volume = volume;
        }
    }

    fn quit(&mut self) {
        let mut state = self.state.borrow_mut();
        state.quits += 1;
        state.initialized = false;
        for ch in &mut state.channels {
            ch.busy = false;
            ch.current = None;
        }
    }
}

/// Clock reading the fake mixer's simulated time.
pub(crate) struct FakeClock {
    state: Rc<RefCell<MixerState>>,
}

impl Clock for FakeClock {
    fn now(&self) -> f64 {
        self.state.borrow().now_ms / 1000.0
    }
}
