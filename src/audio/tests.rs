use std::fs;
use std::path::Path;

use tempfile::tempdir;

use super::pcm::{bytes_to_samples, samples_to_bytes};
use super::*;
use crate::config::AudioSettings;
use crate::player::{AudioBackend, BackendError, MixerFormat, Sound};

const MONO_8K: MixerFormat = MixerFormat {
    sample_rate: 8_000,
    bits_per_sample: 16,
    channels: 1,
};

/// Minimal 16-bit PCM WAV file holding `frames` samples of a ramp.
fn write_wav(path: &Path, sample_rate: u32, frames: u32) {
    let data_len = frames * 2;
    let mut bytes = Vec::with_capacity(44 + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    for i in 0..frames {
        let value = ((i % 200) as i16 - 100) * 100;
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    fs::write(path, bytes).unwrap();
}

#[test]
fn pcm_bytes_are_little_endian_i16() {
    let bytes = samples_to_bytes(&[0.0, 1.0, -1.0, 2.0]);
    assert_eq!(bytes.len(), 8);
    assert_eq!(&bytes[0..2], &0i16.to_le_bytes());
    assert_eq!(&bytes[2..4], &i16::MAX.to_le_bytes());
    assert_eq!(&bytes[4..6], &(-i16::MAX).to_le_bytes());
    // Out-of-range samples clip.
    assert_eq!(&bytes[6..8], &i16::MAX.to_le_bytes());
}

#[test]
fn pcm_decoding_restores_samples() {
    let samples = [0.0, 0.5, -0.25, 1.0];
    let restored = bytes_to_samples(&samples_to_bytes(&samples), 2).unwrap();
    for (a, b) in samples.iter().zip(&restored) {
        assert!((a - b).abs() < 1e-4, "{a} vs {b}");
    }
}

#[test]
fn pcm_rejects_partial_frames() {
    let err = bytes_to_samples(&[0, 0, 0], 1).unwrap_err();
    assert!(matches!(err, BackendError::RawBuffer(_)));
    let err = bytes_to_samples(&[0, 0, 0, 0, 0, 0], 2).unwrap_err();
    assert!(matches!(err, BackendError::RawBuffer(_)));
}

#[test]
fn backend_reports_nothing_before_init() {
    let mut backend = RodioBackend::new(MONO_8K);
    assert!(!backend.is_initialized());
    assert_eq!(backend.format(), None);

    backend.set_num_channels(3);
    assert_eq!(backend.num_channels(), 3);
    backend.set_num_channels(2);
    assert_eq!(backend.num_channels(), 3);

    assert_eq!(backend.find_channel(), Some(0));
    assert!(!backend.is_busy(1));
    assert_eq!(backend.position(1), None);
    assert!(!backend.is_busy(99));
}

#[test]
fn playing_needs_an_open_device() {
    let mut backend = RodioBackend::new(MONO_8K);
    let sound = backend.sound_from_raw(&[0; 16]).unwrap();

    let err = backend.play(0, &sound).unwrap_err();
    assert!(matches!(err, BackendError::NotInitialized));

    // Quitting an unopened backend is harmless.
    backend.quit();
    assert!(!backend.is_initialized());
}

#[test]
fn raw_sounds_know_their_length() {
    let mut backend = RodioBackend::new(MONO_8K);
    let sound = backend.sound_from_raw(&vec![0; 8_000]).unwrap();

    assert_eq!(sound.frames(), 4_000);
    assert_eq!(sound.length(), Some(0.5));
    assert_eq!(sound.raw().map(|r| r.len()), Some(8_000));
}

#[test]
fn raw_buffers_must_align_with_the_output_layout() {
    let mut backend = RodioBackend::new(MixerFormat {
        channels: 2,
        ..MONO_8K
    });
    assert!(matches!(
        backend.sound_from_raw(&[0; 6]),
        Err(BackendError::RawBuffer(_))
    ));
}

#[test]
fn sound_volume_is_independent_of_samples() {
    let mut backend = RodioBackend::new(MONO_8K);
    let mut sound = backend.sound_from_raw(&[0; 4]).unwrap();
    assert_eq!(sound.volume(), 1.0);
    sound.set_volume(0.3);
    assert_eq!(sound.volume(), 0.3);
    assert_eq!(sound.raw(), Some(vec![0; 4]));
}

#[test]
fn load_decodes_wav_into_the_output_format() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tone.wav");
    write_wav(&path, 8_000, 8_000);

    let mut backend = RodioBackend::new(MONO_8K);
    let sound = backend.load(&path).unwrap();

    let length = sound.length().unwrap();
    assert!((length - 1.0).abs() < 0.01, "length {length}");
    let raw = sound.raw().unwrap();
    assert_eq!(raw.len() % MONO_8K.bytes_per_frame(), 0);
    assert!((raw.len() as i64 - 16_000).abs() <= 4);
}

#[test]
fn load_reports_missing_and_undecodable_files() {
    let dir = tempdir().unwrap();
    let mut backend = RodioBackend::new(MONO_8K);

    let missing = dir.path().join("missing.wav");
    assert!(matches!(
        backend.load(&missing),
        Err(BackendError::Open { .. })
    ));

    let garbage = dir.path().join("garbage.wav");
    fs::write(&garbage, b"definitely not audio").unwrap();
    assert!(matches!(
        backend.load(&garbage),
        Err(BackendError::Decode { .. })
    ));
}

#[test]
fn settings_choose_the_output_layout() {
    let settings = AudioSettings {
        sample_rate: 48_000,
        output_channels: 1,
        ..AudioSettings::default()
    };
    let mut backend = RodioBackend::from_settings(&settings);
    let sound = backend.sound_from_raw(&vec![0; 96_000]).unwrap();
    assert_eq!(sound.length(), Some(1.0));
}
