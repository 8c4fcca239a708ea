//! Conversion between the decoder's float samples and 16-bit PCM bytes.

use crate::player::BackendError;

const BYTES_PER_SAMPLE: usize = 2;

/// Encode samples as interleaved signed 16-bit little-endian bytes.
pub(super) fn samples_to_bytes(samples: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(samples.len() * BYTES_PER_SAMPLE);
    for sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16;
        out.extend_from_slice(&value.to_le_bytes());
    }
    out
}

/// Decode interleaved signed 16-bit little-endian bytes.
///
/// The buffer must hold a whole number of frames for `channels`.
pub(super) fn bytes_to_samples(raw: &[u8], channels: u16) -> Result<Vec<f32>, BackendError> {
    let frame = BYTES_PER_SAMPLE * usize::from(channels.max(1));
    if raw.len() % frame != 0 {
        return Err(BackendError::RawBuffer(format!(
            "{} bytes is not a multiple of the {frame}-byte frame",
            raw.len()
        )));
    }
    Ok(raw
        .chunks_exact(BYTES_PER_SAMPLE)
        .map(|pair| {
            let value = i16::from_le_bytes([pair[0], pair[1]]);
            (f32::from(value) / f32::from(i16::MAX)).max(-1.0)
        })
        .collect())
}
