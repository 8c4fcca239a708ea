//! Frame arithmetic for starting playback part-way into a raw buffer.

/// Where playback of a track should begin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentPlan {
    /// Play the whole preloaded sound from the start.
    Full,
    /// The requested start lies at or beyond the end of the raw data.
    PastEnd { position: f64 },
    /// Play `raw[byte_offset..]`, which begins at `actual_start` seconds.
    Partial { byte_offset: usize, actual_start: f64 },
}

/// Plan a segment starting at `start` seconds into a buffer of `raw_len` bytes.
///
/// The start is snapped down to a frame boundary, so `actual_start` may be
/// slightly earlier than `start`. `length` is the track duration when known;
/// a zero length counts as unknown.
pub fn plan_segment(
    start: f64,
    raw_len: usize,
    sample_rate: u32,
    bytes_per_frame: usize,
    length: Option<f64>,
) -> SegmentPlan {
    if start <= 0.0 || sample_rate == 0 || bytes_per_frame == 0 {
        return SegmentPlan::Full;
    }

    let length = length.filter(|l| *l > 0.0);
    let start = match length {
        // `frames / rate * rate` can land just under `frames`, so the end is
        // decided on time before flooring to a frame.
        Some(l) if start >= l => return SegmentPlan::PastEnd { position: l },
        Some(l) => start.clamp(0.0, l),
        None => start,
    };

    let offset_frames = (start * f64::from(sample_rate)).floor() as usize;
    let byte_offset = offset_frames.saturating_mul(bytes_per_frame);
    if byte_offset >= raw_len {
        return SegmentPlan::PastEnd {
            position: length.unwrap_or(start),
        };
    }

    let mut actual_start = byte_offset as f64 / (bytes_per_frame as f64 * f64::from(sample_rate));
    if let Some(l) = length {
        actual_start = actual_start.min(l);
    }

    SegmentPlan::Partial {
        byte_offset,
        actual_start,
    }
}
