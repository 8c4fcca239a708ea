//! Track playback core: preloading, single-track playback, position
//! reporting and frame-accurate seeking over an injected audio backend.

mod backend;
mod clock;
mod error;
mod segment;
mod track_player;

pub use backend::{AudioBackend, ChannelId, FALLBACK_CHANNEL, MixerFormat, Sound};
pub use clock::{Clock, MonotonicClock};
pub use error::{BackendError, PlayerError};
pub use segment::{SegmentPlan, plan_segment};
pub use track_player::TrackPlayer;

#[cfg(test)]
pub(crate) mod fake;
