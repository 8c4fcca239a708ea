//! Library discovery: audio files under a folder, each paired with an
//! optional sidecar transcript.

mod error;
mod model;
mod scan;
mod title;

pub use error::LibraryError;
pub use model::Track;
pub use scan::load_tracks;
