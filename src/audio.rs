//! `rodio` implementation of the player's audio boundary.

mod device;
mod pcm;
mod sound;

pub use device::RodioBackend;
pub use sound::RodioSound;

#[cfg(test)]
mod tests;
