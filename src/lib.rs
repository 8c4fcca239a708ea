//! Terminal player for narrated audio clips with sidecar transcripts.

pub mod app;
pub mod audio;
pub mod config;
pub mod library;
pub mod player;
pub mod runtime;
pub mod ui;
