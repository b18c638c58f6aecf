//! Document arena, engine options and the playback session.

pub mod document;
pub mod executor;
pub mod opts;
