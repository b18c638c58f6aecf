//! Rendering backend contract and the in-memory recording backend.

pub mod backend;
pub mod recorder;
