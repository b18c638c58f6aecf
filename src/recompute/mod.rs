//! Reactive recomputation of the dependents of an animated variable.

pub mod engine;
pub mod plan;
