//! Easing, interpolation and the time-driver abstraction.

pub mod driver;
pub mod ease;
pub mod lerp;
