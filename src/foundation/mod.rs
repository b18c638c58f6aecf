//! Shared ids, errors and geometry helpers.

pub mod error;
pub mod geom;
pub mod ids;
