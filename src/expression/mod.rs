//! Expression nodes and the resolution protocol.

pub mod builder;
pub mod node;
mod resolve;
