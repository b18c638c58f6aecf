//! Variable store, dependency index and the resolved value model.

pub mod store;
pub mod value;
