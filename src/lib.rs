#![forbid(unsafe_code)]
//! Reactive geometry scripting engine.
//!
//! A [`Document`] is an ordered list of expression nodes (`a = 5`, `L = line(g, 0, 0, a, 10)`,
//! `fromTo(a, 5, 15)`). A [`Session`] resolves them against an [`ExpressionContext`], recording
//! which top-level nodes read which variables, and turns playable values into commands that draw
//! through a [`RenderBackend`]. Animating a variable re-resolves every node that transitively
//! depends on it, once per frame, in dependency order.

pub mod animation;
pub mod command;
pub mod context;
pub mod expression;
pub mod formula;
pub mod foundation;
pub mod recompute;
pub mod render;
pub mod session;

pub use animation::driver::{FixedStepDriver, FrameTick, InstantDriver, TimeDriver};
pub use animation::ease::Ease;
pub use command::style::StyleOptions;
pub use command::{Command, CommandState};
pub use context::store::ExpressionContext;
pub use context::value::Value;
pub use expression::builder::NodeBuilder;
pub use expression::node::{ExprNode, NodeKind};
pub use formula::{BytecodeCompiler, Formula, FormulaCompiler, FormulaError};
pub use foundation::error::{GeoError, GeoResult};
pub use foundation::ids::{ArtifactId, NodeId, NodeIdx};
pub use recompute::plan::RecomputePlan;
pub use render::backend::RenderBackend;
pub use render::recorder::SceneRecorder;
pub use session::document::Document;
pub use session::executor::Session;
pub use session::opts::EngineOpts;
