//! Commands: the executable counterpart of playable nodes.

pub mod from_to;
pub mod lifecycle;
pub mod plot;
pub mod registry;
pub mod sequence;
pub mod shape;
pub mod style;

pub use lifecycle::{Command, CommandCore, CommandCtx, CommandSlots, CommandState};

#[cfg(test)]
#[path = "../../tests/unit/command/harness.rs"]
pub(crate) mod harness;

use crate::command::from_to::FromToCommand;
use crate::command::sequence::SequenceCommand;
use crate::command::shape::{GraphCommand, ShapeCommand, ShapeSource};
use crate::command::style::{StyleKind, StyleOptions};
use crate::context::value::{Geometry, Value};
use crate::foundation::ids::NodeId;

/// Build a fresh command for a resolved value, or `None` if the value draws nothing.
///
/// `opts` is laid over the built-in defaults for the value's kind.
pub fn build_command(
    id: Option<NodeId>,
    label: Option<&str>,
    value: &Value,
    opts: &StyleOptions,
) -> Option<Box<dyn Command>> {
    let core = |kind: StyleKind| {
        CommandCore::new(
            id,
            label.map(str::to_owned),
            StyleOptions::defaults_for(kind).merged_with(opts),
        )
    };
    let cmd: Box<dyn Command> = match value {
        Value::Graph(spec) => Box::new(GraphCommand::new(core(StyleKind::Graph), spec.clone())),
        Value::Shape(shape) => {
            let kind = match shape.geometry {
                Geometry::Point(_) => StyleKind::Point,
                Geometry::Segment(_) => StyleKind::Line,
                Geometry::Circle { .. } => StyleKind::Circle,
                Geometry::Polygon(_) => StyleKind::Polygon,
                Geometry::Polyline(_) => StyleKind::Plot,
            };
            Box::new(ShapeCommand::new(
                core(kind),
                shape.graph.clone(),
                ShapeSource::Fixed(shape.geometry.clone()),
            ))
        }
        Value::Plot(plot) => Box::new(ShapeCommand::new(
            core(StyleKind::Plot),
            plot.graph.clone(),
            ShapeSource::Plot(plot.clone()),
        )),
        Value::Sequence(items) => {
            let children = items
                .iter()
                .filter_map(|v| build_command(id, None, v, opts))
                .collect();
            Box::new(SequenceCommand::new(core(StyleKind::Other), children))
        }
        Value::Animation(spec) => {
            Box::new(FromToCommand::new(core(StyleKind::Other), spec.clone()))
        }
        Value::Number(_)
        | Value::Text(_)
        | Value::Range { .. }
        | Value::Function(_) => return None,
    };
    Some(cmd)
}
