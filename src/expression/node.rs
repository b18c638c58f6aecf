use crate::command::style::StyleOptions;
use crate::command::{Command, build_command};
use crate::context::store::ExpressionContext;
use crate::context::value::{AtomicValues, Value};
use crate::expression::resolve::resolve_kind;
use crate::foundation::error::{GeoError, GeoResult};
use crate::foundation::ids::NodeId;

/// Arithmetic operator of a [`NodeKind::Binary`] node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Closed set of node variants.
///
/// Children are unresolved sub-nodes owned by their parent. Argument lists that accept either
/// numbers or points (`line(g, 0, 0, 4, 0)` and `line(g, A, B)`) are kept as flat `args` and
/// flattened to coordinates at resolution time.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    Number {
        value: f64,
    },
    Text {
        value: String,
    },
    Var {
        name: String,
    },
    Assign {
        name: String,
        expr: Box<ExprNode>,
    },
    Binary {
        op: BinOp,
        left: Box<ExprNode>,
        right: Box<ExprNode>,
    },
    Range {
        lo: Box<ExprNode>,
        hi: Box<ExprNode>,
    },
    /// `g2d(xRange?, yRange?)`.
    Graph {
        #[serde(default)]
        x_range: Option<Box<ExprNode>>,
        #[serde(default)]
        y_range: Option<Box<ExprNode>>,
    },
    Point {
        graph: Box<ExprNode>,
        args: Vec<ExprNode>,
    },
    Line {
        graph: Box<ExprNode>,
        args: Vec<ExprNode>,
    },
    Circle {
        graph: Box<ExprNode>,
        args: Vec<ExprNode>,
    },
    Polygon {
        graph: Box<ExprNode>,
        args: Vec<ExprNode>,
    },
    /// Triangle from three sides: `sss(g, a, b, c[, x, y[, rotationDeg]])`.
    Sss {
        graph: Box<ExprNode>,
        args: Vec<ExprNode>,
    },
    Intersect {
        graph: Box<ExprNode>,
        first: Box<ExprNode>,
        second: Box<ExprNode>,
    },
    /// `plot(g, f[, range])`; `f` is a one-parameter function or a formula in `x`.
    Plot {
        graph: Box<ExprNode>,
        func: Box<ExprNode>,
        #[serde(default)]
        domain: Option<Box<ExprNode>>,
    },
    /// `paraplot(g, x(t), y(t)[, range])`.
    ParaPlot {
        graph: Box<ExprNode>,
        x: Box<ExprNode>,
        y: Box<ExprNode>,
        #[serde(default)]
        domain: Option<Box<ExprNode>>,
    },
    /// `def(params, body)`.
    Def {
        params: Vec<String>,
        body: String,
    },
    Call {
        name: String,
        args: Vec<ExprNode>,
    },
    Seq {
        items: Vec<ExprNode>,
    },
    FromTo {
        variable: String,
        from: Box<ExprNode>,
        to: Box<ExprNode>,
    },
    Change {
        variable: String,
        target: Box<ExprNode>,
    },
}

/// One expression node.
///
/// `label` is the variable an enclosing assignment binds this node's result to; it is written by
/// the assignment before the node resolves. Derived state lives in `resolved` and is overwritten
/// by every resolution.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ExprNode {
    pub id: NodeId,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(skip)]
    pub(crate) resolved: Option<Value>,
}

impl ExprNode {
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            label: None,
            kind,
            resolved: None,
        }
    }

    /// Result of the most recent resolution.
    pub fn resolved(&self) -> Option<&Value> {
        self.resolved.as_ref()
    }

    pub(crate) fn value(&self) -> GeoResult<&Value> {
        self.resolved
            .as_ref()
            .ok_or_else(|| GeoError::expression(self.id, "node has not been resolved"))
    }

    /// Resolve against the store as it is now.
    ///
    /// Re-entrant: every call recomputes derived state from scratch, recompiling formulas against
    /// a fresh scope snapshot. The only side effects are bindings written by assignments and
    /// dependency edges recorded against the store's current caller.
    pub fn resolve(&mut self, ctx: &mut ExpressionContext) -> GeoResult<()> {
        let value = resolve_kind(self.id, self.label.as_deref(), &mut self.kind, ctx)?;
        self.resolved = Some(value);
        Ok(())
    }

    /// Flat numeric payload of the last resolution; empty before resolution.
    pub fn atomic_values(&self) -> AtomicValues {
        self.resolved
            .as_ref()
            .map(Value::atomic_values)
            .unwrap_or_default()
    }

    /// Whether this node compiles to a command.
    pub fn can_play(&self) -> bool {
        match &self.kind {
            NodeKind::Assign { expr, .. } => expr.can_play(),
            NodeKind::Graph { .. }
            | NodeKind::Point { .. }
            | NodeKind::Line { .. }
            | NodeKind::Circle { .. }
            | NodeKind::Polygon { .. }
            | NodeKind::Sss { .. }
            | NodeKind::Intersect { .. }
            | NodeKind::Plot { .. }
            | NodeKind::ParaPlot { .. }
            | NodeKind::Seq { .. }
            | NodeKind::FromTo { .. }
            | NodeKind::Change { .. } => true,
            NodeKind::Number { .. }
            | NodeKind::Text { .. }
            | NodeKind::Var { .. }
            | NodeKind::Binary { .. }
            | NodeKind::Range { .. }
            | NodeKind::Def { .. }
            | NodeKind::Call { .. } => false,
        }
    }

    /// The node that produces the command: the right-hand side for assignments, else `self`.
    pub fn commandable(&self) -> &ExprNode {
        match &self.kind {
            NodeKind::Assign { expr, .. } => expr.commandable(),
            _ => self,
        }
    }

    /// Variable this node's result is bound to.
    pub fn binding_label(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Assign { name, .. } => Some(name),
            _ => self.label.as_deref(),
        }
    }

    /// Build a fresh command from the current derived state. `None` for non-playable nodes.
    ///
    /// Every call returns an independent command; nothing is shared with earlier ones.
    pub fn to_command(&self, opts: &StyleOptions) -> GeoResult<Option<Box<dyn Command>>> {
        if !self.can_play() {
            return Ok(None);
        }
        // Commands carry this node's id, not the right-hand side's.
        Ok(build_command(
            Some(self.id),
            self.binding_label(),
            self.commandable().value()?,
            opts,
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/node.rs"]
mod tests;
