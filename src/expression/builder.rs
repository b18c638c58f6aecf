use crate::expression::node::{BinOp, ExprNode, NodeKind};
use crate::foundation::ids::NodeId;

/// Builds node trees in code, numbering nodes in creation order.
///
/// Hosts normally hand over parsed trees (see [`crate::Document::from_json`]); this is the
/// programmatic equivalent used by embedders and tests.
#[derive(Debug, Default)]
pub struct NodeBuilder {
    next_id: u64,
}

impl NodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start numbering at `id`.
    pub fn starting_at(id: u64) -> Self {
        Self { next_id: id }
    }

    fn node(&mut self, kind: NodeKind) -> ExprNode {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        ExprNode::new(id, kind)
    }

    pub fn num(&mut self, value: f64) -> ExprNode {
        self.node(NodeKind::Number { value })
    }

    /// One number node per value.
    pub fn nums(&mut self, values: &[f64]) -> Vec<ExprNode> {
        values.iter().map(|&v| self.num(v)).collect()
    }

    pub fn text(&mut self, value: impl Into<String>) -> ExprNode {
        self.node(NodeKind::Text {
            value: value.into(),
        })
    }

    pub fn var(&mut self, name: impl Into<String>) -> ExprNode {
        self.node(NodeKind::Var { name: name.into() })
    }

    pub fn assign(&mut self, name: impl Into<String>, expr: ExprNode) -> ExprNode {
        self.node(NodeKind::Assign {
            name: name.into(),
            expr: Box::new(expr),
        })
    }

    pub fn binary(&mut self, op: BinOp, left: ExprNode, right: ExprNode) -> ExprNode {
        self.node(NodeKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn range(&mut self, lo: f64, hi: f64) -> ExprNode {
        let lo = self.num(lo);
        let hi = self.num(hi);
        self.node(NodeKind::Range {
            lo: Box::new(lo),
            hi: Box::new(hi),
        })
    }

    /// `g2d()` with default ranges.
    pub fn g2d(&mut self) -> ExprNode {
        self.node(NodeKind::Graph {
            x_range: None,
            y_range: None,
        })
    }

    pub fn g2d_with(&mut self, x_range: ExprNode, y_range: ExprNode) -> ExprNode {
        self.node(NodeKind::Graph {
            x_range: Some(Box::new(x_range)),
            y_range: Some(Box::new(y_range)),
        })
    }

    pub fn point(&mut self, graph: &str, args: Vec<ExprNode>) -> ExprNode {
        let graph = Box::new(self.var(graph));
        self.node(NodeKind::Point { graph, args })
    }

    pub fn line(&mut self, graph: &str, args: Vec<ExprNode>) -> ExprNode {
        let graph = Box::new(self.var(graph));
        self.node(NodeKind::Line { graph, args })
    }

    pub fn circle(&mut self, graph: &str, args: Vec<ExprNode>) -> ExprNode {
        let graph = Box::new(self.var(graph));
        self.node(NodeKind::Circle { graph, args })
    }

    pub fn polygon(&mut self, graph: &str, args: Vec<ExprNode>) -> ExprNode {
        let graph = Box::new(self.var(graph));
        self.node(NodeKind::Polygon { graph, args })
    }

    pub fn sss(&mut self, graph: &str, args: Vec<ExprNode>) -> ExprNode {
        let graph = Box::new(self.var(graph));
        self.node(NodeKind::Sss { graph, args })
    }

    pub fn intersect(&mut self, graph: &str, first: ExprNode, second: ExprNode) -> ExprNode {
        let graph = Box::new(self.var(graph));
        self.node(NodeKind::Intersect {
            graph,
            first: Box::new(first),
            second: Box::new(second),
        })
    }

    pub fn plot(&mut self, graph: &str, func: ExprNode, domain: Option<ExprNode>) -> ExprNode {
        let graph = Box::new(self.var(graph));
        self.node(NodeKind::Plot {
            graph,
            func: Box::new(func),
            domain: domain.map(Box::new),
        })
    }

    pub fn paraplot(
        &mut self,
        graph: &str,
        x: ExprNode,
        y: ExprNode,
        domain: Option<ExprNode>,
    ) -> ExprNode {
        let graph = Box::new(self.var(graph));
        self.node(NodeKind::ParaPlot {
            graph,
            x: Box::new(x),
            y: Box::new(y),
            domain: domain.map(Box::new),
        })
    }

    pub fn def(&mut self, params: &[&str], body: impl Into<String>) -> ExprNode {
        self.node(NodeKind::Def {
            params: params.iter().map(|p| (*p).to_owned()).collect(),
            body: body.into(),
        })
    }

    pub fn call(&mut self, name: impl Into<String>, args: Vec<ExprNode>) -> ExprNode {
        self.node(NodeKind::Call {
            name: name.into(),
            args,
        })
    }

    pub fn seq(&mut self, items: Vec<ExprNode>) -> ExprNode {
        self.node(NodeKind::Seq { items })
    }

    pub fn from_to(&mut self, variable: impl Into<String>, from: f64, to: f64) -> ExprNode {
        let from = self.num(from);
        let to = self.num(to);
        self.node(NodeKind::FromTo {
            variable: variable.into(),
            from: Box::new(from),
            to: Box::new(to),
        })
    }

    pub fn change(&mut self, variable: impl Into<String>, target: ExprNode) -> ExprNode {
        self.node(NodeKind::Change {
            variable: variable.into(),
            target: Box::new(target),
        })
    }
}
