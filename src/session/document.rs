use std::collections::BTreeSet;

use crate::expression::node::ExprNode;
use crate::foundation::error::{GeoError, GeoResult};
use crate::foundation::ids::{NodeId, NodeIdx};

/// Arena of top-level nodes in source order.
///
/// A node's [`NodeIdx`] is its position here; dependency edges and command slots are keyed by
/// it.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Document {
    nodes: Vec<ExprNode>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from top-level nodes, rejecting duplicate ids.
    pub fn from_nodes(nodes: Vec<ExprNode>) -> GeoResult<Self> {
        let doc = Self { nodes };
        doc.validate()?;
        Ok(doc)
    }

    /// Load the JSON form handed over by the host editor: `{"nodes": [...]}`.
    pub fn from_json(s: &str) -> GeoResult<Self> {
        let doc: Self = serde_json::from_str(s).map_err(|e| GeoError::serde(e.to_string()))?;
        doc.validate()?;
        Ok(doc)
    }

    pub fn to_json(&self) -> GeoResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| GeoError::serde(e.to_string()))
    }

    pub fn validate(&self) -> GeoResult<()> {
        let mut seen = BTreeSet::new();
        for n in &self.nodes {
            if !seen.insert(n.id) {
                return Err(GeoError::serde(format!("duplicate node id {}", n.id)));
            }
        }
        if u32::try_from(self.nodes.len()).is_err() {
            return Err(GeoError::serde("too many nodes"));
        }
        Ok(())
    }

    /// Append a top-level node.
    pub fn push(&mut self, node: ExprNode) -> NodeIdx {
        self.nodes.push(node);
        NodeIdx((self.nodes.len() - 1) as u32)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, idx: NodeIdx) -> Option<&ExprNode> {
        self.nodes.get(idx.index())
    }

    pub(crate) fn node_mut(&mut self, idx: NodeIdx) -> GeoResult<&mut ExprNode> {
        self.nodes
            .get_mut(idx.index())
            .ok_or_else(|| GeoError::lifecycle("document", format!("no node at index {}", idx.0)))
    }

    /// Top-level nodes with their indices, in source order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIdx, &ExprNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeIdx(i as u32), n))
    }

    /// Index of the top-level node bearing host id `id`.
    pub fn index_of(&self, id: NodeId) -> Option<NodeIdx> {
        self.iter().find(|(_, n)| n.id == id).map(|(i, _)| i)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/document.rs"]
mod tests;
