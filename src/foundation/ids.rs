use std::fmt;

/// Opaque node id assigned by the host editor. Never generated by the engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of a top-level node in a [`crate::Document`] arena.
///
/// Dependency edges are keyed by this index rather than by live references, and its ordering is
/// document order, which makes scheduling tie-breaks deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(pub u32);

impl NodeIdx {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to an artifact allocated by a [`crate::RenderBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactId(pub u64);
