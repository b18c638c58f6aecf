use crate::foundation::ids::NodeId;

/// Convenience result type used across geoscript.
pub type GeoResult<T> = Result<T, GeoError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum GeoError {
    /// A node failed to resolve against the current variable store.
    ///
    /// Carries the host editor's id of the originating node so the offending source line can be
    /// located. Resolution errors are never retried.
    #[error("expression error in node {id}: {message}")]
    Expression {
        /// Id of the node that failed.
        id: NodeId,
        /// Human readable diagnostic.
        message: String,
    },

    /// The dependents of an animated variable form a cycle.
    #[error("dependency cycle while animating '{variable}': {}", labels.join(" -> "))]
    Cycle {
        /// Variable the animation targets.
        variable: String,
        /// Labels of the nodes that could not be ordered.
        labels: Vec<String>,
    },

    /// A command was driven without a collaborator it requires.
    #[error("lifecycle error: {collaborator}: {message}")]
    Lifecycle {
        /// The missing collaborator (graph container, variable, command state).
        collaborator: String,
        /// Human readable diagnostic.
        message: String,
    },

    /// A formula string failed to compile or evaluate.
    #[error("formula error: {0}")]
    Formula(String),

    /// A variable is already being animated by another recompute pass.
    #[error("variable '{variable}' is already animating")]
    Busy {
        /// Variable that is locked.
        variable: String,
    },

    /// Errors when serializing or deserializing documents and options.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GeoError {
    /// Build a [`GeoError::Expression`] value.
    pub fn expression(id: NodeId, msg: impl Into<String>) -> Self {
        Self::Expression {
            id,
            message: msg.into(),
        }
    }

    /// Build a [`GeoError::Lifecycle`] value.
    pub fn lifecycle(collaborator: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Lifecycle {
            collaborator: collaborator.into(),
            message: msg.into(),
        }
    }

    /// Build a [`GeoError::Formula`] value.
    pub fn formula(msg: impl Into<String>) -> Self {
        Self::Formula(msg.into())
    }

    /// Build a [`GeoError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Id of the node an expression error originated from, if any.
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Self::Expression { id, .. } => Some(*id),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
