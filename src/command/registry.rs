use std::collections::BTreeMap;

use crate::command::style::StyleOptions;
use crate::foundation::error::{GeoError, GeoResult};
use crate::foundation::ids::ArtifactId;

/// Label-keyed lookup of what earlier commands produced.
///
/// Graph commands publish their container here so later shapes can attach to it; labelled
/// commands publish their primary shape and style after `init`.
#[derive(Debug, Default)]
pub struct ShapeRegistry {
    containers: BTreeMap<String, ArtifactId>,
    shapes: BTreeMap<String, ArtifactId>,
    styles: BTreeMap<String, StyleOptions>,
}

impl ShapeRegistry {
    pub fn register_container(&mut self, name: impl Into<String>, id: ArtifactId) {
        self.containers.insert(name.into(), id);
    }

    /// Container published under `name`, or a lifecycle error naming it.
    pub fn container(&self, name: &str) -> GeoResult<ArtifactId> {
        self.containers.get(name).copied().ok_or_else(|| {
            GeoError::lifecycle(
                format!("graph container '{name}'"),
                "not created yet; play the g2d() command first",
            )
        })
    }

    pub fn register_shape(&mut self, label: impl Into<String>, id: ArtifactId) {
        self.shapes.insert(label.into(), id);
    }

    pub fn shape(&self, label: &str) -> Option<ArtifactId> {
        self.shapes.get(label).copied()
    }

    pub fn register_style(&mut self, label: impl Into<String>, style: StyleOptions) {
        self.styles.insert(label.into(), style);
    }

    /// Style last published under `label`. Survives the command being cleared.
    pub fn style(&self, label: &str) -> Option<&StyleOptions> {
        self.styles.get(label)
    }

    /// Drop every container or shape entry pointing at `id`.
    pub fn forget_artifact(&mut self, id: ArtifactId) {
        self.containers.retain(|_, v| *v != id);
        self.shapes.retain(|_, v| *v != id);
    }

    pub fn clear(&mut self) {
        self.containers.clear();
        self.shapes.clear();
        self.styles.clear();
    }
}
