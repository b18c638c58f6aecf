use std::collections::BTreeMap;

use crate::foundation::error::{GeoError, GeoResult};
use crate::foundation::ids::{ArtifactId, NodeId};
use crate::render::backend::{ContainerSpec, RenderBackend, ShapeData};

/// What a recorded artifact is.
#[derive(Clone, Debug, PartialEq)]
pub enum ArtifactKind {
    Container(ContainerSpec),
    Shape {
        container: ArtifactId,
        data: ShapeData,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedArtifact {
    pub kind: ArtifactKind,
    pub progress: f64,
    pub live: bool,
}

/// Backend call log entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SceneEvent {
    Created(ArtifactId),
    Revealed { id: ArtifactId, progress: f64 },
    Removed(ArtifactId),
}

/// In-memory backend that records every call. Used headless and in tests.
#[derive(Debug, Default)]
pub struct SceneRecorder {
    next_id: u64,
    artifacts: BTreeMap<ArtifactId, RecordedArtifact>,
    events: Vec<SceneEvent>,
}

impl SceneRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SceneEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn artifact(&self, id: ArtifactId) -> Option<&RecordedArtifact> {
        self.artifacts.get(&id)
    }

    /// Number of artifacts (containers and shapes) not yet removed.
    pub fn live_count(&self) -> usize {
        self.artifacts.values().filter(|a| a.live).count()
    }

    /// Live shapes in creation order.
    pub fn live_shapes(&self) -> impl Iterator<Item = (ArtifactId, &ShapeData)> + '_ {
        self.artifacts.iter().filter_map(|(id, a)| match &a.kind {
            ArtifactKind::Shape { data, .. } if a.live => Some((*id, data)),
            _ => None,
        })
    }

    /// Live shapes built from node `node`.
    pub fn live_shapes_for(&self, node: NodeId) -> Vec<&ShapeData> {
        self.live_shapes()
            .filter(|(_, d)| d.node == Some(node))
            .map(|(_, d)| d)
            .collect()
    }

    fn alloc(&mut self, kind: ArtifactKind) -> ArtifactId {
        let id = ArtifactId(self.next_id);
        self.next_id += 1;
        self.artifacts.insert(
            id,
            RecordedArtifact {
                kind,
                progress: 0.0,
                live: true,
            },
        );
        self.events.push(SceneEvent::Created(id));
        id
    }
}

impl RenderBackend for SceneRecorder {
    fn create_container(&mut self, spec: &ContainerSpec) -> GeoResult<ArtifactId> {
        Ok(self.alloc(ArtifactKind::Container(spec.clone())))
    }

    fn create_shape(&mut self, container: ArtifactId, shape: &ShapeData) -> GeoResult<ArtifactId> {
        match self.artifacts.get(&container) {
            Some(RecordedArtifact {
                kind: ArtifactKind::Container(_),
                live: true,
                ..
            }) => {}
            _ => {
                return Err(GeoError::lifecycle(
                    "graph container",
                    format!("artifact {} is not a live container", container.0),
                ));
            }
        }
        Ok(self.alloc(ArtifactKind::Shape {
            container,
            data: shape.clone(),
        }))
    }

    fn reveal(&mut self, id: ArtifactId, progress: f64) -> GeoResult<()> {
        let Some(a) = self.artifacts.get_mut(&id).filter(|a| a.live) else {
            return Err(GeoError::lifecycle(
                "artifact",
                format!("artifact {} is not live", id.0),
            ));
        };
        a.progress = progress.clamp(0.0, 1.0);
        self.events.push(SceneEvent::Revealed {
            id,
            progress: a.progress,
        });
        Ok(())
    }

    fn remove(&mut self, id: ArtifactId) {
        if let Some(a) = self.artifacts.get_mut(&id)
            && a.live
        {
            a.live = false;
            self.events.push(SceneEvent::Removed(id));
        }
    }

    fn is_live(&self, id: ArtifactId) -> bool {
        self.artifacts.get(&id).is_some_and(|a| a.live)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/recorder.rs"]
mod tests;
