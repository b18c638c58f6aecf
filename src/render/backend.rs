use crate::command::style::StyleOptions;
use crate::context::value::Geometry;
use crate::foundation::error::GeoResult;
use crate::foundation::ids::{ArtifactId, NodeId};

/// A graph container request.
#[derive(Clone, Debug, PartialEq)]
pub struct ContainerSpec {
    pub node: Option<NodeId>,
    pub name: String,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

/// A shape request, in graph coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeData {
    /// Host id of the node the shape was built from.
    pub node: Option<NodeId>,
    pub geometry: Geometry,
    pub style: StyleOptions,
}

/// Rendering backend collaborator.
///
/// Commands own the artifacts they create and release each of them through [`Self::remove`].
/// Backends must surface a missing or removed container as an error instead of drawing into
/// nothing.
pub trait RenderBackend {
    /// Allocate a graph container.
    fn create_container(&mut self, spec: &ContainerSpec) -> GeoResult<ArtifactId>;

    /// Allocate a shape inside `container`. The shape starts hidden (reveal progress `0`).
    fn create_shape(&mut self, container: ArtifactId, shape: &ShapeData) -> GeoResult<ArtifactId>;

    /// Set the entry-animation progress of an artifact, `1.0` being fully drawn.
    fn reveal(&mut self, id: ArtifactId, progress: f64) -> GeoResult<()>;

    /// Release an artifact. Removing an unknown or already removed artifact is a no-op.
    fn remove(&mut self, id: ArtifactId);

    fn is_live(&self, id: ArtifactId) -> bool;
}

impl<B: RenderBackend + ?Sized> RenderBackend for Box<B> {
    fn create_container(&mut self, spec: &ContainerSpec) -> GeoResult<ArtifactId> {
        (**self).create_container(spec)
    }

    fn create_shape(&mut self, container: ArtifactId, shape: &ShapeData) -> GeoResult<ArtifactId> {
        (**self).create_shape(container, shape)
    }

    fn reveal(&mut self, id: ArtifactId, progress: f64) -> GeoResult<()> {
        (**self).reveal(id, progress)
    }

    fn remove(&mut self, id: ArtifactId) {
        (**self).remove(id);
    }

    fn is_live(&self, id: ArtifactId) -> bool {
        (**self).is_live(id)
    }
}
