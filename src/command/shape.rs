use crate::command::lifecycle::{Command, CommandCore, CommandCtx};
use crate::command::plot::sample_curve;
use crate::context::value::{Curve, Geometry, GraphSpec, PlotValue};
use crate::foundation::error::{GeoError, GeoResult};
use crate::foundation::ids::ArtifactId;
use crate::render::backend::{ContainerSpec, ShapeData};

/// Drive the entry animation of `id` from 0 to 1 with the session's time driver.
pub(crate) fn reveal_animated(
    cx: &mut CommandCtx<'_>,
    id: ArtifactId,
    duration_secs: f64,
) -> GeoResult<()> {
    let ease = cx.opts.ease;
    for tick in cx.driver.start(duration_secs) {
        cx.backend.reveal(id, tick.eased(ease))?;
    }
    Ok(())
}

fn primary(core: &CommandCore) -> GeoResult<ArtifactId> {
    core.artifacts().first().copied().ok_or_else(|| {
        GeoError::lifecycle("artifact", "command owns no artifact; init did not run")
    })
}

/// Creates a graph container and publishes it under the graph's name.
#[derive(Debug)]
pub struct GraphCommand {
    core: CommandCore,
    spec: GraphSpec,
}

impl GraphCommand {
    pub fn new(core: CommandCore, spec: GraphSpec) -> Self {
        Self { core, spec }
    }
}

impl Command for GraphCommand {
    fn core(&self) -> &CommandCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CommandCore {
        &mut self.core
    }

    fn do_init(&mut self, cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        let id = cx.backend.create_container(&ContainerSpec {
            node: self.core.expression_id(),
            name: self.spec.name.clone(),
            x_range: self.spec.x_range,
            y_range: self.spec.y_range,
        })?;
        self.core.own(id);
        // Published even when temporary: shapes rebuilt in the same frame attach to it.
        cx.registry.register_container(self.spec.name.clone(), id);
        Ok(())
    }

    fn do_play(&mut self, cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        let duration = self
            .core
            .style()
            .duration
            .unwrap_or(cx.opts.shape_duration_secs);
        reveal_animated(cx, primary(&self.core)?, duration)
    }

    fn do_direct_play(&mut self, cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        cx.backend.reveal(primary(&self.core)?, 1.0)
    }
}

/// Where a shape's geometry comes from.
#[derive(Clone, Debug)]
pub enum ShapeSource {
    Fixed(Geometry),
    /// Sampled at `init` with the style's sample count or the engine default.
    Plot(PlotValue),
}

/// A single shape inside a graph container.
#[derive(Debug)]
pub struct ShapeCommand {
    core: CommandCore,
    graph: String,
    source: ShapeSource,
    geometry: Option<Geometry>,
}

impl ShapeCommand {
    pub fn new(core: CommandCore, graph: impl Into<String>, source: ShapeSource) -> Self {
        Self {
            core,
            graph: graph.into(),
            source,
            geometry: None,
        }
    }

    /// Geometry handed to the backend; `None` before `init`.
    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }
}

impl Command for ShapeCommand {
    fn core(&self) -> &CommandCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CommandCore {
        &mut self.core
    }

    fn do_init(&mut self, cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        let container = cx.registry.container(&self.graph)?;
        let geometry = match &self.source {
            ShapeSource::Fixed(g) => g.clone(),
            ShapeSource::Plot(p) => {
                let samples = match p.curve {
                    Curve::Explicit(_) => cx.opts.plot_samples,
                    Curve::Parametric { .. } => cx.opts.parametric_samples,
                };
                let samples = self.core.style().samples.unwrap_or(samples);
                Geometry::Polyline(sample_curve(p, samples))
            }
        };
        let id = cx.backend.create_shape(
            container,
            &ShapeData {
                node: self.core.expression_id(),
                geometry: geometry.clone(),
                style: self.core.style().clone(),
            },
        )?;
        self.core.own(id);
        if let Some(label) = self.core.published_label() {
            cx.registry.register_shape(label, id);
        }
        self.geometry = Some(geometry);
        Ok(())
    }

    fn do_play(&mut self, cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        let duration = self
            .core
            .style()
            .duration
            .unwrap_or(cx.opts.shape_duration_secs);
        reveal_animated(cx, primary(&self.core)?, duration)
    }

    fn do_direct_play(&mut self, cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        cx.backend.reveal(primary(&self.core)?, 1.0)
    }

    fn do_play_single(&mut self, cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        // Replay from the hidden state.
        cx.backend.reveal(primary(&self.core)?, 0.0)?;
        self.do_play(cx)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/command/shape.rs"]
mod tests;
