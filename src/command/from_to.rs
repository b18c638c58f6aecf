use crate::command::lifecycle::{Command, CommandCore, CommandCtx};
use crate::context::value::{AnimationKind, AnimationSpec};
use crate::foundation::error::{GeoError, GeoResult};
use crate::recompute::engine::RecomputeEngine;

/// `fromTo(var, from, to)` and `change(var, target)`.
///
/// The recompute plan is built at `init`, so a dependency cycle fails before the first frame.
/// `change` additionally redraws the variable's own shape every frame.
#[derive(Debug)]
pub struct FromToCommand {
    core: CommandCore,
    spec: AnimationSpec,
    engine: Option<RecomputeEngine>,
}

impl FromToCommand {
    pub fn new(core: CommandCore, spec: AnimationSpec) -> Self {
        Self {
            core,
            spec,
            engine: None,
        }
    }

    pub fn spec(&self) -> &AnimationSpec {
        &self.spec
    }

    /// Recompute engine, once initialized.
    pub fn engine(&self) -> Option<&RecomputeEngine> {
        self.engine.as_ref()
    }

    fn duration(&self, cx: &CommandCtx<'_>) -> f64 {
        self.core
            .style()
            .duration
            .unwrap_or(cx.opts.default_duration_secs)
    }
}

fn not_initialized() -> GeoError {
    GeoError::lifecycle("recompute engine", "animation played before init")
}

impl Command for FromToCommand {
    fn core(&self) -> &CommandCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CommandCore {
        &mut self.core
    }

    fn do_init(&mut self, cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        let engine = RecomputeEngine::prepare(
            &self.spec.variable,
            self.core.style().clone(),
            self.spec.kind == AnimationKind::Change,
            cx,
        )?;
        tracing::debug!(
            variable = %self.spec.variable,
            dependents = engine.plan().len(),
            "animation prepared"
        );
        self.engine = Some(engine);
        Ok(())
    }

    fn do_play(&mut self, cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        let duration = self.duration(cx);
        let engine = self.engine.as_mut().ok_or_else(not_initialized)?;
        engine.animate(cx, &self.spec.from, &self.spec.to, duration)
    }

    fn do_direct_play(&mut self, cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        let engine = self.engine.as_mut().ok_or_else(not_initialized)?;
        engine.jump(cx, &self.spec.to)
    }

    fn do_clear(&mut self, cx: &mut CommandCtx<'_>) {
        if let Some(engine) = self.engine.as_mut() {
            engine.clear(cx);
        }
    }

    fn rewind(&mut self, cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        match self.engine.as_mut() {
            Some(engine) => engine.rewind(cx),
            None => Ok(()),
        }
    }
}
