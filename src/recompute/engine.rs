use crate::animation::driver::FrameTick;
use crate::command::build_command;
use crate::command::lifecycle::{Command, CommandCtx};
use crate::command::style::StyleOptions;
use crate::context::store::ExpressionContext;
use crate::context::value::Value;
use crate::foundation::error::{GeoError, GeoResult};
use crate::foundation::ids::{NodeId, NodeIdx};
use crate::recompute::plan::{DependencyView, RecomputePlan};
use crate::session::document::Document;

/// [`DependencyView`] over a live document and its store.
pub struct ContextView<'a> {
    pub document: &'a Document,
    pub exprs: &'a ExpressionContext,
}

impl DependencyView for ContextView<'_> {
    fn dependents(&self, variable: &str) -> Vec<NodeIdx> {
        self.exprs.get_dependents(variable).collect()
    }

    fn label(&self, node: NodeIdx) -> Option<String> {
        self.document
            .node(node)
            .and_then(|n| n.binding_label())
            .map(str::to_owned)
    }
}

/// The animated variable's own node, re-rendered every frame by `change`.
#[derive(Clone, Copy, Debug)]
struct SourceNode {
    id: Option<NodeId>,
    origin: Option<NodeIdx>,
}

/// Frame driver behind `fromTo` and `change`.
///
/// Each frame writes the interpolated value, clears the commands of the previous frame, then
/// re-resolves every node of the plan in order and renders a fresh command for it with
/// `direct_play`. It only ever owns the commands of the latest frame. On the first frame of every
/// run the session's own commands for the same nodes are cleared and their slots refilled with
/// fresh, uninitialized commands, so a later replay from the start can draw them again.
#[derive(Debug)]
pub struct RecomputeEngine {
    plan: RecomputePlan,
    style: StyleOptions,
    source: Option<SourceNode>,
    live: Vec<Box<dyn Command>>,
    retired: bool,
    /// Value of the variable before the first run; restored by [`Self::rewind`].
    initial: Option<Value>,
    frames: u64,
}

impl RecomputeEngine {
    /// Plan the recomputation of `variable`. Fails before anything is rendered when the
    /// dependents form a cycle.
    ///
    /// `style` is the animation's own options, laid over the style each dependent carries.
    /// With `render_source` the variable's value is itself drawn every frame.
    pub fn prepare(
        variable: &str,
        style: StyleOptions,
        render_source: bool,
        cx: &mut CommandCtx<'_>,
    ) -> GeoResult<Self> {
        let view = ContextView {
            document: cx.document,
            exprs: cx.exprs,
        };
        let plan = RecomputePlan::build(variable, &view)?;
        if render_source && let Some(Value::Shape(_)) = cx.exprs.get_reference(variable) {
            let drawn = cx
                .registry
                .shape(variable)
                .is_some_and(|id| cx.backend.is_live(id));
            if !drawn {
                return Err(GeoError::lifecycle(
                    format!("shape '{variable}'"),
                    "not drawn yet; play its command first",
                ));
            }
        }
        let source = render_source.then(|| {
            let origin = cx.exprs.binding(variable).and_then(|b| b.origin);
            SourceNode {
                id: origin.and_then(|o| cx.document.node(o)).map(|n| n.id),
                origin,
            }
        });
        Ok(Self {
            plan,
            style,
            source,
            live: Vec::new(),
            retired: false,
            initial: None,
            frames: 0,
        })
    }

    pub fn plan(&self) -> &RecomputePlan {
        &self.plan
    }

    /// Commands rendered by the latest frame.
    pub fn live(&self) -> &[Box<dyn Command>] {
        &self.live
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Animate from `from` to `to` over `duration_secs`, one frame per driver tick.
    #[tracing::instrument(skip_all, fields(variable = %self.plan.variable()))]
    pub fn animate(
        &mut self,
        cx: &mut CommandCtx<'_>,
        from: &Value,
        to: &Value,
        duration_secs: f64,
    ) -> GeoResult<()> {
        let variable = self.plan.variable().to_owned();
        cx.exprs.begin_animation(&variable)?;
        self.begin_run(cx);
        let out = self.drive(cx, from, to, duration_secs);
        cx.exprs.end_animation(&variable);
        out
    }

    /// Run a single frame at `to`.
    pub fn jump(&mut self, cx: &mut CommandCtx<'_>, to: &Value) -> GeoResult<()> {
        let variable = self.plan.variable().to_owned();
        cx.exprs.begin_animation(&variable)?;
        self.begin_run(cx);
        let out = self.frame(cx, to.clone());
        cx.exprs.end_animation(&variable);
        out
    }

    /// Clear the latest frame's commands.
    pub fn clear(&mut self, cx: &mut CommandCtx<'_>) {
        for mut cmd in self.live.drain(..) {
            cmd.clear(cx);
        }
    }

    /// Undo earlier runs ahead of a replay from the start.
    ///
    /// Releases the latest frame, restores the variable to its value before the first run and
    /// re-resolves the plan against it. A no-op when the engine never ran.
    pub fn rewind(&mut self, cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        self.clear(cx);
        let Some(value) = self.initial.take() else {
            return Ok(());
        };
        cx.exprs.update_reference(self.plan.variable(), value);
        for &idx in self.plan.order() {
            resolve_in_place(cx, idx)?;
        }
        tracing::debug!(variable = %self.plan.variable(), "recompute rewound");
        Ok(())
    }

    fn begin_run(&mut self, cx: &CommandCtx<'_>) {
        self.retired = false;
        if self.initial.is_none() {
            self.initial = cx.exprs.get_reference(self.plan.variable()).cloned();
        }
    }

    fn drive(
        &mut self,
        cx: &mut CommandCtx<'_>,
        from: &Value,
        to: &Value,
        duration_secs: f64,
    ) -> GeoResult<()> {
        let ease = cx.opts.ease;
        for tick in cx.driver.start(duration_secs) {
            let value = match tick {
                FrameTick::Complete => to.clone(),
                FrameTick::Update(_) => from.interpolate(to, tick.eased(ease)).ok_or_else(|| {
                    GeoError::lifecycle(
                        "animation",
                        format!(
                            "cannot interpolate a {} into a {}",
                            from.kind_name(),
                            to.kind_name()
                        ),
                    )
                })?,
            };
            self.frame(cx, value)?;
        }
        Ok(())
    }

    fn frame(&mut self, cx: &mut CommandCtx<'_>, value: Value) -> GeoResult<()> {
        cx.exprs.update_reference(self.plan.variable(), value);
        self.retire_superseded(cx)?;
        self.clear(cx);

        if let Some(src) = self.source {
            let value = cx.exprs.get_reference(self.plan.variable()).cloned();
            let style = self.carried_style(cx, src.origin);
            if let Some(cmd) = value.and_then(|v| build_command(src.id, None, &v, &style)) {
                self.start(cx, cmd)?;
            }
        }

        for i in 0..self.plan.len() {
            let idx = self.plan.order()[i];
            let style = self.carried_style(cx, Some(idx));
            resolve_in_place(cx, idx)?;
            let cmd = cx.document.node_mut(idx)?.to_command(&style)?;
            if let Some(cmd) = cmd {
                self.start(cx, cmd)?;
            }
        }

        self.frames += 1;
        tracing::debug!(frame = self.frames, live = self.live.len(), "recompute frame");
        Ok(())
    }

    fn start(&mut self, cx: &mut CommandCtx<'_>, mut cmd: Box<dyn Command>) -> GeoResult<()> {
        cmd.core_mut().set_temporary();
        let out = cmd.init(cx).and_then(|()| cmd.direct_play(cx));
        // Tracked even on failure so a half-built command is still torn down.
        self.live.push(cmd);
        out
    }

    fn retire_superseded(&mut self, cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        if self.retired {
            return Ok(());
        }
        self.retired = true;
        let origin = self.source.and_then(|s| s.origin);
        for idx in origin.into_iter().chain(self.plan.order().iter().copied()) {
            if !cx.commands.get(idx.index()).is_some_and(Option::is_some) {
                continue;
            }
            // Built from the node's state before this run's first re-resolution.
            let fresh = match cx.document.node(idx) {
                Some(node) => {
                    let opts = cx.node_options.get(&node.id).cloned().unwrap_or_default();
                    node.to_command(&opts)?
                }
                None => None,
            };
            let Some(mut old) = cx.commands.get_mut(idx.index()).and_then(Option::take) else {
                continue;
            };
            old.clear(cx);
            if let Some(slot) = cx.commands.get_mut(idx.index()) {
                *slot = Some(fresh.unwrap_or(old));
            }
        }
        Ok(())
    }

    /// Style registered for the node's label (or the host's options for the node), overlaid
    /// with the animation's own options.
    fn carried_style(&self, cx: &CommandCtx<'_>, idx: Option<NodeIdx>) -> StyleOptions {
        let node = idx.and_then(|i| cx.document.node(i));
        let base = node
            .and_then(|n| n.binding_label())
            .and_then(|l| cx.registry.style(l))
            .or_else(|| node.and_then(|n| cx.node_options.get(&n.id)))
            .cloned()
            .unwrap_or_default();
        base.merged_with(&self.style)
    }
}

fn resolve_in_place(cx: &mut CommandCtx<'_>, idx: NodeIdx) -> GeoResult<()> {
    let node = cx.document.node_mut(idx)?;
    let saved = cx.exprs.set_caller(Some(idx));
    let resolved = node.resolve(cx.exprs);
    cx.exprs.set_caller(saved);
    resolved
}

#[cfg(test)]
#[path = "../../tests/unit/recompute/engine.rs"]
mod tests;
