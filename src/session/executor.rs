use std::collections::BTreeMap;
use std::sync::Arc;

use crate::animation::driver::{FixedStepDriver, TimeDriver};
use crate::command::registry::ShapeRegistry;
use crate::command::style::StyleOptions;
use crate::command::{Command, CommandCtx, CommandSlots};
use crate::context::store::ExpressionContext;
use crate::formula::{BytecodeCompiler, FormulaCompiler};
use crate::foundation::error::{GeoError, GeoResult};
use crate::foundation::ids::{NodeId, NodeIdx};
use crate::render::backend::RenderBackend;
use crate::session::document::Document;
use crate::session::opts::EngineOpts;

#[derive(Clone, Copy, Debug)]
enum Step {
    Play,
    Draw,
    Single,
    Rewind,
}

/// Evaluates a document and plays its commands against a backend.
///
/// [`Session::evaluate`] resolves every top-level node in order (recording dependency edges
/// against the node being resolved) and builds one command per playable node. The playback
/// methods then drive those commands; positions count playable nodes only. Every method stops at
/// the first error and reports it.
pub struct Session<B: RenderBackend> {
    document: Document,
    opts: EngineOpts,
    backend: B,
    driver: Box<dyn TimeDriver>,
    compiler: Arc<dyn FormulaCompiler>,
    exprs: ExpressionContext,
    registry: ShapeRegistry,
    node_options: BTreeMap<NodeId, StyleOptions>,
    commands: CommandSlots,
    playable: Vec<NodeIdx>,
    cursor: usize,
}

impl<B: RenderBackend> Session<B> {
    /// Create a session ticking a [`FixedStepDriver`] at `opts.fps`.
    pub fn new(document: Document, backend: B, opts: EngineOpts) -> Self {
        let compiler: Arc<dyn FormulaCompiler> = Arc::new(BytecodeCompiler);
        Self {
            document,
            driver: Box::new(FixedStepDriver::new(opts.fps)),
            opts,
            backend,
            exprs: ExpressionContext::new(compiler.clone()),
            compiler,
            registry: ShapeRegistry::default(),
            node_options: BTreeMap::new(),
            commands: Vec::new(),
            playable: Vec::new(),
            cursor: 0,
        }
    }

    pub fn with_driver(mut self, driver: impl TimeDriver + 'static) -> Self {
        self.driver = Box::new(driver);
        self
    }

    /// Use a host formula compiler. Takes effect at the next [`Self::evaluate`].
    pub fn with_compiler(mut self, compiler: Arc<dyn FormulaCompiler>) -> Self {
        self.compiler = compiler;
        self
    }

    /// Style options for the top-level node `id`. Takes effect at the next [`Self::evaluate`].
    pub fn set_options(&mut self, id: NodeId, opts: StyleOptions) {
        self.node_options.insert(id, opts);
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn opts(&self) -> &EngineOpts {
        &self.opts
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn context(&self) -> &ExpressionContext {
        &self.exprs
    }

    pub fn context_mut(&mut self) -> &mut ExpressionContext {
        &mut self.exprs
    }

    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    /// Number of commands built by the last evaluation.
    pub fn command_count(&self) -> usize {
        self.playable.len()
    }

    /// Position of the next command [`Self::play_to`] would run.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn command(&self, pos: usize) -> Option<&dyn Command> {
        let idx = self.playable.get(pos)?;
        self.commands.get(idx.index())?.as_deref()
    }

    /// Command built for the top-level node with host id `id`.
    pub fn command_for(&self, id: NodeId) -> Option<&dyn Command> {
        let idx = self.document.index_of(id)?;
        self.commands.get(idx.index())?.as_deref()
    }

    /// Resolve the whole document against a fresh store and build its commands.
    ///
    /// Tears down the commands of a previous evaluation first.
    #[tracing::instrument(skip(self), fields(nodes = self.document.len()))]
    pub fn evaluate(&mut self) -> GeoResult<()> {
        self.clear();
        self.exprs = ExpressionContext::new(self.compiler.clone());
        self.registry.clear();
        self.commands = (0..self.document.len()).map(|_| None).collect();

        for i in 0..self.document.len() {
            let idx = NodeIdx(i as u32);
            let node = self.document.node_mut(idx)?;
            let saved = self.exprs.set_caller(Some(idx));
            let resolved = node.resolve(&mut self.exprs);
            self.exprs.set_caller(saved);
            if let Err(e) = resolved {
                tracing::warn!(node = %node.id, error = %e, "resolution failed");
                return Err(e);
            }

            let opts = self.node_options.get(&node.id).cloned().unwrap_or_default();
            if let Some(cmd) = node.to_command(&opts)? {
                self.commands[i] = Some(cmd);
                self.playable.push(idx);
            }
        }
        tracing::debug!(commands = self.playable.len(), "document evaluated");
        Ok(())
    }

    /// Play every command from the start, animated.
    pub fn play_all(&mut self) -> GeoResult<()> {
        self.rewind()?;
        self.cursor = 0;
        self.play_to(self.playable.len())
    }

    /// Play from the cursor up to, not including, position `to`.
    pub fn play_to(&mut self, to: usize) -> GeoResult<()> {
        let end = to.min(self.playable.len());
        for pos in self.cursor..end {
            if let Err(e) = self.run(pos, Step::Play) {
                self.cursor = pos;
                return Err(e);
            }
        }
        self.cursor = end;
        Ok(())
    }

    /// Play from the start up to and including position `pos`.
    pub fn play_up_to(&mut self, pos: usize) -> GeoResult<()> {
        self.check_pos(pos)?;
        self.rewind()?;
        self.cursor = 0;
        self.play_to(pos + 1)
    }

    /// Replay the command at `pos` on its own.
    pub fn play_single(&mut self, pos: usize) -> GeoResult<()> {
        self.check_pos(pos)?;
        self.run(pos, Step::Single)
    }

    /// Render every command's end state without animation.
    pub fn draw_all(&mut self) -> GeoResult<()> {
        self.draw_to(self.playable.len())
    }

    /// Render the end state of the commands before position `to`.
    pub fn draw_to(&mut self, to: usize) -> GeoResult<()> {
        self.rewind()?;
        let end = to.min(self.playable.len());
        for pos in 0..end {
            if let Err(e) = self.run(pos, Step::Draw) {
                self.cursor = pos;
                return Err(e);
            }
        }
        self.cursor = end;
        Ok(())
    }

    /// Clear every command and forget them. [`Self::evaluate`] rebuilds them.
    pub fn clear(&mut self) {
        let mut commands = std::mem::take(&mut self.commands);
        {
            let mut cx = self.ctx();
            for cmd in commands.iter_mut().flatten() {
                cmd.clear(&mut cx);
            }
        }
        self.playable.clear();
        self.cursor = 0;
    }

    /// Undo every command's earlier plays, last first, so a run from the start begins from the
    /// evaluated state.
    fn rewind(&mut self) -> GeoResult<()> {
        for pos in (0..self.playable.len()).rev() {
            self.run(pos, Step::Rewind)?;
        }
        Ok(())
    }

    fn check_pos(&self, pos: usize) -> GeoResult<()> {
        if pos >= self.playable.len() {
            return Err(GeoError::lifecycle(
                "command index",
                format!(
                    "invalid command index {pos} ({} commands)",
                    self.playable.len()
                ),
            ));
        }
        Ok(())
    }

    fn ctx(&mut self) -> CommandCtx<'_> {
        CommandCtx {
            backend: &mut self.backend,
            registry: &mut self.registry,
            driver: self.driver.as_mut(),
            opts: &self.opts,
            exprs: &mut self.exprs,
            document: &mut self.document,
            commands: &mut self.commands,
            node_options: &self.node_options,
        }
    }

    fn run(&mut self, pos: usize, step: Step) -> GeoResult<()> {
        self.check_pos(pos)?;
        let idx = self.playable[pos];
        let Some(mut cmd) = self.commands.get_mut(idx.index()).and_then(Option::take) else {
            return Err(GeoError::lifecycle(
                "command",
                format!("command {pos} is already running"),
            ));
        };

        let out = {
            let mut cx = self.ctx();
            match step {
                Step::Play => cmd.play(&mut cx),
                Step::Draw => cmd.direct_play(&mut cx),
                Step::Single => cmd.play_single(&mut cx),
                Step::Rewind => cmd.rewind(&mut cx),
            }
        };
        if let Err(e) = &out {
            tracing::warn!(position = pos, ?step, error = %e, "command failed");
        }

        if let Some(slot) = self.commands.get_mut(idx.index()) {
            *slot = Some(cmd);
        }
        out
    }
}

impl<B: RenderBackend + std::fmt::Debug> std::fmt::Debug for Session<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("nodes", &self.document.len())
            .field("commands", &self.playable.len())
            .field("cursor", &self.cursor)
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}
