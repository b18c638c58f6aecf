use std::collections::BTreeMap;
use std::fmt;

use smallvec::SmallVec;

use crate::animation::driver::TimeDriver;
use crate::command::registry::ShapeRegistry;
use crate::command::style::StyleOptions;
use crate::context::store::ExpressionContext;
use crate::foundation::error::{GeoError, GeoResult};
use crate::foundation::ids::{ArtifactId, NodeId};
use crate::render::backend::RenderBackend;
use crate::session::document::Document;
use crate::session::opts::EngineOpts;

/// Commands of a document, indexed by [`crate::NodeIdx`]; `None` for non-playable nodes.
pub type CommandSlots = Vec<Option<Box<dyn Command>>>;

/// Lifecycle state of a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandState {
    Uninitialized,
    Initialized,
    Playing,
    Idle,
    /// Terminal. Artifacts are released and the command cannot be initialized again.
    Cleared,
}

/// Everything a command may touch while it runs.
pub struct CommandCtx<'a> {
    pub backend: &'a mut dyn RenderBackend,
    pub registry: &'a mut ShapeRegistry,
    pub driver: &'a mut dyn TimeDriver,
    pub opts: &'a EngineOpts,
    pub exprs: &'a mut ExpressionContext,
    pub document: &'a mut Document,
    /// The session's commands. The command currently running is taken out of its slot.
    pub commands: &'a mut CommandSlots,
    /// Per-node style options supplied by the host, keyed by top-level node id.
    pub node_options: &'a BTreeMap<NodeId, StyleOptions>,
}

impl fmt::Debug for CommandCtx<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandCtx")
            .field("opts", &self.opts)
            .finish_non_exhaustive()
    }
}

/// State shared by every command: lifecycle, identity, style and owned artifacts.
#[derive(Clone, Debug)]
pub struct CommandCore {
    state: CommandState,
    expression_id: Option<NodeId>,
    label: Option<String>,
    style: StyleOptions,
    artifacts: SmallVec<[ArtifactId; 2]>,
    temporary: bool,
}

impl CommandCore {
    pub fn new(expression_id: Option<NodeId>, label: Option<String>, style: StyleOptions) -> Self {
        Self {
            state: CommandState::Uninitialized,
            expression_id,
            label,
            style,
            artifacts: SmallVec::new(),
            temporary: false,
        }
    }

    pub fn state(&self) -> CommandState {
        self.state
    }

    pub fn expression_id(&self) -> Option<NodeId> {
        self.expression_id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn style(&self) -> &StyleOptions {
        &self.style
    }

    /// Artifacts currently owned.
    pub fn artifacts(&self) -> &[ArtifactId] {
        &self.artifacts
    }

    /// Take ownership of a freshly allocated artifact.
    pub fn own(&mut self, id: ArtifactId) {
        self.artifacts.push(id);
    }

    /// Mark as a short-lived command built by an animation. Temporary commands never publish
    /// their shape or style under their label.
    pub fn set_temporary(&mut self) {
        self.temporary = true;
    }

    pub fn is_temporary(&self) -> bool {
        self.temporary
    }

    /// Label to publish under, if this command publishes at all.
    pub fn published_label(&self) -> Option<&str> {
        if self.temporary {
            None
        } else {
            self.label.as_deref()
        }
    }

    fn describe(&self) -> String {
        match (&self.label, self.expression_id) {
            (Some(l), _) => format!("command '{l}'"),
            (None, Some(id)) => format!("command for node {id}"),
            (None, None) => "command".to_owned(),
        }
    }

    fn release(&mut self, cx: &mut CommandCtx<'_>) {
        for id in self.artifacts.drain(..) {
            cx.backend.remove(id);
            cx.registry.forget_artifact(id);
        }
    }
}

/// Executable counterpart of a playable node.
///
/// Implementors provide the `do_*` hooks; the provided methods run the state machine
/// `Uninitialized -> Initialized -> (Playing <-> Idle) -> Cleared` around them. `play`,
/// `direct_play` and `play_single` initialize on demand.
pub trait Command: fmt::Debug {
    fn core(&self) -> &CommandCore;
    fn core_mut(&mut self) -> &mut CommandCore;

    /// Resolve external collaborators and allocate artifacts.
    fn do_init(&mut self, cx: &mut CommandCtx<'_>) -> GeoResult<()>;

    /// Animated rendering. Returns once the animation has settled.
    fn do_play(&mut self, _cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        Ok(())
    }

    /// Render the end state without animation.
    fn do_direct_play(&mut self, _cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        Ok(())
    }

    /// Replay on an initialized command.
    fn do_play_single(&mut self, cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        self.do_play(cx)
    }

    /// Release anything beyond the artifacts recorded in the core.
    fn do_clear(&mut self, _cx: &mut CommandCtx<'_>) {}

    /// Undo what earlier plays left outside this command's own artifacts, ahead of a replay from
    /// the first command. The command keeps its state.
    fn rewind(&mut self, _cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        Ok(())
    }

    fn state(&self) -> CommandState {
        self.core().state
    }

    fn is_initialized(&self) -> bool {
        matches!(
            self.core().state,
            CommandState::Initialized | CommandState::Playing | CommandState::Idle
        )
    }

    /// Initialize once; later calls are no-ops.
    fn init(&mut self, cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        match self.core().state {
            CommandState::Uninitialized => {}
            CommandState::Cleared => {
                return Err(GeoError::lifecycle(
                    "command state",
                    format!(
                        "{} was cleared and cannot be initialized again",
                        self.core().describe()
                    ),
                ));
            }
            CommandState::Initialized | CommandState::Playing | CommandState::Idle => {
                return Ok(());
            }
        }
        self.do_init(cx)?;
        let core = self.core_mut();
        core.state = CommandState::Initialized;
        if let Some(label) = core.published_label() {
            cx.registry.register_style(label, core.style.clone());
        }
        Ok(())
    }

    fn play(&mut self, cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        self.init(cx)?;
        self.core_mut().state = CommandState::Playing;
        let out = self.do_play(cx);
        settle(self.core_mut());
        out
    }

    fn direct_play(&mut self, cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        self.init(cx)?;
        let out = self.do_direct_play(cx);
        settle(self.core_mut());
        out
    }

    fn play_single(&mut self, cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        self.init(cx)?;
        self.core_mut().state = CommandState::Playing;
        let out = self.do_play_single(cx);
        settle(self.core_mut());
        out
    }

    /// Release every owned artifact. Safe before `init` and when repeated.
    fn clear(&mut self, cx: &mut CommandCtx<'_>) {
        if self.core().state == CommandState::Cleared {
            return;
        }
        self.do_clear(cx);
        let core = self.core_mut();
        core.release(cx);
        core.state = CommandState::Cleared;
    }
}

fn settle(core: &mut CommandCore) {
    if core.state != CommandState::Cleared {
        core.state = CommandState::Idle;
    }
}
