use crate::command::lifecycle::{Command, CommandCore, CommandCtx};
use crate::foundation::error::GeoResult;

/// Ordered composite. Every lifecycle call is forwarded to the children in declaration order;
/// `play` finishes each child's animation before starting the next.
#[derive(Debug)]
pub struct SequenceCommand {
    core: CommandCore,
    children: Vec<Box<dyn Command>>,
}

impl SequenceCommand {
    pub fn new(core: CommandCore, children: Vec<Box<dyn Command>>) -> Self {
        Self { core, children }
    }

    pub fn children(&self) -> &[Box<dyn Command>] {
        &self.children
    }
}

impl Command for SequenceCommand {
    fn core(&self) -> &CommandCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CommandCore {
        &mut self.core
    }

    fn do_init(&mut self, cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        self.children.iter_mut().try_for_each(|c| c.init(cx))
    }

    fn do_play(&mut self, cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        self.children.iter_mut().try_for_each(|c| c.play(cx))
    }

    fn do_direct_play(&mut self, cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        self.children.iter_mut().try_for_each(|c| c.direct_play(cx))
    }

    fn do_play_single(&mut self, cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        self.children.iter_mut().try_for_each(|c| c.play_single(cx))
    }

    fn do_clear(&mut self, cx: &mut CommandCtx<'_>) {
        for c in &mut self.children {
            c.clear(cx);
        }
    }

    fn rewind(&mut self, cx: &mut CommandCtx<'_>) -> GeoResult<()> {
        self.children.iter_mut().rev().try_for_each(|c| c.rewind(cx))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/command/sequence.rs"]
mod tests;
