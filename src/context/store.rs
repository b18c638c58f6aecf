use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::context::value::{Scope, Value};
use crate::foundation::error::{GeoError, GeoResult};
use crate::foundation::ids::NodeIdx;
use crate::formula::{BytecodeCompiler, FormulaCompiler};

/// A variable binding: the resolved value plus the top-level node that produced it.
#[derive(Clone, Debug)]
pub struct Binding {
    pub value: Value,
    /// Node whose resolution installed the binding. `None` for values written by animations or
    /// hosts outside of a resolution pass.
    pub origin: Option<NodeIdx>,
}

/// Variable store and reverse-dependency index for one evaluation pass.
///
/// Reads go through [`ExpressionContext::read_reference`], which records an edge
/// `variable -> caller` against the top-level node currently resolving. Edges are never removed
/// within a pass; re-resolving a node only adds to them.
#[derive(Debug)]
pub struct ExpressionContext {
    bindings: BTreeMap<String, Binding>,
    dependents: BTreeMap<String, BTreeSet<NodeIdx>>,
    caller: Option<NodeIdx>,
    compiler: Arc<dyn FormulaCompiler>,
    animating: BTreeSet<String>,
}

impl Default for ExpressionContext {
    fn default() -> Self {
        Self::new(Arc::new(BytecodeCompiler))
    }
}

impl ExpressionContext {
    pub fn new(compiler: Arc<dyn FormulaCompiler>) -> Self {
        Self {
            bindings: BTreeMap::new(),
            dependents: BTreeMap::new(),
            caller: None,
            compiler,
            animating: BTreeSet::new(),
        }
    }

    /// Formula compiler late-bound nodes compile with.
    pub fn compiler(&self) -> &dyn FormulaCompiler {
        self.compiler.as_ref()
    }

    /// Bind `name` (assignment). The current caller becomes the binding's origin.
    pub fn add_reference(&mut self, name: impl Into<String>, value: Value) {
        let origin = self.caller;
        self.bindings
            .insert(name.into(), Binding { value, origin });
    }

    /// Look up `name` without recording a dependency.
    pub fn get_reference(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name).map(|b| &b.value)
    }

    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    /// Look up `name` on behalf of the current caller, recording `name -> caller`.
    pub fn read_reference(&mut self, name: &str) -> Option<Value> {
        let value = self.bindings.get(name)?.value.clone();
        if let Some(caller) = self.caller {
            self.add_dependent(name, caller);
        }
        Some(value)
    }

    /// Rebind `name` to an interpolated value. Keeps the binding's origin and leaves dependency
    /// edges untouched.
    pub fn update_reference(&mut self, name: &str, value: Value) {
        match self.bindings.get_mut(name) {
            Some(b) => b.value = value,
            None => {
                self.bindings.insert(
                    name.to_owned(),
                    Binding {
                        value,
                        origin: None,
                    },
                );
            }
        }
    }

    pub fn add_dependent(&mut self, name: &str, node: NodeIdx) {
        self.dependents
            .entry(name.to_owned())
            .or_default()
            .insert(node);
    }

    /// Nodes that read `name`, in document order.
    pub fn get_dependents(&self, name: &str) -> impl Iterator<Item = NodeIdx> + '_ {
        self.dependents.get(name).into_iter().flatten().copied()
    }

    /// Register the current caller as a dependent of every bound name in `names`.
    ///
    /// Used by late-bound nodes for the free variables of their formulas; unbound names are
    /// skipped since they cannot be animated.
    pub fn register_dependencies<'n>(&mut self, names: impl IntoIterator<Item = &'n String>) {
        let Some(caller) = self.caller else {
            return;
        };
        for name in names {
            if self.bindings.contains_key(name) {
                self.add_dependent(name, caller);
            }
        }
    }

    /// Snapshot of every binding whose value is a plain number or string.
    pub fn references_as_primitives(&self) -> Scope {
        self.bindings
            .iter()
            .filter_map(|(k, b)| Some((k.clone(), b.value.as_primitive()?)))
            .collect()
    }

    pub fn caller(&self) -> Option<NodeIdx> {
        self.caller
    }

    /// Replace the current caller, returning the previous one so it can be restored.
    pub fn set_caller(&mut self, caller: Option<NodeIdx>) -> Option<NodeIdx> {
        std::mem::replace(&mut self.caller, caller)
    }

    /// Run `f` with the caller suppressed, so reads inside do not register edges.
    pub fn without_caller<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.set_caller(None);
        let out = f(self);
        self.set_caller(saved);
        out
    }

    /// Claim `name` for an animation. A second claim before [`Self::end_animation`] is rejected.
    pub fn begin_animation(&mut self, name: &str) -> GeoResult<()> {
        if !self.animating.insert(name.to_owned()) {
            return Err(GeoError::Busy {
                variable: name.to_owned(),
            });
        }
        Ok(())
    }

    pub fn end_animation(&mut self, name: &str) {
        self.animating.remove(name);
    }

    pub fn is_animating(&self, name: &str) -> bool {
        self.animating.contains(name)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/context/store.rs"]
mod tests;
