use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use crate::foundation::error::{GeoError, GeoResult};
use crate::foundation::ids::NodeIdx;

/// Read access to the dependency graph, as the planner needs it.
pub trait DependencyView {
    /// Nodes recorded as having read `variable`.
    fn dependents(&self, variable: &str) -> Vec<NodeIdx>;

    /// Variable `node`'s result is bound to, if any.
    fn label(&self, node: NodeIdx) -> Option<String>;
}

/// Re-evaluation order for everything an animated variable transitively reaches.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecomputePlan {
    variable: String,
    order: Vec<NodeIdx>,
}

impl RecomputePlan {
    /// Collect the dependency closure of `variable` and order it topologically.
    ///
    /// Node `a` must run before node `b` when `b` read the variable `a` is bound to. Ties go to
    /// the smallest index, i.e. document order. Fails with [`GeoError::Cycle`] naming the nodes
    /// that could not be ordered.
    #[tracing::instrument(skip(view))]
    pub fn build(variable: &str, view: &impl DependencyView) -> GeoResult<Self> {
        let closure = closure(variable, view);

        let mut labels = BTreeMap::<NodeIdx, String>::new();
        for &n in &closure {
            if let Some(l) = view.label(n) {
                labels.insert(n, l);
            }
        }

        let mut successors = BTreeMap::<NodeIdx, BTreeSet<NodeIdx>>::new();
        for (&n, label) in &labels {
            for d in view.dependents(label) {
                if d != n && closure.contains(&d) {
                    successors.entry(n).or_default().insert(d);
                }
            }
        }

        let mut sched = Scheduler::new(&closure, &successors);
        let mut order = Vec::with_capacity(closure.len());
        while let Some(next) = sched.pop_ready() {
            order.push(next);
            sched.mark_done(next);
        }

        if order.len() < closure.len() {
            let done: BTreeSet<NodeIdx> = order.iter().copied().collect();
            let stuck = closure
                .iter()
                .filter(|n| !done.contains(n))
                .map(|n| {
                    labels
                        .get(n)
                        .cloned()
                        .unwrap_or_else(|| format!("<node {}>", n.0))
                })
                .collect();
            return Err(GeoError::Cycle {
                variable: variable.to_owned(),
                labels: stuck,
            });
        }

        tracing::debug!(nodes = order.len(), "recompute plan built");
        Ok(Self {
            variable: variable.to_owned(),
            order,
        })
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Nodes to re-resolve each frame, prerequisites first.
    pub fn order(&self) -> &[NodeIdx] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

fn closure(variable: &str, view: &impl DependencyView) -> BTreeSet<NodeIdx> {
    let mut seen_vars = BTreeSet::from([variable.to_owned()]);
    let mut out = BTreeSet::new();
    let mut frontier = view.dependents(variable);
    while let Some(n) = frontier.pop() {
        if !out.insert(n) {
            continue;
        }
        if let Some(label) = view.label(n)
            && seen_vars.insert(label.clone())
        {
            frontier.extend(view.dependents(&label));
        }
    }
    out
}

/// Dependency-count scheduler over the closure. The smallest ready index pops first.
struct Scheduler<'a> {
    indeg: BTreeMap<NodeIdx, u32>,
    successors: &'a BTreeMap<NodeIdx, BTreeSet<NodeIdx>>,
    ready: BinaryHeap<Reverse<NodeIdx>>,
}

impl<'a> Scheduler<'a> {
    fn new(
        nodes: &BTreeSet<NodeIdx>,
        successors: &'a BTreeMap<NodeIdx, BTreeSet<NodeIdx>>,
    ) -> Self {
        let mut indeg: BTreeMap<NodeIdx, u32> = nodes.iter().map(|&n| (n, 0)).collect();
        for succ in successors.values() {
            for s in succ {
                if let Some(d) = indeg.get_mut(s) {
                    *d = d.saturating_add(1);
                }
            }
        }
        let ready = indeg
            .iter()
            .filter(|(_, d)| **d == 0)
            .map(|(&n, _)| Reverse(n))
            .collect();
        Self {
            indeg,
            successors,
            ready,
        }
    }

    fn pop_ready(&mut self) -> Option<NodeIdx> {
        let Reverse(n) = self.ready.pop()?;
        Some(n)
    }

    fn mark_done(&mut self, done: NodeIdx) {
        let Some(succ) = self.successors.get(&done) else {
            return;
        };
        for s in succ {
            if let Some(d) = self.indeg.get_mut(s) {
                *d = d.saturating_sub(1);
                if *d == 0 {
                    self.ready.push(Reverse(*s));
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/recompute/plan.rs"]
mod tests;
