//! Sequential rootification: one frontier vertex per level.

use crate::aggregate::Aggregation;
use crate::collect::TerminalVisitor;
use crate::error::RootifyError;
use crate::graph::Graph;

use super::{absorb_into_root, commit_root_arc, frontier, Runner};

impl<'a, A, V> Runner<'a, A, V>
where
    A: Aggregation,
    V: TerminalVisitor<A::Payload>,
{
    /// For each frontier vertex `r` in order: commit `root → r` as its parent,
    /// drop the root arcs of the siblings handled before it, fold `r`'s
    /// out-arcs into the root and recurse.
    pub(super) fn sequential(
        &mut self,
        graph: Graph<A::Payload>,
        depth: usize,
    ) -> Result<(), RootifyError> {
        let Ok(root) = graph.root() else {
            self.stats.pruned += 1;
            return Ok(());
        };
        let frontier = frontier(&graph, root);
        if frontier.is_empty() {
            self.terminal(&graph, root);
            return Ok(());
        }
        let next_depth = self.descend(depth)?;
        for (k, &r) in frontier.iter().enumerate() {
            let mut next = self.copy(&graph);
            for &done in &frontier[..k] {
                next.remove_arc(root, done);
            }
            commit_root_arc(&mut next, root, r);
            absorb_into_root(self.agg, &mut next, root, r);
            self.sequential(next, next_depth)?;
        }
        Ok(())
    }
}
