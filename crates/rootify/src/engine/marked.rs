//! Marked-path rootification: resolve one vertex's subtree before the rest.
//!
//! Marked vertices hang directly off the root with no other in-arc. While a
//! marked vertex still has out-arcs, the walk branches on the first of those
//! arcs (in order) that a branching uses: the chosen arc `(r, v)` becomes the
//! root arc of `v` and `v` is marked; earlier arcs are excluded. A last branch
//! uses none of them, strips the marked vertices' out-arcs and hands the rest
//! to the sequential strategy.

use std::collections::BTreeSet;

use crate::aggregate::Aggregation;
use crate::collect::TerminalVisitor;
use crate::error::RootifyError;
use crate::graph::{Graph, Vertex};

use super::{commit_root_arc, Runner};

impl<'a, A, V> Runner<'a, A, V>
where
    A: Aggregation,
    V: TerminalVisitor<A::Payload>,
{
    /// Branchings with `start` under the root (anchored walk) plus those
    /// without `root → start` (sequential).
    pub(super) fn marked_path(
        &mut self,
        graph: &Graph<A::Payload>,
        root: Vertex,
        start: Vertex,
    ) -> Result<(), RootifyError> {
        check_start(graph, root, start)?;
        if graph.has_arc(root, start) {
            self.anchored(graph, root, start, 0)?;
        }
        let mut rest = self.copy(graph);
        rest.remove_arc(root, start);
        self.sequential(rest, 0)
    }

    /// Only the branchings in which `start` is a child of the root.
    pub(super) fn anchored(
        &mut self,
        graph: &Graph<A::Payload>,
        root: Vertex,
        start: Vertex,
        depth: usize,
    ) -> Result<(), RootifyError> {
        check_start(graph, root, start)?;
        if !graph.has_arc(root, start) {
            return Err(RootifyError::input(format!(
                "vertex {} has no arc from the root",
                start.0
            )));
        }
        let mut next = self.copy(graph);
        commit_root_arc(&mut next, root, start);
        self.marked_walk(next, BTreeSet::from([start]), depth)
    }

    fn marked_walk(
        &mut self,
        graph: Graph<A::Payload>,
        marked: BTreeSet<Vertex>,
        depth: usize,
    ) -> Result<(), RootifyError> {
        let Ok(root) = graph.root() else {
            self.stats.pruned += 1;
            return Ok(());
        };
        let active: Vec<Vertex> = marked
            .iter()
            .copied()
            .filter(|&v| graph.has_arc(root, v) && graph.out_degree(v) > 0)
            .collect();
        if active.is_empty() {
            return self.sequential(graph, depth);
        }
        let next_depth = self.descend(depth)?;

        let mut used: Vec<(Vertex, Vertex)> = Vec::new();
        for &r in &active {
            for v in graph.out_neighbors(r) {
                let Some(payload) = graph.arc(r, v).cloned() else {
                    continue;
                };
                let mut next = self.copy(&graph);
                for &(a, b) in &used {
                    next.remove_arc(a, b);
                }
                for u in next.in_neighbors(v) {
                    next.remove_arc(u, v);
                }
                next.add_arc(root, v, payload);
                let mut marked_next = marked.clone();
                marked_next.insert(v);
                self.marked_walk(next, marked_next, next_depth)?;
                used.push((r, v));
            }
        }

        let mut rest = self.copy(&graph);
        for &v in &marked {
            for w in graph.out_neighbors(v) {
                rest.remove_arc(v, w);
            }
        }
        self.sequential(rest, next_depth)
    }
}

fn check_start<P>(graph: &Graph<P>, root: Vertex, start: Vertex) -> Result<(), RootifyError> {
    if start == root || !graph.contains_vertex(start) {
        return Err(RootifyError::UnknownVertex { vertex: start });
    }
    Ok(())
}
