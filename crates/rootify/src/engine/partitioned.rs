//! Partitioned rootification: absorb a whole subset of the frontier per level.
//!
//! Each child fixes exactly which frontier vertices take the root as parent
//! (the absorbed half `S`); the others lose their root arc and can only get it
//! back through arcs folded in from `S`. The children partition the branchings
//! of the parent graph, so totals match the sequential strategy while the
//! contraction order differs.

use std::collections::BTreeSet;

use crate::aggregate::Aggregation;
use crate::collect::TerminalVisitor;
use crate::error::RootifyError;
use crate::graph::{Graph, Vertex};

use super::{absorb_into_root, commit_root_arc, frontier, Runner};

impl<'a, A, V> Runner<'a, A, V>
where
    A: Aggregation,
    V: TerminalVisitor<A::Payload>,
{
    pub(super) fn partitioned(
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
        let mut members = Vec::with_capacity(frontier.len() + 1);
        members.push(root);
        members.extend(frontier.iter().copied());

        for (left, right) in bipartitions(&members) {
            let absorbed = if left.contains(&root) { right } else { left };
            let mut next = self.copy(&graph);
            for &k in frontier.iter().filter(|k| !absorbed.contains(k)) {
                next.remove_arc(root, k);
            }
            // Commit every parent before folding, so arcs inside `absorbed` vanish.
            for &r in &absorbed {
                commit_root_arc(&mut next, root, r);
            }
            for &r in &absorbed {
                absorb_into_root(self.agg, &mut next, root, r);
            }
            self.partitioned(next, next_depth)?;
        }
        Ok(())
    }
}

/// All unordered splits of `set` into two non-empty halves.
///
/// Halves are built from combinations of sizes `1..=n/2`; the pair is stored
/// with the lexicographically smaller half first and duplicates (the equal-size
/// case) are dropped, leaving `2^(n-1) - 1` splits. Duplicate input vertices
/// are ignored; fewer than two distinct vertices give no splits.
pub fn bipartitions(set: &[Vertex]) -> Vec<(Vec<Vertex>, Vec<Vertex>)> {
    let mut items = set.to_vec();
    items.sort();
    items.dedup();
    let n = items.len();
    let mut out = Vec::new();
    if n < 2 {
        return out;
    }
    let mut seen = BTreeSet::new();
    for size in 1..=n / 2 {
        for idx in combinations(n, size) {
            let first: Vec<Vertex> = idx.iter().map(|&i| items[i]).collect();
            let second: Vec<Vertex> = (0..n)
                .filter(|i| !idx.contains(i))
                .map(|i| items[i])
                .collect();
            let pair = if first <= second {
                (first, second)
            } else {
                (second, first)
            };
            if seen.insert(pair.clone()) {
                out.push(pair);
            }
        }
    }
    out
}

/// Index combinations of size `k` from `0..n`, in lexicographic order.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k == 0 || k > n {
        return out;
    }
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        out.push(idx.clone());
        let Some(pos) = (0..k).rev().find(|&i| idx[i] < n - k + i) else {
            break;
        };
        idx[pos] += 1;
        for i in pos + 1..k {
            idx[i] = idx[i - 1] + 1;
        }
    }
    out
}
