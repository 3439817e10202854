//! Rootification engine: enumerate branchings by contracting into the root.
//!
//! Purpose
//! - Walk every way of contracting a rooted digraph into its root, folding
//!   merged arcs through an [`Aggregation`], and hand each fully contracted
//!   snapshot to a [`TerminalVisitor`]. With the matrix digraph, numeric
//!   weights and [`DeterminantSum`], the total is the determinant.
//!
//! Strategies
//! - `Sequential`: peel one frontier vertex per level; earlier siblings lose
//!   their root arc so no branching is produced twice.
//! - `Partitioned`: split `{root} ∪ frontier` into two halves per level and
//!   absorb the half without the root at once (`2^k - 1` children).
//! - `MarkedPath { start }`: resolve the chain below `start` first (anchored
//!   half), then the branchings where `start` does not hang off the root.
//! - `Anchored { start }`: only the anchored half, i.e. the branchings where
//!   `start` is a child of the root. Useful for targeted factoring.
//!
//! Contract
//! - The entry graph must have exactly one in-degree-0 vertex, otherwise the
//!   call fails with `MalformedGraph` and the visitor is never called.
//! - Inside the recursion a snapshot without a unique root is a dead branch
//!   (some vertex lost every possible parent) and is pruned silently.
//! - A snapshot whose root has no out-neighbour with further out-arcs is
//!   terminal. It is reported when every remaining arc leaves the root; if
//!   non-root arcs remain they form a structure unreachable from the root, no
//!   spanning branching exists, and the snapshot is counted as stranded.
//!
//! Resources
//! - Every child branch owns a deep copy of its parent's graph, so memory is
//!   O(live branches × graph size) and at most one copy per recursion level
//!   is alive at a time. Depth is bounded by the vertex count and guarded by
//!   `RootifyCfg::max_depth`.

mod marked;
mod partitioned;
mod sequential;

pub use partitioned::bipartitions;

use crate::aggregate::{Aggregation, NumericSum, SymbolicJoin};
use crate::collect::{DeterminantSum, SymbolicExpansion, TerminalVisitor};
use crate::error::RootifyError;
use crate::graph::{Graph, Vertex};
use crate::matrix::{build_graph, SparseMatrix};

/// Enumeration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Strategy {
    #[default]
    Sequential,
    Partitioned,
    MarkedPath {
        start: Vertex,
    },
    Anchored {
        start: Vertex,
    },
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Sequential => "sequential",
            Strategy::Partitioned => "partitioned",
            Strategy::MarkedPath { .. } => "marked",
            Strategy::Anchored { .. } => "anchored",
        }
    }
}

/// Engine configuration.
#[derive(Clone, Copy, Debug)]
pub struct RootifyCfg {
    pub strategy: Strategy,
    /// Deepest recursion level allowed before failing with `DepthExceeded`.
    pub max_depth: usize,
}

impl Default for RootifyCfg {
    fn default() -> Self {
        Self {
            strategy: Strategy::Sequential,
            max_depth: 1024,
        }
    }
}

/// Counters gathered during one `rootify` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RootifyStats {
    /// Terminals handed to the visitor.
    pub terminals: usize,
    /// Branches dropped because they lost their unique root.
    pub pruned: usize,
    /// Terminal snapshots dropped because non-root arcs remained.
    pub stranded: usize,
    /// Graph copies made.
    pub copies: usize,
    /// Deepest recursion level reached.
    pub deepest: usize,
}

/// Enumerate the terminals of `graph` under `cfg.strategy`.
///
/// The visitor sees each branching exactly once; the returned stats describe
/// the enumeration. Fails before visiting anything when the graph has no
/// unique root or the strategy names an unusable start vertex.
pub fn rootify<A, V>(
    graph: &Graph<A::Payload>,
    aggregation: &A,
    visitor: &mut V,
    cfg: RootifyCfg,
) -> Result<RootifyStats, RootifyError>
where
    A: Aggregation,
    V: TerminalVisitor<A::Payload>,
{
    let root = graph.root()?;
    tracing::debug!(
        strategy = cfg.strategy.name(),
        vertices = graph.vertex_count(),
        arcs = graph.arc_count(),
        root = root.0,
        "rootify"
    );
    let mut runner = Runner {
        agg: aggregation,
        visitor,
        max_depth: cfg.max_depth,
        stats: RootifyStats::default(),
    };
    match cfg.strategy {
        Strategy::Sequential => runner.sequential(graph.clone(), 0)?,
        Strategy::Partitioned => runner.partitioned(graph.clone(), 0)?,
        Strategy::MarkedPath { start } => runner.marked_path(graph, root, start)?,
        Strategy::Anchored { start } => runner.anchored(graph, root, start, 0)?,
    }
    let stats = runner.stats;
    tracing::debug!(
        terminals = stats.terminals,
        pruned = stats.pruned,
        stranded = stats.stranded,
        copies = stats.copies,
        deepest = stats.deepest,
        "rootify done"
    );
    Ok(stats)
}

/// Sequential strategy with default limits.
pub fn rootify_with_defaults<A, V>(
    graph: &Graph<A::Payload>,
    aggregation: &A,
    visitor: &mut V,
) -> Result<RootifyStats, RootifyError>
where
    A: Aggregation,
    V: TerminalVisitor<A::Payload>,
{
    rootify(graph, aggregation, visitor, RootifyCfg::default())
}

/// Determinant of `matrix` as a sum of branching weights.
pub fn numeric_determinant(
    matrix: &SparseMatrix,
    strategy: Strategy,
) -> Result<(f64, RootifyStats), RootifyError> {
    let graph = build_graph(matrix).numeric();
    let mut sum = DeterminantSum::new();
    let cfg = RootifyCfg {
        strategy,
        ..RootifyCfg::default()
    };
    let stats = rootify(&graph, &NumericSum, &mut sum, cfg)?;
    Ok((sum.total, stats))
}

/// Determinant of `matrix` as a factored expression over arc labels.
pub fn symbolic_determinant(
    matrix: &SparseMatrix,
    strategy: Strategy,
) -> Result<(String, RootifyStats), RootifyError> {
    let graph = build_graph(matrix).symbolic();
    let mut expansion = SymbolicExpansion::new();
    let cfg = RootifyCfg {
        strategy,
        ..RootifyCfg::default()
    };
    let stats = rootify(&graph, &SymbolicJoin, &mut expansion, cfg)?;
    Ok((expansion.expression(), stats))
}

/// Recursion context shared by all strategies.
struct Runner<'a, A: Aggregation, V> {
    agg: &'a A,
    visitor: &'a mut V,
    max_depth: usize,
    stats: RootifyStats,
}

impl<'a, A, V> Runner<'a, A, V>
where
    A: Aggregation,
    V: TerminalVisitor<A::Payload>,
{
    fn copy(&mut self, graph: &Graph<A::Payload>) -> Graph<A::Payload> {
        self.stats.copies += 1;
        graph.clone()
    }

    /// Level of the children of a call at `depth`, checked against the limit.
    fn descend(&mut self, depth: usize) -> Result<usize, RootifyError> {
        let next = depth + 1;
        if next > self.max_depth {
            return Err(RootifyError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        self.stats.deepest = self.stats.deepest.max(next);
        Ok(next)
    }

    fn terminal(&mut self, graph: &Graph<A::Payload>, root: Vertex) {
        if graph.is_star(root) {
            self.stats.terminals += 1;
            self.visitor.visit(graph);
        } else {
            self.stats.stranded += 1;
        }
    }
}

/// Out-neighbours of the root that still have out-arcs to absorb.
fn frontier<P>(graph: &Graph<P>, root: Vertex) -> Vec<Vertex> {
    graph
        .out_neighbors(root)
        .into_iter()
        .filter(|&v| graph.out_degree(v) > 0)
        .collect()
}

/// Make `root → r` the only in-arc of `r`.
fn commit_root_arc<P>(graph: &mut Graph<P>, root: Vertex, r: Vertex) {
    for u in graph.in_neighbors(r) {
        if u != root {
            graph.remove_arc(u, r);
        }
    }
}

/// Fold every out-arc of `r` into the root and delete it.
fn absorb_into_root<A: Aggregation>(
    agg: &A,
    graph: &mut Graph<A::Payload>,
    root: Vertex,
    r: Vertex,
) {
    for w in graph.out_neighbors(r) {
        agg.merge(graph, root, r, w);
        graph.remove_arc(r, w);
    }
}
