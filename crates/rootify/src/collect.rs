//! Result collectors fed by the engine, one call per terminal graph.

use crate::graph::{Graph, Numeric, Symbolic};

/// Receives each terminal snapshot. The borrow only lives for the call; keep a
/// clone if the snapshot is needed later.
pub trait TerminalVisitor<P> {
    fn visit(&mut self, terminal: &Graph<P>);
}

impl<P, F> TerminalVisitor<P> for F
where
    F: FnMut(&Graph<P>),
{
    fn visit(&mut self, terminal: &Graph<P>) {
        self(terminal)
    }
}

/// Product of all arc weights of a terminal graph.
pub fn branching_weight(terminal: &Graph<Numeric>) -> f64 {
    terminal.arcs().map(|(_, _, p)| p.weight).product()
}

/// `(l1)(l2)...` for the arcs of a terminal graph.
pub fn branching_term(terminal: &Graph<Symbolic>) -> String {
    terminal
        .arcs()
        .map(|(_, _, p)| format!("({})", p.label))
        .collect()
}

/// Sums branching weights into the determinant.
#[derive(Clone, Debug, Default)]
pub struct DeterminantSum {
    pub total: f64,
    pub terminals: usize,
    keep_snapshots: bool,
    snapshots: Vec<(Graph<Numeric>, f64)>,
}

impl DeterminantSum {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also retain every terminal graph with its weight.
    pub fn keeping_snapshots() -> Self {
        Self {
            keep_snapshots: true,
            ..Self::default()
        }
    }

    pub fn snapshots(&self) -> &[(Graph<Numeric>, f64)] {
        &self.snapshots
    }
}

impl TerminalVisitor<Numeric> for DeterminantSum {
    fn visit(&mut self, terminal: &Graph<Numeric>) {
        let w = branching_weight(terminal);
        self.total += w;
        self.terminals += 1;
        if self.keep_snapshots {
            self.snapshots.push((terminal.clone(), w));
        }
    }
}

/// Collects one symbolic term per terminal.
#[derive(Clone, Debug, Default)]
pub struct SymbolicExpansion {
    pub terms: Vec<String>,
}

impl SymbolicExpansion {
    pub fn new() -> Self {
        Self::default()
    }

    /// The determinant as a `+`-joined sum of products.
    pub fn expression(&self) -> String {
        self.terms.join("+")
    }
}

impl TerminalVisitor<Symbolic> for SymbolicExpansion {
    fn visit(&mut self, terminal: &Graph<Symbolic>) {
        self.terms.push(branching_term(terminal));
    }
}

/// Counts terminals of any payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BranchingCount(pub usize);

impl<P> TerminalVisitor<P> for BranchingCount {
    fn visit(&mut self, _terminal: &Graph<P>) {
        self.0 += 1;
    }
}
