//! Determinants from branchings of the matrix digraph.
//!
//! A square matrix becomes a weighted digraph with a synthetic root (vertex 0)
//! that absorbs each column's balance; the signed weight products of the
//! graph's spanning branchings sum to the determinant. The branchings are
//! enumerated by recursive rootification: frontier vertices are contracted
//! into the root one step at a time, merged arcs fold their payloads through a
//! pluggable [`aggregate::Aggregation`], and every fully contracted snapshot is
//! handed to a [`collect::TerminalVisitor`].
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API.
//! - Breaking changes are fine when they make the engine or its contracts
//!   clearer.

pub mod aggregate;
pub mod collect;
pub mod engine;
pub mod error;
pub mod graph;
pub mod matrix;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::RootifyError;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::aggregate::{Aggregation, CalcType, NumericSum, SymbolicJoin};
    pub use crate::collect::{
        branching_weight, BranchingCount, DeterminantSum, SymbolicExpansion, TerminalVisitor,
    };
    pub use crate::engine::{
        bipartitions, numeric_determinant, rootify, rootify_with_defaults, symbolic_determinant,
        RootifyCfg, RootifyStats, Strategy,
    };
    pub use crate::error::RootifyError;
    pub use crate::graph::{ArcRecord, Graph, Numeric, Sign, Symbolic, Vertex};
    pub use crate::matrix::rand::{draw_matrix, RandomMatrixCfg, ReplayToken};
    pub use crate::matrix::{build_graph, complete_graph, Entry, SparseMatrix};
}
