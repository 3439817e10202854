//! Sparse matrices and the matrix digraph.
//!
//! Purpose
//! - Hold a square matrix as 1-indexed `(row, col, value)` triples, the form
//!   the matrix files use.
//! - Build the matrix digraph whose branchings sum to the determinant.
//!
//! Model
//! - Off-diagonal `a_ij ≠ 0` becomes arc `i → j` with weight `-a_ij`.
//! - Column `j` sums to `diagSum[j] = Σ_i a_ij`; a nonzero sum becomes the root
//!   arc `0 → j`. Then `a_jj = w(0→j) + Σ_{i≠j} w(i→j)`, so the matrix is the
//!   in-degree Laplacian of the digraph with the root row and column removed,
//!   and the directed matrix-tree theorem gives the determinant as the sum of
//!   branching weights.
//! - An LU determinant (nalgebra) is kept alongside for cross-checks.

pub mod rand;

use std::collections::BTreeMap;

use nalgebra::DMatrix;

use crate::error::RootifyError;
use crate::graph::{ArcRecord, Graph, Vertex};

/// One stored entry, 1-indexed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entry {
    pub row: usize,
    pub col: usize,
    pub value: f64,
}

/// Square matrix of order `N` as a list of entries. Missing entries are zero;
/// repeated `(row, col)` pairs add up.
#[derive(Clone, Debug, PartialEq)]
pub struct SparseMatrix {
    order: usize,
    entries: Vec<Entry>,
}

impl SparseMatrix {
    pub fn new(order: usize) -> Self {
        Self {
            order,
            entries: Vec::new(),
        }
    }

    /// Append an entry; indices must lie in `1..=order`.
    pub fn push(&mut self, row: usize, col: usize, value: f64) -> Result<(), RootifyError> {
        if row == 0 || col == 0 || row > self.order || col > self.order {
            return Err(RootifyError::input(format!(
                "entry ({row}, {col}) outside 1..={}",
                self.order
            )));
        }
        if !value.is_finite() {
            return Err(RootifyError::input(format!(
                "entry ({row}, {col}) is not finite"
            )));
        }
        self.entries.push(Entry { row, col, value });
        Ok(())
    }

    pub fn from_triples(
        order: usize,
        triples: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> Result<Self, RootifyError> {
        let mut m = Self::new(order);
        for (row, col, value) in triples {
            m.push(row, col, value)?;
        }
        Ok(m)
    }

    /// Order taken from the largest row or column index, as matrix files imply.
    pub fn from_triples_inferred(
        triples: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> Result<Self, RootifyError> {
        let triples: Vec<(usize, usize, f64)> = triples.into_iter().collect();
        let order = triples
            .iter()
            .map(|&(r, c, _)| r.max(c))
            .max()
            .ok_or_else(|| RootifyError::input("matrix has no entries"))?;
        Self::from_triples(order, triples)
    }

    /// Dense rows; zeros are not stored.
    pub fn from_dense(rows: &[Vec<f64>]) -> Result<Self, RootifyError> {
        let n = rows.len();
        let mut m = Self::new(n);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(RootifyError::input(format!(
                    "row {} has {} columns, expected {n}",
                    i + 1,
                    row.len()
                )));
            }
            for (j, &value) in row.iter().enumerate() {
                if value != 0.0 {
                    m.push(i + 1, j + 1, value)?;
                }
            }
        }
        Ok(m)
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut dense = DMatrix::zeros(self.order, self.order);
        for e in &self.entries {
            dense[(e.row - 1, e.col - 1)] += e.value;
        }
        dense
    }

    /// Determinant by LU decomposition, for cross-checking branching sums.
    pub fn lu_determinant(&self) -> f64 {
        if self.order == 0 {
            return 1.0;
        }
        self.to_dense().lu().determinant()
    }

    /// 1-based columns whose (summed) entries are all zero. Each one leaves
    /// an extra in-degree-0 vertex in the matrix digraph.
    pub fn zero_columns(&self) -> Vec<usize> {
        let dense = self.to_dense();
        (0..self.order)
            .filter(|&j| dense.column(j).iter().all(|&x| x == 0.0))
            .map(|j| j + 1)
            .collect()
    }
}

/// Build the matrix digraph (root `Vertex(0)`, vertices `1..=N`).
pub fn build_graph(matrix: &SparseMatrix) -> Graph<ArcRecord> {
    // Sum duplicates first; the fold below needs final entry values.
    let mut summed: BTreeMap<(usize, usize), f64> = BTreeMap::new();
    for e in matrix.entries() {
        *summed.entry((e.row, e.col)).or_insert(0.0) += e.value;
    }

    let mut graph = Graph::new();
    for k in 0..=matrix.order() {
        graph.add_vertex(Vertex(k));
    }

    let mut diag_sum: BTreeMap<usize, f64> = BTreeMap::new();
    for (&(i, j), &a_ij) in &summed {
        *diag_sum.entry(j).or_insert(0.0) += a_ij;
        if i != j && a_ij != 0.0 {
            graph.add_arc(
                Vertex(i),
                Vertex(j),
                ArcRecord::new(-a_ij, format!("v_{i}_{j}")),
            );
        }
    }
    for (&j, &sum) in &diag_sum {
        if sum != 0.0 {
            graph.add_arc(
                Vertex::ROOT,
                Vertex(j),
                ArcRecord::new(sum, format!("v_{j}_{j}")),
            );
        }
    }
    graph
}

/// Complete digraph on `n` vertices under a root, unit weights and labels
/// `a_i_j`. Rootification yields exactly `n!` terminals.
pub fn complete_graph(n: usize) -> Graph<ArcRecord> {
    let mut graph = Graph::new();
    graph.add_vertex(Vertex::ROOT);
    for i in 1..=n {
        graph.add_arc(Vertex::ROOT, Vertex(i), ArcRecord::new(1.0, format!("a_{i}_{i}")));
    }
    for i in 1..=n {
        for j in 1..=n {
            if i != j {
                graph.add_arc(Vertex(i), Vertex(j), ArcRecord::new(1.0, format!("a_{i}_{j}")));
            }
        }
    }
    graph
}
