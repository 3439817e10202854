//! Weighted digraph with at most one arc per ordered pair.
//!
//! Purpose
//! - Hold the matrix digraph and every transient snapshot the engine derives
//!   from it. Snapshots are plain deep copies (`Clone`); nothing is shared
//!   between them.
//! - Keep vertex, out-arc and in-arc iteration in ascending vertex order so
//!   every enumeration over a graph is deterministic.
//!
//! Vertices are explicit: removing a vertex's last arc leaves it in the graph,
//! where it counts as in-degree 0. The root check relies on that.

mod types;

use std::collections::{BTreeMap, BTreeSet};

pub use types::{ArcRecord, Numeric, Sign, Symbolic, Vertex};

use crate::error::RootifyError;

/// Directed graph with payload `P` on each arc.
#[derive(Clone, Debug, PartialEq)]
pub struct Graph<P> {
    out: BTreeMap<Vertex, BTreeMap<Vertex, P>>,
    inc: BTreeMap<Vertex, BTreeSet<Vertex>>,
}

impl<P> Default for Graph<P> {
    fn default() -> Self {
        Self {
            out: BTreeMap::new(),
            inc: BTreeMap::new(),
        }
    }
}

impl<P> Graph<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `v` if absent.
    pub fn add_vertex(&mut self, v: Vertex) {
        self.out.entry(v).or_default();
        self.inc.entry(v).or_default();
    }

    /// Insert arc `(u, v)`, adding both endpoints. An existing arc over the
    /// same pair has its payload replaced and the old payload is returned.
    pub fn add_arc(&mut self, u: Vertex, v: Vertex, payload: P) -> Option<P> {
        self.add_vertex(u);
        self.add_vertex(v);
        self.inc.entry(v).or_default().insert(u);
        self.out.entry(u).or_default().insert(v, payload)
    }

    /// Remove arc `(u, v)`; absent arcs are a no-op.
    pub fn remove_arc(&mut self, u: Vertex, v: Vertex) -> Option<P> {
        let removed = self.out.get_mut(&u)?.remove(&v)?;
        if let Some(preds) = self.inc.get_mut(&v) {
            preds.remove(&u);
        }
        Some(removed)
    }

    pub fn contains_vertex(&self, v: Vertex) -> bool {
        self.out.contains_key(&v)
    }

    pub fn has_arc(&self, u: Vertex, v: Vertex) -> bool {
        self.arc(u, v).is_some()
    }

    pub fn arc(&self, u: Vertex, v: Vertex) -> Option<&P> {
        self.out.get(&u)?.get(&v)
    }

    pub fn arc_mut(&mut self, u: Vertex, v: Vertex) -> Option<&mut P> {
        self.out.get_mut(&u)?.get_mut(&v)
    }

    pub fn vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.out.keys().copied()
    }

    pub fn vertex_count(&self) -> usize {
        self.out.len()
    }

    pub fn arc_count(&self) -> usize {
        self.out.values().map(BTreeMap::len).sum()
    }

    /// All arcs as `(from, to, payload)`, ordered by `from` then `to`.
    pub fn arcs(&self) -> impl Iterator<Item = (Vertex, Vertex, &P)> + '_ {
        self.out
            .iter()
            .flat_map(|(&u, succ)| succ.iter().map(move |(&v, p)| (u, v, p)))
    }

    pub fn out_arcs(&self, u: Vertex) -> impl Iterator<Item = (Vertex, &P)> + '_ {
        self.out
            .get(&u)
            .into_iter()
            .flat_map(|succ| succ.iter().map(|(&v, p)| (v, p)))
    }

    /// Out-neighbours of `u`, collected so the caller may mutate the graph afterwards.
    pub fn out_neighbors(&self, u: Vertex) -> Vec<Vertex> {
        self.out
            .get(&u)
            .map(|succ| succ.keys().copied().collect())
            .unwrap_or_default()
    }

    /// In-neighbours of `v`, collected so the caller may mutate the graph afterwards.
    pub fn in_neighbors(&self, v: Vertex) -> Vec<Vertex> {
        self.inc
            .get(&v)
            .map(|preds| preds.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn out_degree(&self, u: Vertex) -> usize {
        self.out.get(&u).map_or(0, BTreeMap::len)
    }

    pub fn in_degree(&self, v: Vertex) -> usize {
        self.inc.get(&v).map_or(0, BTreeSet::len)
    }

    /// The unique vertex with in-degree 0.
    pub fn root(&self) -> Result<Vertex, RootifyError> {
        let roots: Vec<Vertex> = self
            .inc
            .iter()
            .filter(|(_, preds)| preds.is_empty())
            .map(|(&v, _)| v)
            .collect();
        match roots.as_slice() {
            [root] => Ok(*root),
            _ => Err(RootifyError::MalformedGraph { roots }),
        }
    }

    /// True when every arc leaves `root`, i.e. the graph is a star around it.
    pub fn is_star(&self, root: Vertex) -> bool {
        self.out
            .iter()
            .all(|(&u, succ)| u == root || succ.is_empty())
    }

    /// Same vertices and arcs with payloads mapped through `f`.
    pub fn map_payload<Q>(&self, mut f: impl FnMut(&P) -> Q) -> Graph<Q> {
        let out: BTreeMap<Vertex, BTreeMap<Vertex, Q>> = self
            .out
            .iter()
            .map(|(&u, succ)| {
                let mapped = succ.iter().map(|(&v, p)| (v, f(p))).collect::<BTreeMap<_, _>>();
                (u, mapped)
            })
            .collect();
        Graph {
            out,
            inc: self.inc.clone(),
        }
    }
}

impl Graph<ArcRecord> {
    /// Numeric projection for a weight run.
    pub fn numeric(&self) -> Graph<Numeric> {
        self.map_payload(|rec| rec.numeric)
    }

    /// Symbolic projection for a label run.
    pub fn symbolic(&self) -> Graph<Symbolic> {
        self.map_payload(|rec| rec.symbolic.clone())
    }
}
