//! Aggregation strategies: how an arc folds into the root during contraction.
//!
//! When frontier vertex `u` is absorbed, each of its out-arcs `(u, v)` is
//! merged into `(root, v)`. If that root arc already exists the payloads are
//! combined; otherwise the root arc is created with a copy of `(u, v)`'s
//! payload. Removing `(u, v)` afterwards is the engine's job.

use std::str::FromStr;

use crate::error::RootifyError;
use crate::graph::{Graph, Numeric, Symbolic, Vertex};

/// Payload combination used when two arcs into the same vertex are unified.
pub trait Aggregation {
    type Payload: Clone;

    /// Combine `incoming` into `acc`.
    fn fold(&self, acc: &mut Self::Payload, incoming: &Self::Payload);

    /// Merge arc `(u, v)` into `(root, v)`. No-op if `(u, v)` is absent.
    fn merge(&self, graph: &mut Graph<Self::Payload>, root: Vertex, u: Vertex, v: Vertex) {
        let Some(incoming) = graph.arc(u, v).cloned() else {
            return;
        };
        match graph.arc_mut(root, v) {
            Some(acc) => self.fold(acc, &incoming),
            None => {
                graph.add_arc(root, v, incoming);
            }
        }
    }
}

/// Weights add.
#[derive(Clone, Copy, Debug, Default)]
pub struct NumericSum;

impl Aggregation for NumericSum {
    type Payload = Numeric;

    fn fold(&self, acc: &mut Numeric, incoming: &Numeric) {
        acc.add_assign(incoming);
    }
}

/// Labels join with `+`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SymbolicJoin;

impl Aggregation for SymbolicJoin {
    type Payload = Symbolic;

    fn fold(&self, acc: &mut Symbolic, incoming: &Symbolic) {
        acc.label.push('+');
        acc.label.push_str(&incoming.label);
    }
}

/// Calculation selector used by front ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CalcType {
    #[default]
    Numeric,
    Label,
}

impl FromStr for CalcType {
    type Err = RootifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "numeric" => Ok(CalcType::Numeric),
            "label" => Ok(CalcType::Label),
            other => Err(RootifyError::config(format!(
                "{other} is an incorrect calculation type (expected \"numeric\" or \"label\")"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_merge_adds_or_creates() {
        let mut g = Graph::new();
        g.add_arc(Vertex(0), Vertex(1), Numeric::new(1.0));
        g.add_arc(Vertex(0), Vertex(2), Numeric::new(4.0));
        g.add_arc(Vertex(1), Vertex(2), Numeric::new(-1.5));
        g.add_arc(Vertex(1), Vertex(3), Numeric::new(2.0));

        NumericSum.merge(&mut g, Vertex(0), Vertex(1), Vertex(2));
        NumericSum.merge(&mut g, Vertex(0), Vertex(1), Vertex(3));
        assert_eq!(g.arc(Vertex(0), Vertex(2)).map(|p| p.weight), Some(2.5));
        assert_eq!(g.arc(Vertex(0), Vertex(3)).map(|p| p.weight), Some(2.0));
        // source arcs stay; the engine removes them
        assert!(g.has_arc(Vertex(1), Vertex(2)));
        assert_eq!(g.arc_count(), 5);
    }

    #[test]
    fn merge_of_missing_arc_is_noop() {
        let mut g = Graph::new();
        g.add_arc(Vertex(0), Vertex(1), Numeric::new(1.0));
        let before = g.clone();
        NumericSum.merge(&mut g, Vertex(0), Vertex(1), Vertex(2));
        assert_eq!(g, before);
    }

    #[test]
    fn symbolic_merge_joins_labels() {
        let mut g = Graph::new();
        g.add_arc(Vertex(0), Vertex(2), Symbolic::new("a_2_2"));
        g.add_arc(Vertex(1), Vertex(2), Symbolic::new("a_1_2"));
        g.add_arc(Vertex(3), Vertex(2), Symbolic::new("a_3_2"));
        SymbolicJoin.merge(&mut g, Vertex(0), Vertex(1), Vertex(2));
        SymbolicJoin.merge(&mut g, Vertex(0), Vertex(3), Vertex(2));
        assert_eq!(
            g.arc(Vertex(0), Vertex(2)).map(|p| p.label.as_str()),
            Some("a_2_2+a_1_2+a_3_2")
        );
    }

    #[test]
    fn calc_type_selector() {
        assert_eq!("numeric".parse::<CalcType>(), Ok(CalcType::Numeric));
        assert_eq!("label".parse::<CalcType>(), Ok(CalcType::Label));
        assert!(matches!(
            "lu".parse::<CalcType>(),
            Err(RootifyError::Configuration { .. })
        ));
    }
}
