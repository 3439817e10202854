//! Error type shared by the builder, the aggregation selectors and the engine.

use std::fmt;

use crate::graph::Vertex;

/// Errors surfaced by the core.
///
/// Enumeration is deterministic, so every variant is structural: retrying the
/// same call yields the same error.
#[derive(Clone, Debug, PartialEq)]
pub enum RootifyError {
    /// The graph does not have exactly one in-degree-0 vertex.
    /// `roots` lists the in-degree-0 candidates (empty when every vertex has an in-arc).
    MalformedGraph { roots: Vec<Vertex> },
    /// Matrix input that cannot be turned into a graph.
    MalformedInput { reason: String },
    /// A vertex named by the caller is not part of the graph (or is the root).
    UnknownVertex { vertex: Vertex },
    /// Unknown selector or invalid parameters.
    Configuration { reason: String },
    /// Recursion went deeper than `RootifyCfg::max_depth`.
    DepthExceeded { limit: usize },
}

impl RootifyError {
    pub(crate) fn input(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RootifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedGraph { roots } if roots.is_empty() => {
                write!(f, "malformed graph: no vertex with in-degree 0")
            }
            Self::MalformedGraph { roots } => {
                let ids: Vec<String> = roots.iter().map(|v| v.0.to_string()).collect();
                write!(
                    f,
                    "malformed graph: {} vertices with in-degree 0 ({})",
                    roots.len(),
                    ids.join(", ")
                )
            }
            Self::MalformedInput { reason } => write!(f, "malformed input: {reason}"),
            Self::UnknownVertex { vertex } => write!(f, "vertex {} is not usable here", vertex.0),
            Self::Configuration { reason } => write!(f, "configuration error: {reason}"),
            Self::DepthExceeded { limit } => {
                write!(f, "rootification exceeded the recursion limit of {limit}")
            }
        }
    }
}

impl std::error::Error for RootifyError {}
