//! Vertex ids and arc payloads.
//!
//! Kept small and explicit; the graph container in `mod.rs` is generic over the
//! payload so one run carries either numbers or labels, never both.

/// Vertex identifier. The builder uses `Vertex(0)` as the synthetic root and
/// `1..=N` for matrix indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Vertex(pub usize);

impl Vertex {
    /// Synthetic root created by the matrix builder.
    pub const ROOT: Vertex = Vertex(0);
}

/// Sign of a weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

impl Sign {
    #[inline]
    pub fn of(x: f64) -> Self {
        if x > 0.0 {
            Sign::Positive
        } else if x < 0.0 {
            Sign::Negative
        } else {
            Sign::Zero
        }
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Sign::Negative => -1.0,
            Sign::Zero => 0.0,
            Sign::Positive => 1.0,
        }
    }

    #[inline]
    pub fn flip(self) -> Self {
        match self {
            Sign::Negative => Sign::Positive,
            Sign::Zero => Sign::Zero,
            Sign::Positive => Sign::Negative,
        }
    }
}

/// Numeric arc payload. `sign` and `log_weight` always describe `weight`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Numeric {
    pub weight: f64,
    pub sign: Sign,
    /// `ln |weight|`; `-inf` for a zero weight.
    pub log_weight: f64,
}

impl Numeric {
    pub fn new(weight: f64) -> Self {
        Self {
            weight,
            sign: Sign::of(weight),
            log_weight: weight.abs().ln(),
        }
    }

    /// Add `other` to this weight and re-derive sign and log-weight.
    pub fn add_assign(&mut self, other: &Numeric) {
        *self = Numeric::new(self.weight + other.weight);
    }
}

/// Symbolic arc payload: a human-readable polynomial term.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbolic {
    pub label: String,
}

impl Symbolic {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// Everything the matrix builder knows about an arc. Projected to one of the
/// run payloads with `Graph::numeric` / `Graph::symbolic`.
#[derive(Clone, Debug, PartialEq)]
pub struct ArcRecord {
    pub numeric: Numeric,
    pub symbolic: Symbolic,
}

impl ArcRecord {
    pub fn new(weight: f64, label: impl Into<String>) -> Self {
        Self {
            numeric: Numeric::new(weight),
            symbolic: Symbolic::new(label),
        }
    }
}
