//! Random column-dominant matrices (replay tokens for reproducible draws).
//!
//! Model
//! - Every off-diagonal draw `x ∈ [0, x_max)` is stored as `a_ij = -x` and the
//!   same `x` is added to `a_jj`, so each column sums to its diagonal seed.
//! - The diagonal seed is `fixed_col_sum` when set, otherwise a draw in
//!   `[0, x_max)`. Both must be positive (`validate`), so column sums are
//!   non-negative and, unless a seed draw lands exactly on 0, every root arc
//!   of the matrix digraph exists.
//! - Tridiagonal mode only fills `|i - j| <= 1`.

use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::SparseMatrix;
use crate::error::RootifyError;

/// Sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct RandomMatrixCfg {
    pub order: usize,
    /// Upper bound on the magnitude of each off-diagonal entry.
    pub x_max: f64,
    /// Fixed diagonal seed (and column sum) instead of a random one.
    pub fixed_col_sum: Option<f64>,
    pub tridiagonal: bool,
}

impl Default for RandomMatrixCfg {
    fn default() -> Self {
        Self {
            order: 4,
            x_max: 1.0,
            fixed_col_sum: None,
            tridiagonal: false,
        }
    }
}

impl RandomMatrixCfg {
    fn validate(&self) -> Result<(), RootifyError> {
        if self.order == 0 {
            return Err(RootifyError::config("order must be >= 1"));
        }
        if !self.x_max.is_finite() || self.x_max <= 0.0 {
            return Err(RootifyError::config("x_max must be finite and > 0"));
        }
        if let Some(c) = self.fixed_col_sum {
            if !c.is_finite() || c <= 0.0 {
                return Err(RootifyError::config("fixed_col_sum must be finite and > 0"));
            }
        }
        Ok(())
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw one matrix. Only nonzero entries are stored.
pub fn draw_matrix(cfg: RandomMatrixCfg, tok: ReplayToken) -> Result<SparseMatrix, RootifyError> {
    cfg.validate()?;
    let mut rng = tok.to_std_rng();
    let n = cfg.order;
    let mut a = DMatrix::<f64>::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            if i == j {
                a[(i, j)] += match cfg.fixed_col_sum {
                    Some(c) => c,
                    None => cfg.x_max * rng.gen::<f64>(),
                };
            } else if !cfg.tridiagonal || i.abs_diff(j) <= 1 {
                let x = cfg.x_max * rng.gen::<f64>();
                a[(i, j)] -= x;
                a[(j, j)] += x;
            }
        }
    }
    let mut m = SparseMatrix::new(n);
    for i in 0..n {
        for j in 0..n {
            if a[(i, j)] != 0.0 {
                m.push(i + 1, j + 1, a[(i, j)])?;
            }
        }
    }
    Ok(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_token_same_matrix() {
        let cfg = RandomMatrixCfg::default();
        let tok = ReplayToken { seed: 7, index: 3 };
        assert_eq!(draw_matrix(cfg, tok).unwrap(), draw_matrix(cfg, tok).unwrap());
        let other = ReplayToken { seed: 7, index: 4 };
        assert_ne!(draw_matrix(cfg, tok).unwrap(), draw_matrix(cfg, other).unwrap());
    }

    #[test]
    fn fixed_column_sum_holds() {
        let cfg = RandomMatrixCfg {
            order: 5,
            fixed_col_sum: Some(2.5),
            ..RandomMatrixCfg::default()
        };
        let dense = draw_matrix(cfg, ReplayToken { seed: 1, index: 0 })
            .unwrap()
            .to_dense();
        for j in 0..5 {
            let sum: f64 = dense.column(j).iter().sum();
            assert!((sum - 2.5).abs() < 1e-12, "column {j} sums to {sum}");
        }
    }

    #[test]
    fn tridiagonal_band_only() {
        let cfg = RandomMatrixCfg {
            order: 6,
            tridiagonal: true,
            ..RandomMatrixCfg::default()
        };
        let m = draw_matrix(cfg, ReplayToken { seed: 2, index: 0 }).unwrap();
        assert!(m.entries().iter().all(|e| e.row.abs_diff(e.col) <= 1));
    }

    #[test]
    fn invalid_cfg_is_configuration_error() {
        let cfg = RandomMatrixCfg {
            order: 0,
            ..RandomMatrixCfg::default()
        };
        assert!(matches!(
            draw_matrix(cfg, ReplayToken { seed: 0, index: 0 }),
            Err(RootifyError::Configuration { .. })
        ));
        let cfg = RandomMatrixCfg {
            x_max: f64::NAN,
            ..RandomMatrixCfg::default()
        };
        assert!(draw_matrix(cfg, ReplayToken { seed: 0, index: 0 }).is_err());
    }

    #[test]
    fn non_positive_scales_are_rejected() {
        let tok = ReplayToken { seed: 0, index: 0 };
        for x_max in [0.0, -1.0] {
            let cfg = RandomMatrixCfg {
                x_max,
                ..RandomMatrixCfg::default()
            };
            assert!(matches!(
                draw_matrix(cfg, tok),
                Err(RootifyError::Configuration { .. })
            ));
        }
        for c in [0.0, -2.5] {
            let cfg = RandomMatrixCfg {
                fixed_col_sum: Some(c),
                ..RandomMatrixCfg::default()
            };
            assert!(matches!(
                draw_matrix(cfg, tok),
                Err(RootifyError::Configuration { .. })
            ));
        }
    }
}
