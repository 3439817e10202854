mod matrix_file;
mod provenance;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rootify::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

use crate::provenance::{write_sidecar, RunRecord};

#[derive(Parser)]
#[command(name = "branching-det")]
#[command(about = "Matrix determinants from branchings of the matrix digraph")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Compute (or factor) the determinant of a matrix file by rootification
    Det {
        /// Matrix text file: `row col value` per line
        file: PathBuf,
        /// Calculation type: "numeric" or "label"
        #[arg(long, default_value = "numeric")]
        calc_type: String,
        #[arg(long, value_enum, default_value_t = StrategyArg::Sequential)]
        strategy: StrategyArg,
        /// Start vertex for the marked and anchored strategies
        #[arg(long)]
        start: Option<usize>,
        /// Decimal places for numeric output
        #[arg(long, default_value_t = 2)]
        prec: usize,
        /// Also print the LU determinant
        #[arg(long)]
        compare: bool,
        /// Write a JSON report (and a provenance sidecar) here
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Factor the determinant of the complete digraph on N symbolic vertices
    Complete {
        n: usize,
    },
    /// Print a random column-dominant matrix as `row col value` triples
    Random {
        n: usize,
        #[arg(long, default_value_t = 1.0)]
        x_max: f64,
        #[arg(long)]
        fixed_col_sum: Option<f64>,
        #[arg(long)]
        tridiag: bool,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 0)]
        index: u64,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    Sequential,
    Partitioned,
    Marked,
    Anchored,
}

impl StrategyArg {
    fn resolve(self, start: Option<usize>) -> Result<Strategy> {
        let needs_start = |name: &str| -> Result<Vertex> {
            match start {
                Some(v) => Ok(Vertex(v)),
                None => bail!("--strategy {name} needs --start <vertex>"),
            }
        };
        Ok(match self {
            StrategyArg::Sequential => Strategy::Sequential,
            StrategyArg::Partitioned => Strategy::Partitioned,
            StrategyArg::Marked => Strategy::MarkedPath {
                start: needs_start("marked")?,
            },
            StrategyArg::Anchored => Strategy::Anchored {
                start: needs_start("anchored")?,
            },
        })
    }
}

#[derive(Serialize)]
struct DetReport {
    file: String,
    calc_type: &'static str,
    strategy: &'static str,
    start: Option<usize>,
    determinant: Option<f64>,
    expression: Option<String>,
    lu_determinant: Option<f64>,
    branchings: usize,
    pruned: usize,
    stranded: usize,
    copies: usize,
    deepest: usize,
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Det {
            file,
            calc_type,
            strategy,
            start,
            prec,
            compare,
            out,
        } => det(&file, &calc_type, strategy.resolve(start)?, prec, compare, out),
        Action::Complete { n } => complete(n),
        Action::Random {
            n,
            x_max,
            fixed_col_sum,
            tridiag,
            seed,
            index,
        } => random(
            RandomMatrixCfg {
                order: n,
                x_max,
                fixed_col_sum,
                tridiagonal: tridiag,
            },
            ReplayToken { seed, index },
        ),
        Action::Report => report(),
    }
}

fn det(
    file: &Path,
    calc_type: &str,
    strategy: Strategy,
    prec: usize,
    compare: bool,
    out: Option<PathBuf>,
) -> Result<()> {
    let calc: CalcType = calc_type.parse()?;
    tracing::info!(file = %file.display(), calc_type, strategy = strategy.name(), "det");
    let matrix = matrix_file::load_matrix(file)?;
    tracing::info!(order = matrix.order(), entries = matrix.entries().len(), "matrix loaded");

    let (determinant, expression, stats) = match calc {
        CalcType::Numeric => {
            let (value, stats) =
                numeric_determinant(&matrix, strategy).map_err(|e| explain(&matrix, e))?;
            println!("\nDeterminant = {value:.prec$}\n");
            (Some(value), None, stats)
        }
        CalcType::Label => {
            let (expr, stats) =
                symbolic_determinant(&matrix, strategy).map_err(|e| explain(&matrix, e))?;
            println!("\nDeterminant = {expr}\n");
            (None, Some(expr), stats)
        }
    };
    println!("Number of branchings = {}", stats.terminals);

    let lu_determinant = compare.then(|| matrix.lu_determinant());
    if let Some(lu) = lu_determinant {
        println!("\nDeterminant by LU decomposition = {lu:.prec$}\n");
    }

    if let Some(out) = out {
        let start = match strategy {
            Strategy::MarkedPath { start } | Strategy::Anchored { start } => Some(start.0),
            Strategy::Sequential | Strategy::Partitioned => None,
        };
        let report = DetReport {
            file: file.display().to_string(),
            calc_type: match calc {
                CalcType::Numeric => "numeric",
                CalcType::Label => "label",
            },
            strategy: strategy.name(),
            start,
            determinant,
            expression,
            lu_determinant,
            branchings: stats.terminals,
            pruned: stats.pruned,
            stranded: stats.stranded,
            copies: stats.copies,
            deepest: stats.deepest,
        };
        if let Some(parent) = out.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        std::fs::write(&out, serde_json::to_vec_pretty(&report)?)
            .with_context(|| format!("writing {}", out.display()))?;
        let params = serde_json::json!({
            "file": report.file,
            "calc_type": report.calc_type,
            "strategy": report.strategy,
            "start": report.start,
            "compare": compare,
        });
        let prov = write_sidecar(&out, RunRecord::new("det", params))?;
        tracing::info!(out = %out.display(), provenance = %prov.display(), "report written");
    }
    Ok(())
}

/// A second in-degree-0 vertex usually means an all-zero column; say so.
fn explain(matrix: &SparseMatrix, err: RootifyError) -> anyhow::Error {
    let zero = matrix.zero_columns();
    match err {
        RootifyError::MalformedGraph { .. } if !zero.is_empty() => {
            let cols: Vec<String> = zero.iter().map(|c| c.to_string()).collect();
            anyhow::Error::new(err).context(format!(
                "matrix has an all-zero column ({}), so it is singular (determinant 0)",
                cols.join(", ")
            ))
        }
        other => other.into(),
    }
}

fn complete(n: usize) -> Result<()> {
    tracing::info!(n, "complete");
    if n > 8 {
        tracing::warn!(n, "complete graph enumeration grows like n!");
    }
    let graph = complete_graph(n).symbolic();
    let mut expansion = SymbolicExpansion::new();
    let stats = rootify_with_defaults(&graph, &SymbolicJoin, &mut expansion)?;
    println!("{}", expansion.expression());
    println!("Number of branchings = {}", stats.terminals);
    Ok(())
}

fn random(cfg: RandomMatrixCfg, tok: ReplayToken) -> Result<()> {
    tracing::info!(order = cfg.order, seed = tok.seed, index = tok.index, "random");
    let matrix = draw_matrix(cfg, tok)?;
    for e in matrix.entries() {
        println!("{} {} {}", e.row, e.col, e.value);
    }
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "rootify_version": rootify::VERSION,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_det_flags() {
        let cmd = Cmd::try_parse_from([
            "branching-det",
            "det",
            "m.txt",
            "--calc-type",
            "label",
            "--strategy",
            "marked",
            "--start",
            "2",
            "--compare",
        ])
        .unwrap();
        match cmd.action {
            Action::Det {
                calc_type,
                strategy,
                start,
                compare,
                prec,
                ..
            } => {
                assert_eq!(calc_type, "label");
                assert_eq!(prec, 2);
                assert!(compare);
                assert_eq!(
                    strategy.resolve(start).unwrap(),
                    Strategy::MarkedPath { start: Vertex(2) }
                );
            }
            _ => panic!("expected det"),
        }
    }

    #[test]
    fn marked_without_start_is_rejected() {
        assert!(StrategyArg::Marked.resolve(None).is_err());
        assert!(StrategyArg::Anchored.resolve(None).is_err());
        assert_eq!(
            StrategyArg::Partitioned.resolve(None).unwrap(),
            Strategy::Partitioned
        );
    }

    #[test]
    fn unknown_calc_type_fails_before_reading() {
        let err = det(
            Path::new("does-not-exist.txt"),
            "lu",
            Strategy::Sequential,
            2,
            false,
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RootifyError>(),
            Some(RootifyError::Configuration { .. })
        ));
    }

    #[test]
    fn zero_column_is_reported_as_singular() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("zero.txt");
        std::fs::write(&file, "1 1 4\n2 1 -1\n").unwrap();
        for calc in ["numeric", "label"] {
            let err = det(&file, calc, Strategy::Sequential, 2, false, None).unwrap_err();
            let text = format!("{err:#}");
            assert!(text.contains("all-zero column (2)"), "{text}");
            assert!(text.contains("singular"), "{text}");
            assert!(matches!(
                err.downcast_ref::<RootifyError>(),
                Some(RootifyError::MalformedGraph { .. })
            ));
        }
    }

    #[test]
    fn det_writes_report_and_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("tri.txt");
        std::fs::write(&file, "1 1 2\n1 2 -1\n2 1 -1\n2 2 2\n2 3 -1\n3 2 -1\n3 3 2\n").unwrap();
        let out = dir.path().join("out").join("det.json");
        det(&file, "numeric", Strategy::Partitioned, 3, true, Some(out.clone())).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
        let value = parsed["determinant"].as_f64().unwrap();
        assert!((value - 4.0).abs() < 1e-9);
        assert!((parsed["lu_determinant"].as_f64().unwrap() - 4.0).abs() < 1e-9);
        assert_eq!(parsed["strategy"], "partitioned");
        assert!(out.with_file_name("det.provenance.json").exists());
    }
}
