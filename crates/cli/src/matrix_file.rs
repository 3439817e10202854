//! Matrix text files: one `row col value` triple per line.
//!
//! Blank lines and `#` comments are skipped. Indices are 1-based and may be
//! written as integral floats (`2.0`). The order is the largest index seen.

use anyhow::{anyhow, bail, Context, Result};
use rootify::matrix::SparseMatrix;
use std::fs;
use std::path::Path;

pub fn load_matrix<P: AsRef<Path>>(path: P) -> Result<SparseMatrix> {
    let path = path.as_ref();
    let text =
        fs::read_to_string(path).with_context(|| format!("reading matrix {}", path.display()))?;
    parse_matrix(&text).with_context(|| format!("parsing matrix {}", path.display()))
}

pub fn parse_matrix(text: &str) -> Result<SparseMatrix> {
    let mut triples = Vec::new();
    for (k, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [row, col, value] = fields.as_slice() else {
            bail!(
                "line {}: expected `row col value`, found {} fields",
                k + 1,
                fields.len()
            );
        };
        let row = parse_index(row).with_context(|| format!("line {}: row", k + 1))?;
        let col = parse_index(col).with_context(|| format!("line {}: column", k + 1))?;
        let value: f64 = value
            .parse()
            .with_context(|| format!("line {}: value {value:?}", k + 1))?;
        triples.push((row, col, value));
    }
    Ok(SparseMatrix::from_triples_inferred(triples)?)
}

fn parse_index(s: &str) -> Result<usize> {
    if let Ok(i) = s.parse::<usize>() {
        return Ok(i);
    }
    let x: f64 = s.parse().map_err(|_| anyhow!("{s:?} is not an index"))?;
    if x.fract() != 0.0 || x < 0.0 || !x.is_finite() {
        bail!("{s:?} is not an index");
    }
    Ok(x as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_triples_comments_and_float_indices() {
        let m = parse_matrix("# tridiagonal\n1 1 2\n1 2 -1\n\n2.0 1.0 -1 # lower\n2 2 2\n").unwrap();
        assert_eq!(m.order(), 2);
        assert_eq!(m.entries().len(), 4);
        assert!((m.lu_determinant() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_lines() {
        assert!(parse_matrix("1 1\n").is_err());
        assert!(parse_matrix("1 x 2\n").is_err());
        assert!(parse_matrix("1 1.5 2\n").is_err());
        assert!(parse_matrix("0 1 2\n").is_err());
        assert!(parse_matrix("# nothing\n").is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("m.txt");
        fs::write(&path, "1 1 3\n1 2 -1\n2 1 -2\n2 2 5\n").unwrap();
        let m = load_matrix(&path).unwrap();
        assert!((m.lu_determinant() - 13.0).abs() < 1e-12);
        let missing = load_matrix(dir.path().join("absent.txt")).unwrap_err();
        assert!(format!("{missing:#}").contains("reading matrix"));
    }
}
