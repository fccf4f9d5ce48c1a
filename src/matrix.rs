//! Symmetric labeled distance matrices and their CSV serialization.
//!
//! Row/column order is the input tree order, so reordering the input
//! permutes the matrix without changing any pairwise value. The diagonal is
//! never computed (a tree is not compared to itself) and is rendered empty;
//! a pair whose computation failed is flagged with `NA` rather than being
//! silently defaulted.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::distances::{compute_pairwise_bsd, compute_pairwise_weighted_rf};
use crate::splits::SplitSet;

/// Which distance a matrix holds; fixes the output file name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DistanceKind {
    Rf,
    Bsd,
}

impl DistanceKind {
    /// Deterministic output file name for this distance kind.
    pub fn file_name(self) -> &'static str {
        match self {
            DistanceKind::Rf => "rf_matrix.csv",
            DistanceKind::Bsd => "bsd_matrix.csv",
        }
    }
}

/// One cell of a distance matrix.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MatrixCell {
    /// Diagonal: a tree is never compared to itself.
    SelfPair,
    Value(f64),
    /// The pairwise computation failed; flagged, not defaulted.
    Failed,
}

impl fmt::Display for MatrixCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixCell::SelfPair => Ok(()),
            MatrixCell::Value(v) => write!(f, "{v}"),
            MatrixCell::Failed => write!(f, "NA"),
        }
    }
}

/// A square, symmetric distance matrix with display labels.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    pub labels: Vec<String>,
    pub cells: Vec<Vec<MatrixCell>>,
}

impl DistanceMatrix {
    /// Creates an `n x n` matrix with the diagonal marked and every
    /// off-diagonal cell pending (`Failed` until a value is set).
    pub fn new(labels: Vec<String>) -> Self {
        let n = labels.len();
        let mut cells = vec![vec![MatrixCell::Failed; n]; n];
        for (i, row) in cells.iter_mut().enumerate() {
            row[i] = MatrixCell::SelfPair;
        }
        DistanceMatrix { labels, cells }
    }

    /// Stores `value` at `(i, j)` and mirrors it to `(j, i)`.
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.cells[i][j] = MatrixCell::Value(value);
        self.cells[j][i] = MatrixCell::Value(value);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Builds the weighted-RF matrix over all tree pairs in input order.
pub fn build_rf_matrix(labels: &[String], sets: &[SplitSet]) -> DistanceMatrix {
    let mut matrix = DistanceMatrix::new(labels.to_vec());
    for (i, j, d) in compute_pairwise_weighted_rf(sets) {
        matrix.set(i, j, d);
    }
    matrix
}

/// Builds the BSD matrix over all tree pairs in input order.
///
/// A pair that fails (insufficient overlap, degenerate support) leaves its
/// two cells flagged as `NA` and is reported on stderr; the remaining pairs
/// are unaffected.
pub fn build_bsd_matrix(labels: &[String], sets: &[SplitSet]) -> DistanceMatrix {
    let mut matrix = DistanceMatrix::new(labels.to_vec());
    for (i, j, result) in compute_pairwise_bsd(sets) {
        match result {
            Ok(score) => matrix.set(i, j, score.bsd),
            Err(e) => {
                eprintln!("BSD failed for {} vs {}: {e}", labels[i], labels[j]);
            }
        }
    }
    matrix
}

/// Writes a matrix as CSV: header row of labels, then one row per tree.
///
/// Paths ending in `.gz` are gzip-compressed. The file is created, written
/// row by row and flushed before return; any error propagates after the
/// handle is dropped on unwind.
pub fn write_matrix_csv<P: AsRef<Path>>(path: P, matrix: &DistanceMatrix) -> io::Result<()> {
    let p = path.as_ref();
    let is_gz = p.to_string_lossy().ends_with(".gz");

    let mut out: Box<dyn Write> = if is_gz {
        let f = File::create(p)?;
        let enc = GzEncoder::new(f, Compression::default());
        Box::new(BufWriter::new(enc))
    } else {
        Box::new(BufWriter::new(File::create(p)?))
    };

    // Header row: empty corner cell, then all labels.
    for label in &matrix.labels {
        write!(&mut out, ",{label}")?;
    }
    writeln!(&mut out)?;

    for (i, row) in matrix.cells.iter().enumerate() {
        write!(&mut out, "{}", matrix.labels[i])?;
        for cell in row {
            write!(&mut out, ",{cell}")?;
        }
        writeln!(&mut out)?;
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::TaxonNamespace;
    use itertools::Itertools;
    use phylotree::tree::Tree as PhyloTree;

    const NEWICKS: [&str; 3] = [
        "(((T1,T2)90,T3)80,(T4,T5)70);",
        "(((T1,T3)85,T2)75,(T4,T5)70);",
        "(((T2,T3)60,T1)55,(T4,T5)50);",
    ];

    fn split_sets(newicks: &[&str]) -> Vec<SplitSet> {
        let trees: Vec<PhyloTree> = newicks
            .iter()
            .map(|n| PhyloTree::from_newick(n).unwrap())
            .collect();
        let ns = TaxonNamespace::from_trees(&trees).unwrap();
        trees
            .iter()
            .map(|t| SplitSet::from_tree(t, &ns).unwrap())
            .collect()
    }

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("tree_{i}")).collect()
    }

    #[test]
    fn three_trees_give_three_rows_of_three_values() {
        let sets = split_sets(&NEWICKS);
        let matrix = build_bsd_matrix(&labels(3), &sets);

        assert_eq!(matrix.len(), 3);
        for (i, row) in matrix.cells.iter().enumerate() {
            assert_eq!(row.len(), 3);
            assert_eq!(row[i], MatrixCell::SelfPair);
            for (j, cell) in row.iter().enumerate() {
                if i != j {
                    assert!(matches!(cell, MatrixCell::Value(_)));
                }
            }
        }
    }

    #[test]
    fn matrix_is_symmetric() {
        let sets = split_sets(&NEWICKS);
        for matrix in [
            build_rf_matrix(&labels(3), &sets),
            build_bsd_matrix(&labels(3), &sets),
        ] {
            for (i, j) in (0..3usize).tuple_combinations() {
                assert_eq!(matrix.cells[i][j], matrix.cells[j][i]);
            }
        }
    }

    #[test]
    fn reordering_input_permutes_but_preserves_values() {
        let fwd_sets = split_sets(&NEWICKS);
        let rev_newicks: Vec<&str> = NEWICKS.iter().rev().copied().collect();
        let rev_sets = split_sets(&rev_newicks);

        let fwd = build_bsd_matrix(&labels(3), &fwd_sets);
        let rev = build_bsd_matrix(&labels(3), &rev_sets);

        // Index k in the reversed input is index n-1-k in the original.
        for i in 0..3 {
            for j in 0..3 {
                match (fwd.cells[i][j], rev.cells[2 - i][2 - j]) {
                    (MatrixCell::SelfPair, MatrixCell::SelfPair) => {}
                    (MatrixCell::Value(a), MatrixCell::Value(b)) => {
                        // Argument order inside a pair flips with the input
                        // order; BSD is symmetric up to float tolerance.
                        assert!((a - b).abs() < 1e-12);
                    }
                    (a, b) => panic!("cell mismatch at ({i},{j}): {a:?} vs {b:?}"),
                }
            }
        }
    }

    #[test]
    fn failed_pairs_are_flagged_not_defaulted() {
        // The third tree shares only 2 taxa with the first two.
        let sets = split_sets(&[
            "((T1,T2)90,(T3,T4)80);",
            "((T1,T3)85,(T2,T4)75);",
            "((T1,T2)70,(T8,T9)60);",
        ]);
        let matrix = build_bsd_matrix(&labels(3), &sets);

        assert!(matches!(matrix.cells[0][1], MatrixCell::Value(_)));
        assert_eq!(matrix.cells[0][2], MatrixCell::Failed);
        assert_eq!(matrix.cells[2][0], MatrixCell::Failed);
        assert_eq!(matrix.cells[1][2], MatrixCell::Failed);
    }

    #[test]
    fn csv_layout_is_header_plus_one_row_per_tree() {
        let sets = split_sets(&NEWICKS);
        let matrix = build_rf_matrix(&labels(3), &sets);

        let dir = std::env::temp_dir().join("bsd_matrix_csv_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(DistanceKind::Rf.file_name());
        write_matrix_csv(&path, &matrix).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], ",tree_0,tree_1,tree_2");
        for (i, line) in lines[1..].iter().enumerate() {
            assert_eq!(line.split(',').count(), 4);
            assert!(line.starts_with(&format!("tree_{i}")));
            // Diagonal cell is empty.
            let fields: Vec<&str> = line.split(',').collect();
            assert_eq!(fields[i + 1], "");
        }

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn kind_names_are_fixed() {
        assert_eq!(DistanceKind::Rf.file_name(), "rf_matrix.csv");
        assert_eq!(DistanceKind::Bsd.file_name(), "bsd_matrix.csv");
    }
}
