//! Discovery and loading of Newick tree files.
//!
//! Inputs are a directory of `.treefile` files, one Newick tree per file.
//! The file name (stem up to the first `.`, prefixed with `tree_`) becomes
//! the display label used for matrix rows and columns.

use std::fs;
use std::path::Path;

use phylotree::tree::Tree as PhyloTree;

use crate::error::{Result, SplitDistError};

/// Extension that marks a file as a tree input.
const TREE_EXTENSION: &str = ".treefile";

/// Prefix applied to file stems when deriving display labels.
const LABEL_PREFIX: &str = "tree_";

/// Loads all `.treefile` trees from `dir` as `(label, tree)` pairs.
///
/// Files are visited in sorted name order so the resulting matrix layout is
/// deterministic. A file that fails to parse is reported on stderr and
/// skipped; the returned list only contains trees that actually loaded, so
/// downstream matrices are sized by it and can never be silently mis-sized.
///
/// # Errors
/// [`SplitDistError::InvalidPath`] if `dir` does not exist or cannot be
/// listed. This is fatal before any computation starts.
pub fn load_tree_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<(String, PhyloTree)>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|e| SplitDistError::InvalidPath {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(TREE_EXTENSION))
        .collect();
    names.sort_unstable();

    let mut trees = Vec::with_capacity(names.len());
    for name in names {
        let path = dir.join(&name);
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Skipping unreadable tree file {path:?}: {e}");
                continue;
            }
        };
        // Tree files may be wrapped over several lines.
        let newick = text.replace(['\n', '\r'], "");
        let newick = newick.trim();

        match PhyloTree::from_newick(newick) {
            Ok(tree) => trees.push((display_label(&name), tree)),
            Err(e) => {
                let err = SplitDistError::MalformedTreeFile {
                    path: path.clone(),
                    reason: e.to_string(),
                };
                eprintln!("Skipping {path:?}: {err}");
            }
        }
    }

    Ok(trees)
}

/// Display label for a tree file: `tree_` + stem up to the first `.`.
fn display_label(file_name: &str) -> String {
    let stem = file_name.split('.').next().unwrap_or(file_name);
    format!("{LABEL_PREFIX}{stem}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_strips_extension_and_prefixes() {
        assert_eq!(display_label("1.treefile"), "tree_1");
        assert_eq!(display_label("sample_A.boot.treefile"), "tree_sample_A");
    }

    #[test]
    fn invalid_path_is_fatal() {
        let err = load_tree_dir("/definitely/not/a/real/dir").unwrap_err();
        assert!(matches!(err, SplitDistError::InvalidPath { .. }));
    }

    #[test]
    fn loads_and_labels_trees_in_sorted_order() {
        let dir = std::env::temp_dir().join("bsd_io_load_test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("b.treefile"), "((A,B)90,(C,D)80);\n").unwrap();
        std::fs::write(dir.join("a.treefile"), "((A,C)70,\n(B,D)60);\n").unwrap();
        std::fs::write(dir.join("notes.txt"), "not a tree").unwrap();

        let trees = load_tree_dir(&dir).unwrap();
        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0].0, "tree_a");
        assert_eq!(trees[1].0, "tree_b");
        // Multi-line file was normalized before parsing.
        assert_eq!(trees[0].1.get_leaves().len(), 4);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn malformed_files_are_skipped_not_fatal() {
        let dir = std::env::temp_dir().join("bsd_io_malformed_test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("good.treefile"), "((A,B)90,(C,D)80);\n").unwrap();
        std::fs::write(dir.join("bad.treefile"), "((A,B%%%;\n").unwrap();

        let trees = load_tree_dir(&dir).unwrap();
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].0, "tree_good");

        std::fs::remove_dir_all(&dir).ok();
    }
}
