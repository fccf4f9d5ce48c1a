//! Error taxonomy for tree loading and distance calculations.

use std::path::PathBuf;

use phylotree::tree::TreeError;
use thiserror::Error;

/// Errors raised while loading tree files or computing split distances.
#[derive(Error, Debug)]
pub enum SplitDistError {
    /// The tree directory does not exist or cannot be listed.
    #[error("invalid tree path {path:?}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    /// A tree file did not parse as Newick.
    #[error("malformed tree file {path:?}: {reason}")]
    MalformedTreeFile { path: PathBuf, reason: String },

    /// Two trees share fewer than the 4 taxa the BSD method requires.
    #[error("trees share only {found} taxa, need at least 4 for BSD")]
    InsufficientOverlap { found: usize },

    /// No bipartition in either tree carries a bootstrap label, so the
    /// BSD normalization denominator is zero.
    #[error("total bootstrap support is zero, BSD is undefined for this pair")]
    DegenerateInput,

    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SplitDistError>;
