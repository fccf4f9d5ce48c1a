//! Crate root: lightweight module orchestration and public re-exports.
//!
//! Modules:
//! - `bitset`: compact bitset representation for taxon sets.
//! - `namespace`: shared taxon namespace for cross-tree split identity.
//! - `splits`: split (bipartition) extraction from rooted trees.
//! - `distances`: split matching, support aggregation, weighted RF and BSD.
//! - `matrix`: symmetric labeled distance matrices and CSV output.
//! - `io`: discovery and loading of `.treefile` Newick inputs.
//! - `error`: crate-wide error taxonomy.

pub mod bitset;
pub mod distances;
pub mod error;
pub mod io;
pub mod matrix;
pub mod namespace;
pub mod splits;

// Re-export frequently used types & functions
pub use bitset::Bitset;
pub use distances::{BsdScore, SplitMatch, boot_split_distance, match_splits, weighted_rf};
pub use error::{Result, SplitDistError};
pub use io::load_tree_dir;
pub use matrix::{DistanceKind, DistanceMatrix, write_matrix_csv};
pub use namespace::TaxonNamespace;
pub use splits::{Split, SplitSet};
