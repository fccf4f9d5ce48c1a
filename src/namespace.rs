//! Shared taxon namespace for cross-tree split comparison.
//!
//! Split bitmasks are only comparable across trees when every tree maps a
//! given taxon label to the same bit position. Node ids are useless for this
//! (they depend on parse order within each file), so the namespace is built
//! once from the union of leaf labels over all loaded trees, sorted
//! lexicographically, and then passed by reference to every split
//! extraction. There is deliberately no ambient or global namespace state.

use std::collections::HashMap;

use phylotree::tree::Tree as PhyloTree;

use crate::error::Result;

/// The canonical enumeration of taxa shared by a collection of trees.
#[derive(Debug, Clone)]
pub struct TaxonNamespace {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl TaxonNamespace {
    /// Builds the namespace from the union of leaf labels of `trees`.
    ///
    /// Labels are sorted so that the taxon-to-bit mapping is independent of
    /// tree order and of per-file node numbering. Unnamed leaves map to the
    /// empty label, which parsing normally rules out.
    pub fn from_trees(trees: &[PhyloTree]) -> Result<Self> {
        let mut labels: Vec<String> = Vec::new();
        for tree in trees {
            for leaf_id in tree.get_leaves() {
                let name = tree.get(&leaf_id)?.name.clone().unwrap_or_default();
                labels.push(name);
            }
        }
        labels.sort_unstable();
        labels.dedup();

        let index = labels
            .iter()
            .enumerate()
            .map(|(idx, label)| (label.clone(), idx))
            .collect();

        Ok(TaxonNamespace { labels, index })
    }

    /// Number of taxa in the namespace.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of u64 words a bitset over this namespace needs.
    pub fn words(&self) -> usize {
        self.labels.len().div_ceil(64)
    }

    /// Bit position of `label`, if it is a known taxon.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Taxon label at bit position `idx`.
    pub fn label(&self, idx: usize) -> Option<&str> {
        self.labels.get(idx).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_is_sorted_and_deduplicated() {
        let t1 = PhyloTree::from_newick("((T4,T1),T3);").unwrap();
        let t2 = PhyloTree::from_newick("((T2,T1),T4);").unwrap();

        let ns = TaxonNamespace::from_trees(&[t1, t2]).unwrap();
        assert_eq!(ns.len(), 4);
        assert_eq!(ns.label(0), Some("T1"));
        assert_eq!(ns.label(3), Some("T4"));
        assert_eq!(ns.index_of("T2"), Some(1));
        assert_eq!(ns.index_of("T9"), None);
    }

    #[test]
    fn bit_positions_do_not_depend_on_tree_order() {
        let t1 = PhyloTree::from_newick("((A,B),(C,D));").unwrap();
        let t2 = PhyloTree::from_newick("((D,C),(B,A));").unwrap();

        let fwd = TaxonNamespace::from_trees(&[t1.clone(), t2.clone()]).unwrap();
        let rev = TaxonNamespace::from_trees(&[t2, t1]).unwrap();

        for label in ["A", "B", "C", "D"] {
            assert_eq!(fwd.index_of(label), rev.index_of(label));
        }
    }

    #[test]
    fn words_rounds_up() {
        let newick = "(A,B);";
        let ns = TaxonNamespace::from_trees(&[PhyloTree::from_newick(newick).unwrap()]).unwrap();
        assert_eq!(ns.words(), 1);
    }
}
