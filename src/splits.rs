//! Split (bipartition) extraction from rooted phylogenetic trees.
//!
//! Every internal edge of a rooted tree separates the taxa below it from the
//! rest of the tree. That clade, encoded as a [`Bitset`] over the shared
//! [`TaxonNamespace`], is the identity of the split: two splits from
//! different trees are "the same" iff their bitmasks are equal. Each split
//! additionally carries the bootstrap-support label of its internal node
//! (when present) and the branch length of the edge that induces it.
//!
//! A [`SplitSet`] is built once per tree and is immutable afterwards, so
//! there is no window in which a tree can be queried for splits before they
//! have been encoded.

use std::collections::HashMap;

use phylotree::tree::Tree as PhyloTree;

use crate::bitset::Bitset;
use crate::error::Result;
use crate::namespace::TaxonNamespace;

/// One bipartition induced by one internal edge of one tree.
#[derive(Debug, Clone)]
pub struct Split {
    /// Leaf set below the edge, as a bitmask over the taxon namespace.
    pub clade: Bitset,
    /// Bootstrap support of the edge as an integer percentage (0-100).
    /// Absent for edges whose node carries no numeric label.
    pub support: Option<u32>,
    /// Branch length of the edge; missing lengths are treated as 0.
    pub length: f64,
}

impl Split {
    /// Fraction form of the support label (`support / 100`), if labeled.
    pub fn support_fraction(&self) -> Option<f64> {
        self.support.map(|s| f64::from(s) / 100.0)
    }

    /// Newick-style rendering of the clade, for diagnostics only.
    ///
    /// Matching never looks at this string; identity is the bitmask.
    pub fn newick_string(&self, namespace: &TaxonNamespace) -> String {
        let mut out = String::from("(");
        let mut first = true;
        for idx in 0..namespace.len() {
            if !self.clade.contains(idx) {
                continue;
            }
            if !first {
                out.push(',');
            }
            out.push_str(namespace.label(idx).unwrap_or(""));
            first = false;
        }
        out.push(')');
        out
    }
}

/// The complete set of non-trivial splits for one tree.
///
/// Splits are sorted by clade bitmask so downstream iteration is
/// reproducible, and indexed by bitmask for O(1) presence checks during
/// matching.
#[derive(Debug, Clone)]
pub struct SplitSet {
    splits: Vec<Split>,
    index: HashMap<Bitset, usize>,
    /// The tree's own leaf set over the namespace, for the overlap guard.
    pub taxa: Bitset,
}

impl SplitSet {
    /// Extracts all non-trivial splits of `tree` against `namespace`.
    ///
    /// DFS from the root builds each node's clade bitset bottom-up; the root
    /// itself (which induces no edge) and single-leaf clades are skipped.
    ///
    /// # Errors
    /// Returns a tree error if `tree` is empty or malformed.
    pub fn from_tree(tree: &PhyloTree, namespace: &TaxonNamespace) -> Result<Self> {
        let words = namespace.words();

        // Map node ids of leaves to namespace bit positions.
        let mut leaf_bits: HashMap<usize, usize> = HashMap::new();
        for leaf_id in tree.get_leaves() {
            let name = tree.get(&leaf_id)?.name.clone().unwrap_or_default();
            let bit = namespace
                .index_of(&name)
                .expect("namespace built from the union of all leaf labels");
            leaf_bits.insert(leaf_id, bit);
        }

        let root_id = tree.get_root()?;
        let mut clades: HashMap<usize, Bitset> = HashMap::new();
        Self::compute_clades(root_id, tree, &leaf_bits, words, &mut clades);

        let taxa = clades
            .get(&root_id)
            .cloned()
            .unwrap_or_else(|| Bitset::zeros(words));

        let mut splits = Vec::new();
        for (&node_id, clade) in clades.iter() {
            if node_id == root_id {
                continue;
            }
            // Leaf-adjacent edges carry no topological information.
            if clade.count_ones() <= 1 {
                continue;
            }

            let node = tree.get(&node_id)?;
            let support = node.name.as_deref().and_then(|label| label.parse().ok());
            let length = node.parent_edge.unwrap_or(0.0);
            splits.push(Split {
                clade: clade.clone(),
                support,
                length,
            });
        }

        // HashMap iteration order is arbitrary; sort by bitmask so the set
        // has one canonical ordering.
        splits.sort_by(|a, b| a.clade.cmp(&b.clade));
        splits.dedup_by(|a, b| a.clade == b.clade);

        let index = splits
            .iter()
            .enumerate()
            .map(|(i, split)| (split.clade.clone(), i))
            .collect();

        Ok(SplitSet {
            splits,
            index,
            taxa,
        })
    }

    /// Bottom-up clade construction: a leaf is its own singleton bitset, an
    /// internal node is the union of its children.
    fn compute_clades(
        node_id: usize,
        tree: &PhyloTree,
        leaf_bits: &HashMap<usize, usize>,
        words: usize,
        clades: &mut HashMap<usize, Bitset>,
    ) -> Bitset {
        if let Some(clade) = clades.get(&node_id) {
            return clade.clone();
        }

        let node = tree.get(&node_id).expect("valid node");

        if node.children.is_empty() {
            let mut clade = Bitset::zeros(words);
            let bit = *leaf_bits.get(&node_id).expect("leaf mapped");
            clade.set(bit);
            clades.insert(node_id, clade.clone());
            return clade;
        }

        let mut clade = Bitset::zeros(words);
        for &child_id in &node.children {
            let child = Self::compute_clades(child_id, tree, leaf_bits, words, clades);
            clade.or_assign(&child);
        }
        clades.insert(node_id, clade.clone());
        clade
    }

    /// Splits in canonical (bitmask) order.
    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    pub fn len(&self) -> usize {
        self.splits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.splits.is_empty()
    }

    /// O(1) presence check by bitmask identity.
    pub fn contains(&self, clade: &Bitset) -> bool {
        self.index.contains_key(clade)
    }

    /// The split with the given bitmask, if this tree has it.
    pub fn get(&self, clade: &Bitset) -> Option<&Split> {
        self.index.get(clade).map(|&i| &self.splits[i])
    }

    /// Number of taxa this tree is defined over.
    pub fn taxon_count(&self) -> usize {
        self.taxa.count_ones()
    }
}
