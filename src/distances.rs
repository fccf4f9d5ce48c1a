//! Split matching, support aggregation and the pairwise distance metrics.
//!
//! Two metrics are implemented over [`SplitSet`]s:
//!
//! 1. **Weighted Robinson-Foulds**: for every split present in both trees,
//!    the absolute branch-length difference; for every split unique to one
//!    tree, its full branch length.
//!
//! 2. **Boot-Split Distance (BSD)**, after Puigbò, Wolf and Koonin (2012):
//!    splits are matched by bitmask identity into shared and differing sets,
//!    bootstrap supports (as fractions) are summed and averaged over each,
//!    and the equal-split and differing-split components are combined:
//!
//!    ```text
//!    eBSD = 1 - (sum_shared / sum_total) * mean_shared
//!    dBSD =     (sum_differing / sum_total) * mean_differing
//!    BSD  = (eBSD + dBSD) / 2
//!    ```
//!
//!    A shared split contributes the support observed in *both* trees to
//!    the shared aggregates, which keeps the statistic symmetric in
//!    argument order and pins BSD to 0 for identical, fully supported
//!    trees.

use rayon::prelude::*;

use crate::error::{Result, SplitDistError};
use crate::splits::{Split, SplitSet};

/// BSD requires at least this many taxa in common between two trees;
/// smaller overlaps cannot form meaningful non-trivial splits.
pub const MIN_SHARED_TAXA: usize = 4;

/// Result of partitioning two trees' splits by bitmask identity.
#[derive(Debug, Clone)]
pub struct SplitMatch {
    /// Splits present in both trees, one representative per bitmask
    /// (the copy from the first tree).
    pub shared: Vec<Split>,
    /// Splits present in exactly one tree.
    pub differing: Vec<Split>,
}

/// Partitions the splits of `a` and `b` into shared and differing sets.
///
/// Membership is decided solely by clade bitmask; support and branch-length
/// differences between two observations of the same split are irrelevant
/// here. Each `SplitSet` is already deduplicated per bitmask, and a split
/// found in both trees enters `shared` once, so no bitmask ever appears
/// twice in the output. Presence checks go through the bitmask index, which
/// keeps matching linear in |A| + |B|.
pub fn match_splits(a: &SplitSet, b: &SplitSet) -> SplitMatch {
    let mut shared = Vec::new();
    let mut differing = Vec::new();

    for split in a.splits() {
        if b.contains(&split.clade) {
            shared.push(split.clone());
        } else {
            differing.push(split.clone());
        }
    }
    for split in b.splits() {
        if !a.contains(&split.clade) {
            differing.push(split.clone());
        }
    }

    SplitMatch { shared, differing }
}

/// Sums and averages bootstrap supports (as fractions) over `splits`.
///
/// Unlabeled splits are excluded from both the sum and the count. The mean
/// of a set with no labeled splits is 0 — trivial and root-adjacent edges
/// routinely lack support, so this is an ordinary case, not an error.
pub fn support_sum_mean(splits: &[Split]) -> (f64, f64) {
    let mut sum = 0.0;
    let mut count = 0usize;
    for fraction in splits.iter().filter_map(Split::support_fraction) {
        sum += fraction;
        count += 1;
    }
    let mean = if count == 0 { 0.0 } else { sum / count as f64 };
    (sum, mean)
}

/// Full decomposition of one Boot-Split Distance computation.
///
/// All intermediate aggregates are carried along with the final scalar so
/// reporting can show where a distance came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BsdScore {
    pub bsd: f64,
    pub ebsd: f64,
    pub dbsd: f64,
    pub sum_total: f64,
    pub sum_shared: f64,
    pub sum_differing: f64,
    pub mean_shared: f64,
    pub mean_differing: f64,
}

/// Computes the Boot-Split Distance between two trees' split sets.
///
/// # Errors
/// - [`SplitDistError::InsufficientOverlap`] when the trees share fewer
///   than [`MIN_SHARED_TAXA`] taxa.
/// - [`SplitDistError::DegenerateInput`] when no split in either tree
///   carries a support label; the normalization denominator would be zero
///   and the distance is undefined.
pub fn boot_split_distance(a: &SplitSet, b: &SplitSet) -> Result<BsdScore> {
    let found = a.taxa.intersection_count(&b.taxa);
    if found < MIN_SHARED_TAXA {
        return Err(SplitDistError::InsufficientOverlap { found });
    }

    let matched = match_splits(a, b);

    let (sum_a, _) = support_sum_mean(a.splits());
    let (sum_b, _) = support_sum_mean(b.splits());
    let sum_total = sum_a + sum_b;
    if sum_total == 0.0 {
        return Err(SplitDistError::DegenerateInput);
    }

    // A shared split was observed in both trees, and both observations count
    // toward its aggregated support. Summing only one side would make the
    // distance depend on argument order and leave identical, fully supported
    // trees at a nonzero BSD.
    let mut shared_observations = matched.shared.clone();
    for split in &matched.shared {
        if let Some(other) = b.get(&split.clade) {
            shared_observations.push(other.clone());
        }
    }
    let (sum_shared, mean_shared) = support_sum_mean(&shared_observations);
    let (sum_differing, mean_differing) = support_sum_mean(&matched.differing);

    let ebsd = 1.0 - (sum_shared / sum_total) * mean_shared;
    let dbsd = (sum_differing / sum_total) * mean_differing;
    let bsd = (ebsd + dbsd) / 2.0;

    Ok(BsdScore {
        bsd,
        ebsd,
        dbsd,
        sum_total,
        sum_shared,
        sum_differing,
        mean_shared,
        mean_differing,
    })
}

/// Weighted Robinson-Foulds distance between two trees' split sets.
///
/// Symmetric and non-negative; zero exactly when the trees have identical
/// split sets with identical branch lengths.
pub fn weighted_rf(a: &SplitSet, b: &SplitSet) -> f64 {
    let mut distance = 0.0;

    for split in a.splits() {
        match b.get(&split.clade) {
            Some(other) => distance += (split.length - other.length).abs(),
            None => distance += split.length,
        }
    }
    for split in b.splits() {
        if !a.contains(&split.clade) {
            distance += split.length;
        }
    }

    distance
}

/// Weighted RF for every ordered pair `(i, j)` with `i < j`, in parallel.
///
/// Pairs are independent, so the loop is a straight rayon map.
pub fn compute_pairwise_weighted_rf(sets: &[SplitSet]) -> Vec<(usize, usize, f64)> {
    let n = sets.len();
    (0..n)
        .into_par_iter()
        .flat_map_iter(|i| (i + 1..n).map(move |j| (i, j)))
        .map(|(i, j)| (i, j, weighted_rf(&sets[i], &sets[j])))
        .collect()
}

/// BSD for every ordered pair `(i, j)` with `i < j`, in parallel.
///
/// A failing pair does not abort the others; its error travels with the
/// pair so the caller can flag that cell.
pub fn compute_pairwise_bsd(sets: &[SplitSet]) -> Vec<(usize, usize, Result<BsdScore>)> {
    let n = sets.len();
    (0..n)
        .into_par_iter()
        .flat_map_iter(|i| (i + 1..n).map(move |j| (i, j)))
        .map(|(i, j)| (i, j, boot_split_distance(&sets[i], &sets[j])))
        .collect()
}
