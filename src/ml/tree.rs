//! Histogram-binned regression trees grown leaf-wise.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ml::MLError;

/// Upper bin boundaries for every feature.
///
/// A value `x` falls into the first bin whose threshold is not less than `x`;
/// values above every threshold fall into the last bin. `NaN` falls into
/// bin 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureBins {
    thresholds: Vec<Vec<f32>>,
}

impl FeatureBins {
    /// Compute bin boundaries from feature rows.
    ///
    /// A feature with at most `max_bins` distinct values gets one bin per
    /// value, separated at midpoints. Otherwise boundaries are placed at
    /// evenly spaced quantiles of the distinct values.
    pub fn fit(rows: &[Vec<f32>], num_features: usize, max_bins: usize) -> Self {
        let thresholds = (0..num_features)
            .map(|feature| {
                let mut values: Vec<f32> = rows
                    .iter()
                    .map(|row| row[feature])
                    .filter(|v| v.is_finite())
                    .collect();
                values.sort_by(f32::total_cmp);
                values.dedup();
                feature_thresholds(&values, max_bins)
            })
            .collect();

        FeatureBins { thresholds }
    }

    /// Number of features.
    pub fn num_features(&self) -> usize {
        self.thresholds.len()
    }

    /// Number of bins of `feature`.
    pub fn num_bins(&self, feature: usize) -> usize {
        self.thresholds[feature].len() + 1
    }

    /// Bin index of `value` for `feature`.
    pub fn bin(&self, feature: usize, value: f32) -> u8 {
        self.thresholds[feature].partition_point(|&t| t < value) as u8
    }

    /// Upper boundary of `bin` for `feature`.
    pub fn threshold(&self, feature: usize, bin: usize) -> f32 {
        self.thresholds[feature][bin]
    }
}

fn feature_thresholds(distinct: &[f32], max_bins: usize) -> Vec<f32> {
    if distinct.len() < 2 {
        return Vec::new();
    }

    let midpoint = |i: usize| distinct[i - 1] + (distinct[i] - distinct[i - 1]) / 2.0;

    if distinct.len() <= max_bins {
        return (1..distinct.len()).map(midpoint).collect();
    }

    let mut thresholds: Vec<f32> = (1..max_bins)
        .map(|k| midpoint((k * distinct.len() / max_bins).max(1)))
        .collect();
    thresholds.dedup();
    thresholds
}

/// Feature values mapped to bins, stored feature-major.
#[derive(Debug, Clone)]
pub struct BinnedDataset {
    bins: FeatureBins,
    columns: Vec<Vec<u8>>,
    num_rows: usize,
}

impl BinnedDataset {
    /// Bin a dense row-major feature matrix.
    ///
    /// Every row must have the same length. `max_bins` must be in `2..=256`.
    pub fn new(rows: &[Vec<f32>], max_bins: usize) -> Result<Self> {
        if !(2..=256).contains(&max_bins) {
            return Err(MLError::InvalidOptions {
                message: format!("bin count per feature must be in 2..=256, got {max_bins}"),
            }
            .into());
        }

        let num_features = rows.first().map_or(0, Vec::len);
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != num_features)
        {
            return Err(MLError::InvalidFeatureVector {
                message: format!(
                    "row {} has {} features, expected {}",
                    index,
                    row.len(),
                    num_features
                ),
            }
            .into());
        }

        let bins = FeatureBins::fit(rows, num_features, max_bins);
        let columns = (0..num_features)
            .map(|feature| {
                rows.iter()
                    .map(|row| bins.bin(feature, row[feature]))
                    .collect()
            })
            .collect();

        Ok(BinnedDataset {
            bins,
            columns,
            num_rows: rows.len(),
        })
    }

    pub fn bins(&self) -> &FeatureBins {
        &self.bins
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_features(&self) -> usize {
        self.columns.len()
    }

    fn bin_of(&self, feature: usize, row: usize) -> usize {
        self.columns[feature][row] as usize
    }
}

/// Tree growth limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOptions {
    /// Maximum number of leaves.
    pub number_of_leaves: usize,
    /// Minimum number of rows in each leaf.
    pub minimum_example_count_per_leaf: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
}

/// A regression tree fitted to residuals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    bin: usize,
    gain: f64,
}

struct LeafState {
    node: usize,
    rows: Vec<usize>,
    split: Option<SplitCandidate>,
}

impl RegressionTree {
    /// Fit a tree to `targets` over the given rows.
    ///
    /// The leaf with the largest gain is split first until the leaf budget
    /// is used or no split satisfies the minimum leaf size. Only the
    /// features listed in `features` are considered. A left branch holds
    /// rows with `x <= threshold`.
    pub fn fit(
        data: &BinnedDataset,
        targets: &[f64],
        rows: &[usize],
        features: &[usize],
        options: &TreeOptions,
    ) -> Result<Self> {
        if targets.len() != data.num_rows() {
            return Err(MLError::InvalidFeatureVector {
                message: "Targets and training data length mismatch".to_string(),
            }
            .into());
        }

        let min_count = options.minimum_example_count_per_leaf.max(1);
        let mut nodes = vec![TreeNode::Leaf {
            value: mean(targets, rows),
        }];
        let mut leaves = vec![LeafState {
            node: 0,
            rows: rows.to_vec(),
            split: find_best_split(data, targets, rows, features, min_count),
        }];

        while leaves.len() < options.number_of_leaves {
            let best = leaves
                .iter()
                .enumerate()
                .filter_map(|(index, leaf)| leaf.split.map(|split| (index, split)))
                .max_by(|a, b| a.1.gain.total_cmp(&b.1.gain));
            let Some((index, split)) = best else {
                break;
            };

            let leaf = leaves.swap_remove(index);
            let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = leaf
                .rows
                .iter()
                .partition(|&&row| data.bin_of(split.feature, row) <= split.bin);

            let left = nodes.len();
            nodes.push(TreeNode::Leaf {
                value: mean(targets, &left_rows),
            });
            let right = nodes.len();
            nodes.push(TreeNode::Leaf {
                value: mean(targets, &right_rows),
            });
            nodes[leaf.node] = TreeNode::Split {
                feature: split.feature,
                threshold: data.bins().threshold(split.feature, split.bin),
                left,
                right,
            };

            leaves.push(LeafState {
                node: left,
                split: find_best_split(data, targets, &left_rows, features, min_count),
                rows: left_rows,
            });
            leaves.push(LeafState {
                node: right,
                split: find_best_split(data, targets, &right_rows, features, min_count),
                rows: right_rows,
            });
        }

        Ok(RegressionTree { nodes })
    }

    /// Output of the tree for one feature vector.
    ///
    /// `NaN` feature values take the left branch.
    pub fn predict(&self, features: &[f32]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let x = features.get(*feature).copied().unwrap_or(f32::NAN);
                    index = if x > *threshold { *right } else { *left };
                }
            }
        }
    }

    /// Number of leaves.
    pub fn num_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, TreeNode::Leaf { .. }))
            .count()
    }

    /// Highest feature index used by a split, if any.
    pub fn max_feature(&self) -> Option<usize> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                TreeNode::Split { feature, .. } => Some(*feature),
                TreeNode::Leaf { .. } => None,
            })
            .max()
    }
}

fn mean(targets: &[f64], rows: &[usize]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    rows.iter().map(|&row| targets[row]).sum::<f64>() / rows.len() as f64
}

/// Find the split that maximizes the reduction in squared error.
///
/// With sums `s` and counts `n`, the gain is `sl²/nl + sr²/nr - s²/n`.
fn find_best_split(
    data: &BinnedDataset,
    targets: &[f64],
    rows: &[usize],
    features: &[usize],
    min_count: usize,
) -> Option<SplitCandidate> {
    if rows.len() < 2 * min_count {
        return None;
    }

    let total_sum: f64 = rows.iter().map(|&row| targets[row]).sum();
    let total_count = rows.len();
    let parent_score = total_sum * total_sum / total_count as f64;

    let mut best: Option<SplitCandidate> = None;

    for &feature in features {
        let num_bins = data.bins().num_bins(feature);
        if num_bins < 2 {
            continue;
        }

        let mut sums = vec![0.0f64; num_bins];
        let mut counts = vec![0usize; num_bins];
        for &row in rows {
            let bin = data.bin_of(feature, row);
            sums[bin] += targets[row];
            counts[bin] += 1;
        }

        let mut left_sum = 0.0;
        let mut left_count = 0;
        for bin in 0..num_bins - 1 {
            left_sum += sums[bin];
            left_count += counts[bin];
            let right_count = total_count - left_count;
            if left_count < min_count {
                continue;
            }
            if right_count < min_count {
                break;
            }

            let right_sum = total_sum - left_sum;
            let gain = left_sum * left_sum / left_count as f64
                + right_sum * right_sum / right_count as f64
                - parent_score;

            if gain > 1e-12 && best.is_none_or(|b| gain > b.gain) {
                best = Some(SplitCandidate { feature, bin, gain });
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(leaves: usize, min_count: usize) -> TreeOptions {
        TreeOptions {
            number_of_leaves: leaves,
            minimum_example_count_per_leaf: min_count,
        }
    }

    #[test]
    fn test_bins_small_cardinality() {
        let rows = vec![vec![1.0], vec![3.0], vec![3.0], vec![5.0]];
        let bins = FeatureBins::fit(&rows, 1, 255);
        assert_eq!(bins.num_bins(0), 3);
        assert_eq!(bins.bin(0, 1.0), 0);
        assert_eq!(bins.bin(0, 2.0), 0);
        assert_eq!(bins.bin(0, 3.0), 1);
        assert_eq!(bins.bin(0, 100.0), 2);
        assert_eq!(bins.bin(0, f32::NAN), 0);
    }

    #[test]
    fn test_bins_respect_maximum() {
        let rows: Vec<Vec<f32>> = (0..1000).map(|i| vec![i as f32]).collect();
        let bins = FeatureBins::fit(&rows, 1, 16);
        assert!(bins.num_bins(0) <= 16);
        assert!(bins.num_bins(0) > 8);
    }

    #[test]
    fn test_dataset_rejects_ragged_rows() {
        let rows = vec![vec![1.0, 2.0], vec![1.0]];
        assert!(BinnedDataset::new(&rows, 255).is_err());
        assert!(BinnedDataset::new(&[vec![1.0]], 1).is_err());
    }

    #[test]
    fn test_tree_learns_step_function() {
        let rows: Vec<Vec<f32>> = (0..40).map(|i| vec![i as f32, 0.0]).collect();
        let targets: Vec<f64> = (0..40).map(|i| if i < 20 { 1.0 } else { 5.0 }).collect();
        let data = BinnedDataset::new(&rows, 255).unwrap();
        let all: Vec<usize> = (0..40).collect();

        let tree = RegressionTree::fit(&data, &targets, &all, &[0, 1], &options(2, 5)).unwrap();
        assert_eq!(tree.num_leaves(), 2);
        assert_eq!(tree.max_feature(), Some(0));
        assert_eq!(tree.predict(&[3.0, 0.0]), 1.0);
        assert_eq!(tree.predict(&[30.0, 0.0]), 5.0);
        assert_eq!(tree.predict(&[f32::NAN, 0.0]), 1.0);
    }

    #[test]
    fn test_tree_respects_leaf_budget_and_minimum() {
        let rows: Vec<Vec<f32>> = (0..100).map(|i| vec![i as f32]).collect();
        let targets: Vec<f64> = (0..100).map(|i| (i * i) as f64).collect();
        let data = BinnedDataset::new(&rows, 255).unwrap();
        let all: Vec<usize> = (0..100).collect();

        let tree = RegressionTree::fit(&data, &targets, &all, &[0], &options(8, 10)).unwrap();
        assert!(tree.num_leaves() <= 8);
        assert!(tree.num_leaves() > 1);

        let tree = RegressionTree::fit(&data, &targets, &all, &[0], &options(8, 60)).unwrap();
        assert_eq!(tree.num_leaves(), 1);
    }

    #[test]
    fn test_constant_targets_do_not_split() {
        let rows: Vec<Vec<f32>> = (0..20).map(|i| vec![i as f32]).collect();
        let targets = vec![2.5; 20];
        let data = BinnedDataset::new(&rows, 255).unwrap();
        let all: Vec<usize> = (0..20).collect();

        let tree = RegressionTree::fit(&data, &targets, &all, &[0], &options(20, 1)).unwrap();
        assert_eq!(tree.num_leaves(), 1);
        assert_eq!(tree.predict(&[7.0]), 2.5);
    }
}
