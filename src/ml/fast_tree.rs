//! Gradient-boosted regression trees ("FastTree").

use std::collections::HashMap;
use std::path::Path;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::data::view::{Column, DataView};
use crate::error::Result;
use crate::ml::MLError;
use crate::ml::pipeline::{Estimator, Transformer};
use crate::ml::tree::{BinnedDataset, RegressionTree, TreeOptions};

/// Name of the column the model writes its predictions to.
pub const SCORE_COLUMN: &str = "Score";

/// FastTree trainer options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FastTreeOptions {
    /// Number column holding the regression target.
    pub label_column: String,
    /// Vector column holding the features.
    pub feature_column: String,
    /// Number of boosting rounds.
    pub number_of_trees: usize,
    /// Maximum leaves per tree.
    pub number_of_leaves: usize,
    /// Minimum training rows in each leaf.
    pub minimum_example_count_per_leaf: usize,
    /// Shrinkage applied to every tree's output.
    pub learning_rate: f64,
    /// Maximum number of histogram bins per feature.
    pub maximum_bin_count_per_feature: usize,
    /// Fraction of features considered by each tree.
    pub feature_fraction: f64,
    /// Seed for feature sampling.
    pub seed: u64,
}

impl Default for FastTreeOptions {
    fn default() -> Self {
        FastTreeOptions {
            label_column: "Label".to_string(),
            feature_column: "Features".to_string(),
            number_of_trees: 100,
            number_of_leaves: 20,
            minimum_example_count_per_leaf: 10,
            learning_rate: 0.2,
            maximum_bin_count_per_feature: 255,
            feature_fraction: 1.0,
            seed: 0,
        }
    }
}

impl FastTreeOptions {
    /// Check that every option is in range.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| -> Result<()> {
            Err(MLError::InvalidOptions { message }.into())
        };

        if self.number_of_trees == 0 {
            return invalid("number of trees must be positive".to_string());
        }
        if self.number_of_leaves < 2 {
            return invalid(format!(
                "number of leaves must be at least 2, got {}",
                self.number_of_leaves
            ));
        }
        if self.minimum_example_count_per_leaf == 0 {
            return invalid("minimum example count per leaf must be positive".to_string());
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return invalid(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            ));
        }
        if !(2..=256).contains(&self.maximum_bin_count_per_feature) {
            return invalid(format!(
                "maximum bin count per feature must be in 2..=256, got {}",
                self.maximum_bin_count_per_feature
            ));
        }
        if !(self.feature_fraction > 0.0 && self.feature_fraction <= 1.0) {
            return invalid(format!(
                "feature fraction must be in (0, 1], got {}",
                self.feature_fraction
            ));
        }
        Ok(())
    }

    fn hyperparameters(&self) -> HashMap<String, f64> {
        let mut params = HashMap::new();
        params.insert("number_of_trees".to_string(), self.number_of_trees as f64);
        params.insert("number_of_leaves".to_string(), self.number_of_leaves as f64);
        params.insert(
            "minimum_example_count_per_leaf".to_string(),
            self.minimum_example_count_per_leaf as f64,
        );
        params.insert("learning_rate".to_string(), self.learning_rate);
        params.insert(
            "maximum_bin_count_per_feature".to_string(),
            self.maximum_bin_count_per_feature as f64,
        );
        params.insert("feature_fraction".to_string(), self.feature_fraction);
        params
    }
}

/// Model metadata for tracking model information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model name/identifier.
    pub name: String,
    /// Model version.
    pub version: String,
    /// Training timestamp.
    pub trained_at: chrono::DateTime<chrono::Utc>,
    /// Number of training examples used.
    pub training_examples: usize,
    /// Model hyperparameters.
    pub hyperparameters: HashMap<String, f64>,
}

/// Training statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    /// Mean squared error on the training rows after each tree.
    pub training_losses: Vec<f64>,
    /// Number of trees built.
    pub iterations: usize,
    /// Training time in milliseconds.
    pub training_time_ms: u64,
    /// Final training loss.
    pub final_training_loss: f64,
    /// Whether boosting stopped before the tree budget.
    pub early_stopped: bool,
}

/// Trains a [`FastTreeRegressionModel`] from a label and a feature column.
#[derive(Debug, Clone, Default)]
pub struct FastTreeRegressionTrainer {
    options: FastTreeOptions,
}

impl FastTreeRegressionTrainer {
    pub fn new(options: FastTreeOptions) -> Self {
        FastTreeRegressionTrainer { options }
    }

    pub fn options(&self) -> &FastTreeOptions {
        &self.options
    }

    /// Train on `data`.
    ///
    /// Rows with a non-finite label are skipped. Boosting starts from the
    /// label mean and fits each tree to the current residuals. It stops
    /// early when a tree finds no split even on the full feature set.
    pub fn train(&self, data: &DataView) -> Result<FastTreeRegressionModel> {
        let options = &self.options;
        options.validate()?;

        let labels = data.numbers(&options.label_column)?;
        let features = data.vectors(&options.feature_column)?;

        let (rows, targets): (Vec<Vec<f32>>, Vec<f64>) = labels
            .iter()
            .zip(features)
            .filter(|(label, _)| label.is_finite())
            .map(|(label, row)| (row.clone(), *label as f64))
            .unzip();

        if rows.len() < 2 {
            return Err(MLError::InsufficientTrainingData {
                min_samples: 2,
                actual: rows.len(),
            }
            .into());
        }
        let skipped = labels.len() - rows.len();
        if skipped > 0 {
            debug!("skipped {skipped} row(s) with a missing label");
        }

        let start_time = std::time::Instant::now();
        let dataset = BinnedDataset::new(&rows, options.maximum_bin_count_per_feature)?;
        let num_features = dataset.num_features();
        let all_rows: Vec<usize> = (0..rows.len()).collect();
        let tree_options = TreeOptions {
            number_of_leaves: options.number_of_leaves,
            minimum_example_count_per_leaf: options.minimum_example_count_per_leaf,
        };

        let bias = targets.iter().sum::<f64>() / targets.len() as f64;
        let mut predictions = vec![bias; targets.len()];
        let mut rng = StdRng::seed_from_u64(options.seed);
        let mut trees = Vec::with_capacity(options.number_of_trees);
        let mut training_losses = Vec::with_capacity(options.number_of_trees);
        let mut early_stopped = false;

        for iteration in 0..options.number_of_trees {
            let residuals: Vec<f64> = targets
                .iter()
                .zip(&predictions)
                .map(|(target, prediction)| target - prediction)
                .collect();

            let sampled = sample_features(num_features, options.feature_fraction, &mut rng);
            let mut tree =
                RegressionTree::fit(&dataset, &residuals, &all_rows, &sampled, &tree_options)?;

            if tree.num_leaves() < 2 && sampled.len() < num_features {
                debug!("tree {iteration} found no split on sampled features, refitting on all");
                let all_features: Vec<usize> = (0..num_features).collect();
                tree = RegressionTree::fit(
                    &dataset,
                    &residuals,
                    &all_rows,
                    &all_features,
                    &tree_options,
                )?;
            }

            if tree.num_leaves() < 2 {
                debug!("tree {iteration} found no split, stopping");
                early_stopped = true;
                break;
            }

            for (prediction, row) in predictions.iter_mut().zip(&rows) {
                *prediction += options.learning_rate * tree.predict(row);
            }

            let loss = mean_squared_error(&predictions, &targets);
            debug!(
                "tree {} has {} leaves, training loss {:.6}",
                iteration,
                tree.num_leaves(),
                loss
            );
            training_losses.push(loss);
            trees.push(tree);
        }

        let training_time = start_time.elapsed();
        let final_training_loss = training_losses
            .last()
            .copied()
            .unwrap_or_else(|| mean_squared_error(&predictions, &targets));

        info!(
            "trained {} tree(s) on {} rows x {} features in {} ms, training loss {:.6}",
            trees.len(),
            rows.len(),
            num_features,
            training_time.as_millis(),
            final_training_loss
        );

        Ok(FastTreeRegressionModel {
            feature_column: options.feature_column.clone(),
            num_features,
            bias,
            learning_rate: options.learning_rate,
            training_stats: TrainingStats {
                iterations: trees.len(),
                training_losses,
                training_time_ms: training_time.as_millis() as u64,
                final_training_loss,
                early_stopped,
            },
            trees,
            metadata: ModelMetadata {
                name: "FastTreeRegression".to_string(),
                version: crate::VERSION.to_string(),
                trained_at: chrono::Utc::now(),
                training_examples: rows.len(),
                hyperparameters: options.hyperparameters(),
            },
        })
    }
}

impl Estimator for FastTreeRegressionTrainer {
    fn fit(&self, data: &DataView) -> Result<Box<dyn Transformer>> {
        Ok(Box::new(self.train(data)?))
    }

    fn name(&self) -> &'static str {
        "fast_tree_regression"
    }
}

fn sample_features(num_features: usize, fraction: f64, rng: &mut StdRng) -> Vec<usize> {
    if fraction >= 1.0 || num_features == 0 {
        return (0..num_features).collect();
    }
    let amount = ((num_features as f64 * fraction).ceil() as usize).clamp(1, num_features);
    let mut sampled = rand::seq::index::sample(rng, num_features, amount).into_vec();
    sampled.sort_unstable();
    sampled
}

fn mean_squared_error(predictions: &[f64], targets: &[f64]) -> f64 {
    predictions
        .iter()
        .zip(targets)
        .map(|(prediction, target)| (prediction - target).powi(2))
        .sum::<f64>()
        / predictions.len() as f64
}

/// A trained boosted tree ensemble.
///
/// The prediction for a feature vector is `bias + learning_rate * sum(tree)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastTreeRegressionModel {
    feature_column: String,
    num_features: usize,
    bias: f64,
    learning_rate: f64,
    trees: Vec<RegressionTree>,
    training_stats: TrainingStats,
    metadata: ModelMetadata,
}

impl FastTreeRegressionModel {
    /// Predict the target for one feature vector.
    pub fn predict(&self, features: &[f32]) -> Result<f32> {
        if features.len() != self.num_features {
            return Err(MLError::InvalidFeatureVector {
                message: format!(
                    "expected {} features, got {}",
                    self.num_features,
                    features.len()
                ),
            }
            .into());
        }

        let sum: f64 = self.trees.iter().map(|tree| tree.predict(features)).sum();
        Ok((self.bias + self.learning_rate * sum) as f32)
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    /// The initial score every prediction starts from.
    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    pub fn training_stats(&self) -> &TrainingStats {
        &self.training_stats
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Save the model as JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|_| MLError::ModelSaveError {
            path: path.display().to_string(),
        })?;

        std::fs::write(path, json).map_err(|_| MLError::ModelSaveError {
            path: path.display().to_string(),
        })?;

        Ok(())
    }

    /// Load a model saved with [`FastTreeRegressionModel::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|_| MLError::ModelLoadError {
            path: path.display().to_string(),
        })?;

        let model = serde_json::from_str(&content).map_err(|_| MLError::ModelLoadError {
            path: path.display().to_string(),
        })?;

        Ok(model)
    }
}

impl Transformer for FastTreeRegressionModel {
    fn transform(&self, data: &DataView) -> Result<DataView> {
        let scores = data
            .vectors(&self.feature_column)?
            .iter()
            .map(|features| self.predict(features))
            .collect::<Result<Vec<f32>>>()?;

        data.clone()
            .with_column(SCORE_COLUMN, Column::Number(scores))
    }

    fn name(&self) -> &'static str {
        "fast_tree_regression"
    }
}
