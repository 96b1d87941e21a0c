//! Regression training, evaluation and prediction over [`DataView`]s.
//!
//! Training follows an estimator/transformer split: an [`pipeline::Estimator`]
//! learns from data and returns a [`pipeline::Transformer`] that appends
//! columns to any view with the same schema. Chains of estimators fit into
//! chains of transformers, with the trainer as the last step.
//!
//! [`DataView`]: crate::data::view::DataView

pub mod evaluation;
pub mod fast_tree;
pub mod pipeline;
pub mod prediction;
pub mod transforms;
pub mod tree;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::data::loader;
use crate::data::view::DataView;
use crate::error::Result;
use crate::ml::fast_tree::{FastTreeOptions, FastTreeRegressionTrainer};

/// Shared settings for a training run.
///
/// Every random choice made through the context derives from its seed, so
/// two runs with the same seed and data produce the same model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MLContext {
    seed: u64,
}

impl MLContext {
    /// Create a context with a fixed seed.
    pub fn new(seed: u64) -> Self {
        MLContext { seed }
    }

    /// The seed of this context.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// A random generator seeded from this context.
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }

    /// Split `data` into train and test views using this context's seed.
    pub fn train_test_split(
        &self,
        data: &DataView,
        test_fraction: f64,
    ) -> Result<(DataView, DataView)> {
        loader::train_test_split(data, test_fraction, self.seed)
    }

    /// A FastTree trainer whose seed is taken from this context.
    pub fn fast_tree(&self, options: FastTreeOptions) -> FastTreeRegressionTrainer {
        FastTreeRegressionTrainer::new(FastTreeOptions {
            seed: self.seed,
            ..options
        })
    }
}

/// Machine learning error types.
#[derive(Debug, thiserror::Error)]
pub enum MLError {
    #[error("Invalid feature vector: {message}")]
    InvalidFeatureVector { message: String },

    #[error("Training data insufficient: need at least {min_samples} samples, got {actual}")]
    InsufficientTrainingData { min_samples: usize, actual: usize },

    #[error("Invalid training options: {message}")]
    InvalidOptions { message: String },

    #[error("Model loading failed: {path}")]
    ModelLoadError { path: String },

    #[error("Model saving failed: {path}")]
    ModelSaveError { path: String },
}
