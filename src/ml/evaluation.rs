//! Regression quality metrics.

use serde::{Deserialize, Serialize};

use crate::data::view::DataView;
use crate::error::{PrimerError, Result};

/// Quality of regression predictions against known labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub mean_absolute_error: f64,
    pub mean_squared_error: f64,
    pub root_mean_squared_error: f64,
    /// Average squared loss; equal to the mean squared error.
    pub loss_function: f64,
    /// Coefficient of determination, `1 - SS_res / SS_tot`.
    pub r_squared: f64,
}

impl RegressionMetrics {
    /// Compute metrics from paired labels and scores.
    ///
    /// Pairs with a non-finite label are ignored. When every label is the
    /// same, `SS_tot` is zero and R² is reported as 0.
    pub fn compute(labels: &[f32], scores: &[f32]) -> Result<Self> {
        if labels.len() != scores.len() {
            return Err(PrimerError::data(format!(
                "{} labels but {} scores",
                labels.len(),
                scores.len()
            )));
        }

        let pairs: Vec<(f64, f64)> = labels
            .iter()
            .zip(scores)
            .filter(|(label, _)| label.is_finite())
            .map(|(&label, &score)| (label as f64, score as f64))
            .collect();

        if pairs.is_empty() {
            return Err(PrimerError::data("no labelled rows to evaluate"));
        }

        let n = pairs.len() as f64;
        let label_mean = pairs.iter().map(|(label, _)| label).sum::<f64>() / n;

        let mut absolute = 0.0;
        let mut squared = 0.0;
        let mut total = 0.0;
        for (label, score) in &pairs {
            let error = label - score;
            absolute += error.abs();
            squared += error * error;
            total += (label - label_mean).powi(2);
        }

        let mean_squared_error = squared / n;
        let r_squared = if total == 0.0 {
            0.0
        } else {
            1.0 - squared / total
        };

        Ok(RegressionMetrics {
            mean_absolute_error: absolute / n,
            mean_squared_error,
            root_mean_squared_error: mean_squared_error.sqrt(),
            loss_function: mean_squared_error,
            r_squared,
        })
    }
}

/// Evaluate the `score` column of a scored view against its `label` column.
pub fn evaluate_regression(data: &DataView, label: &str, score: &str) -> Result<RegressionMetrics> {
    RegressionMetrics::compute(data.numbers(label)?, data.numbers(score)?)
}
