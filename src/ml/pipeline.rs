//! Estimator and transformer traits and their chains.

use std::fmt;

use log::debug;

use crate::data::view::DataView;
use crate::error::Result;

/// Trait for fitted steps that derive new columns from a view.
pub trait Transformer: Send + Sync + fmt::Debug {
    /// Return `data` with this step's output columns added.
    fn transform(&self, data: &DataView) -> Result<DataView>;

    /// Get the name of this transformer.
    fn name(&self) -> &'static str;
}

/// Trait for steps that learn a [`Transformer`] from data.
pub trait Estimator: Send + Sync {
    /// Learn from `data`.
    fn fit(&self, data: &DataView) -> Result<Box<dyn Transformer>>;

    /// Get the name of this estimator.
    fn name(&self) -> &'static str;
}

/// A sequence of estimators fitted left to right.
///
/// # Examples
///
/// ```
/// use primer::data::view::{Column, DataView};
/// use primer::ml::pipeline::{EstimatorChain, Transformer};
/// use primer::ml::transforms::{Concatenate, CopyColumns, OneHotEncoding};
///
/// let data = DataView::new()
///     .with_column("Vendor", Column::Text(vec!["CMT".into(), "VTS".into()]))
///     .unwrap()
///     .with_column("Fare", Column::Number(vec![8.5, 12.0]))
///     .unwrap();
///
/// let model = EstimatorChain::new()
///     .append(CopyColumns::new("Label", "Fare"))
///     .append(OneHotEncoding::new("VendorEncoded", "Vendor"))
///     .append(Concatenate::new("Features", &["VendorEncoded"]))
///     .fit(&data)
///     .unwrap();
///
/// let transformed = model.transform(&data).unwrap();
/// assert_eq!(transformed.vectors("Features").unwrap()[1], vec![0.0, 1.0]);
/// ```
#[derive(Default)]
pub struct EstimatorChain {
    estimators: Vec<Box<dyn Estimator>>,
}

impl fmt::Debug for EstimatorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.estimators.iter().map(|e| e.name()).collect();
        f.debug_struct("EstimatorChain")
            .field("estimators", &names)
            .finish()
    }
}

impl EstimatorChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an estimator.
    pub fn append<E: Estimator + 'static>(mut self, estimator: E) -> Self {
        self.estimators.push(Box::new(estimator));
        self
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.estimators.len()
    }

    /// Whether the chain has no steps.
    pub fn is_empty(&self) -> bool {
        self.estimators.is_empty()
    }

    /// Fit every step in order.
    ///
    /// Each step is fitted on the output of the previously fitted steps. The
    /// last step's output is not computed.
    pub fn fit(&self, data: &DataView) -> Result<TransformerChain> {
        let mut transformers = Vec::with_capacity(self.estimators.len());
        let mut current = data.clone();

        for (index, estimator) in self.estimators.iter().enumerate() {
            debug!("fitting step {} ({})", index, estimator.name());
            let transformer = estimator.fit(&current)?;
            if index + 1 < self.estimators.len() {
                current = transformer.transform(&current)?;
            }
            transformers.push(transformer);
        }

        Ok(TransformerChain { transformers })
    }
}

/// Fitted steps applied in order.
#[derive(Debug, Default)]
pub struct TransformerChain {
    transformers: Vec<Box<dyn Transformer>>,
}

impl TransformerChain {
    /// The fitted steps.
    pub fn transformers(&self) -> &[Box<dyn Transformer>] {
        &self.transformers
    }

    /// The last fitted step, typically the trained model.
    pub fn last(&self) -> Option<&dyn Transformer> {
        self.transformers.last().map(|t| t.as_ref())
    }
}

impl Transformer for TransformerChain {
    fn transform(&self, data: &DataView) -> Result<DataView> {
        let mut current = data.clone();
        for transformer in &self.transformers {
            current = transformer.transform(&current)?;
        }
        Ok(current)
    }

    fn name(&self) -> &'static str {
        "chain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::view::Column;
    use crate::ml::transforms::CopyColumns;

    fn data() -> DataView {
        DataView::new()
            .with_column("Fare", Column::Number(vec![1.0, 2.0, 3.0]))
            .unwrap()
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let model = EstimatorChain::new().fit(&data()).unwrap();
        assert!(model.transformers().is_empty());
        assert_eq!(model.transform(&data()).unwrap(), data());
    }

    #[test]
    fn test_chain_steps_see_previous_outputs() {
        let chain = EstimatorChain::new()
            .append(CopyColumns::new("A", "Fare"))
            .append(CopyColumns::new("B", "A"));
        assert_eq!(chain.len(), 2);

        let model = chain.fit(&data()).unwrap();
        let out = model.transform(&data()).unwrap();
        assert_eq!(out.numbers("B").unwrap(), &[1.0, 2.0, 3.0]);
        assert_eq!(model.last().unwrap().name(), "copy_columns");
    }

    #[test]
    fn test_chain_propagates_fit_errors() {
        let chain = EstimatorChain::new().append(CopyColumns::new("A", "Missing"));
        assert!(chain.fit(&data()).is_err());
    }
}
