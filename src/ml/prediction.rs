//! Single-record prediction over a fitted pipeline.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::data::view::DataView;
use crate::error::{PrimerError, Result};
use crate::ml::pipeline::Transformer;

/// Runs one input record of type `I` through a fitted transformer and reads
/// the output row back as `O`.
///
/// `O` picks the columns it needs by name, for example a field renamed to
/// `Score`.
pub struct PredictionEngine<I, O> {
    transformer: Arc<dyn Transformer>,
    _types: PhantomData<fn(I) -> O>,
}

impl<I, O> PredictionEngine<I, O>
where
    I: Serialize,
    O: DeserializeOwned,
{
    pub fn new(transformer: Arc<dyn Transformer>) -> Self {
        PredictionEngine {
            transformer,
            _types: PhantomData,
        }
    }

    /// Predict for a single record.
    pub fn predict(&self, input: &I) -> Result<O> {
        let view = DataView::from_records(std::slice::from_ref(input))?;
        let output = self.transformer.transform(&view)?;
        output
            .to_records::<O>()?
            .into_iter()
            .next()
            .ok_or_else(|| PrimerError::data("transformer produced no rows"))
    }
}

impl<I, O> Clone for PredictionEngine<I, O> {
    fn clone(&self) -> Self {
        PredictionEngine {
            transformer: Arc::clone(&self.transformer),
            _types: PhantomData,
        }
    }
}
