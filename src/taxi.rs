//! Taxi fare regression: record types, the training pipeline and the sample
//! trip used by the demonstration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::loader::{self, TextLoaderOptions};
use crate::data::view::DataView;
use crate::error::Result;
use crate::ml::MLContext;
use crate::ml::fast_tree::{FastTreeOptions, FastTreeRegressionModel, FastTreeRegressionTrainer};
use crate::ml::pipeline::{EstimatorChain, Transformer, TransformerChain};
use crate::ml::transforms::{Concatenate, CopyColumns, OneHotEncoding};

/// Observed fare of [`sample_trip`].
pub const ACTUAL_SAMPLE_FARE: f32 = 15.5;

/// One row of the taxi fare CSV files.
///
/// Columns are read by position in this order: vendor id, rate code,
/// passenger count, trip time, trip distance, payment type, fare amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaxiTrip {
    pub vendor_id: String,
    pub rate_code: String,
    pub passenger_count: f32,
    pub trip_time: f32,
    pub trip_distance: f32,
    pub payment_type: String,
    pub fare_amount: f32,
}

/// Model output for one trip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxiTripFarePrediction {
    #[serde(rename = "Score")]
    pub fare_amount: f32,
}

/// Load a taxi fare CSV with a header row and comma separators.
pub fn load_trips<P: AsRef<Path>>(path: P) -> Result<DataView> {
    loader::load_from_text_file::<TaxiTrip, _>(path, &TextLoaderOptions::default())
}

/// Feature preparation for the fare model.
///
/// The fare is copied to `Label`; vendor, rate code and payment type are
/// one-hot encoded and joined with passenger count and trip distance into
/// `Features`. Trip time is not used.
pub fn fare_featurizer() -> EstimatorChain {
    EstimatorChain::new()
        .append(CopyColumns::new("Label", "FareAmount"))
        .append(OneHotEncoding::new("VendorIdEncoded", "VendorId"))
        .append(OneHotEncoding::new("RateCodeEncoded", "RateCode"))
        .append(OneHotEncoding::new("PaymentTypeEncoded", "PaymentType"))
        .append(Concatenate::new(
            "Features",
            &[
                "VendorIdEncoded",
                "RateCodeEncoded",
                "PassengerCount",
                "TripDistance",
                "PaymentTypeEncoded",
            ],
        ))
}

fn fare_trainer(context: &MLContext, options: FastTreeOptions) -> FastTreeRegressionTrainer {
    context.fast_tree(FastTreeOptions {
        label_column: "Label".to_string(),
        feature_column: "Features".to_string(),
        ..options
    })
}

/// The complete fare pipeline: feature preparation followed by the FastTree
/// trainer.
pub fn fare_pipeline(context: &MLContext, options: FastTreeOptions) -> EstimatorChain {
    fare_featurizer().append(fare_trainer(context, options))
}

/// A fitted fare pipeline that keeps the trained regressor accessible.
#[derive(Debug)]
pub struct FareModel {
    featurizer: TransformerChain,
    regressor: FastTreeRegressionModel,
}

impl FareModel {
    /// Fit the fare pipeline on `data`.
    pub fn train(context: &MLContext, options: FastTreeOptions, data: &DataView) -> Result<Self> {
        let featurizer = fare_featurizer().fit(data)?;
        let features = featurizer.transform(data)?;
        let regressor = fare_trainer(context, options).train(&features)?;
        Ok(FareModel {
            featurizer,
            regressor,
        })
    }

    /// The trained tree ensemble.
    pub fn regressor(&self) -> &FastTreeRegressionModel {
        &self.regressor
    }
}

impl Transformer for FareModel {
    fn transform(&self, data: &DataView) -> Result<DataView> {
        self.regressor.transform(&self.featurizer.transform(data)?)
    }

    fn name(&self) -> &'static str {
        "fare_model"
    }
}

/// The trip whose fare the demonstration predicts.
pub fn sample_trip() -> TaxiTrip {
    TaxiTrip {
        vendor_id: "VTS".to_string(),
        rate_code: "1".to_string(),
        passenger_count: 1.0,
        trip_time: 1140.0,
        trip_distance: 3.75,
        payment_type: "CRD".to_string(),
        fare_amount: 0.0,
    }
}
