//! Column transforms: copy, one-hot encoding and concatenation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::view::{Column, DataView};
use crate::error::{PrimerError, Result};
use crate::ml::pipeline::{Estimator, Transformer};

/// Copy an existing column under a new name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyColumns {
    output: String,
    input: String,
}

impl CopyColumns {
    pub fn new<O: Into<String>, I: Into<String>>(output: O, input: I) -> Self {
        CopyColumns {
            output: output.into(),
            input: input.into(),
        }
    }
}

impl Estimator for CopyColumns {
    fn fit(&self, data: &DataView) -> Result<Box<dyn Transformer>> {
        data.column(&self.input)?;
        Ok(Box::new(self.clone()))
    }

    fn name(&self) -> &'static str {
        "copy_columns"
    }
}

impl Transformer for CopyColumns {
    fn transform(&self, data: &DataView) -> Result<DataView> {
        let column = data.column(&self.input)?.clone();
        data.clone().with_column(self.output.clone(), column)
    }

    fn name(&self) -> &'static str {
        "copy_columns"
    }
}

/// Learn a vocabulary of categorical values and encode each row as an
/// indicator vector.
///
/// Numeric inputs are treated as categories by their textual form, so a
/// rate code `1` and `2` become two different slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneHotEncoding {
    output: String,
    input: String,
}

impl OneHotEncoding {
    pub fn new<O: Into<String>, I: Into<String>>(output: O, input: I) -> Self {
        OneHotEncoding {
            output: output.into(),
            input: input.into(),
        }
    }
}

impl Estimator for OneHotEncoding {
    fn fit(&self, data: &DataView) -> Result<Box<dyn Transformer>> {
        let mut categories: Vec<String> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for key in category_keys(data, &self.input)? {
            if !seen.contains_key(&key) {
                seen.insert(key.clone(), categories.len());
                categories.push(key);
            }
        }

        log::debug!(
            "one-hot '{}' -> '{}': {} categories",
            self.input,
            self.output,
            categories.len()
        );

        Ok(Box::new(OneHotEncodingModel {
            output: self.output.clone(),
            input: self.input.clone(),
            categories,
            slots: seen,
        }))
    }

    fn name(&self) -> &'static str {
        "one_hot_encoding"
    }
}

/// A fitted one-hot vocabulary.
///
/// Categories keep first-seen order. A value missing from the vocabulary
/// encodes as all zeros.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneHotEncodingModel {
    output: String,
    input: String,
    categories: Vec<String>,
    slots: HashMap<String, usize>,
}

impl OneHotEncodingModel {
    /// Categories in slot order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Encode a single category key.
    pub fn encode(&self, key: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.categories.len()];
        if let Some(&slot) = self.slots.get(key) {
            vector[slot] = 1.0;
        }
        vector
    }
}

impl Transformer for OneHotEncodingModel {
    fn transform(&self, data: &DataView) -> Result<DataView> {
        let encoded = category_keys(data, &self.input)?
            .iter()
            .map(|key| self.encode(key))
            .collect();
        data.clone()
            .with_column(self.output.clone(), Column::Vector(encoded))
    }

    fn name(&self) -> &'static str {
        "one_hot_encoding"
    }
}

fn category_keys(data: &DataView, name: &str) -> Result<Vec<String>> {
    match data.column(name)? {
        Column::Text(values) => Ok(values.clone()),
        Column::Number(values) => Ok(values.iter().map(|v| v.to_string()).collect()),
        Column::Vector(_) => Err(PrimerError::data(format!(
            "column '{name}' is a vector column and cannot be one-hot encoded"
        ))),
    }
}

/// Join number and vector columns into one feature vector per row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concatenate {
    output: String,
    inputs: Vec<String>,
}

impl Concatenate {
    pub fn new<O: Into<String>>(output: O, inputs: &[&str]) -> Self {
        Concatenate {
            output: output.into(),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Input columns in the order they are joined.
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }
}

impl Estimator for Concatenate {
    fn fit(&self, data: &DataView) -> Result<Box<dyn Transformer>> {
        if self.inputs.is_empty() {
            return Err(PrimerError::invalid_argument(
                "concatenate needs at least one input column",
            ));
        }
        for name in &self.inputs {
            if let Column::Text(_) = data.column(name)? {
                return Err(PrimerError::data(format!(
                    "column '{name}' is a text column; encode it before concatenating"
                )));
            }
        }
        Ok(Box::new(self.clone()))
    }

    fn name(&self) -> &'static str {
        "concatenate"
    }
}

impl Transformer for Concatenate {
    fn transform(&self, data: &DataView) -> Result<DataView> {
        let mut rows: Vec<Vec<f32>> = vec![Vec::new(); data.num_rows()];

        for name in &self.inputs {
            match data.column(name)? {
                Column::Number(values) => {
                    for (row, value) in rows.iter_mut().zip(values) {
                        row.push(*value);
                    }
                }
                Column::Vector(values) => {
                    for (row, value) in rows.iter_mut().zip(values) {
                        row.extend_from_slice(value);
                    }
                }
                Column::Text(_) => {
                    return Err(PrimerError::data(format!(
                        "column '{name}' is a text column; encode it before concatenating"
                    )));
                }
            }
        }

        data.clone()
            .with_column(self.output.clone(), Column::Vector(rows))
    }

    fn name(&self) -> &'static str {
        "concatenate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trips() -> DataView {
        DataView::new()
            .with_column(
                "VendorId",
                Column::Text(vec!["CMT".into(), "VTS".into(), "CMT".into()]),
            )
            .unwrap()
            .with_column("RateCode", Column::Number(vec![1.0, 2.0, 1.0]))
            .unwrap()
            .with_column("TripDistance", Column::Number(vec![1.5, 10.0, 0.5]))
            .unwrap()
    }

    #[test]
    fn test_copy_columns() {
        let data = trips();
        let copy = CopyColumns::new("Label", "TripDistance");
        let out = copy.fit(&data).unwrap().transform(&data).unwrap();
        assert_eq!(out.numbers("Label").unwrap(), data.numbers("TripDistance").unwrap());
        assert!(CopyColumns::new("Label", "Fare").fit(&data).is_err());
    }

    #[test]
    fn test_one_hot_text_first_seen_order() {
        let data = trips();
        let model = OneHotEncoding::new("VendorEncoded", "VendorId")
            .fit(&data)
            .unwrap();
        let out = model.transform(&data).unwrap();
        assert_eq!(
            out.vectors("VendorEncoded").unwrap(),
            &[vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0]]
        );
    }

    #[test]
    fn test_one_hot_numeric_and_unseen_values() {
        let data = trips();
        let model = OneHotEncoding::new("RateEncoded", "RateCode")
            .fit(&data)
            .unwrap();

        let unseen = DataView::new()
            .with_column("RateCode", Column::Number(vec![5.0, 2.0]))
            .unwrap();
        let out = model.transform(&unseen).unwrap();
        assert_eq!(
            out.vectors("RateEncoded").unwrap(),
            &[vec![0.0, 0.0], vec![0.0, 1.0]]
        );
    }

    #[test]
    fn test_concatenate_numbers_and_vectors() {
        let data = trips()
            .with_column(
                "Encoded",
                Column::Vector(vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0]]),
            )
            .unwrap();
        let concat = Concatenate::new("Features", &["Encoded", "TripDistance"]);
        let out = concat.fit(&data).unwrap().transform(&data).unwrap();
        assert_eq!(out.vectors("Features").unwrap()[1], vec![0.0, 1.0, 10.0]);
    }

    #[test]
    fn test_concatenate_rejects_text_and_empty_inputs() {
        let data = trips();
        assert!(Concatenate::new("Features", &["VendorId"]).fit(&data).is_err());
        assert!(Concatenate::new("Features", &[]).fit(&data).is_err());
    }
}
