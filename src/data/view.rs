//! Column-oriented in-memory table passed between pipeline steps.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{PrimerError, Result};

/// A typed column of a [`DataView`].
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Categorical or free text values.
    Text(Vec<String>),
    /// Scalar numeric values. Missing values are `NaN`.
    Number(Vec<f32>),
    /// Fixed-width numeric vectors, one per row.
    Vector(Vec<Vec<f32>>),
}

impl Column {
    /// Number of rows in the column.
    pub fn len(&self) -> usize {
        match self {
            Column::Text(values) => values.len(),
            Column::Number(values) => values.len(),
            Column::Vector(values) => values.len(),
        }
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the column type for messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Column::Text(_) => "text",
            Column::Number(_) => "number",
            Column::Vector(_) => "vector",
        }
    }

    /// Copy the rows at `indices`, in that order.
    pub fn take(&self, indices: &[usize]) -> Column {
        match self {
            Column::Text(values) => Column::Text(indices.iter().map(|&i| values[i].clone()).collect()),
            Column::Number(values) => Column::Number(indices.iter().map(|&i| values[i]).collect()),
            Column::Vector(values) => {
                Column::Vector(indices.iter().map(|&i| values[i].clone()).collect())
            }
        }
    }

    fn json_value(&self, row: usize) -> Value {
        match self {
            Column::Text(values) => Value::String(values[row].clone()),
            Column::Number(values) => number_value(values[row]),
            Column::Vector(values) => {
                Value::Array(values[row].iter().map(|&x| number_value(x)).collect())
            }
        }
    }
}

fn number_value(x: f32) -> Value {
    serde_json::Number::from_f64(x as f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// An ordered set of equally long named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataView {
    names: Vec<String>,
    columns: Vec<Column>,
    rows: usize,
}

impl DataView {
    /// Create an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a view from serializable records.
    ///
    /// Every record must serialize to a flat object. Field names become
    /// column names; strings become text columns, numbers and booleans
    /// number columns, numeric arrays vector columns. `null` numbers load
    /// as `NaN`.
    pub fn from_records<T: Serialize>(records: &[T]) -> Result<Self> {
        let mut objects = Vec::with_capacity(records.len());
        for record in records {
            match serde_json::to_value(record)? {
                Value::Object(object) => objects.push(object),
                other => {
                    return Err(PrimerError::data(format!(
                        "records must serialize to objects, got {other}"
                    )));
                }
            }
        }

        let Some(first) = objects.first() else {
            return Ok(Self::new());
        };

        let mut view = Self::new();
        for (name, sample) in first {
            let column = match sample {
                Value::String(_) => Column::Text(
                    objects
                        .iter()
                        .map(|o| field_text(o, name))
                        .collect::<Result<_>>()?,
                ),
                Value::Array(_) => Column::Vector(
                    objects
                        .iter()
                        .map(|o| field_vector(o, name))
                        .collect::<Result<_>>()?,
                ),
                Value::Number(_) | Value::Bool(_) | Value::Null => Column::Number(
                    objects
                        .iter()
                        .map(|o| field_number(o, name))
                        .collect::<Result<_>>()?,
                ),
                Value::Object(_) => {
                    return Err(PrimerError::data(format!(
                        "field '{name}' is a nested object"
                    )));
                }
            };
            view.add_column(name, column)?;
        }

        Ok(view)
    }

    /// Deserialize every row into `T`.
    ///
    /// Columns `T` does not declare are ignored.
    pub fn to_records<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        (0..self.rows)
            .map(|row| {
                serde_json::from_value(Value::Object(self.row_object(row))).map_err(PrimerError::from)
            })
            .collect()
    }

    /// The row at `row` as a JSON object keyed by column name.
    pub fn row_object(&self, row: usize) -> Map<String, Value> {
        self.names
            .iter()
            .zip(&self.columns)
            .map(|(name, column)| (name.clone(), column.json_value(row)))
            .collect()
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> Vec<&str> {
        self.names.iter().map(String::as_str).collect()
    }

    /// The column called `name`.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|index| &self.columns[index])
            .ok_or_else(|| {
                PrimerError::data(format!(
                    "column '{}' not found (available: {})",
                    name,
                    self.names.join(", ")
                ))
            })
    }

    /// The number column called `name`.
    pub fn numbers(&self, name: &str) -> Result<&[f32]> {
        match self.column(name)? {
            Column::Number(values) => Ok(values),
            other => Err(type_mismatch(name, "number", other)),
        }
    }

    /// The text column called `name`.
    pub fn texts(&self, name: &str) -> Result<&[String]> {
        match self.column(name)? {
            Column::Text(values) => Ok(values),
            other => Err(type_mismatch(name, "text", other)),
        }
    }

    /// The vector column called `name`.
    pub fn vectors(&self, name: &str) -> Result<&[Vec<f32>]> {
        match self.column(name)? {
            Column::Vector(values) => Ok(values),
            other => Err(type_mismatch(name, "vector", other)),
        }
    }

    /// Add or replace a column.
    ///
    /// The first column fixes the row count; later columns must match it.
    pub fn add_column<S: Into<String>>(&mut self, name: S, column: Column) -> Result<()> {
        let name = name.into();
        if !self.columns.is_empty() && column.len() != self.rows {
            return Err(PrimerError::data(format!(
                "column '{}' has {} rows, view has {}",
                name,
                column.len(),
                self.rows
            )));
        }

        match self.names.iter().position(|n| *n == name) {
            Some(index) => self.columns[index] = column,
            None => {
                self.rows = column.len();
                self.names.push(name);
                self.columns.push(column);
            }
        }
        Ok(())
    }

    /// Return this view with one more (or one replaced) column.
    pub fn with_column<S: Into<String>>(mut self, name: S, column: Column) -> Result<Self> {
        self.add_column(name, column)?;
        Ok(self)
    }

    /// A new view holding the rows at `indices`, in that order.
    pub fn select_rows(&self, indices: &[usize]) -> DataView {
        DataView {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take(indices)).collect(),
            rows: indices.len(),
        }
    }
}

fn type_mismatch(name: &str, expected: &str, actual: &Column) -> PrimerError {
    PrimerError::data(format!(
        "column '{}' is a {} column, expected {}",
        name,
        actual.kind(),
        expected
    ))
}

fn field<'a>(object: &'a Map<String, Value>, name: &str) -> Result<&'a Value> {
    object
        .get(name)
        .ok_or_else(|| PrimerError::data(format!("record is missing field '{name}'")))
}

fn field_text(object: &Map<String, Value>, name: &str) -> Result<String> {
    match field(object, name)? {
        Value::String(s) => Ok(s.clone()),
        other => Err(PrimerError::data(format!(
            "field '{name}' expected text, got {other}"
        ))),
    }
}

fn field_number(object: &Map<String, Value>, name: &str) -> Result<f32> {
    match field(object, name)? {
        Value::Number(n) => Ok(n.as_f64().unwrap_or(f64::NAN) as f32),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Null => Ok(f32::NAN),
        other => Err(PrimerError::data(format!(
            "field '{name}' expected a number, got {other}"
        ))),
    }
}

fn field_vector(object: &Map<String, Value>, name: &str) -> Result<Vec<f32>> {
    match field(object, name)? {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Number(n) => Ok(n.as_f64().unwrap_or(f64::NAN) as f32),
                Value::Null => Ok(f32::NAN),
                other => Err(PrimerError::data(format!(
                    "field '{name}' holds a non-numeric element {other}"
                ))),
            })
            .collect(),
        other => Err(PrimerError::data(format!(
            "field '{name}' expected an array, got {other}"
        ))),
    }
}
