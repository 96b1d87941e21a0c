//! Loading delimited text files into typed records and data views.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::data::view::DataView;
use crate::error::{PrimerError, Result};

/// How a delimited text file is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLoaderOptions {
    /// Skip the first line.
    pub has_header: bool,
    /// Field separator; must be an ASCII character.
    pub separator: char,
    /// Trim whitespace around fields.
    pub trim: bool,
}

impl Default for TextLoaderOptions {
    fn default() -> Self {
        TextLoaderOptions {
            has_header: true,
            separator: ',',
            trim: true,
        }
    }
}

impl TextLoaderOptions {
    fn separator_byte(&self) -> Result<u8> {
        if self.separator.is_ascii() {
            Ok(self.separator as u8)
        } else {
            Err(PrimerError::invalid_config(format!(
                "separator '{}' is not an ASCII character",
                self.separator
            )))
        }
    }
}

/// Read delimited records from any reader.
///
/// Columns are mapped to the fields of `T` by position; header names, when
/// present, are skipped and not consulted.
pub fn read_records<T, R>(reader: R, options: &TextLoaderOptions) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut reader = ReaderBuilder::new()
        .has_headers(options.has_header)
        .delimiter(options.separator_byte()?)
        .trim(if options.trim { Trim::All } else { Trim::None })
        .from_reader(reader);

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.deserialize(None)?);
    }
    Ok(records)
}

/// Read delimited records from a file.
pub fn read_records_from_file<T, P>(path: P, options: &TextLoaderOptions) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        PrimerError::Io(io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;

    let records = read_records(BufReader::new(file), options)?;
    debug!("read {} record(s) from {}", records.len(), path.display());
    Ok(records)
}

/// Load a delimited text file as a [`DataView`] whose columns are the
/// fields of `T`.
pub fn load_from_text_file<T, P>(path: P, options: &TextLoaderOptions) -> Result<DataView>
where
    T: DeserializeOwned + Serialize,
    P: AsRef<Path>,
{
    let records: Vec<T> = read_records_from_file(path, options)?;
    DataView::from_records(&records)
}

/// Shuffle the rows with a seeded generator and split off a test set.
///
/// The test set receives `round(rows * test_fraction)` rows.
pub fn train_test_split(
    data: &DataView,
    test_fraction: f64,
    seed: u64,
) -> Result<(DataView, DataView)> {
    if !(0.0..1.0).contains(&test_fraction) {
        return Err(PrimerError::invalid_argument(format!(
            "test fraction must be in [0, 1), got {test_fraction}"
        )));
    }

    let mut indices: Vec<usize> = (0..data.num_rows()).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_rows = (data.num_rows() as f64 * test_fraction).round() as usize;
    let (test, train) = indices.split_at(test_rows);
    Ok((data.select_rows(train), data.select_rows(test)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Trip {
        vendor_id: String,
        passenger_count: f32,
        fare_amount: f32,
    }

    const CSV: &str = "vendor_id,passenger_count,fare_amount\n\
                       CMT,1,8.5\n\
                       VTS, 2 ,12\n\
                       CMT,1,5.5\n";

    #[test]
    fn test_read_records_by_position() {
        let trips: Vec<Trip> = read_records(CSV.as_bytes(), &TextLoaderOptions::default()).unwrap();
        assert_eq!(trips.len(), 3);
        assert_eq!(trips[1].vendor_id, "VTS");
        assert_eq!(trips[1].passenger_count, 2.0);
        assert_eq!(trips[2].fare_amount, 5.5);
    }

    #[test]
    fn test_custom_separator_without_header() {
        let options = TextLoaderOptions {
            has_header: false,
            separator: ';',
            trim: true,
        };
        let trips: Vec<Trip> = read_records("CMT;1;8.5\n".as_bytes(), &options).unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].fare_amount, 8.5);
    }

    #[test]
    fn test_malformed_row_fails() {
        let csv = "vendor_id,passenger_count,fare_amount\nCMT,one,8.5\n";
        let result: Result<Vec<Trip>> = read_records(csv.as_bytes(), &TextLoaderOptions::default());
        assert!(matches!(result, Err(PrimerError::Csv(_))));
    }

    #[test]
    fn test_non_ascii_separator_is_rejected() {
        let options = TextLoaderOptions {
            separator: '→',
            ..TextLoaderOptions::default()
        };
        let result: Result<Vec<Trip>> = read_records(CSV.as_bytes(), &options);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_text_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        let view =
            load_from_text_file::<Trip, _>(file.path(), &TextLoaderOptions::default()).unwrap();
        assert_eq!(view.num_rows(), 3);
        assert_eq!(view.texts("vendor_id").unwrap()[0], "CMT");
        assert_eq!(view.numbers("fare_amount").unwrap()[1], 12.0);
    }

    #[test]
    fn test_missing_file() {
        let result =
            load_from_text_file::<Trip, _>("/nonexistent/trips.csv", &TextLoaderOptions::default());
        match result {
            Err(PrimerError::Io(e)) => assert!(e.to_string().contains("/nonexistent/trips.csv")),
            other => panic!("expected I/O error, got {other:?}"),
        }
    }

    #[test]
    fn test_train_test_split_is_seeded_partition() {
        let trips: Vec<Trip> = (0..20)
            .map(|i| Trip {
                vendor_id: format!("V{i}"),
                passenger_count: 1.0,
                fare_amount: i as f32,
            })
            .collect();
        let view = DataView::from_records(&trips).unwrap();

        let (train, test) = train_test_split(&view, 0.25, 7).unwrap();
        assert_eq!(train.num_rows(), 15);
        assert_eq!(test.num_rows(), 5);

        let mut all: Vec<f32> = train.numbers("fare_amount").unwrap().to_vec();
        all.extend_from_slice(test.numbers("fare_amount").unwrap());
        all.sort_by(f32::total_cmp);
        assert_eq!(all, (0..20).map(|i| i as f32).collect::<Vec<_>>());

        let (train_again, _) = train_test_split(&view, 0.25, 7).unwrap();
        assert_eq!(train, train_again);

        assert!(train_test_split(&view, 1.0, 7).is_err());
    }
}
