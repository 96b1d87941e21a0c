//! Command line argument parsing for the demonstration binaries using clap.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::error::{PrimerError, Result};
use crate::ml::fast_tree::FastTreeOptions;

/// Flags shared by every binary.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl CommonArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Inflect personal names into a certificate template and list a lexeme
#[derive(Parser, Debug, Clone)]
#[command(name = "primer-morph")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct MorphArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Paradigm dictionary file (JSON); the built-in Russian set is used by default
    #[arg(long, value_name = "FILE")]
    pub paradigms: Option<PathBuf>,
}

/// Train a taxi fare regression model, evaluate it and predict one trip
#[derive(Parser, Debug, Clone)]
#[command(name = "primer-taxi")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct TaxiArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Training data CSV
    #[arg(long, value_name = "FILE")]
    pub train: Option<PathBuf>,

    /// Test data CSV
    #[arg(long, value_name = "FILE")]
    pub test: Option<PathBuf>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of trees
    #[arg(long)]
    pub trees: Option<usize>,

    /// Maximum leaves per tree
    #[arg(long)]
    pub leaves: Option<usize>,

    /// Save the trained model as JSON
    #[arg(long, value_name = "FILE")]
    pub save_model: Option<PathBuf>,
}

impl TaxiArgs {
    /// The configuration file (or the defaults) with command line overrides
    /// applied.
    pub fn resolve_config(&self) -> Result<TaxiFareConfig> {
        let mut config = match &self.config {
            Some(path) => TaxiFareConfig::from_file(path)?,
            None => TaxiFareConfig::default(),
        };

        if let Some(train) = &self.train {
            config.train_data_path = train.clone();
        }
        if let Some(test) = &self.test {
            config.test_data_path = test.clone();
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(trees) = self.trees {
            config.trainer.number_of_trees = trees;
        }
        if let Some(leaves) = self.leaves {
            config.trainer.number_of_leaves = leaves;
        }
        if self.save_model.is_some() {
            config.model_path = self.save_model.clone();
        }

        config.check_trainer_fields()?;
        config.trainer.validate()?;
        Ok(config)
    }
}

/// Settings of a taxi fare run.
///
/// The fare pipeline fixes the trainer's label and feature columns and seeds
/// the trainer from the top-level `seed`, so a `trainer` section may not set
/// `seed`, `label_column` or `feature_column`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxiFareConfig {
    pub train_data_path: PathBuf,
    pub test_data_path: PathBuf,
    pub seed: u64,
    pub trainer: FastTreeOptions,
    /// Where to save the trained model, if anywhere.
    pub model_path: Option<PathBuf>,
}

impl Default for TaxiFareConfig {
    fn default() -> Self {
        TaxiFareConfig {
            train_data_path: Path::new("Data").join("taxi-fare-train.csv"),
            test_data_path: Path::new("Data").join("taxi-fare-test.csv"),
            seed: 0,
            trainer: FastTreeOptions::default(),
            model_path: None,
        }
    }
}

impl TaxiFareConfig {
    fn check_trainer_fields(&self) -> Result<()> {
        let defaults = FastTreeOptions::default();
        if self.trainer.seed != defaults.seed {
            return Err(PrimerError::invalid_config(
                "trainer.seed is not used, set the top-level seed instead",
            ));
        }
        if self.trainer.label_column != defaults.label_column
            || self.trainer.feature_column != defaults.feature_column
        {
            return Err(PrimerError::invalid_config(format!(
                "the fare pipeline trains on columns '{}' and '{}'",
                defaults.label_column, defaults.feature_column
            )));
        }
        Ok(())
    }

    /// Load a configuration from a JSON file. Missing fields take their
    /// default values.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PrimerError::invalid_config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_morph_defaults() {
        let args = MorphArgs::try_parse_from(["primer-morph"]).unwrap();
        assert!(args.paradigms.is_none());
        assert_eq!(args.common.verbosity(), 1);
        assert_eq!(args.common.output_format, OutputFormat::Human);
    }

    #[test]
    fn test_morph_paradigms_flag() {
        let args =
            MorphArgs::try_parse_from(["primer-morph", "--paradigms", "names.json", "-f", "json"])
                .unwrap();
        assert_eq!(args.paradigms, Some(PathBuf::from("names.json")));
        assert_eq!(args.common.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_verbosity_levels() {
        let args = TaxiArgs::try_parse_from(["primer-taxi", "-vv"]).unwrap();
        assert_eq!(args.common.verbosity(), 2);

        let args = TaxiArgs::try_parse_from(["primer-taxi", "-vvv", "--quiet"]).unwrap();
        assert_eq!(args.common.verbosity(), 0);
    }

    #[test]
    fn test_taxi_defaults() {
        let args = TaxiArgs::try_parse_from(["primer-taxi"]).unwrap();
        let config = args.resolve_config().unwrap();
        assert_eq!(config, TaxiFareConfig::default());
        assert_eq!(
            config.train_data_path,
            PathBuf::from("Data").join("taxi-fare-train.csv")
        );
        assert_eq!(config.seed, 0);
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"train_data_path": "train.csv", "seed": 5, "trainer": {{"number_of_trees": 10}}}}"#
        )
        .unwrap();

        let args = TaxiArgs::try_parse_from([
            "primer-taxi",
            "--config",
            file.path().to_str().unwrap(),
            "--seed",
            "9",
            "--leaves",
            "4",
            "--save-model",
            "model.json",
        ])
        .unwrap();
        let config = args.resolve_config().unwrap();

        assert_eq!(config.train_data_path, PathBuf::from("train.csv"));
        assert_eq!(
            config.test_data_path,
            TaxiFareConfig::default().test_data_path
        );
        assert_eq!(config.seed, 9);
        assert_eq!(config.trainer.number_of_trees, 10);
        assert_eq!(config.trainer.number_of_leaves, 4);
        assert_eq!(config.trainer.learning_rate, 0.2);
        assert_eq!(config.model_path, Some(PathBuf::from("model.json")));
    }

    #[test]
    fn test_fixed_trainer_fields_are_rejected() {
        for trainer in [
            r#"{"seed": 3}"#,
            r#"{"label_column": "Fare"}"#,
            r#"{"feature_column": "Inputs"}"#,
        ] {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            write!(file, r#"{{"seed": 3, "trainer": {trainer}}}"#).unwrap();

            let args = TaxiArgs::try_parse_from([
                "primer-taxi",
                "--config",
                file.path().to_str().unwrap(),
            ])
            .unwrap();
            let error = args.resolve_config().unwrap_err();
            assert!(error.to_string().contains("Invalid configuration"), "{trainer}");
        }
    }

    #[test]
    fn test_invalid_overrides() {
        let args = TaxiArgs::try_parse_from(["primer-taxi", "--trees", "0"]).unwrap();
        assert!(args.resolve_config().is_err());
        assert!(TaxiFareConfig::from_file("/nonexistent/config.json").is_err());
    }
}
