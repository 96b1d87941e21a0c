//! # Primer
//!
//! Two small, self-contained demonstrations built on shared plumbing.
//!
//! ## Features
//!
//! - Morphological analysis and inflection of Russian personal names with a
//!   rule-based paradigm dictionary
//! - Tag selection by predicate and power order
//! - Column-oriented data views loaded from CSV
//! - Estimator/transformer pipelines with one-hot encoding and concatenation
//! - Histogram gradient-boosted regression trees
//! - Regression metrics and single-record prediction

pub mod cli;
pub mod data;
pub mod error;
pub mod ml;
pub mod morphology;
pub mod taxi;
pub mod text;

pub mod prelude {
    pub use crate::data::view::{Column, DataView};
    pub use crate::error::{PrimerError, Result};
    pub use crate::ml::MLContext;
    pub use crate::ml::pipeline::{Estimator, Transformer};
    pub use crate::morphology::analyzer::{Analyzer, Inflector, MorphAnalyzer};
    pub use crate::morphology::tag::{InflectTask, MorphInfo, Tag};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
