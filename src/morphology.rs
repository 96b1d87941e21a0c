//! Morphological analysis and inflection of Russian personal names.
//!
//! The flow is: an [`analyzer::Analyzer`] turns words into candidate
//! [`tag::Tag`]s, a [`selector`] policy picks one candidate per word, and an
//! [`analyzer::Inflector`] produces the form described by a target tag.
//!
//! # Examples
//!
//! ```
//! use primer::morphology::dictionary::ParadigmAnalyzer;
//! use primer::morphology::full_name::{FullName, FullNameInflector};
//! use primer::morphology::tag::Tag;
//!
//! let analyzer = ParadigmAnalyzer::russian().unwrap();
//! let dative = Tag::builder().case("дт").build().unwrap();
//! let name = FullName::new("Марковцом", "Дмитрий", "Олегович");
//!
//! let result = FullNameInflector::new().inflect(&analyzer, &name, &dative).unwrap();
//! assert_eq!(result, "Марковцу Дмитрию Олеговичу");
//! ```

pub mod analyzer;
pub mod dictionary;
pub mod full_name;
pub mod grammeme;
pub mod paradigm;
pub mod selector;
pub mod tag;
