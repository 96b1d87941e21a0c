//! Capability traits for morphological backends.
//!
//! Selection and formatting code only talks to these traits, so any backend
//! that can enumerate analyses and produce forms can be plugged in.

use crate::error::Result;
use crate::morphology::tag::{InflectTask, MorphInfo, Tag};

/// Trait for backends that analyse surface words.
pub trait Analyzer: Send + Sync {
    /// Analyse each word.
    ///
    /// Returns one [`MorphInfo`] per input word, in input order. Candidates
    /// are sorted by descending power and their powers sum to one; a word the
    /// backend does not recognise gets an empty candidate list.
    fn parse(&self, words: &[&str]) -> Result<Vec<MorphInfo>>;

    /// Get the name of this analyzer.
    fn name(&self) -> &'static str;
}

/// Trait for backends that produce inflected forms.
pub trait Inflector: Send + Sync {
    /// Inflect each task.
    ///
    /// Returns one entry per task, in task order; `None` means the backend
    /// has no form for that source analysis and target.
    fn inflect(&self, tasks: &[InflectTask]) -> Result<Vec<Option<String>>>;

    /// Enumerate every form of the word read as `tag`, paired with the tag
    /// describing each form.
    fn lexeme(&self, word: &str, tag: &Tag) -> Result<Vec<(String, Tag)>>;
}

/// A backend that both analyses and inflects.
pub trait MorphAnalyzer: Analyzer + Inflector {}

impl<T: Analyzer + Inflector> MorphAnalyzer for T {}
