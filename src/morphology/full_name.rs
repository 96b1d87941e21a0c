//! Inflecting a Russian full name (surname, given name, patronymic) as a unit.

use serde::{Deserialize, Serialize};

use crate::error::{PrimerError, Result};
use crate::morphology::analyzer::MorphAnalyzer;
use crate::morphology::grammeme::{Category, gender};
use crate::morphology::selector::{PowerOrder, TagPolicy};
use crate::morphology::tag::{InflectTask, MorphInfo, Tag};
use crate::text::first_char_to_upper;

/// A person's name in surname, given name, patronymic order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullName {
    pub surname: String,
    pub name: String,
    pub patronymic: String,
}

impl FullName {
    /// Create a new full name.
    pub fn new<S: Into<String>>(surname: S, name: S, patronymic: S) -> Self {
        FullName {
            surname: surname.into(),
            name: name.into(),
            patronymic: patronymic.into(),
        }
    }

    /// The three words in analysis order.
    pub fn words(&self) -> [&str; 3] {
        [&self.surname, &self.name, &self.patronymic]
    }
}

/// Selects a source analysis for each part of a full name and inflects all
/// three parts in one batch.
///
/// Each position has its own [`TagPolicy`]. The default reads every part as
/// masculine; the surname takes its most confident analysis while the given
/// name and patronymic take their least confident one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullNameInflector {
    pub surname: TagPolicy,
    pub name: TagPolicy,
    pub patronymic: TagPolicy,
}

impl Default for FullNameInflector {
    fn default() -> Self {
        FullNameInflector {
            surname: TagPolicy::new(Category::Gender, gender::MASCULINE, PowerOrder::Descending),
            name: TagPolicy::new(Category::Gender, gender::MASCULINE, PowerOrder::Ascending),
            patronymic: TagPolicy::new(
                Category::Gender,
                gender::MASCULINE,
                PowerOrder::Ascending,
            ),
        }
    }
}

impl FullNameInflector {
    /// Create an inflector with the default masculine policies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the same policy for every position.
    pub fn uniform(policy: TagPolicy) -> Self {
        FullNameInflector {
            surname: policy.clone(),
            name: policy.clone(),
            patronymic: policy,
        }
    }

    /// Analyse the three parts of `full_name`.
    pub fn parse<A>(&self, analyzer: &A, full_name: &FullName) -> Result<Vec<MorphInfo>>
    where
        A: MorphAnalyzer + ?Sized,
    {
        analyzer.parse(&full_name.words())
    }

    /// Inflect already analysed parts into `result_tag`.
    ///
    /// `parsed` must hold exactly the surname, given name and patronymic
    /// analyses, in that order. Each inflected part is capitalised and the
    /// parts are joined with single spaces.
    ///
    /// # Errors
    ///
    /// - [`PrimerError::NoMatchingTag`] when a part has no analysis accepted
    ///   by its policy
    /// - [`PrimerError::NullInput`] when the backend has no form for a part
    pub fn inflect_parsed<A>(
        &self,
        analyzer: &A,
        parsed: &[MorphInfo],
        result_tag: &Tag,
    ) -> Result<String>
    where
        A: MorphAnalyzer + ?Sized,
    {
        let [surname, name, patronymic] = parsed else {
            return Err(PrimerError::invalid_argument(format!(
                "a full name has 3 parts, got {}",
                parsed.len()
            )));
        };

        let tasks = [
            (surname, &self.surname),
            (name, &self.name),
            (patronymic, &self.patronymic),
        ]
        .into_iter()
        .map(|(info, policy)| -> Result<InflectTask> {
            let word_tag = policy.select(&info.text, &info.tags)?;
            Ok(InflectTask::new(
                info.text.clone(),
                word_tag.clone(),
                result_tag.clone(),
            ))
        })
        .collect::<Result<Vec<_>>>()?;

        let inflected = analyzer.inflect(&tasks)?;
        let parts = inflected
            .iter()
            .map(|form| first_char_to_upper(form.as_deref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(parts.join(" "))
    }

    /// Analyse and inflect `full_name` into `result_tag`.
    pub fn inflect<A>(&self, analyzer: &A, full_name: &FullName, result_tag: &Tag) -> Result<String>
    where
        A: MorphAnalyzer + ?Sized,
    {
        let parsed = self.parse(analyzer, full_name)?;
        self.inflect_parsed(analyzer, &parsed, result_tag)
    }
}
