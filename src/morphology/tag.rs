//! Morphological tags, analysis results and inflection requests.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::morphology::grammeme::Category;

fn default_power() -> f32 {
    1.0
}

/// A bundle of grammeme assignments plus a confidence weight.
///
/// Tags are immutable once built; the `with_*` methods return new values.
/// The optional lemma records which dictionary word an analysis belongs to,
/// so two analyses with identical grammemes can still be told apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    grams: BTreeMap<Category, String>,
    #[serde(default = "default_power")]
    power: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lemma: Option<String>,
}

impl Tag {
    /// Create a tag from grammemes with full confidence and no lemma.
    pub fn new(grams: BTreeMap<Category, String>) -> Self {
        Tag {
            grams,
            power: default_power(),
            lemma: None,
        }
    }

    /// Start building a tag from individual grammemes.
    pub fn builder() -> TagBuilder {
        TagBuilder::default()
    }

    /// Return a copy of this tag with a different confidence weight.
    pub fn with_power(mut self, power: f32) -> Self {
        self.power = power;
        self
    }

    /// Return a copy of this tag bound to a lemma.
    pub fn with_lemma<S: Into<String>>(mut self, lemma: S) -> Self {
        self.lemma = Some(lemma.into());
        self
    }

    /// All grammemes of this tag, ordered by category.
    pub fn grams(&self) -> &BTreeMap<Category, String> {
        &self.grams
    }

    /// Grammeme assigned to `category`, if any.
    pub fn get(&self, category: Category) -> Option<&str> {
        self.grams.get(&category).map(String::as_str)
    }

    /// Whether `category` is assigned exactly `value`.
    pub fn has(&self, category: Category, value: &str) -> bool {
        self.get(category) == Some(value)
    }

    /// Confidence weight of this analysis.
    pub fn power(&self) -> f32 {
        self.power
    }

    /// Dictionary form this analysis belongs to.
    pub fn lemma(&self) -> Option<&str> {
        self.lemma.as_deref()
    }

    /// Whether both tags assign the same grammemes, ignoring power and lemma.
    pub fn same_grams(&self, other: &Tag) -> bool {
        self.grams == other.grams
    }

    /// Grammemes of this tag with every category `target` specifies replaced
    /// by the target's value.
    pub fn overlay(&self, target: &Tag) -> BTreeMap<Category, String> {
        let mut grams = self.grams.clone();
        for (category, value) in &target.grams {
            grams.insert(*category, value.clone());
        }
        grams
    }

    /// Whether the tag assigns no grammemes at all.
    pub fn is_empty(&self) -> bool {
        self.grams.is_empty()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grams: Vec<&str> = self.grams.values().map(String::as_str).collect();
        f.write_str(&grams.join(","))
    }
}

/// Builder for [`Tag`] taking the four supported categories by name.
///
/// Every grammeme is optional; unset categories are left out of the tag so
/// that an overlay only touches what the caller asked for.
#[derive(Debug, Clone, Default)]
pub struct TagBuilder {
    grams: BTreeMap<Category, String>,
    power: Option<f32>,
}

impl TagBuilder {
    /// Set the part of speech.
    pub fn post<S: Into<String>>(self, value: S) -> Self {
        self.gram(Category::Post, value)
    }

    /// Set the gender.
    pub fn gender<S: Into<String>>(self, value: S) -> Self {
        self.gram(Category::Gender, value)
    }

    /// Set the number.
    pub fn number<S: Into<String>>(self, value: S) -> Self {
        self.gram(Category::Number, value)
    }

    /// Set the case.
    pub fn case<S: Into<String>>(self, value: S) -> Self {
        self.gram(Category::Case, value)
    }

    /// Set an arbitrary category.
    pub fn gram<S: Into<String>>(mut self, category: Category, value: S) -> Self {
        self.grams.insert(category, value.into());
        self
    }

    /// Set the confidence weight.
    pub fn power(mut self, power: f32) -> Self {
        self.power = Some(power);
        self
    }

    /// Validate every grammeme against its category and build the tag.
    pub fn build(self) -> Result<Tag> {
        for (category, value) in &self.grams {
            category.validate(value)?;
        }

        let tag = Tag::new(self.grams);
        Ok(match self.power {
            Some(power) => tag.with_power(power),
            None => tag,
        })
    }
}

/// A word together with its candidate analyses.
///
/// Candidates are ordered by descending power.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MorphInfo {
    /// The analysed surface form.
    pub text: String,
    /// Candidate analyses.
    pub tags: Vec<Tag>,
}

impl MorphInfo {
    /// Create a new analysis result.
    pub fn new<S: Into<String>>(text: S, tags: Vec<Tag>) -> Self {
        MorphInfo {
            text: text.into(),
            tags,
        }
    }

    /// The most confident analysis.
    pub fn best_tag(&self) -> Option<&Tag> {
        self.tags.first()
    }

    /// Whether the analyzer produced no candidates for this word.
    pub fn is_unknown(&self) -> bool {
        self.tags.is_empty()
    }
}

/// A request to inflect `word`, read as `word_tag`, into `result_tag`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InflectTask {
    /// Surface form to inflect.
    pub word: String,
    /// The chosen analysis of `word`.
    pub word_tag: Tag,
    /// Grammemes the result must carry.
    pub result_tag: Tag,
}

impl InflectTask {
    /// Create a new inflection request.
    pub fn new<S: Into<String>>(word: S, word_tag: Tag, result_tag: Tag) -> Self {
        InflectTask {
            word: word.into(),
            word_tag,
            result_tag,
        }
    }
}
