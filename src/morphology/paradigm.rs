//! Inflectional paradigms and the dictionary that holds them.
//!
//! A paradigm is a table of endings shared by every word that declines the
//! same way. A word matches a paradigm when one of its endings is a suffix of
//! the word and the remaining stem is acceptable to the paradigm.
//!
//! The dictionary is a JSON document:
//!
//! ```json
//! {
//!   "min_stem_chars": 2,
//!   "paradigms": [
//!     {
//!       "name": "name_masc_iy",
//!       "grams": { "чр": "сущ", "род": "муж", "чис": "ед" },
//!       "weight": 2.0,
//!       "forms": [
//!         { "ending": "ий", "grams": { "падеж": "им" } },
//!         { "ending": "ием", "grams": { "падеж": "тв" } }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{PrimerError, Result};
use crate::morphology::grammeme::Category;

/// Dictionary of Russian personal-name paradigms shipped with the crate.
const DEFAULT_RUSSIAN_PARADIGMS: &str = include_str!("../../resources/morphology/paradigms_ru.json");

fn default_weight() -> f32 {
    1.0
}

fn default_min_stem_chars() -> usize {
    2
}

/// One cell of a paradigm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParadigmForm {
    /// Lowercase ending appended to the stem.
    pub ending: String,
    /// Grammemes specific to this form.
    pub grams: BTreeMap<Category, String>,
    /// Relative frequency of this form within the paradigm.
    #[serde(default = "default_weight")]
    pub weight: f32,
}

/// A declension table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paradigm {
    /// Identifier used in logs and error messages.
    pub name: String,
    /// Grammemes shared by every form.
    pub grams: BTreeMap<Category, String>,
    /// Regular expression the lowercase stem must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stem_pattern: Option<String>,
    /// Relative frequency of the paradigm as a whole.
    #[serde(default = "default_weight")]
    pub weight: f32,
    /// Forms; the first one is the dictionary form.
    pub forms: Vec<ParadigmForm>,
}

impl Paradigm {
    /// Full grammemes of the form at `index`.
    pub fn form_grams(&self, index: usize) -> BTreeMap<Category, String> {
        let mut grams = self.grams.clone();
        if let Some(form) = self.forms.get(index) {
            for (category, value) in &form.grams {
                grams.insert(*category, value.clone());
            }
        }
        grams
    }

    /// Index of the first form whose full grammemes equal `grams`.
    pub fn find_form(&self, grams: &BTreeMap<Category, String>) -> Option<usize> {
        (0..self.forms.len()).find(|&index| &self.form_grams(index) == grams)
    }

    /// Dictionary form for a lowercase stem.
    pub fn lemma(&self, stem: &str) -> String {
        let ending = self.forms.first().map(|f| f.ending.as_str()).unwrap_or("");
        format!("{}{}", stem.to_lowercase(), ending)
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(PrimerError::morphology("paradigm name is empty"));
        }
        if self.forms.is_empty() {
            return Err(PrimerError::morphology(format!(
                "paradigm '{}' has no forms",
                self.name
            )));
        }
        if !(self.weight > 0.0) {
            return Err(PrimerError::morphology(format!(
                "paradigm '{}' has non-positive weight {}",
                self.name, self.weight
            )));
        }
        for (category, value) in &self.grams {
            category.validate(value)?;
        }
        for form in &self.forms {
            if form.ending != form.ending.to_lowercase() {
                return Err(PrimerError::morphology(format!(
                    "paradigm '{}' has non-lowercase ending '{}'",
                    self.name, form.ending
                )));
            }
            if !(form.weight > 0.0) {
                return Err(PrimerError::morphology(format!(
                    "paradigm '{}' form '{}' has non-positive weight {}",
                    self.name, form.ending, form.weight
                )));
            }
            for (category, value) in &form.grams {
                category.validate(value)?;
            }
        }
        Ok(())
    }
}

/// Serialized layout of a paradigm dictionary.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ParadigmFile {
    #[serde(default = "default_min_stem_chars")]
    min_stem_chars: usize,
    paradigms: Vec<Paradigm>,
}

/// A paradigm that matched a word.
#[derive(Debug, Clone, PartialEq)]
pub struct ParadigmMatch {
    /// Index of the paradigm in its set.
    pub paradigm: usize,
    /// Index of the matched form.
    pub form: usize,
    /// Stem with the input's letter case preserved.
    pub stem: String,
}

/// A validated collection of paradigms with compiled stem patterns.
#[derive(Debug, Clone)]
pub struct ParadigmSet {
    paradigms: Vec<Paradigm>,
    stem_patterns: Vec<Option<Regex>>,
    min_stem_chars: usize,
}

impl ParadigmSet {
    /// Build a set from paradigms, validating every grammeme and pattern.
    pub fn from_paradigms(paradigms: Vec<Paradigm>, min_stem_chars: usize) -> Result<Self> {
        let mut stem_patterns = Vec::with_capacity(paradigms.len());
        for paradigm in &paradigms {
            paradigm.validate()?;
            let pattern = match &paradigm.stem_pattern {
                Some(pattern) => Some(Regex::new(pattern)?),
                None => None,
            };
            stem_patterns.push(pattern);
        }

        Ok(ParadigmSet {
            paradigms,
            stem_patterns,
            min_stem_chars,
        })
    }

    /// Parse a dictionary from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: ParadigmFile = serde_json::from_str(json)
            .map_err(|e| PrimerError::parse(format!("Failed to parse paradigm JSON: {e}")))?;
        Self::from_paradigms(file.paradigms, file.min_stem_chars)
    }

    /// Load a dictionary from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PrimerError::morphology(format!(
                "Failed to read paradigm dictionary '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    /// The built-in dictionary of Russian personal names.
    pub fn default_russian() -> Result<Self> {
        Self::from_json(DEFAULT_RUSSIAN_PARADIGMS)
    }

    /// Paradigm at `index`.
    pub fn get(&self, index: usize) -> Option<&Paradigm> {
        self.paradigms.get(index)
    }

    /// All paradigms in declaration order.
    pub fn paradigms(&self) -> &[Paradigm] {
        &self.paradigms
    }

    /// Number of paradigms.
    pub fn len(&self) -> usize {
        self.paradigms.len()
    }

    /// Whether the set holds no paradigms.
    pub fn is_empty(&self) -> bool {
        self.paradigms.is_empty()
    }

    /// Every `(paradigm, form)` pair whose ending ends `word`.
    ///
    /// Matching ignores letter case. The stem left after removing the ending
    /// must have at least `min_stem_chars` characters and satisfy the
    /// paradigm's stem pattern.
    pub fn matches(&self, word: &str) -> Vec<ParadigmMatch> {
        let chars: Vec<char> = word.chars().collect();
        let lower: Vec<char> = chars
            .iter()
            .map(|c| c.to_lowercase().next().unwrap_or(*c))
            .collect();

        let mut matches = Vec::new();
        for (paradigm_idx, paradigm) in self.paradigms.iter().enumerate() {
            for (form_idx, form) in paradigm.forms.iter().enumerate() {
                let ending: Vec<char> = form.ending.chars().collect();
                if ending.len() + self.min_stem_chars > lower.len() || !lower.ends_with(&ending) {
                    continue;
                }

                let stem_len = lower.len() - ending.len();
                let stem_lower: String = lower[..stem_len].iter().collect();
                if let Some(pattern) = &self.stem_patterns[paradigm_idx]
                    && !pattern.is_match(&stem_lower)
                {
                    continue;
                }

                matches.push(ParadigmMatch {
                    paradigm: paradigm_idx,
                    form: form_idx,
                    stem: chars[..stem_len].iter().collect(),
                });
            }
        }
        matches
    }
}
