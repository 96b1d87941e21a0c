//! Grammatical categories and the grammeme values used by the Russian
//! paradigm dictionary.
//!
//! Category keys and grammeme values use the short Russian notation
//! (`чр`, `род`, `чис`, `падеж`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PrimerError, Result};

/// A grammatical category a tag can assign a value to.
///
/// The declaration order is the order grammemes are printed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Part of speech.
    #[serde(rename = "чр")]
    Post,
    /// Grammatical gender.
    #[serde(rename = "род")]
    Gender,
    /// Grammatical number.
    #[serde(rename = "чис")]
    Number,
    /// Grammatical case.
    #[serde(rename = "падеж")]
    Case,
}

impl Category {
    /// All categories in print order.
    pub const ALL: [Category; 4] = [
        Category::Post,
        Category::Gender,
        Category::Number,
        Category::Case,
    ];

    /// The dictionary key of this category.
    pub fn key(&self) -> &'static str {
        match self {
            Category::Post => "чр",
            Category::Gender => "род",
            Category::Number => "чис",
            Category::Case => "падеж",
        }
    }

    /// Grammemes this category accepts.
    pub fn values(&self) -> &'static [&'static str] {
        match self {
            Category::Post => &[post::NOUN, post::ADJECTIVE],
            Category::Gender => &[gender::MASCULINE, gender::FEMININE, gender::NEUTER],
            Category::Number => &[number::SINGULAR, number::PLURAL],
            Category::Case => &[
                case::NOMINATIVE,
                case::GENITIVE,
                case::DATIVE,
                case::ACCUSATIVE,
                case::INSTRUMENTAL,
                case::PREPOSITIONAL,
                case::VOCATIVE,
            ],
        }
    }

    /// Check that `value` is a grammeme of this category.
    pub fn validate(&self, value: &str) -> Result<()> {
        if self.values().contains(&value) {
            Ok(())
        } else {
            Err(PrimerError::morphology(format!(
                "'{}' is not a grammeme of category '{}'",
                value,
                self.key()
            )))
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = PrimerError;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|category| category.key() == s)
            .ok_or_else(|| PrimerError::morphology(format!("unknown category '{s}'")))
    }
}

/// Part of speech grammemes.
pub mod post {
    /// Noun.
    pub const NOUN: &str = "сущ";
    /// Adjective.
    pub const ADJECTIVE: &str = "прил";
}

/// Gender grammemes.
pub mod gender {
    pub const MASCULINE: &str = "муж";
    pub const FEMININE: &str = "жен";
    pub const NEUTER: &str = "ср";
}

/// Number grammemes.
pub mod number {
    pub const SINGULAR: &str = "ед";
    pub const PLURAL: &str = "мн";
}

/// Case grammemes.
pub mod case {
    pub const NOMINATIVE: &str = "им";
    pub const GENITIVE: &str = "рд";
    pub const DATIVE: &str = "дт";
    pub const ACCUSATIVE: &str = "вн";
    pub const INSTRUMENTAL: &str = "тв";
    pub const PREPOSITIONAL: &str = "пр";
    pub const VOCATIVE: &str = "зв";
}
