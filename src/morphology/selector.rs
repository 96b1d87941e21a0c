//! Choosing one analysis out of a word's ambiguous candidates.
//!
//! Selection is a pure function of the candidates, a filter predicate and an
//! ordering. Callers decide the ordering per call site: the full-name
//! inflector reads surnames with the most confident masculine analysis but
//! given names and patronymics with the least confident one.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{PrimerError, Result};
use crate::morphology::grammeme::Category;
use crate::morphology::tag::Tag;

/// Select one candidate from `candidates`.
///
/// Candidates rejected by `predicate` are skipped; of the rest, the first
/// one (in input order) that no other candidate orders before under
/// `compare` is returned.
///
/// # Errors
///
/// [`PrimerError::NoMatchingTag`] when no candidate satisfies `predicate`.
///
/// # Examples
///
/// ```
/// use primer::morphology::grammeme::{Category, gender};
/// use primer::morphology::selector::{by_power_descending, has_gram, select_tag};
/// use primer::morphology::tag::Tag;
///
/// let candidates = vec![
///     Tag::builder().gender(gender::FEMININE).power(0.6).build().unwrap(),
///     Tag::builder().gender(gender::MASCULINE).power(0.3).build().unwrap(),
///     Tag::builder().gender(gender::MASCULINE).power(0.1).build().unwrap(),
/// ];
///
/// let tag = select_tag(
///     &candidates,
///     has_gram(Category::Gender, gender::MASCULINE),
///     by_power_descending,
/// )
/// .unwrap();
/// assert_eq!(tag.power(), 0.3);
/// ```
pub fn select_tag<'a, P, C>(candidates: &'a [Tag], predicate: P, compare: C) -> Result<&'a Tag>
where
    P: Fn(&Tag) -> bool,
    C: Fn(&Tag, &Tag) -> Ordering,
{
    candidates
        .iter()
        .filter(|tag| predicate(tag))
        .min_by(|a, b| compare(a, b))
        .ok_or_else(|| {
            PrimerError::no_matching_tag(format!(
                "none of {} candidate(s) satisfied the filter",
                candidates.len()
            ))
        })
}

/// Predicate accepting tags that assign `value` to `category`.
///
/// Tags that leave the category unset are rejected.
pub fn has_gram(category: Category, value: &str) -> impl Fn(&Tag) -> bool + '_ {
    move |tag: &Tag| tag.has(category, value)
}

/// Order the most confident analysis first.
pub fn by_power_descending(a: &Tag, b: &Tag) -> Ordering {
    b.power().total_cmp(&a.power())
}

/// Order the least confident analysis first.
pub fn by_power_ascending(a: &Tag, b: &Tag) -> Ordering {
    a.power().total_cmp(&b.power())
}

/// Direction in which candidates are ranked by power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerOrder {
    /// Highest power wins.
    Descending,
    /// Lowest power wins.
    Ascending,
}

impl PowerOrder {
    /// Compare two tags in this direction.
    pub fn compare(&self, a: &Tag, b: &Tag) -> Ordering {
        match self {
            PowerOrder::Descending => by_power_descending(a, b),
            PowerOrder::Ascending => by_power_ascending(a, b),
        }
    }
}

/// A grammeme filter together with the power order used to break ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagPolicy {
    /// Category the filter inspects.
    pub category: Category,
    /// Value the category must carry.
    pub value: String,
    /// Tie-break direction.
    pub order: PowerOrder,
}

impl TagPolicy {
    /// Create a new policy.
    pub fn new<S: Into<String>>(category: Category, value: S, order: PowerOrder) -> Self {
        TagPolicy {
            category,
            value: value.into(),
            order,
        }
    }

    /// Apply this policy to the candidates of `word`.
    ///
    /// The error message names the word and the filter that rejected it.
    pub fn select<'a>(&self, word: &str, candidates: &'a [Tag]) -> Result<&'a Tag> {
        select_tag(
            candidates,
            has_gram(self.category, &self.value),
            |a, b| self.order.compare(a, b),
        )
        .map_err(|_| {
            PrimerError::no_matching_tag(format!(
                "no analysis of '{}' has {}={} among {} candidate(s)",
                word,
                self.category,
                self.value,
                candidates.len()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::grammeme::{case, gender};

    fn tag(gender: &str, case: &str, power: f32) -> Tag {
        Tag::builder()
            .gender(gender)
            .case(case)
            .power(power)
            .build()
            .unwrap()
    }

    fn candidates() -> Vec<Tag> {
        vec![
            tag(gender::FEMININE, case::NOMINATIVE, 0.5),
            tag(gender::MASCULINE, case::GENITIVE, 0.2),
            tag(gender::MASCULINE, case::ACCUSATIVE, 0.2),
            tag(gender::MASCULINE, case::VOCATIVE, 0.1),
        ]
    }

    #[test]
    fn test_descending_picks_highest_matching_power() {
        let candidates = candidates();
        let selected = select_tag(
            &candidates,
            has_gram(Category::Gender, gender::MASCULINE),
            by_power_descending,
        )
        .unwrap();
        // Ties keep the original order
        assert_eq!(selected.get(Category::Case), Some(case::GENITIVE));
    }

    #[test]
    fn test_ascending_picks_lowest_matching_power() {
        let candidates = candidates();
        let selected = select_tag(
            &candidates,
            has_gram(Category::Gender, gender::MASCULINE),
            by_power_ascending,
        )
        .unwrap();
        assert_eq!(selected.get(Category::Case), Some(case::VOCATIVE));
    }

    #[test]
    fn test_selection_is_member_of_filtered_set() {
        let candidates = candidates();
        for order in [PowerOrder::Ascending, PowerOrder::Descending] {
            for value in [gender::MASCULINE, gender::FEMININE] {
                let selected = select_tag(
                    &candidates,
                    has_gram(Category::Gender, value),
                    |a, b| order.compare(a, b),
                )
                .unwrap();
                assert!(selected.has(Category::Gender, value));
                assert!(candidates.iter().any(|c| std::ptr::eq(c, selected)));
            }
        }
    }

    #[test]
    fn test_empty_filtered_set_fails() {
        let candidates = candidates();
        let err = select_tag(
            &candidates,
            has_gram(Category::Gender, gender::NEUTER),
            by_power_descending,
        )
        .unwrap_err();
        assert!(matches!(err, PrimerError::NoMatchingTag(_)));

        let err = select_tag(&[], |_| true, by_power_ascending).unwrap_err();
        assert!(matches!(err, PrimerError::NoMatchingTag(_)));
    }

    #[test]
    fn test_tags_without_category_are_rejected() {
        let candidates = vec![Tag::builder().case(case::DATIVE).build().unwrap()];
        let result = select_tag(
            &candidates,
            has_gram(Category::Gender, gender::MASCULINE),
            by_power_descending,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_policy_error_names_word() {
        let policy = TagPolicy::new(Category::Gender, gender::NEUTER, PowerOrder::Descending);
        let err = policy.select("Анна", &candidates()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Анна"));
        assert!(message.contains("род=ср"));
    }
}
