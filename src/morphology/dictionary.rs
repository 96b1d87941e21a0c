//! Paradigm-driven analyzer and inflector.

use std::collections::BTreeMap;

use log::debug;

use crate::error::{PrimerError, Result};
use crate::morphology::analyzer::{Analyzer, Inflector};
use crate::morphology::grammeme::Category;
use crate::morphology::paradigm::{ParadigmMatch, ParadigmSet};
use crate::morphology::tag::{InflectTask, MorphInfo, Tag};

/// An analysis together with the paradigm cell it came from.
#[derive(Debug, Clone)]
struct Analysis {
    grams: BTreeMap<Category, String>,
    lemma: String,
    power: f32,
    best_weight: f32,
    source: ParadigmMatch,
}

impl Analysis {
    fn tag(&self) -> Tag {
        Tag::new(self.grams.clone())
            .with_lemma(self.lemma.clone())
            .with_power(self.power)
    }
}

/// Analyzer backed by a [`ParadigmSet`].
///
/// Every paradigm cell whose ending fits the word is a candidate analysis.
/// Candidates that agree on grammemes and lemma are merged, their weights
/// summed, and the heaviest contributing paradigm is kept for inflection.
#[derive(Debug, Clone)]
pub struct ParadigmAnalyzer {
    paradigms: ParadigmSet,
}

impl ParadigmAnalyzer {
    /// Create an analyzer over a paradigm set.
    pub fn new(paradigms: ParadigmSet) -> Self {
        ParadigmAnalyzer { paradigms }
    }

    /// Create an analyzer over the built-in Russian name dictionary.
    pub fn russian() -> Result<Self> {
        Ok(Self::new(ParadigmSet::default_russian()?))
    }

    /// The underlying paradigm set.
    pub fn paradigms(&self) -> &ParadigmSet {
        &self.paradigms
    }

    fn analyze(&self, word: &str) -> Vec<Analysis> {
        let mut analyses: Vec<Analysis> = Vec::new();

        for source in self.paradigms.matches(word) {
            let Some(paradigm) = self.paradigms.get(source.paradigm) else {
                continue;
            };
            let weight = paradigm.weight * paradigm.forms[source.form].weight;
            let grams = paradigm.form_grams(source.form);
            let lemma = paradigm.lemma(&source.stem);

            match analyses
                .iter_mut()
                .find(|a| a.grams == grams && a.lemma == lemma)
            {
                Some(existing) => {
                    existing.power += weight;
                    if weight > existing.best_weight {
                        existing.best_weight = weight;
                        existing.source = source;
                    }
                }
                None => analyses.push(Analysis {
                    grams,
                    lemma,
                    power: weight,
                    best_weight: weight,
                    source,
                }),
            }
        }

        let total: f32 = analyses.iter().map(|a| a.power).sum();
        if total > 0.0 {
            for analysis in &mut analyses {
                analysis.power /= total;
            }
        }
        analyses.sort_by(|a, b| b.power.total_cmp(&a.power));
        analyses
    }

    fn find_analysis(&self, word: &str, tag: &Tag) -> Option<Analysis> {
        self.analyze(word).into_iter().find(|analysis| {
            analysis.grams == *tag.grams()
                && tag.lemma().is_none_or(|lemma| lemma == analysis.lemma)
        })
    }

    fn inflect_one(&self, task: &InflectTask) -> Option<String> {
        let analysis = self.find_analysis(&task.word, &task.word_tag)?;
        let paradigm = self.paradigms.get(analysis.source.paradigm)?;

        let target = task.word_tag.overlay(&task.result_tag);
        let form = paradigm.find_form(&target)?;
        Some(join_form(&analysis.source.stem, &paradigm.forms[form].ending))
    }
}

/// Append an ending to a stem, keeping an all-caps stem all caps.
fn join_form(stem: &str, ending: &str) -> String {
    let shouting = stem.chars().count() > 1
        && stem.chars().any(char::is_alphabetic)
        && !stem.chars().any(char::is_lowercase);

    if shouting {
        format!("{}{}", stem, ending.to_uppercase())
    } else {
        format!("{stem}{ending}")
    }
}

impl Analyzer for ParadigmAnalyzer {
    fn parse(&self, words: &[&str]) -> Result<Vec<MorphInfo>> {
        Ok(words
            .iter()
            .map(|word| {
                let tags: Vec<Tag> = self.analyze(word).iter().map(Analysis::tag).collect();
                debug!("parsed '{}' into {} candidate(s)", word, tags.len());
                MorphInfo::new(*word, tags)
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "paradigm"
    }
}

impl Inflector for ParadigmAnalyzer {
    fn inflect(&self, tasks: &[InflectTask]) -> Result<Vec<Option<String>>> {
        Ok(tasks
            .iter()
            .map(|task| {
                let result = self.inflect_one(task);
                if result.is_none() {
                    debug!(
                        "no form of '{}' ({}) for target {}",
                        task.word, task.word_tag, task.result_tag
                    );
                }
                result
            })
            .collect())
    }

    fn lexeme(&self, word: &str, tag: &Tag) -> Result<Vec<(String, Tag)>> {
        let analysis = self.find_analysis(word, tag).ok_or_else(|| {
            PrimerError::no_matching_tag(format!("'{word}' has no analysis {tag}"))
        })?;
        let paradigm = self.paradigms.get(analysis.source.paradigm).ok_or_else(|| {
            PrimerError::morphology(format!(
                "paradigm {} disappeared from the dictionary",
                analysis.source.paradigm
            ))
        })?;

        Ok(paradigm
            .forms
            .iter()
            .enumerate()
            .map(|(index, form)| {
                let tag = Tag::new(paradigm.form_grams(index)).with_lemma(analysis.lemma.clone());
                (join_form(&analysis.source.stem, &form.ending), tag)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::grammeme::{case, gender, post};

    fn analyzer() -> ParadigmAnalyzer {
        ParadigmAnalyzer::russian().unwrap()
    }

    fn target(case_value: &str) -> Tag {
        Tag::builder()
            .post(post::NOUN)
            .gender(gender::MASCULINE)
            .number("ед")
            .case(case_value)
            .build()
            .unwrap()
    }

    #[test]
    fn test_parse_sorts_and_normalizes_powers() {
        let infos = analyzer().parse(&["Зыкин"]).unwrap();
        let tags = &infos[0].tags;
        assert!(tags.len() > 1);

        let total: f32 = tags.iter().map(Tag::power).sum();
        assert!((total - 1.0).abs() < 1e-5);
        assert!(tags.windows(2).all(|w| w[0].power() >= w[1].power()));

        let best = &tags[0];
        assert!(best.has(Category::Post, post::NOUN));
        assert!(best.has(Category::Case, case::NOMINATIVE));
        assert_eq!(best.lemma(), Some("зыкин"));
    }

    #[test]
    fn test_parse_unknown_word() {
        let infos = analyzer().parse(&["ъ"]).unwrap();
        assert_eq!(infos.len(), 1);
        assert!(infos[0].is_unknown());
    }

    #[test]
    fn test_inflect_surname_ets() {
        let analyzer = analyzer();
        let infos = analyzer.parse(&["Марковцом"]).unwrap();
        let source = infos[0].best_tag().unwrap().clone();
        assert!(source.has(Category::Case, case::INSTRUMENTAL));

        let results = analyzer
            .inflect(&[
                InflectTask::new("Марковцом", source.clone(), target(case::DATIVE)),
                InflectTask::new("Марковцом", source.clone(), target(case::NOMINATIVE)),
                InflectTask::new("Марковцом", source, target(case::INSTRUMENTAL)),
            ])
            .unwrap();

        assert_eq!(results[0].as_deref(), Some("Марковцу"));
        assert_eq!(results[1].as_deref(), Some("Марковец"));
        assert_eq!(results[2].as_deref(), Some("Марковцом"));
    }

    #[test]
    fn test_inflect_case_only_target_keeps_source_grams() {
        let analyzer = analyzer();
        let infos = analyzer.parse(&["Дмитрий"]).unwrap();
        let source = infos[0].best_tag().unwrap().clone();
        let dative = Tag::builder().case(case::DATIVE).build().unwrap();

        let result = analyzer
            .inflect(&[InflectTask::new("Дмитрий", source, dative)])
            .unwrap();
        assert_eq!(result[0].as_deref(), Some("Дмитрию"));
    }

    #[test]
    fn test_inflect_names_and_patronymics() {
        let analyzer = analyzer();
        let cases = [
            ("Дмитрий", case::DATIVE, "Дмитрию"),
            ("Даниил", case::INSTRUMENTAL, "Даниилом"),
            ("Олегович", case::INSTRUMENTAL, "Олеговичем"),
            ("Зыкин", case::INSTRUMENTAL, "Зыкиным"),
        ];

        for (word, case_value, expected) in cases {
            let infos = analyzer.parse(&[word]).unwrap();
            let source = infos[0].best_tag().unwrap().clone();
            let result = analyzer
                .inflect(&[InflectTask::new(word, source, target(case_value))])
                .unwrap();
            assert_eq!(result[0].as_deref(), Some(expected), "inflecting {word}");
        }
    }

    #[test]
    fn test_inflect_missing_target_form() {
        let analyzer = analyzer();
        let infos = analyzer.parse(&["Зыкин"]).unwrap();
        let adjective = infos[0]
            .tags
            .iter()
            .find(|t| t.has(Category::Post, post::ADJECTIVE))
            .unwrap()
            .clone();

        // Possessive adjectives have no vocative
        let vocative = Tag::builder().case(case::VOCATIVE).build().unwrap();
        let result = analyzer
            .inflect(&[InflectTask::new("Зыкин", adjective, vocative)])
            .unwrap();
        assert_eq!(result, vec![None]);
    }

    #[test]
    fn test_inflect_with_foreign_source_tag() {
        let analyzer = analyzer();
        let foreign = target(case::PREPOSITIONAL);
        let result = analyzer
            .inflect(&[InflectTask::new("Дмитрий", foreign, target(case::DATIVE))])
            .unwrap();
        assert_eq!(result, vec![None]);
    }

    #[test]
    fn test_lexeme_lists_every_form() {
        let analyzer = analyzer();
        let infos = analyzer.parse(&["Зыкин"]).unwrap();
        let forms = analyzer.lexeme("Зыкин", &infos[0].tags[0]).unwrap();

        assert_eq!(forms.len(), 7);
        assert_eq!(forms[0].0, "Зыкин");
        assert!(forms.iter().any(|(text, tag)| text == "Зыкиным"
            && tag.has(Category::Case, case::INSTRUMENTAL)));
        assert!(forms.iter().all(|(_, tag)| tag.lemma() == Some("зыкин")));
    }

    #[test]
    fn test_lexeme_without_analysis_fails() {
        let analyzer = analyzer();
        let result = analyzer.lexeme("Дмитрий", &target(case::GENITIVE));
        assert!(matches!(result, Err(PrimerError::NoMatchingTag(_))));
    }

    #[test]
    fn test_join_form_keeps_all_caps() {
        assert_eq!(join_form("ЗЫК", "ином"), "ЗЫКИНОМ");
        assert_eq!(join_form("Зык", "ином"), "Зыкином");
    }
}
