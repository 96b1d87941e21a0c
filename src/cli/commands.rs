//! Command implementations for the demonstration binaries.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use log::info;

use crate::cli::args::{MorphArgs, TaxiArgs};
use crate::cli::output::*;
use crate::error::{PrimerError, Result};
use crate::ml::MLContext;
use crate::ml::evaluation::evaluate_regression;
use crate::ml::fast_tree::SCORE_COLUMN;
use crate::ml::pipeline::Transformer;
use crate::ml::prediction::PredictionEngine;
use crate::morphology::analyzer::MorphAnalyzer;
use crate::morphology::dictionary::ParadigmAnalyzer;
use crate::morphology::full_name::{FullName, FullNameInflector};
use crate::morphology::grammeme::{case, gender, number, post};
use crate::morphology::paradigm::ParadigmSet;
use crate::morphology::tag::Tag;
use crate::taxi::{self, FareModel, TaxiTrip, TaxiTripFarePrediction};

/// Word whose lexeme the morphology demonstration lists.
pub const LEXEME_WORD: &str = "Зыкин";

/// Run the morphology demonstration.
pub fn run_morph(args: &MorphArgs) -> Result<()> {
    let analyzer = load_analyzer(args.paradigms.as_deref())?;
    let report = MorphReport {
        certificate: build_certificate(&analyzer)?,
        lexeme: build_lexeme(&analyzer, LEXEME_WORD)?,
    };
    output_result(&report, &args.common)
}

fn load_analyzer(paradigms: Option<&Path>) -> Result<ParadigmAnalyzer> {
    match paradigms {
        Some(path) => {
            let set = ParadigmSet::load_from_file(path)
                .with_context(|| format!("loading paradigms from {}", path.display()))?;
            info!("loaded {} paradigm(s) from {}", set.len(), path.display());
            Ok(ParadigmAnalyzer::new(set))
        }
        None => ParadigmAnalyzer::russian(),
    }
}

/// A masculine singular noun tag in `case_value`.
pub fn masculine_noun(case_value: &str) -> Result<Tag> {
    Tag::builder()
        .post(post::NOUN)
        .gender(gender::MASCULINE)
        .number(number::SINGULAR)
        .case(case_value)
        .build()
}

/// Fill the certificate template with the two demonstration names.
pub fn build_certificate<A>(analyzer: &A) -> Result<CertificateReport>
where
    A: MorphAnalyzer + ?Sized,
{
    let inflector = FullNameInflector::new();
    let recipient = FullName::new("Марковцом", "Дмитрий", "Олегович");
    let issuer = FullName::new("Зыкин", "Даниил", "Батькович");

    let recipient_parsed = inflector.parse(analyzer, &recipient)?;
    let issuer_parsed = inflector.parse(analyzer, &issuer)?;

    let issued_by = inflector
        .inflect_parsed(analyzer, &issuer_parsed, &masculine_noun(case::INSTRUMENTAL)?)
        .context("inflecting the issuer name")?;
    let issued_to = inflector
        .inflect_parsed(analyzer, &recipient_parsed, &masculine_noun(case::DATIVE)?)
        .context("inflecting the recipient name")?;
    let subject = inflector
        .inflect_parsed(analyzer, &recipient_parsed, &masculine_noun(case::VOCATIVE)?)
        .context("inflecting the subject name")?;

    Ok(CertificateReport {
        issued_by,
        issued_to,
        subject,
    })
}

/// List every form of `word`, read with its second analysis when it has
/// more than one.
pub fn build_lexeme<A>(analyzer: &A, word: &str) -> Result<LexemeReport>
where
    A: MorphAnalyzer + ?Sized,
{
    let parsed = analyzer.parse(&[word])?;
    let tag = parsed
        .first()
        .and_then(|info| info.tags.get(1).or_else(|| info.tags.first()))
        .ok_or_else(|| PrimerError::no_matching_tag(format!("'{word}' has no analyses")))?;

    let forms = analyzer
        .lexeme(word, tag)?
        .into_iter()
        .map(|(text, tag)| LexemeForm {
            text,
            tag: tag.to_string(),
        })
        .collect();

    Ok(LexemeReport {
        word: word.to_string(),
        tag: tag.to_string(),
        forms,
    })
}

/// Run the taxi fare demonstration.
pub fn run_taxi(args: &TaxiArgs) -> Result<()> {
    let config = args.resolve_config()?;
    let context = MLContext::new(config.seed);

    let train = taxi::load_trips(&config.train_data_path).with_context(|| {
        format!(
            "loading training data from {}",
            config.train_data_path.display()
        )
    })?;
    info!("loaded {} training rows", train.num_rows());

    let model = FareModel::train(&context, config.trainer.clone(), &train)
        .context("training the fare model")?;

    let test = taxi::load_trips(&config.test_data_path).with_context(|| {
        format!("loading test data from {}", config.test_data_path.display())
    })?;
    let scored = model.transform(&test)?;
    let metrics = evaluate_regression(&scored, "Label", SCORE_COLUMN)?;
    info!(
        "evaluated on {} rows: R^2 {:.4}, RMSE {:.4}",
        test.num_rows(),
        metrics.r_squared,
        metrics.root_mean_squared_error
    );

    if let Some(path) = &config.model_path {
        model
            .regressor()
            .save(path)
            .with_context(|| format!("saving the model to {}", path.display()))?;
        info!("saved model to {}", path.display());
    }

    let engine: PredictionEngine<TaxiTrip, TaxiTripFarePrediction> =
        PredictionEngine::new(Arc::new(model));
    let prediction = engine.predict(&taxi::sample_trip())?;

    let report = TaxiReport {
        training_rows: train.num_rows(),
        evaluation: MetricsReport {
            rows: test.num_rows(),
            metrics,
        },
        prediction: PredictionReport {
            predicted_fare: prediction.fare_amount,
            actual_fare: taxi::ACTUAL_SAMPLE_FARE,
        },
        model_path: config.model_path.map(|p| p.display().to_string()),
    };
    output_result(&report, &args.common)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_certificate_names() {
        let analyzer = ParadigmAnalyzer::russian().unwrap();
        let certificate = build_certificate(&analyzer).unwrap();
        assert_eq!(certificate.issued_by, "Зыкиным Даниилом Батьковичем");
        assert_eq!(certificate.issued_to, "Марковцу Дмитрию Олеговичу");
        assert_eq!(certificate.subject, "Марковец Дмитрий Олегович");
    }

    #[test]
    fn test_lexeme_listing() {
        let analyzer = ParadigmAnalyzer::russian().unwrap();
        let lexeme = build_lexeme(&analyzer, LEXEME_WORD).unwrap();
        assert_eq!(lexeme.forms.len(), 7);
        assert!(build_lexeme(&analyzer, "Любовь").is_err());
    }

    #[test]
    fn test_missing_paradigm_file_has_context() {
        let args =
            MorphArgs::try_parse_from(["primer-morph", "--paradigms", "/nonexistent/p.json"])
                .unwrap();
        let error = run_morph(&args).unwrap_err();
        assert!(error.to_string().contains("loading paradigms from /nonexistent/p.json"));
    }

    #[test]
    fn test_missing_training_data_has_context() {
        let args = TaxiArgs::try_parse_from([
            "primer-taxi",
            "--train",
            "/nonexistent/train.csv",
        ])
        .unwrap();
        let error = run_taxi(&args).unwrap_err();
        assert!(error.to_string().contains("loading training data"));
    }
}
