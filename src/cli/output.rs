//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{CommonArgs, OutputFormat};
use crate::error::Result;
use crate::ml::evaluation::RegressionMetrics;

/// Reports that have a human-readable rendering.
pub trait HumanReadable {
    /// Render the report as plain text lines.
    fn render_human(&self) -> String;
}

/// The filled certificate template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateReport {
    /// Issuer name, instrumental case.
    pub issued_by: String,
    /// Recipient name, dative case.
    pub issued_to: String,
    /// Subject name, vocative case.
    pub subject: String,
}

impl HumanReadable for CertificateReport {
    fn render_human(&self) -> String {
        format!(
            "\n                         СПРАВКА\n           \
             Выдана кем - {}\n           \
             Выдана кому - {}\n        \
             Причина в том, что {} не нуждается\n        \
             более в получении никаких задач.",
            self.issued_by, self.issued_to, self.subject
        )
    }
}

/// One form of a lexeme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexemeForm {
    pub text: String,
    pub tag: String,
}

/// Every form of a word read with one analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexemeReport {
    pub word: String,
    pub tag: String,
    pub forms: Vec<LexemeForm>,
}

impl HumanReadable for LexemeReport {
    fn render_human(&self) -> String {
        self.forms
            .iter()
            .map(|form| format!("{} : {}", form.text, form.tag))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Evaluation of a model on a test set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    pub rows: usize,
    #[serde(flatten)]
    pub metrics: RegressionMetrics,
}

impl HumanReadable for MetricsReport {
    fn render_human(&self) -> String {
        [
            String::new(),
            "*************************************************".to_string(),
            "*       Model quality metrics evaluation         ".to_string(),
            "*------------------------------------------------".to_string(),
            format!(
                "*       RSquared Score:      {}",
                format_decimal(self.metrics.r_squared, 2)
            ),
            format!(
                "*       Root Mean Squared Error:      {}",
                format_decimal(self.metrics.root_mean_squared_error, 2)
            ),
        ]
        .join("\n")
    }
}

/// Prediction for the sample trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionReport {
    pub predicted_fare: f32,
    pub actual_fare: f32,
}

impl HumanReadable for PredictionReport {
    fn render_human(&self) -> String {
        let rule = "*".repeat(70);
        format!(
            "{}\nPredicted fare: {}, actual fare: {}\n{}",
            rule,
            format_decimal(self.predicted_fare as f64, 4),
            format_decimal(self.actual_fare as f64, 4),
            rule
        )
    }
}

/// Everything the morphology demonstration prints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MorphReport {
    pub certificate: CertificateReport,
    pub lexeme: LexemeReport,
}

impl HumanReadable for MorphReport {
    fn render_human(&self) -> String {
        format!(
            "{}\n{}",
            self.certificate.render_human(),
            self.lexeme.render_human()
        )
    }
}

/// Everything the fare demonstration prints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxiReport {
    pub training_rows: usize,
    pub evaluation: MetricsReport,
    pub prediction: PredictionReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,
}

impl HumanReadable for TaxiReport {
    fn render_human(&self) -> String {
        let mut text = format!(
            "{}\n{}",
            self.evaluation.render_human(),
            self.prediction.render_human()
        );
        if let Some(path) = &self.model_path {
            text.push_str(&format!("\nModel saved to {path}"));
        }
        text
    }
}

/// Output a result in the specified format.
pub fn output_result<T>(result: &T, args: &CommonArgs) -> Result<()>
where
    T: Serialize + HumanReadable,
{
    match args.output_format {
        OutputFormat::Human => output_human(result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: HumanReadable>(result: &T, args: &CommonArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{}", result.render_human());
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &CommonArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format with at most `places` decimals, dropping trailing zeros.
pub fn format_decimal(value: f64, places: usize) -> String {
    let formatted = format!("{value:.places$}");
    if !formatted.contains('.') {
        return formatted;
    }
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}
