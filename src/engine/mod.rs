//! The evaluation engine: eight independent criterion scorers over an
//! immutable transcript, combined into a weighted 0-100 composite.

pub mod analyzers;
pub mod lexicon;
pub mod transcript;

mod aggregate;
mod scorers;

use crate::rubric::{Criterion, RubricConfig, RubricError};
use analyzers::Analyzers;
use lexicon::CompiledCategory;
use serde::{Deserialize, Serialize};
use transcript::Transcript;

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationRequest {
    pub transcript: String,
    /// Spoken duration. Absent duration zeroes the speech-rate criterion
    /// rather than guessing silently.
    #[serde(default)]
    pub duration_minutes: Option<f64>,
}

/// One scorer's output: points already expressed on the 0..=weight scale,
/// plus diagnostic detail for feedback rendering.
#[derive(Debug, Clone, Serialize)]
pub struct CriterionResult {
    pub criterion: Criterion,
    pub label: &'static str,
    pub score: f64,
    pub weight: u32,
    pub details: serde_json::Value,
}

impl CriterionResult {
    pub(crate) fn new(
        criterion: Criterion,
        score: f64,
        weight: u32,
        details: serde_json::Value,
    ) -> Self {
        Self {
            criterion,
            label: criterion.label(),
            score,
            weight,
            details,
        }
    }
}

/// The structured evaluation report returned to callers, with criteria in
/// rubric declaration order.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub overall_score: f64,
    pub word_count: usize,
    pub sentence_count: usize,
    pub criteria: Vec<CriterionResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl EvaluationReport {
    pub fn criterion(&self, criterion: Criterion) -> Option<&CriterionResult> {
        self.criteria
            .iter()
            .find(|result| result.criterion == criterion)
    }
}

/// Stateless evaluator applying the rubric configuration to transcripts.
/// Construction validates the rubric and compiles its keyword patterns, so
/// scoring itself never meets an invalid configuration.
#[derive(Debug)]
pub struct EvaluationEngine {
    rubric: RubricConfig,
    categories: Vec<CompiledCategory>,
    analyzers: Analyzers,
}

impl EvaluationEngine {
    pub fn new(rubric: RubricConfig, analyzers: Analyzers) -> Result<Self, RubricError> {
        rubric.validate()?;
        let categories = lexicon::compile_categories(&rubric.keywords.categories)?;
        Ok(Self {
            rubric,
            categories,
            analyzers,
        })
    }

    pub fn rubric(&self) -> &RubricConfig {
        &self.rubric
    }

    pub fn evaluate(
        &self,
        transcript_text: &str,
        duration_minutes: Option<f64>,
    ) -> Result<EvaluationReport, RubricError> {
        let transcript = Transcript::new(transcript_text);

        // Scorers are independent; this sequence only fixes display order.
        let results = vec![
            scorers::salutation::score(&transcript, &self.rubric.salutation),
            scorers::keywords::score(&transcript, &self.rubric.keywords, &self.categories),
            scorers::flow::score(&transcript, &self.rubric.flow, &self.categories),
            scorers::speech_rate::score(&transcript, &self.rubric.speech_rate, duration_minutes),
            scorers::grammar::score(&transcript, &self.rubric.grammar, &self.analyzers.grammar),
            scorers::vocabulary::score(&transcript, &self.rubric.vocabulary),
            scorers::filler::score(&transcript, &self.rubric.filler),
            scorers::sentiment::score(&transcript, &self.rubric.sentiment, &self.analyzers.sentiment),
        ];

        aggregate::combine(&transcript, results)
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
