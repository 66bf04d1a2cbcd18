use crate::engine::transcript::Transcript;
use crate::engine::{round2, CriterionResult};
use crate::rubric::{classify, Criterion, VocabularyConfig};
use serde_json::json;
use std::collections::HashSet;

/// Type-token ratio banded into rubric tiers.
pub(crate) fn score(transcript: &Transcript, config: &VocabularyConfig) -> CriterionResult {
    let total = transcript.word_count();
    if total == 0 {
        return CriterionResult::new(
            Criterion::Vocabulary,
            0.0,
            config.weight,
            json!({ "error": "empty transcript" }),
        );
    }

    let distinct = transcript
        .words()
        .iter()
        .map(String::as_str)
        .collect::<HashSet<_>>()
        .len();
    let ttr = distinct as f64 / total as f64;
    let ratio = classify(&config.bands, ttr, config.floor_ratio);

    CriterionResult::new(
        Criterion::Vocabulary,
        ratio * f64::from(config.weight),
        config.weight,
        json!({
            "ttr": round2(ttr),
            "distinct_words": distinct,
            "total_words": total,
        }),
    )
}
