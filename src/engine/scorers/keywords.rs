use crate::engine::lexicon::CompiledCategory;
use crate::engine::transcript::Transcript;
use crate::engine::{round2, CriterionResult};
use crate::rubric::{Criterion, KeywordConfig};
use serde_json::json;

/// A category is satisfied by any of its phrases appearing anywhere in the
/// transcript. Mandatory and optional categories carry separate point
/// blocks, summed and capped at the criterion weight.
pub(crate) fn score(
    transcript: &Transcript,
    config: &KeywordConfig,
    categories: &[CompiledCategory],
) -> CriterionResult {
    let lowered = transcript.lowered();

    let mut found_must = Vec::new();
    let mut found_optional = Vec::new();
    let mut missed = Vec::new();
    let mut must_total = 0usize;
    let mut optional_total = 0usize;

    for category in categories {
        if category.must_have {
            must_total += 1;
        } else {
            optional_total += 1;
        }
        if category.matches(lowered) {
            if category.must_have {
                found_must.push(category.name.as_str());
            } else {
                found_optional.push(category.name.as_str());
            }
        } else {
            missed.push(category.name.as_str());
        }
    }

    let must_score = if must_total > 0 {
        found_must.len() as f64 / must_total as f64 * config.must_points
    } else {
        0.0
    };
    let optional_score = if optional_total > 0 {
        found_optional.len() as f64 / optional_total as f64 * config.optional_points
    } else {
        0.0
    };

    let raw_score = must_score + optional_score;
    let score = raw_score.min(f64::from(config.weight));

    CriterionResult::new(
        Criterion::KeywordPresence,
        score,
        config.weight,
        json!({
            "found_must": found_must,
            "found_optional": found_optional,
            "missed": missed,
            "must_total": must_total,
            "optional_total": optional_total,
            "raw_score": round2(raw_score),
        }),
    )
}
