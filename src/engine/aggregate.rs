//! Combines the eight criterion results into the composite report.

use super::transcript::Transcript;
use super::{CriterionResult, EvaluationReport};
use crate::rubric::RubricError;
use tracing::warn;

/// Scorers emit points on the 0..=weight scale, so summation yields 0..100
/// directly. Weight-sum violations are rejected here as well as at load
/// time; out-of-range scorer output is clamped per criterion and surfaced
/// as a warning, never silently hidden.
pub(crate) fn combine(
    transcript: &Transcript,
    criteria: Vec<CriterionResult>,
) -> Result<EvaluationReport, RubricError> {
    let total_weight: u32 = criteria.iter().map(|result| result.weight).sum();
    if total_weight != 100 {
        return Err(RubricError::WeightSum {
            actual: total_weight,
        });
    }

    let mut warnings = Vec::new();
    let mut total = 0.0;
    for result in &criteria {
        let max = f64::from(result.weight);
        if result.score < 0.0 || result.score > max {
            warn!(
                criterion = result.label,
                score = result.score,
                weight = result.weight,
                "criterion score out of range, clamping"
            );
            warnings.push(format!(
                "{} scored {:.2} outside 0..={} and was clamped",
                result.label, result.score, result.weight
            ));
        }
        total += result.score.clamp(0.0, max);
    }

    Ok(EvaluationReport {
        overall_score: round1(total).clamp(0.0, 100.0),
        word_count: transcript.word_count(),
        sentence_count: transcript.sentence_count(),
        criteria,
        warnings,
    })
}

/// Round half away from zero to one decimal place; `f64::round` already
/// carries that tie-breaking rule.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubric::Criterion;
    use serde_json::json;

    fn result(criterion: Criterion, score: f64, weight: u32) -> CriterionResult {
        CriterionResult::new(criterion, score, weight, json!({}))
    }

    fn full_set(scores: [f64; 8]) -> Vec<CriterionResult> {
        let weights = [5, 30, 5, 10, 10, 10, 15, 15];
        Criterion::ordered()
            .iter()
            .zip(scores.iter().zip(weights.iter()))
            .map(|(criterion, (score, weight))| result(*criterion, *score, *weight))
            .collect()
    }

    #[test]
    fn sums_weighted_scores_to_composite() {
        let transcript = Transcript::new("hello there");
        let report = combine(
            &transcript,
            full_set([5.0, 30.0, 5.0, 10.0, 10.0, 10.0, 15.0, 15.0]),
        )
        .expect("weights sum to 100");
        assert_eq!(report.overall_score, 100.0);
        assert!(report.warnings.is_empty());
        assert_eq!(report.word_count, 2);
    }

    #[test]
    fn rejects_weight_sum_violations() {
        let transcript = Transcript::new("hello");
        let mut criteria = full_set([0.0; 8]);
        criteria[0].weight = 10;
        let err = combine(&transcript, criteria).expect_err("sum 105 must fail");
        assert!(matches!(err, RubricError::WeightSum { actual: 105 }));
    }

    #[test]
    fn clamps_and_flags_out_of_range_scores() {
        let transcript = Transcript::new("hello");
        let mut criteria = full_set([2.0, 10.0, 2.0, 5.0, 5.0, 5.0, 7.0, 7.0]);
        criteria[1].score = 35.0; // above its weight of 30
        let report = combine(&transcript, criteria).expect("valid weights");
        assert_eq!(report.warnings.len(), 1);
        // 2 + 30 + 2 + 5 + 5 + 5 + 7 + 7
        assert_eq!(report.overall_score, 63.0);
    }

    #[test]
    fn rounds_half_away_from_zero_to_one_decimal() {
        let transcript = Transcript::new("hello");
        let report = combine(
            &transcript,
            full_set([2.25, 10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
        )
        .expect("valid weights");
        assert_eq!(report.overall_score, 12.3);
    }

    #[test]
    fn composite_stays_within_bounds() {
        let transcript = Transcript::new("");
        let report = combine(&transcript, full_set([0.0; 8])).expect("valid weights");
        assert_eq!(report.overall_score, 0.0);
        assert_eq!(report.word_count, 0);
        assert_eq!(report.sentence_count, 0);
    }
}
