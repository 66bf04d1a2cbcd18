use crate::engine::transcript::Transcript;
use crate::engine::{round2, CriterionResult};
use crate::rubric::{Criterion, SpeechRateConfig};
use serde_json::json;

/// Words-per-minute banding. Boundaries are lower-inclusive and
/// upper-exclusive, so a boundary value classifies exactly once. A missing
/// or zero duration zeroes the criterion instead of guessing a rate.
pub(crate) fn score(
    transcript: &Transcript,
    config: &SpeechRateConfig,
    duration_minutes: Option<f64>,
) -> CriterionResult {
    let weight = f64::from(config.weight);

    if transcript.is_empty() {
        return CriterionResult::new(
            Criterion::SpeechRate,
            0.0,
            config.weight,
            json!({ "error": "empty transcript" }),
        );
    }

    let duration = match duration_minutes {
        Some(minutes) if minutes > 0.0 => minutes,
        _ => {
            return CriterionResult::new(
                Criterion::SpeechRate,
                0.0,
                config.weight,
                json!({ "error": "duration unavailable" }),
            );
        }
    };

    let wpm = transcript.word_count() as f64 / duration;

    let (ratio, band) = if wpm >= config.ideal_min_wpm && wpm < config.ideal_max_wpm {
        (1.0, "ideal")
    } else if (wpm >= config.slow_min_wpm && wpm < config.ideal_min_wpm)
        || (wpm >= config.ideal_max_wpm && wpm < config.fast_max_wpm)
    {
        (config.mid_ratio, "acceptable")
    } else {
        (config.low_ratio, "poor")
    };

    CriterionResult::new(
        Criterion::SpeechRate,
        ratio * weight,
        config.weight,
        json!({
            "wpm": round2(wpm),
            "word_count": transcript.word_count(),
            "duration_minutes": duration,
            "band": band,
        }),
    )
}
