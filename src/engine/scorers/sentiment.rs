use crate::engine::analyzers::SentimentEngine;
use crate::engine::lexicon::{NEGATIVE_WORDS, POSITIVE_WORDS};
use crate::engine::transcript::Transcript;
use crate::engine::CriterionResult;
use crate::rubric::{classify, Criterion, SentimentConfig};
use serde_json::json;
use tracing::warn;

/// Two-path sentiment criterion. The precise lexicon yields a compound
/// polarity in [-1, 1]; the heuristic maps a positive-word ratio onto the
/// same scale so both paths share the rubric's band table.
pub(crate) fn score(
    transcript: &Transcript,
    config: &SentimentConfig,
    engine: &SentimentEngine,
) -> CriterionResult {
    if transcript.is_empty() {
        return CriterionResult::new(
            Criterion::Sentiment,
            0.0,
            config.weight,
            json!({ "error": "empty transcript" }),
        );
    }

    let (compound, engine_used, degraded) = match engine {
        SentimentEngine::Precise(lexicon) => match lexicon.compound(transcript.words()) {
            Ok(compound) => (compound, "precise", false),
            Err(fault) => {
                warn!(error = %fault, "precise sentiment engine faulted, substituting heuristic");
                (heuristic_compound(transcript, config), "heuristic", true)
            }
        },
        SentimentEngine::Heuristic => (heuristic_compound(transcript, config), "heuristic", false),
    };

    let ratio = classify(&config.bands, compound, config.floor_ratio);

    CriterionResult::new(
        Criterion::Sentiment,
        ratio * f64::from(config.weight),
        config.weight,
        json!({
            "compound": round3(compound),
            "engine": engine_used,
            "degraded": degraded,
        }),
    )
}

/// Occurrences of the built-in positive and negative word lists relative
/// to total words, scaled onto the compound range.
fn heuristic_compound(transcript: &Transcript, config: &SentimentConfig) -> f64 {
    let positive = count_hits(transcript, POSITIVE_WORDS);
    let negative = count_hits(transcript, NEGATIVE_WORDS);
    let balance = (positive as f64 - negative as f64) / transcript.word_count() as f64;
    (balance * config.heuristic_scale).clamp(-1.0, 1.0)
}

fn count_hits(transcript: &Transcript, lexicon: &[&str]) -> usize {
    transcript
        .words()
        .iter()
        .filter(|word| lexicon.contains(&word.as_str()))
        .count()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::analyzers::PolarityLexicon;

    #[test]
    fn heuristic_rewards_positive_language() {
        let transcript =
            Transcript::new("I am excited and happy to be here and I enjoy this a lot");
        let result = score(&transcript, &SentimentConfig::default(), &SentimentEngine::Heuristic);
        // 3 positive hits over 14 words, scaled by 10: compound > 0.5.
        assert_eq!(result.score, 15.0);
        assert_eq!(result.details["engine"], "heuristic");
        assert_eq!(result.details["degraded"], false);
    }

    #[test]
    fn heuristic_penalizes_negative_language() {
        let transcript = Transcript::new("this is bad and boring and i hate it honestly");
        let result = score(&transcript, &SentimentConfig::default(), &SentimentEngine::Heuristic);
        // 3 negative hits over 10 words: compound -1.0, bottom band.
        assert_eq!(result.score, 3.0);
    }

    #[test]
    fn neutral_text_lands_in_the_neutral_band() {
        let transcript = Transcript::new("my name is rahul and i study in class ten");
        let result = score(&transcript, &SentimentConfig::default(), &SentimentEngine::Heuristic);
        // compound 0.0 sits in the [-0.1, 0.1) band.
        assert_eq!(result.score, 6.0);
    }

    #[test]
    fn precise_lexicon_drives_the_band() {
        let lexicon =
            PolarityLexicon::from_str("excited\t2.2\ngreat\t3.1\nhappy\t2.7\n").expect("parses");
        let engine = SentimentEngine::Precise(lexicon);
        let transcript = Transcript::new("I am excited and happy, this is great");
        let result = score(&transcript, &SentimentConfig::default(), &engine);

        assert_eq!(result.details["engine"], "precise");
        // Valence sum 8.0: compound 8 / sqrt(64 + 15) = 0.9, top band.
        assert_eq!(result.score, 15.0);
    }

    #[test]
    fn precise_fault_degrades_to_heuristic() {
        let lexicon = PolarityLexicon::from_str("# empty\n").expect("parses");
        let engine = SentimentEngine::Precise(lexicon);
        let transcript = Transcript::new("I am excited to be here");
        let result = score(&transcript, &SentimentConfig::default(), &engine);

        assert_eq!(result.details["engine"], "heuristic");
        assert_eq!(result.details["degraded"], true);
    }

    #[test]
    fn empty_transcript_reports_error() {
        let result = score(
            &Transcript::new(""),
            &SentimentConfig::default(),
            &SentimentEngine::Heuristic,
        );
        assert_eq!(result.score, 0.0);
        assert_eq!(result.details["error"], "empty transcript");
    }
}
