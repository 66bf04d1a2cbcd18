use crate::engine::lexicon::{SalutationTier, SALUTATION_TIERS};
use crate::engine::transcript::Transcript;
use crate::engine::CriterionResult;
use crate::rubric::{Criterion, SalutationConfig};
use serde_json::json;

/// Scans only the opening window for the best-matching greeting tier.
pub(crate) fn score(transcript: &Transcript, config: &SalutationConfig) -> CriterionResult {
    let window = transcript.opening_window(config.window_words);

    let matched = SALUTATION_TIERS
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|pattern| pattern.is_match(window)));

    let (score, label) = match matched {
        Some((tier, _)) => {
            let ratio = match tier {
                SalutationTier::Excellent => config.excellent_ratio,
                SalutationTier::Good => config.good_ratio,
                SalutationTier::Basic => config.basic_ratio,
            };
            (ratio * f64::from(config.weight), tier.label())
        }
        None => (0.0, "Missing"),
    };

    CriterionResult::new(
        Criterion::Salutation,
        score,
        config.weight,
        json!({
            "label": label,
            "window_words": config.window_words,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SalutationConfig {
        SalutationConfig::default()
    }

    #[test]
    fn good_greeting_scores_its_tier() {
        let transcript = Transcript::new("Hello everyone, myself Muskan.");
        let result = score(&transcript, &config());
        assert_eq!(result.score, 4.0);
        assert_eq!(result.details["label"], "Good");
    }

    #[test]
    fn excellent_tier_beats_lower_tiers() {
        let transcript = Transcript::new("Hello everyone, I am excited to introduce myself.");
        let result = score(&transcript, &config());
        assert_eq!(result.score, 5.0);
        assert_eq!(result.details["label"], "Excellent");
    }

    #[test]
    fn bare_hi_is_basic() {
        let transcript = Transcript::new("Hi, my name is Rahul.");
        let result = score(&transcript, &config());
        assert_eq!(result.score, 2.0);
        assert_eq!(result.details["label"], "Basic");
    }

    #[test]
    fn no_greeting_is_missing() {
        let transcript = Transcript::new("My name is Rahul and I study in class 10.");
        let result = score(&transcript, &config());
        assert_eq!(result.score, 0.0);
        assert_eq!(result.details["label"], "Missing");
    }

    #[test]
    fn greeting_outside_opening_window_does_not_count() {
        let mut text = "word ".repeat(45);
        text.push_str("hello everyone");
        let result = score(&Transcript::new(&text), &config());
        assert_eq!(result.score, 0.0);
        assert_eq!(result.details["label"], "Missing");
    }

    #[test]
    fn empty_transcript_is_missing() {
        let result = score(&Transcript::new(""), &config());
        assert_eq!(result.score, 0.0);
        assert_eq!(result.details["label"], "Missing");
    }
}
