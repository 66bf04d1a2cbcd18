use crate::engine::transcript::Transcript;
use crate::engine::{round2, CriterionResult};
use crate::rubric::{classify, Criterion, FillerConfig};
use serde_json::{json, Map, Value};

/// Counts filler phrases as a fraction of total words. Multi-word phrases
/// are matched first and consume their span, so "you know" never also
/// counts as a stray "know".
pub(crate) fn score(transcript: &Transcript, config: &FillerConfig) -> CriterionResult {
    let total_words = transcript.word_count();
    if total_words == 0 {
        return CriterionResult::new(
            Criterion::FillerRate,
            0.0,
            config.weight,
            json!({ "error": "empty transcript" }),
        );
    }

    // Longest phrases first; ties keep the configured order.
    let mut phrases: Vec<Vec<&str>> = config
        .phrases
        .iter()
        .map(|phrase| phrase.split_whitespace().collect::<Vec<_>>())
        .filter(|tokens| !tokens.is_empty())
        .collect();
    phrases.sort_by(|a, b| b.len().cmp(&a.len()));

    let words = transcript.words();
    let mut consumed = vec![false; words.len()];
    let mut filler_count = 0usize;
    let mut counts: Map<String, Value> = Map::new();

    for phrase in &phrases {
        let len = phrase.len();
        if len > words.len() {
            continue;
        }
        let mut start = 0;
        while start + len <= words.len() {
            let window_free = !consumed[start..start + len].iter().any(|used| *used);
            let window_matches = window_free
                && words[start..start + len]
                    .iter()
                    .zip(phrase.iter())
                    .all(|(word, token)| word == token);
            if window_matches {
                for slot in &mut consumed[start..start + len] {
                    *slot = true;
                }
                filler_count += 1;
                let key = phrase.join(" ");
                let entry = counts.entry(key).or_insert_with(|| json!(0));
                if let Some(current) = entry.as_u64() {
                    *entry = json!(current + 1);
                }
                start += len;
            } else {
                start += 1;
            }
        }
    }

    let filler_rate = filler_count as f64 / total_words as f64 * 100.0;
    let ratio = classify(&config.bands, filler_rate, config.clean_ratio);

    CriterionResult::new(
        Criterion::FillerRate,
        ratio * f64::from(config.weight),
        config.weight,
        json!({
            "filler_rate": round2(filler_rate),
            "filler_count": filler_count,
            "filler_counts": counts,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_speech_keeps_full_points() {
        let transcript = Transcript::new(
            "My name is Rahul and I study in class ten at a public school near my home, \
             where I spend most afternoons playing chess with friends and reading books.",
        );
        let result = score(&transcript, &FillerConfig::default());
        assert_eq!(result.details["filler_count"], 0);
        assert_eq!(result.score, 15.0);
    }

    #[test]
    fn multi_word_phrases_consume_their_span() {
        let transcript = Transcript::new("um you know i like it you know");
        let result = score(&transcript, &FillerConfig::default());
        let counts = result.details["filler_counts"]
            .as_object()
            .expect("counts object");
        assert_eq!(counts["you know"], 2);
        assert_eq!(counts["um"], 1);
        assert_eq!(counts["like"], 1);
        // "know" alone is not a filler and must not be recounted.
        assert_eq!(result.details["filler_count"], 4);
    }

    #[test]
    fn heavy_filler_rate_drops_to_the_bottom_band() {
        let transcript = Transcript::new("um uh like so um uh like so um uh");
        let result = score(&transcript, &FillerConfig::default());
        // Every word is a filler: rate 100%, bottom band.
        assert_eq!(result.details["filler_rate"], 100.0);
        assert_eq!(result.score, 3.0);
    }

    #[test]
    fn rate_bands_are_lower_inclusive() {
        // 1 filler in 20 words = 5%: inside the [3, 6) band.
        let mut text = String::from("um ");
        for i in 0..19 {
            text.push_str(&format!("w{i} "));
        }
        let result = score(&Transcript::new(&text), &FillerConfig::default());
        assert_eq!(result.details["filler_rate"], 5.0);
        assert_eq!(result.score, 12.0);
    }

    #[test]
    fn empty_transcript_reports_error() {
        let result = score(&Transcript::new(""), &FillerConfig::default());
        assert_eq!(result.score, 0.0);
        assert_eq!(result.details["error"], "empty transcript");
    }
}
