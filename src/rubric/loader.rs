//! Loads the tabular rubric source. Each row names a criterion, its weight,
//! and optionally a JSON object of criterion-specific parameter overrides
//! merged over the built-in defaults.

use super::{Criterion, RubricConfig, RubricError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub fn from_path<P: AsRef<Path>>(path: P) -> Result<RubricConfig, RubricError> {
    let file = File::open(path)?;
    from_reader(file)
}

pub fn from_reader<R: Read>(reader: R) -> Result<RubricConfig, RubricError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut rubric = RubricConfig::default();
    let mut seen: HashSet<Criterion> = HashSet::new();

    for record in csv_reader.deserialize::<RubricRow>() {
        let row = record?;
        let criterion = Criterion::from_key(&row.criterion)
            .ok_or_else(|| RubricError::UnknownCriterion(row.criterion.clone()))?;
        if !seen.insert(criterion) {
            return Err(RubricError::DuplicateCriterion(row.criterion.clone()));
        }

        if let Some(params) = row.params.as_deref() {
            apply_params(&mut rubric, criterion, params)?;
        }
        // The weight column wins over any weight inside params.
        rubric.set_weight(criterion, row.weight);
    }

    rubric.validate()?;
    Ok(rubric)
}

#[derive(Debug, Deserialize)]
struct RubricRow {
    #[serde(rename = "criterion")]
    criterion: String,
    #[serde(rename = "weight")]
    weight: u32,
    #[serde(rename = "params", default, deserialize_with = "empty_string_as_none")]
    params: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn apply_params(
    rubric: &mut RubricConfig,
    criterion: Criterion,
    params: &str,
) -> Result<(), RubricError> {
    match criterion {
        Criterion::Salutation => merge(&mut rubric.salutation, "salutation", params),
        Criterion::KeywordPresence => merge(&mut rubric.keywords, "keyword_presence", params),
        Criterion::Flow => merge(&mut rubric.flow, "flow", params),
        Criterion::SpeechRate => merge(&mut rubric.speech_rate, "speech_rate", params),
        Criterion::Grammar => merge(&mut rubric.grammar, "grammar", params),
        Criterion::Vocabulary => merge(&mut rubric.vocabulary, "vocabulary", params),
        Criterion::FillerRate => merge(&mut rubric.filler, "filler_rate", params),
        Criterion::Sentiment => merge(&mut rubric.sentiment, "sentiment", params),
    }
}

/// Overlays the keys of a JSON params object onto a config section,
/// leaving unnamed fields at their defaults.
fn merge<T>(section: &mut T, criterion: &'static str, params: &str) -> Result<(), RubricError>
where
    T: Serialize + DeserializeOwned,
{
    let overrides: Value =
        serde_json::from_str(params).map_err(|source| RubricError::Params { criterion, source })?;
    let Value::Object(overrides) = overrides else {
        return Err(RubricError::InvalidValue {
            field: format!("{criterion}.params"),
            reason: "params must be a JSON object".to_string(),
        });
    };

    let mut current = serde_json::to_value(&*section)
        .map_err(|source| RubricError::Params { criterion, source })?;
    if let Value::Object(map) = &mut current {
        for (key, value) in overrides {
            map.insert(key, value);
        }
    }
    *section =
        serde_json::from_value(current).map_err(|source| RubricError::Params { criterion, source })?;
    Ok(())
}
