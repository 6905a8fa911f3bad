use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

use verdict_lexer::PhraseReport;
use verdict_protocol::{LabeledPhrase, ScoredWord};
use verdict_scorer::Agreement;

/// Loads records from a JSON array, a JSON object of records, or JSON Lines.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let input = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    if input.trim_start().starts_with('[') || input.trim_start().starts_with('{') {
        if let Ok(value) = serde_json::from_str::<Value>(&input) {
            let items = match value {
                Value::Array(items) => items,
                // A keyed collection such as {"0": {...}, "1": {...}}; `{}` is one default record
                Value::Object(map) if !map.is_empty() && map.values().all(Value::is_object) => {
                    map.into_iter().map(|(_, item)| item).collect()
                }
                // A single record, e.g. one-line JSON Lines
                record @ Value::Object(_) => vec![record],
                other => bail!("{}: expected records, found {}", path.display(), other),
            };
            return items
                .into_iter()
                .enumerate()
                .map(|(i, item)| {
                    serde_json::from_value(item).with_context(|| format!("{}: record {}", path.display(), i))
                })
                .collect();
        }
    }

    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line).with_context(|| format!("{}:{}: invalid JSON line", path.display(), n + 1))
        })
        .collect()
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

#[derive(Debug, Serialize)]
pub struct ScoredOutput {
    pub index: u64,
    pub original_post: String,
    pub generated_summary: String,
    pub textual_feedback: String,
    pub word_score_list: Vec<ScoredWord>,
    pub diagnostics: Vec<PhraseReport>,
}

#[derive(Debug, Serialize)]
pub struct Failure {
    pub index: u64,
    pub reason: String,
}

/// A raw model response to be mined for feedback and scores.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ResponseRecord {
    pub index: Option<u64>,
    pub generated_summary: Option<String>,
    pub model_response: String,
    /// Reference scores, if already known.
    pub word_score_list: Option<Vec<ScoredWord>>,
    /// Labeled phrases used to compile a reference when none is given.
    pub phrases: Vec<LabeledPhrase>,
}

#[derive(Debug, Serialize)]
pub struct ExtractedOutput {
    pub index: u64,
    pub textual_feedback: String,
    pub word_score_list: Vec<(String, i64)>,
    pub agreement: Option<Agreement>,
}
