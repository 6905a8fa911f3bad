//! Recovery of feedback and word scores from raw reward-model responses.
//!
//! Responses are supposed to be a JSON object with `textual_feedback` and
//! `word_score_list`, but models drift: the list may be a string of tuples,
//! a list of objects with odd key names, or the whole response may not be
//! JSON at all. Each extractor degrades step by step and never fails.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

static FEEDBACK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""textual_feedback"\s*:\s*"([^"]*)""#).unwrap());

static TUPLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\(["']?([^"',]+)["']?,\s*(-?\d+)\)"#).unwrap());

static BRACKET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\[["']?([^"',]+)["']?,\s*(-?\d+)\]"#).unwrap());

static OBJECT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\{\s*["']?word["']?\s*:\s*["']?([^"',]+)["']?\s*,\s*["']?score["']?\s*:\s*(-?\d+)\s*\}"#).unwrap()
});

static BLOCK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\{[\s\S]*\})").unwrap());

static INTEGER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+").unwrap());

/// The critique part of a response, or an empty string.
pub fn extract_textual_feedback(response: &str) -> String {
    match serde_json::from_str::<Value>(response) {
        Ok(value) => value
            .get("textual_feedback")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Err(_) => FEEDBACK_RE
            .captures(response)
            .map(|caps| caps[1].to_string())
            .unwrap_or_default(),
    }
}

/// The `(word, score)` list of a response, or an empty list.
///
/// Scores are returned as found; they are not clamped to {-1, 0, 1}.
pub fn extract_word_scores(response: &str) -> Vec<(String, i64)> {
    match serde_json::from_str::<Value>(response) {
        Ok(value) => scores_from_json(&value),
        Err(_) => scores_from_text(response),
    }
}

fn scores_from_json(value: &Value) -> Vec<(String, i64)> {
    match value.get("word_score_list") {
        Some(Value::String(list)) => captures(&TUPLE_RE, list),
        Some(Value::Array(items)) => items.iter().filter_map(pair_from_item).collect(),
        other => {
            warn!(found = ?other.map(kind_of), "response has no usable word_score_list");
            Vec::new()
        }
    }
}

fn scores_from_text(response: &str) -> Vec<(String, i64)> {
    for pattern in [&*TUPLE_RE, &*BRACKET_RE, &*OBJECT_RE] {
        let found = captures(pattern, response);
        if !found.is_empty() {
            return found;
        }
    }

    // Last resort: a JSON object buried in surrounding prose
    if let Some(block) = BLOCK_RE.find(response) {
        if let Ok(value) = serde_json::from_str::<Value>(block.as_str()) {
            if value.get("word_score_list").is_some() {
                debug!("recovered JSON block from free-text response");
                return scores_from_json(&value);
            }
        }
    }

    Vec::new()
}

fn captures(pattern: &Regex, haystack: &str) -> Vec<(String, i64)> {
    pattern
        .captures_iter(haystack)
        .filter_map(|caps| Some((caps[1].to_string(), caps[2].parse::<i64>().ok()?)))
        .collect()
}

fn pair_from_item(item: &Value) -> Option<(String, i64)> {
    match item {
        Value::Array(pair) if pair.len() >= 2 => Some((word_text(&pair[0]), parse_score(&pair[1]))),
        Value::Object(fields) => {
            let word = field(fields, &["word", "token"])?;
            let score = field(fields, &["score", "value"])?;
            Some((word_text(word), parse_score(score)))
        }
        _ => None,
    }
}

fn field<'v>(fields: &'v serde_json::Map<String, Value>, names: &[&str]) -> Option<&'v Value> {
    fields
        .iter()
        .find(|(key, _)| names.iter().any(|name| key.eq_ignore_ascii_case(name)))
        .map(|(_, value)| value)
}

fn word_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numbers are taken as is; strings are parsed, falling back to the first
/// integer they contain, else 0.
fn parse_score(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).unwrap_or(0),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| INTEGER_RE.find(s).and_then(|m| m.as_str().parse().ok()))
            .unwrap_or(0),
        _ => 0,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
