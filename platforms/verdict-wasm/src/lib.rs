use wasm_bindgen::prelude::*;
use serde::Serialize;
use verdict_lexer::{PhraseOutcome, PhraseReport};
use verdict_protocol::{EvaluationRequest, ScoredWord};
use verdict_scorer::{extract_textual_feedback, extract_word_scores, Scorer, ScoringConfig};

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// The structured response sent back to JavaScript
#[derive(Debug, Serialize)]
pub struct EvaluationReport {
    pub textual_feedback: String,
    pub word_score_list: Vec<ScoredWord>,
    pub warnings: Vec<SerializablePhraseWarning>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SerializablePhraseWarning {
    pub phrase_index: usize,
    pub phrase: String,
    pub outcome: PhraseOutcome,
}

impl From<&PhraseReport> for SerializablePhraseWarning {
    fn from(r: &PhraseReport) -> Self {
        Self {
            phrase_index: r.phrase_index,
            phrase: r.phrase.clone(),
            outcome: r.outcome.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExtractionReport {
    pub textual_feedback: String,
    pub word_score_list: Vec<(String, i64)>,
}

/// Scores one request; failures are reported in `error` with an empty score list.
pub fn build_report(scorer: &Scorer, request: &EvaluationRequest) -> EvaluationReport {
    match scorer.evaluate(request) {
        Ok(evaluation) => EvaluationReport {
            warnings: evaluation.warnings().map(Into::into).collect(),
            textual_feedback: evaluation.output.textual_feedback,
            word_score_list: evaluation.output.word_score_list,
            error: None,
        },
        Err(err) => EvaluationReport {
            textual_feedback: request.textual_feedback.clone(),
            word_score_list: Vec::new(),
            warnings: Vec::new(),
            error: Some(err.to_string()),
        },
    }
}

/// The scorer instance running in the browser
#[wasm_bindgen]
pub struct VerdictEngine {
    scorer: Scorer,
}

#[wasm_bindgen]
impl VerdictEngine {
    /// `config` is a `ScoringConfig` object, or undefined for the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<VerdictEngine, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            ScoringConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        Ok(Self { scorer: Scorer::new(config) })
    }

    /// Request object -> Pipeline -> Report object
    pub fn evaluate(&self, request: JsValue) -> Result<JsValue, JsValue> {
        let request: EvaluationRequest = serde_wasm_bindgen::from_value(request)?;
        let report = build_report(&self.scorer, &request);
        Ok(serde_wasm_bindgen::to_value(&report)?)
    }

    /// Raw model response -> feedback and word scores
    pub fn extract(&self, response: &str) -> Result<JsValue, JsValue> {
        let report = ExtractionReport {
            textual_feedback: extract_textual_feedback(response),
            word_score_list: extract_word_scores(response),
        };
        Ok(serde_wasm_bindgen::to_value(&report)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdict_protocol::LabeledPhrase;

    #[test]
    fn test_report_from_request() {
        let request = EvaluationRequest {
            generated_summary: Some("A quick fox.".to_string()),
            textual_feedback: "The fox was slow in the post.".to_string(),
            phrases: vec![LabeledPhrase::poor("quick"), LabeledPhrase::good("turtle")],
            ..Default::default()
        };

        let report = build_report(&Scorer::default(), &request);

        assert!(report.error.is_none());
        let scores: Vec<i8> = report.word_score_list.iter().map(|w| w.score).collect();
        assert_eq!(scores, vec![0, -1, 0]);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].phrase, "turtle");
        assert_eq!(report.warnings[0].phrase_index, 1);
        assert_eq!(report.warnings[0].outcome, PhraseOutcome::NotFound);
    }

    #[test]
    fn test_trimmed_phrase_warning() {
        let request = EvaluationRequest {
            generated_summary: Some("one two three four".to_string()),
            phrases: vec![LabeledPhrase::good("two"), LabeledPhrase::poor("one two three four")],
            ..Default::default()
        };

        let report = build_report(&Scorer::default(), &request);

        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].outcome, PhraseOutcome::Matched { spans: 1, trimmed: 1 });
    }

    #[test]
    fn test_report_for_missing_summary() {
        let request = EvaluationRequest {
            textual_feedback: "n/a".to_string(),
            ..Default::default()
        };

        let report = build_report(&Scorer::default(), &request);

        assert!(report.word_score_list.is_empty());
        assert!(report.error.unwrap().contains("generated_summary"));
    }
}
