pub mod agreement;
pub mod compiler;
pub mod config;
pub mod error;
pub mod resolver;
pub mod response;
pub mod validator;

pub use agreement::{compare, Agreement};
pub use compiler::compile;
pub use config::ScoringConfig;
pub use error::{ScoreError, ValidationError};
pub use resolver::resolve;
pub use response::{extract_textual_feedback, extract_word_scores};
pub use validator::validate;

use tracing::debug;
use verdict_lexer::{tokenize, PhraseReport};
use verdict_protocol::{EvaluationOutput, EvaluationRequest, LabeledPhrase};

/// A validated output plus what happened to each input phrase.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub output: EvaluationOutput,
    pub reports: Vec<PhraseReport>,
}

impl Evaluation {
    pub fn warnings(&self) -> impl Iterator<Item = &PhraseReport> {
        self.reports.iter().filter(|r| r.outcome.is_warning())
    }
}

/// Runs Tokenizer -> Locator -> Resolver -> Compiler -> Validator.
///
/// Holds no state between calls; one scorer can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Scores one request. A missing summary is a tokenization error.
    pub fn evaluate(&self, request: &EvaluationRequest) -> Result<Evaluation, ScoreError> {
        let summary = request
            .generated_summary
            .as_deref()
            .ok_or_else(|| ScoreError::Tokenization("generated_summary is missing or null".to_string()))?;

        self.score(summary, &request.textual_feedback, &request.phrases)
    }

    /// Scores `summary` against the labeled phrases extracted from `critique`.
    ///
    /// The critique is passed through untouched.
    pub fn score(
        &self,
        summary: &str,
        critique: &str,
        phrases: &[LabeledPhrase],
    ) -> Result<Evaluation, ScoreError> {
        let tokens = tokenize(summary);
        let located = self.config.locator().locate(summary, &tokens, phrases);
        let labels = resolve(&tokens, &located.spans)?;
        let word_score_list = compile(&tokens, &labels);
        validate(&tokens, &word_score_list)?;

        debug!(
            words = tokens.len(),
            spans = located.spans.len(),
            phrases = phrases.len(),
            "summary scored"
        );

        Ok(Evaluation {
            output: EvaluationOutput {
                textual_feedback: critique.to_string(),
                word_score_list,
            },
            reports: located.reports,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use verdict_lexer::PhraseOutcome;
    use verdict_protocol::{MatchPolicy, PhraseLabel, ScoredWord};

    fn scored(items: &[(&str, i8)]) -> Vec<ScoredWord> {
        items.iter().map(|(w, s)| ScoredWord::new(*w, *s)).collect()
    }

    #[test]
    fn test_cat_sat_on_the_mat() {
        let evaluation = Scorer::default()
            .score(
                "The cat sat on the mat",
                "Gets the cat right, the mat is invented.",
                &[LabeledPhrase::good("cat sat"), LabeledPhrase::poor("mat")],
            )
            .unwrap();

        assert_eq!(
            evaluation.output.word_score_list,
            scored(&[("The", 0), ("cat", 1), ("sat", 1), ("on", 0), ("the", 0), ("mat", -1)])
        );
        assert_eq!(evaluation.output.textual_feedback, "Gets the cat right, the mat is invented.");
        assert_eq!(evaluation.warnings().count(), 0);
    }

    #[test]
    fn test_unmatched_phrase_is_dropped() {
        let evaluation = Scorer::default()
            .score("A quick fox.", "", &[LabeledPhrase::poor("slow turtle")])
            .unwrap();

        assert_eq!(
            evaluation.output.word_score_list,
            scored(&[("A", 0), ("quick", 0), ("fox", 0)])
        );
        let warnings: Vec<_> = evaluation.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].outcome, PhraseOutcome::NotFound);
    }

    #[test]
    fn test_earlier_phrase_keeps_shared_word() {
        let evaluation = Scorer::default()
            .score(
                "A quick fox",
                "",
                &[LabeledPhrase::good("quick fox"), LabeledPhrase::poor("fox")],
            )
            .unwrap();

        assert_eq!(
            evaluation.output.word_score_list,
            scored(&[("A", 0), ("quick", 1), ("fox", 1)])
        );
    }

    #[test]
    fn test_all_occurrences_config() {
        let scorer = Scorer::new(ScoringConfig::default().with_policy(MatchPolicy::AllOccurrences));
        let evaluation = scorer
            .score("red fish, blue fish", "", &[LabeledPhrase::poor("fish")])
            .unwrap();

        let scores: Vec<i8> = evaluation.output.scores().collect();
        assert_eq!(scores, vec![0, -1, 0, -1]);
    }

    #[test]
    fn test_missing_summary_rejected() {
        let request = EvaluationRequest {
            original_post: "Some post".to_string(),
            generated_summary: None,
            ..Default::default()
        };

        let err = Scorer::default().evaluate(&request).unwrap_err();
        assert!(matches!(err, ScoreError::Tokenization(_)));
    }

    #[test]
    fn test_request_round_trip() {
        let request = EvaluationRequest {
            index: Some(7),
            original_post: "My landlord kept the deposit.".to_string(),
            generated_summary: Some("Landlord kept deposit, tenant sued.".to_string()),
            textual_feedback: "No lawsuit is mentioned.".to_string(),
            phrases: vec![
                LabeledPhrase::good("Landlord kept deposit"),
                LabeledPhrase::poor("tenant sued"),
            ],
        };

        let evaluation = Scorer::default().evaluate(&request).unwrap();
        let scores: Vec<i8> = evaluation.output.scores().collect();
        assert_eq!(scores, vec![1, 1, 1, -1, -1]);
    }

    #[test]
    fn test_empty_summary() {
        let evaluation = Scorer::default()
            .score("", "Nothing to score.", &[LabeledPhrase::good("anything")])
            .unwrap();

        assert!(evaluation.output.word_score_list.is_empty());
    }

    fn phrase_strategy() -> impl Strategy<Value = LabeledPhrase> {
        ("[a-e]{1,2}( [a-e]{1,2}){0,2}", any::<bool>()).prop_map(|(text, good)| {
            LabeledPhrase::new(text, if good { PhraseLabel::Good } else { PhraseLabel::Poor })
        })
    }

    proptest! {
        #[test]
        fn test_pipeline_invariants(
            summary in "[a-eA-E.,!]{1,3}( [a-eA-E.,!-]{1,3}){0,12}",
            phrases in prop::collection::vec(phrase_strategy(), 0..6),
            all in any::<bool>(),
        ) {
            let policy = if all { MatchPolicy::AllOccurrences } else { MatchPolicy::FirstUnclaimed };
            let scorer = Scorer::new(ScoringConfig::default().with_policy(policy));

            let first = scorer.score(&summary, "", &phrases).unwrap();
            let second = scorer.score(&summary, "", &phrases).unwrap();
            let tokens = tokenize(&summary);

            // Coverage and order
            prop_assert_eq!(first.output.word_score_list.len(), tokens.len());
            for (token, entry) in tokens.iter().zip(&first.output.word_score_list) {
                prop_assert_eq!(token.text, entry.word.as_str());
                prop_assert!((-1..=1).contains(&entry.score));
            }

            // Idempotence
            prop_assert_eq!(first.output, second.output);
            prop_assert_eq!(first.reports.len(), phrases.len());
        }
    }
}
