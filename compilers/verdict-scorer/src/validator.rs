use verdict_lexer::token::Token;
use verdict_protocol::ScoredWord;

use crate::error::ValidationError;

/// Checks that `scored` covers every summary word once, in order, with a
/// score in {-1, 0, 1}.
pub fn validate(tokens: &[Token], scored: &[ScoredWord]) -> Result<(), ValidationError> {
    if tokens.len() != scored.len() {
        return Err(ValidationError::LengthMismatch {
            tokens: tokens.len(),
            scored: scored.len(),
        });
    }

    for (index, (token, entry)) in tokens.iter().zip(scored).enumerate() {
        if token.text != entry.word {
            return Err(ValidationError::WordMismatch {
                index,
                expected: token.text.to_string(),
                found: entry.word.clone(),
            });
        }
        if !(-1..=1).contains(&entry.score) {
            return Err(ValidationError::ScoreOutOfDomain {
                index,
                word: entry.word.clone(),
                score: entry.score,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdict_lexer::tokenize;

    #[test]
    fn test_valid_list_passes() {
        let tokens = tokenize("A quick fox.");
        let scored = [ScoredWord::new("A", 0), ScoredWord::new("quick", 1), ScoredWord::new("fox", -1)];
        assert_eq!(validate(&tokens, &scored), Ok(()));
    }

    #[test]
    fn test_missing_word_rejected() {
        let tokens = tokenize("A quick fox.");
        let scored = [ScoredWord::new("A", 0), ScoredWord::new("quick", 1)];
        assert_eq!(
            validate(&tokens, &scored),
            Err(ValidationError::LengthMismatch { tokens: 3, scored: 2 })
        );
    }

    #[test]
    fn test_reordered_words_rejected() {
        let tokens = tokenize("A quick fox.");
        let scored = [ScoredWord::new("A", 0), ScoredWord::new("fox", 0), ScoredWord::new("quick", 0)];
        let err = validate(&tokens, &scored).unwrap_err();
        assert!(matches!(err, ValidationError::WordMismatch { index: 1, .. }));
    }

    #[test]
    fn test_score_domain_enforced() {
        let tokens = tokenize("fox");
        let scored = [ScoredWord::new("fox", 2)];
        let err = validate(&tokens, &scored).unwrap_err();
        assert!(err.to_string().contains("score 2"));
    }
}
