use verdict_lexer::token::Token;
use verdict_protocol::{ScoredWord, TokenLabel};

/// Pairs every token with the score of its label, in token order.
///
/// `labels` holds one entry per token; a short label list yields a short
/// score list, which the validator then rejects.
pub fn compile(tokens: &[Token], labels: &[TokenLabel]) -> Vec<ScoredWord> {
    tokens
        .iter()
        .zip(labels)
        .map(|(token, label)| ScoredWord::new(token.text, label.score()))
        .collect()
}
