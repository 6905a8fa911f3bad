use tracing::debug;
use verdict_lexer::token::Token;
use verdict_lexer::Span;
use verdict_protocol::TokenLabel;

use crate::error::ScoreError;

/// Materializes spans into exactly one label per token.
///
/// Every token starts `Neutral`. Spans are applied in locator order; where two
/// spans touch the same word the higher precedence label stays
/// (`Poor > Good > Neutral`).
pub fn resolve(tokens: &[Token], spans: &[Span]) -> Result<Vec<TokenLabel>, ScoreError> {
    let mut labels = vec![TokenLabel::Neutral; tokens.len()];

    for span in spans {
        if span.first > span.last || span.last >= labels.len() {
            return Err(ScoreError::Resolution {
                first: span.first,
                last: span.last,
                tokens: labels.len(),
            });
        }

        let label = TokenLabel::from(span.label);
        for slot in &mut labels[span.indices()] {
            if *slot != TokenLabel::Neutral && *slot != label {
                debug!(current = ?slot, incoming = ?label, "overlapping spans, keeping higher precedence");
            }
            *slot = (*slot).max(label);
        }
    }

    Ok(labels)
}
