pub mod locator;
pub mod parser;
pub mod token;

use verdict_norm::trim_punctuation;
use crate::parser::split_with_spans;
use crate::token::Token;

pub use locator::{Located, PhraseOutcome, PhraseReport, Span, SpanLocator};

/// Primary entry point: Text -> Words.
///
/// Splits on whitespace, trims punctuation off both ends of every chunk and
/// drops chunks that were nothing but punctuation. Offsets index into `input`.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    split_with_spans(input)
        .into_iter()
        .filter_map(|(span, raw)| {
            let trimmed = trim_punctuation(raw)?;
            let start = span.start + trimmed.start;
            let end = span.start + trimmed.end;
            Some((start, end))
        })
        .enumerate()
        .map(|(index, (start, end))| Token {
            index,
            start,
            end,
            text: &input[start..end],
        })
        .collect()
}
