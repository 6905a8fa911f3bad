use thiserror::Error;

/// Output invariants checked before a score list leaves the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("score list has {scored} entries but the summary has {tokens} words")]
    LengthMismatch { tokens: usize, scored: usize },

    #[error("entry {index} is `{found}` but word {index} of the summary is `{expected}`")]
    WordMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("entry {index} (`{word}`) has score {score}, expected -1, 0 or 1")]
    ScoreOutOfDomain { index: usize, word: String, score: i8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("cannot tokenize summary: {0}")]
    Tokenization(String),

    #[error("span {first}..={last} is outside a summary of {tokens} words")]
    Resolution { first: usize, last: usize, tokens: usize },

    #[error("rejected score list: {0}")]
    Validation(#[from] ValidationError),
}
