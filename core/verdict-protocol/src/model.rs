use rkyv::{Archive, Deserialize, Serialize};
use crate::label::PhraseLabel;
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// A phrase of the summary singled out by the critique.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct LabeledPhrase {
    pub text: String,
    pub label: PhraseLabel,
}

impl LabeledPhrase {
    pub fn new(text: impl Into<String>, label: PhraseLabel) -> Self {
        Self { text: text.into(), label }
    }

    pub fn good(text: impl Into<String>) -> Self {
        Self::new(text, PhraseLabel::Good)
    }

    pub fn poor(text: impl Into<String>) -> Self {
        Self::new(text, PhraseLabel::Poor)
    }
}

/// One output unit: a summary word and its score in {-1, 0, 1}.
///
/// Serialized with serde as a `[word, score]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(from = "(String, i8)", into = "(String, i8)"))]
#[archive(check_bytes)]
pub struct ScoredWord {
    pub word: String,
    pub score: i8,
}

impl ScoredWord {
    pub fn new(word: impl Into<String>, score: i8) -> Self {
        Self { word: word.into(), score }
    }
}

impl From<(String, i8)> for ScoredWord {
    fn from((word, score): (String, i8)) -> Self {
        Self { word, score }
    }
}

impl From<ScoredWord> for (String, i8) {
    fn from(scored: ScoredWord) -> Self {
        (scored.word, scored.score)
    }
}

/// A (post, summary) pair together with the critic's judgment of the summary.
///
/// `original_post` is carried through untouched; only the summary is scored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[archive(check_bytes)]
pub struct EvaluationRequest {
    pub index: Option<u64>,
    /// Older evaluation files call this field `post`.
    #[cfg_attr(feature = "serde", serde(alias = "post"))]
    pub original_post: String,
    pub generated_summary: Option<String>,
    pub textual_feedback: String,
    pub phrases: Vec<LabeledPhrase>,
}

/// Critique plus the word-aligned score list of the summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct EvaluationOutput {
    pub textual_feedback: String,
    pub word_score_list: Vec<ScoredWord>,
}

impl EvaluationOutput {
    pub fn scores(&self) -> impl Iterator<Item = i8> + '_ {
        self.word_score_list.iter().map(|w| w.score)
    }
}

/// One scored request, keyed by its position in the input batch.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct ScoredRecord {
    pub index: u64,
    pub output: EvaluationOutput,
}

/// Binary batch written next to the JSON results for training pipelines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct ScoredBatch {
    pub version: u32,
    pub records: Vec<ScoredRecord>,
}
