#![no_std] // Shared by the wasm binding

extern crate alloc;

// Enable std if the feature is active (for tests/tools)
#[cfg(feature = "std")]
extern crate std;

pub mod label;

// Re-export core types for convenience
pub use label::{MatchFlags, MatchPolicy, PhraseLabel, TokenLabel, UnknownLabel};

pub mod model;
pub use model::*;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use rkyv::{to_bytes, from_bytes};

    #[test]
    fn test_label_serialization() {
        let original = TokenLabel::Poor;

        let bytes = to_bytes::<_, 256>(&original).expect("Failed to serialize TokenLabel");
        let deserialized: TokenLabel = from_bytes(&bytes).expect("Failed to deserialize TokenLabel");

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_output_archive() {
        // A compiled output is what the batch tool archives to disk
        let output = EvaluationOutput {
            textual_feedback: "Mentions the cat but invents the mat.".to_string(),
            word_score_list: vec![
                ScoredWord::new("cat", 1),
                ScoredWord::new("mat", -1),
                ScoredWord::new("on", 0),
            ],
        };

        let bytes = to_bytes::<_, 1024>(&output).expect("Failed to serialize output");
        let archived = rkyv::check_archived_root::<EvaluationOutput>(&bytes).expect("Archive failed validation");
        assert_eq!(archived.word_score_list.len(), 3);
        assert_eq!(archived.word_score_list[1].word.as_str(), "mat");
        assert_eq!(archived.word_score_list[1].score, -1);

        let restored: EvaluationOutput = from_bytes(&bytes).expect("Failed to deserialize output");
        assert_eq!(restored, output);
    }

    #[test]
    fn test_batch_archive() {
        let batch = ScoredBatch {
            version: 1,
            records: vec![ScoredRecord {
                index: 42,
                output: EvaluationOutput {
                    textual_feedback: String::new(),
                    word_score_list: vec![ScoredWord::new("fox", 1)],
                },
            }],
        };

        let bytes = to_bytes::<_, 1024>(&batch).expect("Failed to serialize batch");
        let archived = rkyv::check_archived_root::<ScoredBatch>(&bytes).expect("Archive failed validation");
        assert_eq!(archived.version, 1);
        assert_eq!(archived.records[0].index, 42);
        assert_eq!(archived.records[0].output.word_score_list[0].word.as_str(), "fox");
    }

    #[test]
    fn test_label_precedence() {
        assert!(TokenLabel::Poor > TokenLabel::Good);
        assert!(TokenLabel::Good > TokenLabel::Neutral);
        assert_eq!(TokenLabel::default(), TokenLabel::Neutral);
        assert_eq!(TokenLabel::Good.max(TokenLabel::Poor), TokenLabel::Poor);
    }

    #[test]
    fn test_score_mapping() {
        assert_eq!(TokenLabel::Good.score(), 1);
        assert_eq!(TokenLabel::Poor.score(), -1);
        assert_eq!(TokenLabel::Neutral.score(), 0);
        assert_eq!(TokenLabel::from(PhraseLabel::Poor), TokenLabel::Poor);
    }

    #[test]
    fn test_label_parsing() {
        assert_eq!("Good".parse::<PhraseLabel>(), Ok(PhraseLabel::Good));
        assert_eq!("POOR".parse::<PhraseLabel>(), Ok(PhraseLabel::Poor));
        assert_eq!("neutral".parse::<PhraseLabel>(), Err(UnknownLabel));
    }

    #[test]
    fn test_default_match_flags() {
        let flags = MatchFlags::default();
        assert!(flags.contains(MatchFlags::CASE_FOLD));
        assert!(flags.contains(MatchFlags::IGNORE_PUNCTUATION));
        assert_eq!(MatchPolicy::default(), MatchPolicy::FirstUnclaimed);
    }
}
