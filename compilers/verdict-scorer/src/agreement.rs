use serde::Serialize;
use verdict_norm::match_key;
use verdict_protocol::{MatchFlags, ScoredWord};

/// Position-by-position agreement between a reference score list and one
/// recovered from a model response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Agreement {
    pub reference_len: usize,
    pub predicted_len: usize,
    /// Both lists cover the same number of words.
    pub aligned: bool,
    /// Positions where the word (ignoring case and punctuation) and score agree.
    pub matched: usize,
    pub accuracy: f64,
}

pub fn compare(reference: &[ScoredWord], predicted: &[(String, i64)]) -> Agreement {
    let flags = MatchFlags::default();
    let matched = reference
        .iter()
        .zip(predicted)
        .filter(|(expected, (word, score))| {
            i64::from(expected.score) == *score && match_key(&expected.word, flags) == match_key(word, flags)
        })
        .count();

    let accuracy = if reference.is_empty() {
        1.0
    } else {
        matched as f64 / reference.len() as f64
    };

    Agreement {
        reference_len: reference.len(),
        predicted_len: predicted.len(),
        aligned: reference.len() == predicted.len(),
        matched,
        accuracy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_agreement() {
        let reference = [ScoredWord::new("cat", 1), ScoredWord::new("mat", -1)];
        let predicted = vec![("Cat".to_string(), 1), ("mat.".to_string(), -1)];
        let agreement = compare(&reference, &predicted);

        assert!(agreement.aligned);
        assert_eq!(agreement.matched, 2);
        assert_eq!(agreement.accuracy, 1.0);
    }

    #[test]
    fn test_short_prediction() {
        let reference = [ScoredWord::new("A", 0), ScoredWord::new("quick", 1), ScoredWord::new("fox", 1)];
        let predicted = vec![("A".to_string(), 0), ("quick".to_string(), -1)];
        let agreement = compare(&reference, &predicted);

        assert!(!agreement.aligned);
        assert_eq!(agreement.matched, 1);
        assert!((agreement.accuracy - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_reference() {
        let agreement = compare(&[], &[]);
        assert!(agreement.aligned);
        assert_eq!(agreement.accuracy, 1.0);
    }
}
