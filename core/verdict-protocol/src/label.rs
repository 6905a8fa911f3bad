use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use bitflags::bitflags;
use core::fmt;
use core::str::FromStr;

/// Judgment attached to a phrase of the summary by the upstream critic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum PhraseLabel {
    Good = 0,
    Poor = 1,
}

/// Resolved classification of a single summary word.
///
/// Variants are declared in precedence order, so `Ord` gives
/// `Poor > Good > Neutral` and `max` picks the label that wins an overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum TokenLabel {
    #[default]
    Neutral = 0,
    Good = 1,
    Poor = 2,
}

impl TokenLabel {
    /// Fixed label-to-score mapping.
    pub const fn score(self) -> i8 {
        match self {
            TokenLabel::Good => 1,
            TokenLabel::Poor => -1,
            TokenLabel::Neutral => 0,
        }
    }
}

impl From<PhraseLabel> for TokenLabel {
    fn from(label: PhraseLabel) -> Self {
        match label {
            PhraseLabel::Good => TokenLabel::Good,
            PhraseLabel::Poor => TokenLabel::Poor,
        }
    }
}

impl fmt::Display for PhraseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhraseLabel::Good => f.write_str("good"),
            PhraseLabel::Poor => f.write_str("poor"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel;

impl fmt::Display for UnknownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("label must be `good` or `poor`")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UnknownLabel {}

impl FromStr for PhraseLabel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("good") {
            Ok(PhraseLabel::Good)
        } else if s.eq_ignore_ascii_case("poor") {
            Ok(PhraseLabel::Poor)
        } else {
            Err(UnknownLabel)
        }
    }
}

/// How a phrase that recurs in the summary is claimed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum MatchPolicy {
    /// Claim the first occurrence whose words are still unclaimed.
    #[default]
    FirstUnclaimed,
    /// Claim every non-overlapping occurrence.
    AllOccurrences,
}

bitflags! {
    /// Normalization applied to both sides before phrase words are compared.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
    pub struct MatchFlags: u8 {
        /// Compare lowercased text.
        const CASE_FOLD = 1;
        /// Drop every non-alphanumeric character before comparing.
        const IGNORE_PUNCTUATION = 2;
    }
}

impl Default for MatchFlags {
    fn default() -> Self {
        MatchFlags::CASE_FOLD | MatchFlags::IGNORE_PUNCTUATION
    }
}
