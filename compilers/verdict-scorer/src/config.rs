use serde::{Deserialize, Serialize};
use verdict_lexer::SpanLocator;
use verdict_protocol::{MatchFlags, MatchPolicy};

/// Knobs of the phrase matcher. Missing fields fall back to the defaults:
/// first-unclaimed matching, case and punctuation insensitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub policy: MatchPolicy,
    pub flags: MatchFlags,
}

impl ScoringConfig {
    pub fn from_json(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn locator(&self) -> SpanLocator {
        SpanLocator::new(self.policy, self.flags)
    }
}
