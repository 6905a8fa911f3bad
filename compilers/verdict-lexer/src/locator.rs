use std::ops::RangeInclusive;

use tracing::{debug, warn};
use verdict_norm::match_key;
use verdict_protocol::{LabeledPhrase, MatchFlags, MatchPolicy, PhraseLabel};

use crate::token::Token;
use crate::tokenize;

/// A labeled run of summary words claimed by one phrase.
///
/// `first` and `last` are inclusive token indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span<'a> {
    pub first: usize,
    pub last: usize,
    pub label: PhraseLabel,
    /// Literal source text from the first word's start to the last word's end.
    pub text: &'a str,
}

impl<'a> Span<'a> {
    pub fn indices(&self) -> RangeInclusive<usize> {
        self.first..=self.last
    }

    pub fn word_count(&self) -> usize {
        self.last - self.first + 1
    }
}

/// Serialized as `{"kind": "matched", "spans": 1, "trimmed": 0}`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "kebab-case"))]
pub enum PhraseOutcome {
    /// At least one span was claimed; `trimmed` of them lost words to earlier phrases.
    Matched { spans: usize, trimmed: usize },
    /// The phrase does not occur in the summary.
    NotFound,
    /// Every occurrence was already claimed by earlier phrases.
    FullyClaimed,
    /// The phrase has no words once punctuation is removed.
    Empty,
}

impl PhraseOutcome {
    pub fn is_warning(&self) -> bool {
        !matches!(self, PhraseOutcome::Matched { trimmed: 0, .. })
    }
}

/// What happened to one input phrase, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PhraseReport {
    pub phrase_index: usize,
    pub phrase: String,
    pub label: PhraseLabel,
    pub outcome: PhraseOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct Located<'a> {
    pub spans: Vec<Span<'a>>,
    pub reports: Vec<PhraseReport>,
}

impl<'a> Located<'a> {
    pub fn not_found(&self) -> impl Iterator<Item = &PhraseReport> {
        self.reports.iter().filter(|r| r.outcome == PhraseOutcome::NotFound)
    }
}

/// Finds labeled phrases inside the summary and claims their words.
///
/// Phrases are processed in the order given, so an earlier phrase wins any
/// word that a later phrase also mentions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanLocator {
    policy: MatchPolicy,
    flags: MatchFlags,
}

impl SpanLocator {
    pub fn new(policy: MatchPolicy, flags: MatchFlags) -> Self {
        Self { policy, flags }
    }

    pub fn locate<'a>(
        &self,
        source: &'a str,
        tokens: &[Token<'a>],
        phrases: &[LabeledPhrase],
    ) -> Located<'a> {
        let haystack: Vec<String> = tokens.iter().map(|t| match_key(t.text, self.flags)).collect();
        let mut claimed = vec![false; tokens.len()];
        let mut located = Located::default();

        for (phrase_index, phrase) in phrases.iter().enumerate() {
            let needle: Vec<String> = tokenize(&phrase.text)
                .iter()
                .map(|t| match_key(t.text, self.flags))
                .collect();

            let outcome = if needle.is_empty() {
                warn!(phrase_index, "phrase has no words, skipping");
                PhraseOutcome::Empty
            } else {
                let occurrences = find_occurrences(&haystack, &needle);
                if occurrences.is_empty() {
                    warn!(phrase_index, phrase = %phrase.text, label = %phrase.label, "phrase not found in summary");
                    PhraseOutcome::NotFound
                } else {
                    let claims: Vec<Claim> = match self.policy {
                        MatchPolicy::FirstUnclaimed => first_unclaimed(&claimed, &occurrences, needle.len())
                            .into_iter()
                            .collect(),
                        MatchPolicy::AllOccurrences => all_unclaimed(&claimed, &occurrences, needle.len()),
                    };
                    self.claim(source, tokens, phrase, &claims, &mut claimed, &mut located.spans);

                    if claims.is_empty() {
                        warn!(phrase_index, phrase = %phrase.text, "every occurrence already claimed, skipping");
                        PhraseOutcome::FullyClaimed
                    } else {
                        let trimmed = claims.iter().filter(|c| c.trimmed).count();
                        if trimmed > 0 {
                            debug!(phrase_index, trimmed, "phrase trimmed to unclaimed words");
                        }
                        PhraseOutcome::Matched { spans: claims.len(), trimmed }
                    }
                }
            };

            located.reports.push(PhraseReport {
                phrase_index,
                phrase: phrase.text.clone(),
                label: phrase.label,
                outcome,
            });
        }

        located
    }

    fn claim<'a>(
        &self,
        source: &'a str,
        tokens: &[Token<'a>],
        phrase: &LabeledPhrase,
        claims: &[Claim],
        claimed: &mut [bool],
        spans: &mut Vec<Span<'a>>,
    ) {
        for c in claims {
            claimed[c.first..=c.last].iter_mut().for_each(|slot| *slot = true);
            spans.push(Span {
                first: c.first,
                last: c.last,
                label: phrase.label,
                text: &source[tokens[c.first].start..tokens[c.last].end],
            });
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Claim {
    first: usize,
    last: usize,
    trimmed: bool,
}

/// Start indices of every (possibly overlapping) occurrence of `needle`.
fn find_occurrences(haystack: &[String], needle: &[String]) -> Vec<usize> {
    if needle.len() > haystack.len() {
        return Vec::new();
    }
    haystack
        .windows(needle.len())
        .enumerate()
        .filter(|(_, window)| *window == needle)
        .map(|(start, _)| start)
        .collect()
}

/// Longest run of unclaimed indices inside `start..start + len`, leftmost on ties.
fn unclaimed_run(claimed: &[bool], start: usize, len: usize) -> Option<Claim> {
    let mut best: Option<(usize, usize)> = None;
    let mut run_start = None;

    for i in start..start + len {
        match (claimed[i], run_start) {
            (false, None) => run_start = Some(i),
            (true, Some(s)) => {
                keep_longest(&mut best, s, i - 1);
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = run_start {
        keep_longest(&mut best, s, start + len - 1);
    }

    best.map(|(first, last)| Claim {
        first,
        last,
        trimmed: last - first + 1 < len,
    })
}

fn keep_longest(best: &mut Option<(usize, usize)>, first: usize, last: usize) {
    let longer = match best {
        Some((f, l)) => last - first > *l - *f,
        None => true,
    };
    if longer {
        *best = Some((first, last));
    }
}

/// A fully unclaimed occurrence if any, else the unclaimed part of the first
/// partially claimed one.
fn first_unclaimed(claimed: &[bool], occurrences: &[usize], len: usize) -> Option<Claim> {
    occurrences
        .iter()
        .filter_map(|&start| unclaimed_run(claimed, start, len))
        .find(|c| !c.trimmed)
        .or_else(|| {
            occurrences
                .iter()
                .find_map(|&start| unclaimed_run(claimed, start, len))
        })
}

/// Every non-overlapping occurrence, each reduced to its unclaimed part.
///
/// Fully unclaimed occurrences are taken first, so a partly claimed one never
/// shadows a free occurrence that overlaps it. Claims come back in token order.
fn all_unclaimed(claimed: &[bool], occurrences: &[usize], len: usize) -> Vec<Claim> {
    let mut taken = claimed.to_vec();
    let mut own = vec![false; claimed.len()];
    let mut claims = Vec::new();

    for whole_only in [true, false] {
        for &start in occurrences {
            let window = start..start + len;
            if own[window.clone()].iter().any(|&o| o) {
                continue;
            }
            let Some(c) = unclaimed_run(&taken, start, len) else {
                continue;
            };
            if whole_only && c.trimmed {
                continue;
            }
            own[window].iter_mut().for_each(|slot| *slot = true);
            taken[c.first..=c.last].iter_mut().for_each(|slot| *slot = true);
            claims.push(c);
        }
    }

    claims.sort_by_key(|c| c.first);
    claims
}
