use std::ops::Range;

use unicode_normalization::char::is_combining_mark;
use verdict_protocol::MatchFlags;

/// Any character that is not a letter, digit or combining mark counts as
/// punctuation. Marks belong to the base letter they follow, so decomposed
/// accents and Thai tone marks stay inside the word.
pub fn is_punctuation(c: char) -> bool {
    !(c.is_alphanumeric() || is_combining_mark(c))
}

/// Byte range of `raw` left after trimming punctuation from both ends.
///
/// Internal punctuation is kept, so `"well-known,"` trims to `well-known`.
/// Returns `None` when nothing but punctuation remains.
pub fn trim_punctuation(raw: &str) -> Option<Range<usize>> {
    let start = raw.find(|c: char| !is_punctuation(c))?;
    let last = raw.rfind(|c: char| !is_punctuation(c))?;
    // `rfind` returns the start of the last char; extend over its UTF-8 width
    let end = last + raw[last..].chars().next().map_or(0, char::len_utf8);
    Some(start..end)
}

/// Comparison key used when matching phrase words against summary words.
pub fn match_key(text: &str, flags: MatchFlags) -> String {
    let mut key = String::with_capacity(text.len());

    for c in text.chars() {
        if flags.contains(MatchFlags::IGNORE_PUNCTUATION) && is_punctuation(c) {
            continue;
        }
        if flags.contains(MatchFlags::CASE_FOLD) {
            key.extend(c.to_lowercase());
        } else {
            key.push(c);
        }
    }

    key
}
