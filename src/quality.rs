//! # Quality Filter
//!
//! Flags low-quality/spam comment text and attenuates its score. A fixed
//! multiplicative penalty (not a zero) keeps low-quality items ordinally
//! comparable among themselves without letting them compete with
//! substantive content.
//!
//! Pure function of the text only; no external services, no state.

use once_cell::sync::Lazy;
use regex::Regex;

/// Texts shorter than this many characters are low quality.
pub const MIN_CHAR_COUNT: usize = 20;
/// Texts with fewer words than this are low quality.
pub const MIN_WORD_COUNT: usize = 5;
/// Multiplier applied to the composed score of low-quality content.
pub const QUALITY_PENALTY: f64 = 0.1;

// Matched against the normalized (lowercased, whitespace-collapsed) text.
// Placeholder/test strings, keyboard mashes, and "first!"-style noise.
static SPAM_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^(?:test|testing|test (?:post|comment)|placeholder|sample(?: text)?)$",
        r"^lorem ipsum(?: .*)?$",
        r"^(?:asdf|qwer|zxcv|sdfg|jkl;?)+$",
        r"^(?:first|f1rst|second|third)\W*$",
        r"^\+?1\W*$",
        r"^(?:bump|lol|wow|nice|cool|ok|okay|thanks|thx)\W*$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("spam pattern"))
    .collect()
});

/// True if the text fails the length floors or matches a spam pattern.
pub fn is_low_quality(text: &str) -> bool {
    let norm = normalize(text);
    if norm.chars().count() < MIN_CHAR_COUNT {
        return true;
    }
    if norm.split_whitespace().count() < MIN_WORD_COUNT {
        return true;
    }
    if SPAM_PATTERNS.iter().any(|re| re.is_match(&norm)) {
        return true;
    }
    // Repeated-character runs ("aaaaaaaa...") — checked outside regex since
    // the regex crate has no backreferences.
    if is_repeated_run(&norm) {
        return true;
    }
    false
}

/// Multiply `score` by [`QUALITY_PENALTY`] when the text is low quality.
pub fn apply_penalty(score: f64, text: &str) -> f64 {
    if is_low_quality(text) {
        score * QUALITY_PENALTY
    } else {
        score
    }
}

/// Lowercase and collapse whitespace. Mirrors the normalization used for
/// signal-name matching so the patterns stay simple.
fn normalize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_space = false;
    for ch in s.chars() {
        let lc = ch.to_ascii_lowercase();
        if lc.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
        } else {
            out.push(lc);
            last_was_space = false;
        }
    }
    out.trim().to_string()
}

/// One distinct non-space character repeated through the whole text.
fn is_repeated_run(norm: &str) -> bool {
    let mut chars = norm.chars().filter(|c| !c.is_whitespace());
    match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => true, // empty text is trivially low quality
    }
}
