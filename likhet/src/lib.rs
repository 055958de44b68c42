//! Compare strings the way a human grader would: fold away the noise first,
//! then measure how far apart the rest is.

use unicode_normalization::UnicodeNormalization;

/// Canonicalize text before any comparison.
///
/// NFKC-folds the input so visually identical characters compare equal,
/// optionally lowercases, strips every character present in
/// `eliminate_chars` (each treated as a literal, not a pattern), and
/// collapses whitespace runs to a single space.
pub fn normalize(text: &str, eliminate_chars: &str, lowercase: bool) -> String {
    let folded: String = text.nfkc().collect();

    let folded = if lowercase {
        folded.to_lowercase()
    } else {
        folded
    };

    folded
        .chars()
        .filter(|c| !eliminate_chars.contains(*c))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Levenshtein distance with unit costs, over chars rather than bytes.
///
/// Two-row table so long answers don't allocate a full matrix.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }

    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;

        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Similarity in [0, 1] derived from edit distance.
///
/// Identical strings score 1 (two empties included), one empty against one
/// non-empty scores 0. A membership-style check ("do the letters appear
/// somewhere") is not good enough here; it passes answers that merely share
/// characters with the target.
pub fn similarity(a: &str, b: &str) -> f32 {
    let longest = a.chars().count().max(b.chars().count());

    if longest == 0 {
        return 1.0;
    }

    1.0 - edit_distance(a, b) as f32 / longest as f32
}

/// Closest candidate to `input`, if any.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BestMatch {
    pub target: Option<String>,
    pub score: f32,
    pub index: Option<usize>,
}

/// Linear scan over `candidates`; first seen wins on ties.
pub fn find_best_match(input: &str, candidates: &[String]) -> BestMatch {
    let mut best = BestMatch::default();

    for (index, candidate) in candidates.iter().enumerate() {
        let score = similarity(input, candidate);

        if best.target.is_none() || score > best.score {
            best = BestMatch {
                target: Some(candidate.clone()),
                score,
                index: Some(index),
            };
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_and_collapses() {
        assert_eq!(normalize("  PARIS! ", "!?", true), "paris");
        assert_eq!(normalize("a   b\tc", "", false), "a b c");
        assert_eq!(normalize("", ".,", true), "");
    }

    #[test]
    fn normalize_folds_compatibility_forms() {
        // fullwidth latin and the ligature form both collapse to ascii
        assert_eq!(normalize("ｐａｒｉｓ", "", true), "paris");
        assert_eq!(normalize("ﬁn", "", true), "fin");
    }

    #[test]
    fn normalize_eliminate_chars_are_literal() {
        // a dot in the eliminate set must not act as a wildcard
        assert_eq!(normalize("abc", ".", true), "abc");
        assert_eq!(normalize("a.b.c", ".", true), "abc");
    }

    #[test]
    fn distance_basics() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("paris", "pariz"), 1);
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [("abc", "acb"), ("kitten", "sitting"), ("", "xyz")];

        for (a, b) in pairs {
            assert_eq!(edit_distance(a, b), edit_distance(b, a));
        }
    }

    #[test]
    fn distance_triangle_inequality() {
        let triples = [
            ("kitten", "sitting", "mitten"),
            ("abc", "", "xyz"),
            ("paris", "pariz", "parisian"),
        ];

        for (a, b, c) in triples {
            assert!(edit_distance(a, c) <= edit_distance(a, b) + edit_distance(b, c));
        }
    }

    #[test]
    fn similarity_identities() {
        assert_eq!(similarity("paris", "paris"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("", "x"), 0.0);
        assert_eq!(similarity("pariz", "paris"), similarity("paris", "pariz"));
        assert!((similarity("pariz", "paris") - 0.8).abs() < 1e-6);
    }

    #[test]
    fn similarity_counts_chars_not_bytes() {
        // multibyte chars must not deflate the score
        assert_eq!(similarity("é", "é"), 1.0);
        assert_eq!(similarity("née", "nee"), similarity("nxe", "nee"));
    }

    #[test]
    fn best_match_first_seen_wins_ties() {
        let candidates = vec!["abcd".to_string(), "abce".to_string()];
        let best = find_best_match("abc", &candidates);

        assert_eq!(best.index, Some(0));
        assert_eq!(best.target.as_deref(), Some("abcd"));
    }

    #[test]
    fn best_match_empty_candidates() {
        let best = find_best_match("anything", &[]);

        assert_eq!(best.target, None);
        assert_eq!(best.score, 0.0);
        assert_eq!(best.index, None);
    }

    #[test]
    fn best_match_picks_closest() {
        let candidates = vec![
            "berlin".to_string(),
            "paris".to_string(),
            "madrid".to_string(),
        ];
        let best = find_best_match("pariz", &candidates);

        assert_eq!(best.index, Some(1));
        assert!(best.score > 0.7);
    }
}
