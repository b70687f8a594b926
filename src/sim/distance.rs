//! Edit distance used to pick which word a partially typed answer aims at.

/// Levenshtein distance between two strings, counted in chars.
///
/// Returns the minimum number of single-character insertions, deletions and
/// substitutions turning `a` into `b`.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two rows of the classic DP matrix
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j]
            } else {
                // substitution, deletion, insertion
                1 + prev[j].min(prev[j + 1]).min(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// First `n` chars of `s` (never splits a multi-byte char)
pub fn char_prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_distances() {
        assert_eq!(levenshtein("cat", "cat"), 0);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        assert_eq!(levenshtein("año", "ano"), 1);
        assert_eq!(levenshtein("", "日本"), 2);
    }

    #[test]
    fn test_char_prefix() {
        assert_eq!(char_prefix("casa", 3), "cas");
        assert_eq!(char_prefix("casa", 10), "casa");
        assert_eq!(char_prefix("señor", 3), "señ");
        assert_eq!(char_prefix("abc", 0), "");
    }

    proptest! {
        #[test]
        fn prop_symmetric(a in "[a-d]{0,8}", b in "[a-d]{0,8}") {
            prop_assert_eq!(levenshtein(&a, &b), levenshtein(&b, &a));
        }

        #[test]
        fn prop_zero_iff_equal(a in "[a-c]{0,6}", b in "[a-c]{0,6}") {
            prop_assert_eq!(levenshtein(&a, &b) == 0, a == b);
        }

        #[test]
        fn prop_bounded_by_longer(a in "\\PC{0,8}", b in "\\PC{0,8}") {
            let d = levenshtein(&a, &b);
            let la = a.chars().count();
            let lb = b.chars().count();
            prop_assert!(d <= la.max(lb));
            prop_assert!(d >= la.abs_diff(lb));
        }
    }
}
