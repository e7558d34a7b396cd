//! Typed-answer grading for write and test sessions.
//!
//! Write mode forgives small typos via Levenshtein distance; test mode
//! grades exactly (case-insensitive, trimmed). Callers must reject
//! empty/whitespace-only submissions before grading.

/// Normalize an answer for comparison: trim and lowercase.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Exact comparison after normalization. Used by test mode and the
/// learn-mode advisory check.
pub fn exact_match(typed: &str, correct: &str) -> bool {
    normalize(typed) == normalize(correct)
}

/// Edit distance allowed before a typed answer is rejected, based on the
/// normalized length of the correct term.
pub fn typo_allowance(term_len: usize) -> usize {
    if term_len > 7 {
        2
    } else {
        1
    }
}

/// Typo-tolerant grade used by write mode.
pub fn grade_typed(typed: &str, correct: &str) -> bool {
    let typed = normalize(typed);
    let correct = normalize(correct);
    if typed == correct {
        return true;
    }
    levenshtein_distance(&typed, &correct) <= typo_allowance(correct.chars().count())
}

/// Calculate Levenshtein distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Use two rows instead of the full matrix for memory efficiency
    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;

        for j in 1..=n {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };

            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levenshtein_basics() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("saturday", "sunday"), 3);
    }

    #[test]
    fn grade_is_reflexive() {
        for word in ["a", "cell", "photosynthesis", "  spaced  "] {
            assert!(grade_typed(word, word), "failed for {word:?}");
        }
    }

    #[test]
    fn grade_tolerates_single_typo_on_short_words() {
        assert!(grade_typed("recieve", "receive"));
        assert!(grade_typed("CELL ", "cell"));
    }

    #[test]
    fn grade_rejects_beyond_allowance() {
        assert!(!grade_typed("recieve", "deceive"));
        assert!(!grade_typed("cat", "dog"));
    }

    #[test]
    fn long_terms_get_two_edits() {
        // 14 chars, distance 2
        assert!(grade_typed("fotosynthesis", "photosynthesis"));
        assert!(!grade_typed("futosinthesis", "photosynthesis"));
    }

    #[test]
    fn allowance_boundary_at_seven_chars() {
        assert_eq!(typo_allowance(7), 1);
        assert_eq!(typo_allowance(8), 2);
    }

    #[test]
    fn exact_match_is_case_insensitive_and_trimmed() {
        assert!(exact_match("  Mitosis ", "mitosis"));
        assert!(!exact_match("mitosi", "mitosis"));
    }
}
