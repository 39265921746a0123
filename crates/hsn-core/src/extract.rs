//! Candidate code extraction from free text

use std::sync::LazyLock;

use regex::Regex;

/// Shortest digit run treated as a candidate code (one chapter)
pub const MIN_CANDIDATE_DIGITS: usize = 2;

/// Longest digit run treated as a candidate code (a full tariff item)
pub const MAX_CANDIDATE_DIGITS: usize = 8;

// ASCII word boundaries: a digit run glued to Devanagari or accented text
// still counts as standalone.
static CANDIDATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?-u:\b)[0-9]{{{MIN_CANDIDATE_DIGITS},{MAX_CANDIDATE_DIGITS}}}(?-u:\b)"
    ))
    .expect("candidate pattern is a valid regex")
});

/// Find every standalone run of 2 to 8 digits in `text`, in order.
///
/// A run must sit on ASCII word boundaries on both sides, so digits glued to
/// ASCII letters (`abc123`) or runs longer than eight digits produce nothing.
/// Repeated codes are returned each time they appear.
pub fn extract_candidates(text: &str) -> Vec<String> {
    CANDIDATE_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_in_order_with_duplicates() {
        assert_eq!(
            extract_candidates("check 0101 and 8471, then 0101 again"),
            vec!["0101", "8471", "0101"]
        );
    }

    #[test]
    fn test_length_bounds() {
        assert_eq!(extract_candidates("code 7"), Vec::<String>::new());
        assert_eq!(extract_candidates("code 12"), vec!["12"]);
        assert_eq!(extract_candidates("code 12345678"), vec!["12345678"]);
        assert_eq!(extract_candidates("code 123456789"), Vec::<String>::new());
    }

    #[test]
    fn test_requires_word_boundaries() {
        assert_eq!(extract_candidates("abc123 x9999"), Vec::<String>::new());
        assert_eq!(extract_candidates("(0402)."), vec!["0402"]);
    }

    #[test]
    fn test_non_ascii_neighbours_are_boundaries() {
        assert_eq!(extract_candidates("0101का विवरण"), vec!["0101"]);
        assert_eq!(extract_candidates("códé0101"), vec!["0101"]);
        assert_eq!(extract_candidates("कोड8471।"), vec!["8471"]);
    }

    #[test]
    fn test_dotted_code_splits_into_segments() {
        assert_eq!(extract_candidates("8471.30"), vec!["8471", "30"]);
    }

    #[test]
    fn test_no_digits() {
        assert!(extract_candidates("hello there").is_empty());
        assert!(extract_candidates("").is_empty());
    }
}
