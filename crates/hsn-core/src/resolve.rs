//! Hierarchy resolution
//!
//! HSN codes nest in 2-digit segments: chapter (`01`), heading (`0101`),
//! sub-heading (`010121`), tariff item (`01012100`). Resolving a code walks
//! its prefixes from the full code down to the chapter and collects every
//! prefix the index knows about.

use serde::{Deserialize, Serialize};

use crate::code::digits_only;
use crate::index::CodeIndex;

/// Width of one hierarchy level, in digits
pub const SEGMENT_WIDTH: usize = 2;

/// One level of a resolved hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyMatch {
    pub code: String,
    pub description: String,
}

/// Result of resolving a single candidate code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// At least one prefix of `code` is indexed. `matches` runs from the most
    /// specific level to the least specific.
    Found {
        code: String,
        matches: Vec<HierarchyMatch>,
    },
    /// `code` has digits but none of its prefixes are indexed
    NotFound { code: String },
    /// The query contained no digits at all
    NoValidCode,
}

impl Outcome {
    /// The cleaned code, unless the query had no digits
    pub fn code(&self) -> Option<&str> {
        match self {
            Outcome::Found { code, .. } | Outcome::NotFound { code } => Some(code),
            Outcome::NoValidCode => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found { .. })
    }
}

/// Prefix lengths to test for a code of `len` digits.
///
/// The full length is always tested once, even when odd. After that the
/// length steps down by [`SEGMENT_WIDTH`] and stops before dropping below
/// one segment, so `7` yields `7, 5, 3` and never `6` or `1`.
fn prefix_lengths(len: usize) -> impl Iterator<Item = usize> {
    std::iter::successors(Some(len), |current| {
        current
            .checked_sub(SEGMENT_WIDTH)
            .filter(|next| *next >= SEGMENT_WIDTH)
    })
}

/// Resolve one query string against the index.
///
/// Non-digit characters are stripped first; a query with no digits yields
/// [`Outcome::NoValidCode`]. Missing intermediate levels are skipped without
/// leaving a gap.
pub fn resolve(query: &str, index: &CodeIndex) -> Outcome {
    let cleaned = digits_only(query);
    if cleaned.is_empty() {
        return Outcome::NoValidCode;
    }

    // `cleaned` is ASCII, so byte slicing is on char boundaries
    let matches: Vec<HierarchyMatch> = prefix_lengths(cleaned.len())
        .filter_map(|len| {
            let prefix = &cleaned[..len];
            index.get(prefix).map(|description| HierarchyMatch {
                code: prefix.to_string(),
                description: description.to_string(),
            })
        })
        .collect();

    if matches.is_empty() {
        Outcome::NotFound { code: cleaned }
    } else {
        Outcome::Found {
            code: cleaned,
            matches,
        }
    }
}

/// Resolve several candidates independently, preserving their order.
///
/// Duplicates are resolved twice; no candidate affects another.
pub fn resolve_all<I, S>(queries: I, index: &CodeIndex) -> Vec<Outcome>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    queries
        .into_iter()
        .map(|query| resolve(query.as_ref(), index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::CodeRecord;

    fn index_of(entries: &[(&str, &str)]) -> CodeIndex {
        CodeIndex::from_records(entries.iter().map(|(code, description)| CodeRecord {
            code: code.to_string(),
            description: description.to_string(),
        }))
    }

    fn codes(outcome: &Outcome) -> Vec<&str> {
        match outcome {
            Outcome::Found { matches, .. } => matches.iter().map(|m| m.code.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn test_prefix_lengths() {
        assert_eq!(prefix_lengths(8).collect::<Vec<_>>(), vec![8, 6, 4, 2]);
        assert_eq!(prefix_lengths(7).collect::<Vec<_>>(), vec![7, 5, 3]);
        assert_eq!(prefix_lengths(3).collect::<Vec<_>>(), vec![3]);
        assert_eq!(prefix_lengths(2).collect::<Vec<_>>(), vec![2]);
        assert_eq!(prefix_lengths(1).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_full_hierarchy_longest_first() {
        let index = index_of(&[("12345678", "item"), ("123456", "sub"), ("1234", "heading")]);
        let outcome = resolve("12345678", &index);

        assert_eq!(
            outcome,
            Outcome::Found {
                code: "12345678".to_string(),
                matches: vec![
                    HierarchyMatch {
                        code: "12345678".to_string(),
                        description: "item".to_string()
                    },
                    HierarchyMatch {
                        code: "123456".to_string(),
                        description: "sub".to_string()
                    },
                    HierarchyMatch {
                        code: "1234".to_string(),
                        description: "heading".to_string()
                    },
                ],
            }
        );
    }

    #[test]
    fn test_missing_intermediate_is_skipped() {
        let index = index_of(&[("12345678", "item"), ("1234", "heading")]);
        let outcome = resolve("12345678", &index);

        assert_eq!(codes(&outcome), vec!["12345678", "1234"]);
    }

    #[test]
    fn test_ancestor_only_match() {
        let index = index_of(&[("01", "Live animals")]);
        let outcome = resolve("01019999", &index);

        assert_eq!(outcome.code(), Some("01019999"));
        assert_eq!(codes(&outcome), vec!["01"]);
    }

    #[test]
    fn test_odd_length_never_tests_even_prefixes() {
        let index = index_of(&[("123", "odd"), ("12", "chapter"), ("1234", "heading")]);

        // 12345 -> 12345, 123 ; never 1234 or 12
        assert_eq!(codes(&resolve("12345", &index)), vec!["123"]);
    }

    #[test]
    fn test_single_digit() {
        let empty = index_of(&[]);
        assert_eq!(
            resolve("1", &empty),
            Outcome::NotFound {
                code: "1".to_string()
            }
        );

        let index = index_of(&[("1", "one")]);
        assert_eq!(codes(&resolve("1", &index)), vec!["1"]);
    }

    #[test]
    fn test_no_valid_code() {
        let index = index_of(&[("01", "Live animals")]);

        assert_eq!(resolve("abc", &index), Outcome::NoValidCode);
        assert_eq!(resolve("", &index), Outcome::NoValidCode);
        assert_eq!(resolve("abc", &index).code(), None);
    }

    #[test]
    fn test_query_is_cleaned_before_walk() {
        let index = index_of(&[("0101", "Horses"), ("01", "Live animals")]);
        let outcome = resolve("HSN 01.01", &index);

        assert_eq!(outcome.code(), Some("0101"));
        assert_eq!(codes(&outcome), vec!["0101", "01"]);
    }

    #[test]
    fn test_empty_description_still_counts() {
        let index = index_of(&[("0101", "")]);
        assert!(resolve("0101", &index).is_found());
    }

    #[test]
    fn test_empty_index_not_found() {
        let index = index_of(&[]);
        for query in ["01", "0101", "12345678", "9"] {
            assert!(matches!(resolve(query, &index), Outcome::NotFound { .. }));
        }
    }

    #[test]
    fn test_idempotent() {
        let index = index_of(&[("0101", "Horses"), ("01", "Live animals")]);
        assert_eq!(resolve("010121", &index), resolve("010121", &index));
    }

    #[test]
    fn test_resolve_all_preserves_order_and_duplicates() {
        let index = index_of(&[("01", "Live animals")]);
        let outcomes = resolve_all(["99", "01", "x", "01"], &index);

        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[0], Outcome::NotFound { code: "99".to_string() });
        assert!(outcomes[1].is_found());
        assert_eq!(outcomes[2], Outcome::NoValidCode);
        assert_eq!(outcomes[1], outcomes[3]);
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let json = serde_json::to_value(Outcome::NotFound {
            code: "99".to_string(),
        })
        .unwrap();

        assert_eq!(json["outcome"], "not_found");
        assert_eq!(json["code"], "99");
    }
}
