//! Code string normalization

/// Strip every character that is not an ASCII digit.
///
/// Codes stay strings so significant leading zeros survive (`"0101"` is a
/// different heading from `"101"`).
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}
