//! Numeric parsing for scraped text.
//!
//! Site text rarely hands over a clean integer: counters render as "1,234",
//! labels as "Total Problems Solved: 567", activity widgets as "89 problems".
//! These helpers pull the first plausible count out of such text.

/// Extract the first non-negative integer token from `text`, tolerating
/// thousands separators inside the token. Returns `None` for text with no
/// digits ("N/A") or where the first numeric token is negative.
pub fn first_count(text: &str) -> Option<u64> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            // Negative values are never a valid count.
            if i > 0 && bytes[i - 1] == b'-' {
                i += 1;
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b',') {
                    i += 1;
                }
                continue;
            }
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b',') {
                i += 1;
            }
            let token: String = text[start..i].chars().filter(|c| *c != ',').collect();
            return token.parse().ok();
        }
        i += 1;
    }
    None
}

/// Parse a count and reject values above `max`. Selector and text-scan
/// strategies use the ceiling to discard false-positive matches (an unrelated
/// number that happens to sit near the target element or marker).
pub fn bounded_count(text: &str, max: u64) -> Option<u64> {
    first_count(text).filter(|n| *n <= max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_thousands_separators() {
        assert_eq!(first_count("1,234"), Some(1234));
        assert_eq!(first_count("12,345,678 submissions"), Some(12_345_678));
    }

    #[test]
    fn takes_first_token_from_labelled_text() {
        assert_eq!(first_count("Total Problems Solved: 567"), Some(567));
        assert_eq!(first_count("89 problems"), Some(89));
    }

    #[test]
    fn rejects_non_numeric_and_negative() {
        assert_eq!(first_count("N/A"), None);
        assert_eq!(first_count(""), None);
        assert_eq!(first_count("-42"), None);
        assert_eq!(first_count("-42 and -7"), None);
        // Scanning continues past a negative token
        assert_eq!(first_count("-42 but 7"), Some(7));
    }

    #[test]
    fn bounded_count_applies_ceiling() {
        assert_eq!(bounded_count("900", 1000), Some(900));
        assert_eq!(bounded_count("1,000,001", 1000), None);
    }
}
