/// Trim and collapse every run of whitespace (including non-breaking
/// spaces and line breaks) into a single ASCII space
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove every whitespace character, e.g. from a registration number
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Parse a counter such as an announcement number (`"0012"` -> 12)
pub fn parse_integer(text: &str) -> Option<u64> {
    text.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  13\u{a0}janvier \n\t 2008 "), "13 janvier 2008");
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace("   "), "");
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("0012"), Some(12));
        assert_eq!(parse_integer(" 7 "), Some(7));
        assert_eq!(parse_integer("12a"), None);
        assert_eq!(parse_integer(""), None);
    }

    #[test]
    fn test_strip_whitespace() {
        assert_eq!(strip_whitespace("123 456 789"), "123456789");
        assert_eq!(strip_whitespace("\u{a0}987\u{a0}654 321 "), "987654321");
    }
}
