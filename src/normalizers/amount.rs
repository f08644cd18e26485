use std::sync::LazyLock;

use regex::Regex;

use super::strip_whitespace;

/// The three ways an amount is written in the feeds, tried in this order
struct AmountPatterns {
    /// `30.000,00` or `30000,0`: decimals after a comma
    comma_decimal: Regex,
    /// `30,000.00` or `30000.0`: decimals after a dot
    dot_decimal: Regex,
    /// Digits only, once every `.` and `,` has been dropped
    integer: Regex,
}

impl AmountPatterns {
    fn new(prefix: &str, suffix: &str) -> Self {
        let build = |body: &str| {
            Regex::new(&format!("{prefix}{body}{suffix}")).expect("valid amount regex")
        };
        Self {
            comma_decimal: build(r"((?:\d|\.)+,\d?\d)"),
            dot_decimal: build(r"((?:\d|,)+\.\d?\d)"),
            integer: build(r"(\d+)"),
        }
    }

    /// First pattern that matches wins, the others are not attempted
    fn first_match(&self, haystack: &str) -> Option<f64> {
        if let Some(caps) = self.comma_decimal.captures(haystack) {
            return caps[1].replace('.', "").replace(',', ".").parse().ok();
        }
        if let Some(caps) = self.dot_decimal.captures(haystack) {
            return caps[1].replace(',', "").parse().ok();
        }
        let digits_only = haystack.replace(['.', ','], "");
        self.integer
            .captures(&digits_only)
            .and_then(|caps| caps[1].parse().ok())
    }
}

static PRICE_PATTERNS: LazyLock<AmountPatterns> = LazyLock::new(|| AmountPatterns::new("", "eur"));
static AMOUNT_PATTERNS: LazyLock<AmountPatterns> = LazyLock::new(|| AmountPatterns::new("^", "$"));

/// Extract the euro amount from an origin-of-funds text such as
/// `"Prix de vente : 30.000,00 EUR"`
pub fn extract_price(origine_fonds: &str) -> Option<f64> {
    let origine = strip_whitespace(&origine_fonds.to_lowercase());
    PRICE_PATTERNS.first_match(&origine)
}

/// Parse a bare amount such as a share capital (`"30000,00"`)
pub fn parse_amount(text: &str) -> Option<f64> {
    AMOUNT_PATTERNS.first_match(&strip_whitespace(text))
}
