use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use super::normalize_whitespace;

static ORDINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b1er\b").expect("valid ordinal regex"));
static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid ISO date regex"));

/// Convert a French date such as `"13 janvier 2008"` or `"1er mars 2021"`
/// into `YYYY-MM-DD`
///
/// Never fails: text that does not parse is returned unchanged, and an ISO
/// date is already normalized.
pub fn normalize_date(text: &str) -> String {
    let collapsed = normalize_whitespace(text);
    if ISO_DATE_RE.is_match(&collapsed) {
        return collapsed;
    }
    let rewritten = ORDINAL_RE.replace_all(&collapsed, "1");
    match parse_french_date(&rewritten) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => text.to_string(),
    }
}

/// Parse `D <month> YYYY` with a French month name
fn parse_french_date(text: &str) -> Option<NaiveDate> {
    let mut parts = text.split(' ');
    let day = parts.next()?;
    let month = parts.next()?;
    let year = parts.next()?;
    if parts.next().is_some() || year.len() != 4 {
        return None;
    }
    let day: u32 = day.parse().ok()?;
    let year: i32 = year.parse().ok()?;
    NaiveDate::from_ymd_opt(year, french_month(month)?, day)
}

/// Month number for a full or abbreviated French month name
fn french_month(name: &str) -> Option<u32> {
    let folded: String = name
        .trim_end_matches('.')
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'é' | 'è' | 'ê' => 'e',
            'û' | 'ù' => 'u',
            'â' | 'à' => 'a',
            other => other,
        })
        .collect();

    let month = match folded.as_str() {
        "janvier" | "janv" => 1,
        "fevrier" | "fevr" | "fev" => 2,
        "mars" => 3,
        "avril" | "avr" => 4,
        "mai" => 5,
        "juin" => 6,
        "juillet" | "juil" => 7,
        "aout" => 8,
        "septembre" | "sept" => 9,
        "octobre" | "oct" => 10,
        "novembre" | "nov" => 11,
        "decembre" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}
