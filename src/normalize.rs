use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::records::{NormalizedRecord, RawRecord};

// ---------------------------------------------------------------------------
// Keys and values
// ---------------------------------------------------------------------------

/// Trim, collapse whitespace runs, uppercase. Applied to record keys, shop
/// names and mode labels so lookups across sheets agree regardless of how a
/// cell was typed.
pub fn normalize_key(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase()
}

/// Coerce a raw cell to a trimmed string. Numbers keep their sheet
/// rendering (date serials stay numeric text for `parse_date`).
pub fn clean_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Clean up one raw row: canonical keys, trimmed string values.
pub fn normalize(raw: &RawRecord) -> NormalizedRecord {
    let mut rec = NormalizedRecord::default();
    for (key, value) in raw {
        rec.insert(normalize_key(key), clean_value(value));
    }
    rec
}

// ---------------------------------------------------------------------------
// Amounts
// ---------------------------------------------------------------------------

/// Parse a locale-formatted cell into a signed amount. Thousands
/// separators, quotes and whitespace are stripped; accountants' parentheses
/// negate. Anything else is 0; blank cells are routine in these sheets.
pub fn parse_amount(raw: &str) -> f64 {
    let s = raw.replace([',', '"'], "").replace(char::is_whitespace, "");
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        return -inner.parse::<f64>().unwrap_or(0.0);
    }
    s.parse().unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

static SERIAL_RE: OnceLock<Regex> = OnceLock::new();

/// Free-text formats seen in the sheets besides serials and delimited dates.
const TEXT_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Normalize a date cell to ISO `YYYY-MM-DD`.
///
/// Handles three encodings: numeric spreadsheet serials (days since
/// 1899-12-30), delimited `D/M/Y`-or-`M/D/Y` text (a first component over
/// 12 means day-first; two-digit years get a "20" prefix), and a short list
/// of free-text formats. Unparseable input passes through unchanged.
pub fn parse_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    let serial_re =
        SERIAL_RE.get_or_init(|| Regex::new(r"^\d+(\.\d+)?$").expect("serial pattern"));
    if serial_re.is_match(raw) {
        if let Ok(serial) = raw.parse::<f64>() {
            return excel_serial_to_date(serial);
        }
    }

    let parts: Vec<&str> = raw.split(['/', '-', '.']).collect();
    if parts.len() == 3 {
        if let Some(date) = from_delimited(&parts) {
            return date;
        }
    }

    for format in TEXT_FORMATS {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, format) {
            return date.format("%Y-%m-%d").to_string();
        }
    }

    raw.to_string()
}

fn from_delimited(parts: &[&str]) -> Option<String> {
    let first: u32 = parts[0].trim().parse().ok()?;
    let second: u32 = parts[1].trim().parse().ok()?;
    let year_raw = parts[2].trim();
    let mut year: i32 = year_raw.parse().ok()?;
    if year_raw.len() == 2 {
        year += 2000;
    }
    let (month, day) = if first > 12 { (second, first) } else { (first, second) };
    chrono::NaiveDate::from_ymd_opt(year, month, day)
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Sheet date serials count days from 1899-12-30 (the epoch that absorbs
/// the 1900 leap-year bug).
pub fn excel_serial_to_date(serial: f64) -> String {
    let base = chrono::NaiveDate::from_ymd_opt(1899, 12, 30).unwrap();
    let date = base + chrono::Duration::days(serial as i64);
    date.format("%Y-%m-%d").to_string()
}

/// True for strings `parse_date` fully canonicalized. The ledger only
/// buckets canonical dates; passthrough leftovers are dropped upstream.
pub fn is_canonical_date(s: &str) -> bool {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("  total   deposit "), "TOTAL DEPOSIT");
        assert_eq!(normalize_key("Shop"), "SHOP");
        assert_eq!(normalize_key(""), "");
    }

    #[test]
    fn test_normalize_record_cleans_keys_and_values() {
        let mut raw = RawRecord::new();
        raw.insert(" SHOP ".to_string(), json!("  Acme Store  "));
        raw.insert("amount".to_string(), json!(1200.5));
        raw.insert("DATE".to_string(), json!(null));
        let rec = normalize(&raw);
        assert_eq!(rec.get("SHOP"), "Acme Store");
        assert_eq!(rec.get("AMOUNT"), "1200.5");
        assert_eq!(rec.get("DATE"), "");
        assert_eq!(rec.get("MISSING"), "");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,200.50"), 1200.50);
        assert_eq!(parse_amount("  -42.50  "), -42.5);
        assert_eq!(parse_amount("\"500.00\""), 500.0);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("abc"), 0.0);
    }

    #[test]
    fn test_parse_amount_parenthesized_negatives() {
        assert_eq!(parse_amount("(300)"), -300.0);
        assert_eq!(parse_amount("(1,200.50)"), -1200.50);
        assert_eq!(parse_amount("( 75.25 )"), -75.25);
    }

    #[test]
    fn test_parse_date_serial() {
        assert_eq!(parse_date("45000"), "2023-03-15");
        assert_eq!(parse_date("45000.5"), "2023-03-15");
        assert_eq!(excel_serial_to_date(45667.0), "2025-01-10");
    }

    #[test]
    fn test_parse_date_delimited_day_first_when_over_twelve() {
        assert_eq!(parse_date("25/12/2024"), "2024-12-25");
        assert_eq!(parse_date("13-01-2024"), "2024-01-13");
    }

    #[test]
    fn test_parse_date_delimited_month_first_otherwise() {
        assert_eq!(parse_date("03/04/2024"), "2024-03-04");
        assert_eq!(parse_date("1/2/2024"), "2024-01-02");
    }

    #[test]
    fn test_parse_date_two_digit_year() {
        assert_eq!(parse_date("25/12/24"), "2024-12-25");
        assert_eq!(parse_date("3/4/24"), "2024-03-04");
    }

    #[test]
    fn test_parse_date_free_text_and_iso() {
        assert_eq!(parse_date("2024-05-06"), "2024-05-06");
        assert_eq!(parse_date("Jan 5, 2024"), "2024-01-05");
        assert_eq!(parse_date("5 Jan 2024"), "2024-01-05");
    }

    #[test]
    fn test_parse_date_passthrough() {
        assert_eq!(parse_date("pending"), "pending");
        assert_eq!(parse_date(""), "");
        // impossible calendar date falls through untouched
        assert_eq!(parse_date("13/13/2024"), "13/13/2024");
    }

    #[test]
    fn test_is_canonical_date() {
        assert!(is_canonical_date("2024-01-02"));
        assert!(!is_canonical_date("pending"));
        assert!(!is_canonical_date(""));
    }
}
