//! Lenient field extraction from loosely-typed Provider mappings.
//!
//! # Design
//! Provider payloads are inconsistent: counts arrive as numbers or numeric
//! strings, collections arrive as one mapping or a list of mappings, and
//! nested blocks are omitted, `null`, or empty. Every entity implements
//! `FromRaw` by pulling its fields through the helpers below, choosing the
//! default per field. None of these helpers fail; a value that cannot be
//! coerced decodes to the field's default.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::{Map, Value};

/// A raw JSON object as received from the Provider.
pub type RawMap = Map<String, Value>;

/// Build one typed value from a raw mapping. Never fails.
pub trait FromRaw: Sized {
    fn from_raw(raw: &RawMap) -> Self;
}

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid digits pattern"));

const DATETIME_FORMATS: [&str; 2] = ["%Y/%m/%d %H:%M", "%Y-%m-%d %H:%M:%S"];

/// JSON truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Render a scalar as text. Objects, arrays and `null` have no text form.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// String field defaulting to `""`.
pub fn string(raw: &RawMap, key: &str) -> String {
    opt_string(raw, key).unwrap_or_default()
}

/// String field that is `None` when absent or `null`.
pub fn opt_string(raw: &RawMap, key: &str) -> Option<String> {
    raw.get(key).and_then(scalar_text)
}

fn coerce_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn opt_u64(raw: &RawMap, key: &str) -> Option<u64> {
    raw.get(key).and_then(coerce_u64)
}

pub fn u64_or(raw: &RawMap, key: &str, default: u64) -> u64 {
    opt_u64(raw, key).unwrap_or(default)
}

pub fn opt_u32(raw: &RawMap, key: &str) -> Option<u32> {
    opt_u64(raw, key).and_then(|n| u32::try_from(n).ok())
}

pub fn u32_or(raw: &RawMap, key: &str, default: u32) -> u32 {
    opt_u32(raw, key).unwrap_or(default)
}

pub fn f64_or(raw: &RawMap, key: &str, default: f64) -> f64 {
    match raw.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}

/// Integer-or-boolean flag such as `pc_flag: 1`.
pub fn flag(raw: &RawMap, key: &str) -> bool {
    match raw.get(key) {
        Some(Value::String(s)) => matches!(s.trim(), "1" | "true"),
        Some(value) => is_truthy(value),
        None => false,
    }
}

/// First run of ASCII digits in a free-form price string.
///
/// `"210~"` yields 210; a string without digits yields `None`.
pub fn extract_price(text: &str) -> Option<u64> {
    DIGITS.find(text).and_then(|m| m.as_str().parse().ok())
}

/// Price field that may be a decorated string or a plain number.
pub fn price(raw: &RawMap, key: &str) -> Option<u64> {
    match raw.get(key)? {
        Value::String(s) => extract_price(s),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

/// Parse `2025/01/24 10:00` or `2025-01-24 10:00:04`.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

pub fn datetime(raw: &RawMap, key: &str) -> Option<NaiveDateTime> {
    raw.get(key).and_then(Value::as_str).and_then(parse_datetime)
}

/// Calendar date in `YYYY-MM-DD` form.
pub fn date(raw: &RawMap, key: &str) -> Option<NaiveDate> {
    raw.get(key)
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
}

/// Nested sub-entity, decoded only when the key holds a non-empty mapping.
pub fn nested<T: FromRaw>(raw: &RawMap, key: &str) -> Option<T> {
    match raw.get(key) {
        Some(Value::Object(obj)) if !obj.is_empty() => Some(T::from_raw(obj)),
        _ => None,
    }
}

/// Nested mapping, only when present and non-empty.
pub fn object<'a>(raw: &'a RawMap, key: &str) -> Option<&'a RawMap> {
    match raw.get(key) {
        Some(Value::Object(obj)) if !obj.is_empty() => Some(obj),
        _ => None,
    }
}

/// Collection that may arrive as one mapping or a list of mappings.
///
/// Both shapes decode to one ordered sequence; entries that are not
/// mappings are skipped.
pub fn list<T: FromRaw>(raw: &RawMap, key: &str) -> Vec<T> {
    raw.get(key).map(list_of).unwrap_or_default()
}

pub fn list_of<T: FromRaw>(value: &Value) -> Vec<T> {
    match value {
        Value::Object(obj) => vec![T::from_raw(obj)],
        Value::Array(entries) => entries
            .iter()
            .filter_map(Value::as_object)
            .map(T::from_raw)
            .collect(),
        _ => Vec::new(),
    }
}

/// List of strings that may also arrive as a single string.
pub fn string_list(raw: &RawMap, key: &str) -> Vec<String> {
    match raw.get(key) {
        Some(Value::Array(entries)) => entries.iter().filter_map(scalar_text).collect(),
        Some(value) => scalar_text(value).into_iter().collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> RawMap {
        value.as_object().cloned().unwrap()
    }

    #[derive(Debug, PartialEq)]
    struct Named(String);

    impl FromRaw for Named {
        fn from_raw(raw: &RawMap) -> Self {
            Named(string(raw, "name"))
        }
    }

    #[test]
    fn truthiness_follows_json_conventions() {
        for falsy in [json!(null), json!(false), json!(0), json!(""), json!([]), json!({})] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(1), json!("0"), json!([0]), json!({"a": null})] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let raw = map(json!({"total_count": "1234", "result_count": 20, "bad": "12a"}));
        assert_eq!(u64_or(&raw, "total_count", 0), 1234);
        assert_eq!(u32_or(&raw, "result_count", 0), 20);
        assert_eq!(u32_or(&raw, "bad", 7), 7);
        assert_eq!(u32_or(&raw, "missing", 1), 1);
        assert_eq!(opt_u32(&raw, "bad"), None);
    }

    #[test]
    fn strings_default_to_empty() {
        let raw = map(json!({"title": "x", "number": 3, "nothing": null}));
        assert_eq!(string(&raw, "title"), "x");
        assert_eq!(string(&raw, "number"), "3");
        assert_eq!(string(&raw, "missing"), "");
        assert_eq!(opt_string(&raw, "nothing"), None);
    }

    #[test]
    fn price_extraction_takes_first_digit_run() {
        assert_eq!(extract_price("210~"), Some(210));
        assert_eq!(extract_price("880"), Some(880));
        assert_eq!(extract_price("from 1,980"), Some(1));
        assert_eq!(extract_price("free"), None);
        assert_eq!(extract_price("２１０円（税込231）"), Some(231));
        assert_eq!(extract_price("２１０~"), None);
        assert_eq!(extract_price("4294967296"), Some(4_294_967_296));

        let raw = map(json!({"price": "300~", "list_price": 500}));
        assert_eq!(price(&raw, "price"), Some(300));
        assert_eq!(price(&raw, "list_price"), Some(500));
        assert_eq!(price(&raw, "missing"), None);
    }

    #[test]
    fn both_datetime_formats_parse_to_the_same_instant() {
        let slashed = parse_datetime("2025/01/24 10:00").unwrap();
        let dashed = parse_datetime("2025-01-24 10:00:00").unwrap();
        assert_eq!(slashed, dashed);
        assert_eq!(
            parse_datetime("2025-01-24 10:00:04").unwrap().date(),
            slashed.date()
        );
        assert_eq!(parse_datetime("24 Jan 2025"), None);
        assert_eq!(parse_datetime(""), None);
    }

    #[test]
    fn date_field_accepts_only_calendar_dates() {
        let raw = map(json!({"birthday": "1995-03-24", "bad": "1995/03/24"}));
        assert_eq!(date(&raw, "birthday"), NaiveDate::from_ymd_opt(1995, 3, 24));
        assert_eq!(date(&raw, "bad"), None);
    }

    #[test]
    fn single_mapping_and_list_normalize_to_one_sequence() {
        let single = map(json!({"directory": {"name": "a"}}));
        let many = map(json!({"directory": [{"name": "a"}, "skip", {"name": "b"}]}));
        assert_eq!(list::<Named>(&single, "directory"), vec![Named("a".into())]);
        assert_eq!(
            list::<Named>(&many, "directory"),
            vec![Named("a".into()), Named("b".into())]
        );
        assert!(list::<Named>(&single, "missing").is_empty());
    }

    #[test]
    fn nested_requires_non_empty_mapping() {
        let raw = map(json!({"full": {"name": "x"}, "empty": {}, "null": null, "text": "x", "list": [{"name": "x"}]}));
        assert_eq!(nested::<Named>(&raw, "full"), Some(Named("x".into())));
        assert_eq!(nested::<Named>(&raw, "empty"), None);
        assert_eq!(nested::<Named>(&raw, "null"), None);
        assert_eq!(nested::<Named>(&raw, "text"), None);
        assert_eq!(nested::<Named>(&raw, "list"), None);
        assert_eq!(nested::<Named>(&raw, "missing"), None);
    }

    #[test]
    fn flags_accept_numbers_and_strings() {
        let raw = map(json!({"pc_flag": 1, "sp_flag": 0, "s": "1"}));
        assert!(flag(&raw, "pc_flag"));
        assert!(!flag(&raw, "sp_flag"));
        assert!(flag(&raw, "s"));
        assert!(!flag(&raw, "missing"));
    }
}
