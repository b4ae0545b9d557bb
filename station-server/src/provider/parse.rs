//! Defensive parsing of provider output.
//!
//! Providers emit Python-dict-style text: single-quoted keys and values
//! rather than JSON's double quotes. Quote delimiters are normalised
//! before parsing. An apostrophe inside a value will still defeat the
//! parse; such output is flagged with the raw text preserved rather
//! than dropped.

use serde_json::Value;

use super::error::ProviderError;

/// Replace single-quote delimiters with double quotes.
pub fn normalize_quotes(raw: &str) -> String {
    raw.replace('\'', "\"")
}

/// Parse provider output into JSON after quote normalisation.
///
/// On failure the raw (un-normalised) text is preserved in the error.
pub fn loose_json(raw: &str) -> Result<Value, ProviderError> {
    let trimmed = raw.trim();
    serde_json::from_str(&normalize_quotes(trimmed)).map_err(|e| ProviderError::Parse {
        message: e.to_string(),
        raw: trimmed.to_string(),
    })
}

/// Extract a string field, treating null and empty strings as absent.
pub fn field_str(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Extract a numeric field, accepting numbers and numeric strings.
///
/// Non-numeric placeholders such as "N/A" yield `None`.
pub fn field_f64(value: &Value, key: &str) -> Option<f64> {
    match value.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_quoted_dict() {
        let value = loose_json("{'real_arrival': '14:45', 'delay': '15 min'}").unwrap();
        assert_eq!(field_str(&value, "real_arrival").unwrap(), "14:45");
        assert_eq!(field_str(&value, "delay").unwrap(), "15 min");
    }

    #[test]
    fn parses_plain_json_too() {
        let value = loose_json(r#"{"delay": "5 min"}"#).unwrap();
        assert_eq!(field_str(&value, "delay").unwrap(), "5 min");
    }

    #[test]
    fn malformed_output_preserves_raw() {
        let err = loose_json("not-json").unwrap_err();
        assert_eq!(err.raw(), Some("not-json"));
    }

    #[test]
    fn python_none_is_a_parse_error() {
        // A provider that found nothing prints the literal "None".
        let err = loose_json("None").unwrap_err();
        assert_eq!(err.raw(), Some("None"));
    }

    #[test]
    fn apostrophe_in_value_is_flagged_not_dropped() {
        let raw = "{'delay': 'o'clock'}";
        let err = loose_json(raw).unwrap_err();
        assert_eq!(err.raw(), Some(raw));
    }

    #[test]
    fn field_str_skips_null_and_empty() {
        let value = loose_json("{'delay': '', 'real_arrival': null}").unwrap();
        assert!(field_str(&value, "delay").is_none());
        assert!(field_str(&value, "real_arrival").is_none());
        assert!(field_str(&value, "missing").is_none());
    }

    #[test]
    fn field_f64_accepts_numbers_and_numeric_strings() {
        let value =
            loose_json("{'temperature': 24.3, 'humidity': '78', 'precipitation': 'N/A'}").unwrap();
        assert_eq!(field_f64(&value, "temperature"), Some(24.3));
        assert_eq!(field_f64(&value, "humidity"), Some(78.0));
        assert_eq!(field_f64(&value, "precipitation"), None);
        assert_eq!(field_f64(&value, "missing"), None);
    }

    #[test]
    fn whitespace_around_output_is_tolerated() {
        let value = loose_json("  {'delay': '2 min'}\n").unwrap();
        assert_eq!(field_str(&value, "delay").unwrap(), "2 min");
    }
}
