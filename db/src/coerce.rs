//! Null-sentinel coercion helpers. Vendor JSON payloads encode "no value"
//! inconsistently — empty strings, the literal string `"None"`, bare
//! JSON null, or out-of-range placeholders like `-1` for a missing
//! distance — so every raw field read out of a [`crate::RowDict`] passes
//! through one of these before it reaches a model struct.

use serde_json::Value;

const NULL_SENTINELS: &[&str] = &["", "None", "null", "NA", "N/A", "-", "—"];

/// Treats any run of one or more hyphens or em dashes (`-`, `--`, `—`) as a
/// null placeholder alongside the exact-match sentinels, since vendor
/// tables use dash runs of varying length for "no value".
fn is_null_sentinel(s: &str) -> bool {
    let trimmed = s.trim();
    NULL_SENTINELS.iter().any(|sentinel| sentinel.eq_ignore_ascii_case(trimmed))
        || (!trimmed.is_empty() && trimmed.chars().all(|c| c == '-' || c == '—'))
}

pub fn to_str_or_none(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if is_null_sentinel(s) => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn to_int_or_none(value: &Value) -> Option<i64> {
    match value {
        Value::Null => None,
        Value::Number(n) => n.as_i64(),
        Value::String(s) if is_null_sentinel(s) => None,
        Value::String(s) => strip_numeric_formatting(s).parse::<i64>().ok(),
        _ => None,
    }
}

pub fn to_float_or_none(value: &Value) -> Option<f64> {
    match value {
        Value::Null => None,
        Value::Number(n) => n.as_f64(),
        Value::String(s) if is_null_sentinel(s) => None,
        Value::String(s) => strip_numeric_formatting(s)
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Strips thousands separators and percent signs vendor tables sometimes
/// embed in otherwise-numeric strings, e.g. `"1,234"` or `"45.2%"`.
fn strip_numeric_formatting(s: &str) -> String {
    s.trim().replace(',', "").replace('%', "")
}

pub fn to_bool_or_none(value: &Value) -> Option<bool> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) if is_null_sentinel(s) => None,
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "1" | "y" | "yes" => Some(true),
            "false" | "f" | "0" | "n" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn str_sentinels_become_none() {
        assert_eq!(to_str_or_none(&json!("")), None);
        assert_eq!(to_str_or_none(&json!("None")), None);
        assert_eq!(to_str_or_none(&json!("NA")), None);
        assert_eq!(to_str_or_none(&json!("Jayson Tatum")), Some("Jayson Tatum".to_string()));
    }

    #[test]
    fn int_parses_numeric_strings() {
        assert_eq!(to_int_or_none(&json!("42")), Some(42));
        assert_eq!(to_int_or_none(&json!(42)), Some(42));
        assert_eq!(to_int_or_none(&json!("N/A")), None);
        assert_eq!(to_int_or_none(&json!("1,234")), Some(1234));
    }

    #[test]
    fn float_and_bool_coerce() {
        assert_eq!(to_float_or_none(&json!("3.5")), Some(3.5));
        assert_eq!(to_float_or_none(&json!(null)), None);
        assert_eq!(to_bool_or_none(&json!("Y")), Some(true));
        assert_eq!(to_bool_or_none(&json!("0")), Some(false));
        assert_eq!(to_bool_or_none(&json!("-")), None);
    }

    #[test]
    fn dash_run_sentinels_become_none() {
        assert_eq!(to_str_or_none(&json!("--")), None);
        assert_eq!(to_str_or_none(&json!("—")), None);
        assert_eq!(to_int_or_none(&json!("--")), None);
    }

    #[test]
    fn numeric_strings_strip_commas_and_percent() {
        assert_eq!(to_float_or_none(&json!("45.2%")), Some(45.2));
        assert_eq!(to_float_or_none(&json!("1,234.5")), Some(1234.5));
    }

    #[test]
    fn float_rejects_non_finite_strings() {
        assert_eq!(to_float_or_none(&json!("NaN")), None);
        assert_eq!(to_float_or_none(&json!("inf")), None);
        assert_eq!(to_float_or_none(&json!("-infinity")), None);
    }
}
