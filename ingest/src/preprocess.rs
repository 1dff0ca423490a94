//! Preprocessing (§4.5) runs once, immediately after extraction, and is
//! the only place vendor type ambiguity gets resolved: every field is
//! coerced through `nba_db::coerce`'s null-sentinel helpers, and any
//! field carrying a known vendor enum code is mapped to its canonical
//! string token via the static tables in `nba_db::enums`.

use nba_db::coerce;

use crate::extractors::RowDict;

/// A coerced, still-untyped row: every value is `Option<CoercedValue>`
/// so downstream transformers pick the concrete type they expect
/// without re-deciding what "null" means.
#[derive(Debug, Clone, Default)]
pub struct PreprocessedRow {
    pub strings: std::collections::HashMap<&'static str, String>,
    pub ints: std::collections::HashMap<&'static str, i64>,
    pub floats: std::collections::HashMap<&'static str, f64>,
    pub bools: std::collections::HashMap<&'static str, bool>,
}

impl PreprocessedRow {
    pub fn str(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        self.ints.get(key).copied()
    }

    pub fn float(&self, key: &str) -> Option<f64> {
        self.floats.get(key).copied()
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.bools.get(key).copied()
    }
}

/// Field-name suffixes (plus an explicit allowlist) that mark a value as
/// an enum code needing vendor→canonical mapping rather than plain
/// numeric/string coercion, per §4.5.
const ENUM_SUFFIXES: &[&str] = &["_type", "_status", "_role", "_result", "_zone", "_kind", "_code"];
const ENUM_ALLOWLIST: &[&str] = &["event_type_code", "status_code", "shot_zone_raw"];

fn looks_like_enum_field(key: &str) -> bool {
    ENUM_SUFFIXES.iter().any(|suffix| key.ends_with(suffix)) || ENUM_ALLOWLIST.contains(&key)
}

/// Runs every field of a raw extracted row through the coercion helpers.
/// A value that looks numeric stays numeric (string coercion is tried
/// last), which keeps a field's type stable across rows even though
/// vendors mix stringified and native-typed encodings of the same
/// column.
pub fn preprocess_row(row: &RowDict) -> PreprocessedRow {
    let mut out = PreprocessedRow::default();

    for (key, raw) in row {
        let json = raw.to_json();

        if looks_like_enum_field(key) {
            // Enum mapping proper happens in the transform layer, which
            // knows which `phf::Map` applies to which field; here we
            // only normalize the code itself to a string or int so the
            // mapper doesn't have to juggle JSON variants.
            if let Some(i) = coerce::to_int_or_none(&json) {
                out.ints.insert(key, i);
            } else if let Some(s) = coerce::to_str_or_none(&json) {
                out.strings.insert(key, s);
            }
            continue;
        }

        if let Some(b) = coerce::to_bool_or_none(&json) {
            if matches!(json, serde_json::Value::Bool(_)) {
                out.bools.insert(key, b);
                continue;
            }
        }
        if let Some(i) = coerce::to_int_or_none(&json) {
            out.ints.insert(key, i);
            continue;
        }
        if let Some(f) = coerce::to_float_or_none(&json) {
            out.floats.insert(key, f);
            continue;
        }
        if let Some(s) = coerce::to_str_or_none(&json) {
            out.strings.insert(key, s);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::RawValue;

    #[test]
    fn numeric_strings_coerce_to_int() {
        let mut row = RowDict::new();
        row.insert("points", RawValue::Str("24".to_string()));
        let pre = preprocess_row(&row);
        assert_eq!(pre.int("points"), Some(24));
    }

    #[test]
    fn null_sentinels_drop_the_field() {
        let mut row = RowDict::new();
        row.insert("note", RawValue::Str("N/A".to_string()));
        let pre = preprocess_row(&row);
        assert_eq!(pre.str("note"), None);
    }

    #[test]
    fn enum_fields_stay_as_code_for_the_transformer() {
        let mut row = RowDict::new();
        row.insert("event_type_code", RawValue::Int(99));
        let pre = preprocess_row(&row);
        assert_eq!(pre.int("event_type_code"), Some(99));
    }
}
