//! Extractors are pure shape-only functions from a vendor response tree
//! to a list of flat [`RowDict`]s, per §4.5. They never coerce types or
//! map enum codes — that's the preprocessor's job, applied uniformly
//! right after extraction regardless of vendor.

pub mod bref;
pub mod gamebooks;
pub mod nba_stats;

use std::collections::HashMap;

/// A single untyped field value straight off the wire. Kept distinct
/// from `serde_json::Value` so the ambiguity vendors introduce — is
/// `"3"` a string or a number? — is resolved exactly once, by the
/// preprocessor, rather than silently by whichever code happens to read
/// the field first.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl RawValue {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            RawValue::Str(s) => serde_json::Value::String(s.clone()),
            RawValue::Int(i) => serde_json::Value::from(*i),
            RawValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            RawValue::Bool(b) => serde_json::Value::Bool(*b),
            RawValue::Null => serde_json::Value::Null,
        }
    }

    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawValue::Null,
            serde_json::Value::Bool(b) => RawValue::Bool(*b),
            serde_json::Value::String(s) => RawValue::Str(s.clone()),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    RawValue::Int(i)
                } else {
                    RawValue::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            other => RawValue::Str(other.to_string()),
        }
    }
}

pub type RowDict = HashMap<&'static str, RawValue>;
