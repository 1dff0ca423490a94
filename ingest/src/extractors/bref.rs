//! Basketball-Reference scrape heuristics are explicitly out of scope
//! (§1's Non-goals list "the specific HTML/PDF parsing heuristics for
//! each vendor" as a replaceable strategy). This extractor only wraps
//! the raw page body so Bref data can flow into the crosswalk loader
//! (matching games up by date/matchup) without pretending to parse full
//! box scores out of HTML that was never a first-class source.

use serde_json::Value;

use super::{RawValue, RowDict};

pub fn extract_page_body(page: &Value) -> Vec<RowDict> {
    let Some(html) = page.as_str() else {
        return Vec::new();
    };

    let mut dict = RowDict::new();
    dict.insert("raw_html", RawValue::Str(html.to_string()));
    vec![dict]
}
