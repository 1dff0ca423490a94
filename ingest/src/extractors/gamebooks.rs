//! Gamebooks extraction is already done by [`fetch::GamebooksClient`] —
//! the PDF download, multi-method text extraction, and regex section
//! detection all live in the fetch layer since they're fetch-adjacent
//! I/O concerns. This extractor's only job is reshaping the already-
//! parsed [`fetch::sources::GamebooksParseResult`] into the uniform
//! `RowDict` shape the rest of the ETL pipeline expects.

use fetch::sources::GamebooksParseResult;

use super::{RawValue, RowDict};

pub fn extract_referee_assignments(result: &GamebooksParseResult) -> Vec<RowDict> {
    result
        .referees
        .iter()
        .map(|assignment| {
            let mut dict = RowDict::new();
            dict.insert("referee_slug", RawValue::Str(assignment.name.clone()));
            dict.insert("role", RawValue::Str(format!("{:?}", assignment.role)));
            dict
        })
        .collect()
}

pub fn extract_referee_alternates(result: &GamebooksParseResult) -> Vec<RowDict> {
    result
        .alternates
        .iter()
        .map(|name| {
            let mut dict = RowDict::new();
            dict.insert("referee_slug", RawValue::Str(name.clone()));
            dict
        })
        .collect()
}
