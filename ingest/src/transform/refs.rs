use nba_db::models::{NewRefereeAlternate, NewRefereeAssignment};

use crate::preprocess::PreprocessedRow;

pub fn transform_assignments(game_id: &str, rows: &[PreprocessedRow]) -> Vec<NewRefereeAssignment> {
    rows.iter()
        .enumerate()
        .filter_map(|(idx, row)| {
            Some(NewRefereeAssignment {
                game_id: game_id.to_string(),
                referee_slug: row.str("referee_slug")?.to_string(),
                role: row.str("role").unwrap_or("referee").to_string(),
                crew_position: Some(idx as i32 + 1),
            })
        })
        .collect()
}

pub fn transform_alternates(game_id: &str, rows: &[PreprocessedRow]) -> Vec<NewRefereeAlternate> {
    rows.iter()
        .filter_map(|row| {
            Some(NewRefereeAlternate {
                game_id: game_id.to_string(),
                referee_slug: row.str("referee_slug")?.to_string(),
            })
        })
        .collect()
}
