use nba_db::models::NewStartingLineup;

use crate::preprocess::PreprocessedRow;

/// Only the starters (`position` present) become starting-lineup rows;
/// bench players are filtered out upstream by the extractor's
/// `START_POSITION` presence, matching §3's "5 rows per game per team"
/// invariant.
pub fn transform_lineup(game_id: &str, rows: &[PreprocessedRow]) -> Vec<NewStartingLineup> {
    rows.iter()
        .filter_map(|row| {
            let player_slug = row.str("player_slug")?.to_string();
            let team_tricode = row.str("team_tricode")?.to_string();
            let position = row.str("position").map(str::to_string);
            if position.as_deref().unwrap_or("").is_empty() {
                return None;
            }
            Some(NewStartingLineup {
                game_id: game_id.to_string(),
                team_tricode,
                player_slug,
                player_id: row.int("player_id"),
                position,
            })
        })
        .collect()
}
