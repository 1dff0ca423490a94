//! Injury-status snapshot transform (§4.4's supporting entities):
//! append-only, point-in-time rows rather than a mutable current-status
//! table, so every ingestion run's report becomes its own row stamped
//! with the time it was fetched.

use chrono::Utc;
use nba_db::models::NewInjuryStatusSnapshot;

use crate::preprocess::PreprocessedRow;

pub fn transform_snapshots(game_id: &str, rows: &[PreprocessedRow]) -> Vec<NewInjuryStatusSnapshot> {
    let snapshot_at = Utc::now();
    rows.iter()
        .filter(|row| row.str("game_id") == Some(game_id))
        .filter_map(|row| {
            Some(NewInjuryStatusSnapshot {
                game_id: game_id.to_string(),
                player_slug: row.str("player_slug")?.to_string(),
                team_tricode: row.str("team_tricode")?.to_string(),
                status: row.str("status").unwrap_or("unknown").to_string(),
                snapshot_at,
                note: row.str("note").map(str::to_string),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[(&'static str, &str)]) -> PreprocessedRow {
        let mut row = PreprocessedRow::default();
        for (k, v) in fields {
            row.strings.insert(k, v.to_string());
        }
        row
    }

    #[test]
    fn filters_to_requested_game_and_drops_rows_missing_identity_fields() {
        let rows = vec![
            row(&[("game_id", "0022300123"), ("player_slug", "player-a"), ("team_tricode", "BOS"), ("status", "out")]),
            row(&[("game_id", "0022300999"), ("player_slug", "player-b"), ("team_tricode", "LAL"), ("status", "out")]),
            row(&[("game_id", "0022300123"), ("team_tricode", "BOS"), ("status", "out")]),
        ];

        let snapshots = transform_snapshots("0022300123", &rows);
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].player_slug, "player-a");
    }
}
