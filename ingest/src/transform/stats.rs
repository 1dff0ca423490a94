use std::collections::HashMap;

use nba_db::models::{NewPlayerGameStats, NewTeamGameStats};
use serde_json::{json, Value};

use crate::preprocess::PreprocessedRow;

const ADVANCED_FIELDS: &[&str] = &[
    "off_rating",
    "def_rating",
    "net_rating",
    "ast_pct",
    "ast_to_tov",
    "ast_ratio",
    "oreb_pct",
    "dreb_pct",
    "reb_pct",
    "tov_pct",
    "efg_pct",
    "ts_pct",
    "pace",
    "pie",
];

const MISC_FIELDS: &[&str] = &[
    "pts_off_tov",
    "pts_2nd_chance",
    "pts_fb",
    "pts_paint",
    "opp_pts_off_tov",
    "opp_pts_2nd_chance",
    "opp_pts_fb",
    "opp_pts_paint",
];

const USAGE_FIELDS: &[&str] = &[
    "usg_pct",
    "pct_fgm",
    "pct_fga",
    "pct_fg3m",
    "pct_fg3a",
    "pct_ftm",
    "pct_fta",
    "pct_oreb",
    "pct_dreb",
    "pct_reb",
    "pct_ast",
    "pct_tov",
    "pct_stl",
    "pct_blk",
    "pct_pf",
    "pct_pts",
];

/// Keys the rows of a supplementary box-score endpoint by (team, player)
/// so the traditional-box-score pass can look up a player's advanced/misc/
/// usage row while building its own output.
fn index_by_player<'a>(rows: &'a [PreprocessedRow]) -> HashMap<(&'a str, &'a str), &'a PreprocessedRow> {
    rows.iter()
        .filter_map(|row| Some(((row.str("team_tricode")?, row.str("player_slug")?), row)))
        .collect()
}

/// Builds a JSON object from the named fields present on `row`, or `None`
/// if the row is absent or carries none of them — the supplementary
/// endpoints aren't always available (e.g. older seasons), and a present
/// but empty object would misrepresent that as "checked, nothing there".
fn json_from_fields(row: Option<&PreprocessedRow>, fields: &[&str]) -> Option<Value> {
    let row = row?;
    let mut map = serde_json::Map::new();
    for field in fields {
        if let Some(v) = row.float(field) {
            map.insert((*field).to_string(), json!(v));
        } else if let Some(v) = row.int(field) {
            map.insert((*field).to_string(), json!(v));
        }
    }
    if map.is_empty() { None } else { Some(Value::Object(map)) }
}

pub fn transform_player_stats(game_id: &str, rows: &[PreprocessedRow]) -> Vec<NewPlayerGameStats> {
    transform_player_stats_with_supplements(game_id, rows, &[], &[], &[])
}

/// Same as [`transform_player_stats`], additionally folding in the
/// advanced/misc/usage box-score endpoints when available.
pub fn transform_player_stats_with_supplements(
    game_id: &str,
    rows: &[PreprocessedRow],
    advanced_rows: &[PreprocessedRow],
    misc_rows: &[PreprocessedRow],
    usage_rows: &[PreprocessedRow],
) -> Vec<NewPlayerGameStats> {
    let advanced_by_player = index_by_player(advanced_rows);
    let misc_by_player = index_by_player(misc_rows);
    let usage_by_player = index_by_player(usage_rows);

    rows.iter()
        .filter_map(|row| {
            let player_slug = row.str("player_slug")?.to_string();
            let team_tricode = row.str("team_tricode")?.to_string();
            let starter = !row.str("position").unwrap_or("").is_empty();
            let key = (team_tricode.as_str(), player_slug.as_str());

            Some(NewPlayerGameStats {
                game_id: game_id.to_string(),
                team_tricode,
                player_slug,
                player_id: row.int("player_id"),
                starter,
                seconds_played: minutes_display_to_seconds(row.str("minutes_display")),
                points: row.int("points").unwrap_or(0) as i32,
                field_goals_made: row.int("field_goals_made").unwrap_or(0) as i32,
                field_goals_attempted: row.int("field_goals_attempted").unwrap_or(0) as i32,
                three_pm: row.int("three_pm").unwrap_or(0) as i32,
                three_pa: row.int("three_pa").unwrap_or(0) as i32,
                ft_made: row.int("ft_made").unwrap_or(0) as i32,
                ft_attempted: row.int("ft_attempted").unwrap_or(0) as i32,
                oreb: row.int("oreb").unwrap_or(0) as i32,
                dreb: row.int("dreb").unwrap_or(0) as i32,
                ast: row.int("ast").unwrap_or(0) as i32,
                stl: row.int("stl").unwrap_or(0) as i32,
                blk: row.int("blk").unwrap_or(0) as i32,
                tov: row.int("tov").unwrap_or(0) as i32,
                pf: row.int("pf").unwrap_or(0) as i32,
                advanced_stats: json_from_fields(advanced_by_player.get(&key).copied(), ADVANCED_FIELDS),
                misc_stats: json_from_fields(misc_by_player.get(&key).copied(), MISC_FIELDS),
                usage_stats: json_from_fields(usage_by_player.get(&key).copied(), USAGE_FIELDS),
            })
        })
        .collect()
}

/// Aggregates the per-team totals from the same player-stats rows, since
/// `stats.nba.com`'s `PlayerStats` result set doesn't carry a team-level
/// row of its own.
pub fn aggregate_team_stats(game_id: &str, home_tricode: &str, away_tricode: &str, players: &[NewPlayerGameStats]) -> Vec<NewTeamGameStats> {
    [home_tricode, away_tricode]
        .into_iter()
        .map(|tricode| {
            let team_players: Vec<&NewPlayerGameStats> = players.iter().filter(|p| p.team_tricode == tricode).collect();
            NewTeamGameStats {
                game_id: game_id.to_string(),
                team_tricode: tricode.to_string(),
                is_home: tricode == home_tricode,
                points: team_players.iter().map(|p| p.points).sum(),
                field_goals_made: team_players.iter().map(|p| p.field_goals_made).sum(),
                field_goals_attempted: team_players.iter().map(|p| p.field_goals_attempted).sum(),
                three_pm: team_players.iter().map(|p| p.three_pm).sum(),
                three_pa: team_players.iter().map(|p| p.three_pa).sum(),
                ft_made: team_players.iter().map(|p| p.ft_made).sum(),
                ft_attempted: team_players.iter().map(|p| p.ft_attempted).sum(),
                oreb: team_players.iter().map(|p| p.oreb).sum(),
                dreb: team_players.iter().map(|p| p.dreb).sum(),
                ast: team_players.iter().map(|p| p.ast).sum(),
                stl: team_players.iter().map(|p| p.stl).sum(),
                blk: team_players.iter().map(|p| p.blk).sum(),
                tov: team_players.iter().map(|p| p.tov).sum(),
                pf: team_players.iter().map(|p| p.pf).sum(),
                advanced_stats: None,
                misc_stats: None,
                usage_stats: None,
            }
        })
        .collect()
}

fn minutes_display_to_seconds(display: Option<&str>) -> i32 {
    let Some(display) = display else { return 0 };
    let Some((minutes, seconds)) = display.split_once(':') else {
        return display.parse::<i32>().unwrap_or(0) * 60;
    };
    let minutes: i32 = minutes.parse().unwrap_or(0);
    let seconds: i32 = seconds.parse().unwrap_or(0);
    minutes * 60 + seconds
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxscore_row(team: &str, player: &str) -> PreprocessedRow {
        let mut row = PreprocessedRow::default();
        row.strings.insert("team_tricode", team.to_string());
        row.strings.insert("player_slug", player.to_string());
        row
    }

    #[test]
    fn missing_supplement_row_leaves_stats_null() {
        let players = vec![boxscore_row("BOS", "JaysonTatum")];
        let stats = transform_player_stats_with_supplements("0022300123", &players, &[], &[], &[]);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].advanced_stats, None);
        assert_eq!(stats[0].usage_stats, None);
    }

    #[test]
    fn matching_advanced_row_populates_json() {
        let players = vec![boxscore_row("BOS", "JaysonTatum")];
        let mut advanced = boxscore_row("BOS", "JaysonTatum");
        advanced.floats.insert("off_rating", 118.4);
        advanced.floats.insert("pie", 0.21);

        let stats = transform_player_stats_with_supplements("0022300123", &players, &[advanced], &[], &[]);
        let json = stats[0].advanced_stats.as_ref().expect("advanced stats present");
        assert_eq!(json["off_rating"], 118.4);
        assert_eq!(json["pie"], 0.21);
        assert!(json.get("def_rating").is_none());
    }
}
