//! `stats.nba.com` responses arrive as a `resultSets` array, each with
//! parallel `headers`/`rowSet` arrays — a long-standing vendor quirk
//! that every NBA scraper has to work around. This extractor walks the
//! requested result set by name and zips each row against a fixed
//! header→canonical-key table so the rest of the pipeline never touches
//! a vendor column name directly.

use phf::phf_map;
use serde_json::Value;

use super::{RawValue, RowDict};

static PBP_HEADER_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "GAME_ID" => "game_id",
    "EVENTNUM" => "event_idx",
    "EVENTMSGTYPE" => "event_type_code",
    "EVENTMSGACTIONTYPE" => "event_subtype_code",
    "PERIOD" => "period",
    "PCTIMESTRING" => "clock_display",
    "HOMEDESCRIPTION" => "home_description",
    "VISITORDESCRIPTION" => "away_description",
    "NEUTRALDESCRIPTION" => "neutral_description",
    "SCORE" => "score",
    "PLAYER1_ID" => "player1_id",
    "PLAYER1_NAME" => "player1_slug",
    "PLAYER1_TEAM_ABBREVIATION" => "team_tricode",
    "PLAYER2_ID" => "player2_id",
    "PLAYER2_NAME" => "player2_slug",
    "PLAYER3_ID" => "player3_id",
    "PLAYER3_NAME" => "player3_slug",
};

static BOXSCORE_PLAYER_HEADER_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "GAME_ID" => "game_id",
    "TEAM_ABBREVIATION" => "team_tricode",
    "PLAYER_ID" => "player_id",
    "PLAYER_NAME" => "player_slug",
    "START_POSITION" => "position",
    "MIN" => "minutes_display",
    "PTS" => "points",
    "FGM" => "field_goals_made",
    "FGA" => "field_goals_attempted",
    "FG3M" => "three_pm",
    "FG3A" => "three_pa",
    "FTM" => "ft_made",
    "FTA" => "ft_attempted",
    "OREB" => "oreb",
    "DREB" => "dreb",
    "AST" => "ast",
    "STL" => "stl",
    "BLK" => "blk",
    "TO" => "tov",
    "PF" => "pf",
};

static SHOT_HEADER_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "GAME_ID" => "game_id",
    "GAME_EVENT_ID" => "event_idx",
    "PLAYER_ID" => "player_id",
    "PLAYER_NAME" => "player_slug",
    "TEAM_ABBREVIATION" => "team_tricode",
    "PERIOD" => "period",
    "MINUTES_REMAINING" => "minutes_remaining",
    "SECONDS_REMAINING" => "seconds_remaining",
    "SHOT_TYPE" => "shot_type",
    "SHOT_ZONE_BASIC" => "shot_zone_raw",
    "SHOT_DISTANCE" => "shot_distance_ft",
    "LOC_X" => "shot_x",
    "LOC_Y" => "shot_y",
    "SHOT_MADE_FLAG" => "shot_made",
};

static SCOREBOARD_HEADER_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "GAME_ID" => "game_id",
    "GAME_DATE_EST" => "arena_date",
    "GAME_STATUS_ID" => "status_code",
    "HOME_TEAM_ID" => "home_team_id",
    "VISITOR_TEAM_ID" => "away_team_id",
    "LIVE_PERIOD" => "period",
};

static BOXSCORE_ADVANCED_HEADER_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "GAME_ID" => "game_id",
    "TEAM_ABBREVIATION" => "team_tricode",
    "PLAYER_ID" => "player_id",
    "PLAYER_NAME" => "player_slug",
    "OFF_RATING" => "off_rating",
    "DEF_RATING" => "def_rating",
    "NET_RATING" => "net_rating",
    "AST_PCT" => "ast_pct",
    "AST_TOV" => "ast_to_tov",
    "AST_RATIO" => "ast_ratio",
    "OREB_PCT" => "oreb_pct",
    "DREB_PCT" => "dreb_pct",
    "REB_PCT" => "reb_pct",
    "TM_TOV_PCT" => "tov_pct",
    "EFG_PCT" => "efg_pct",
    "TS_PCT" => "ts_pct",
    "PACE" => "pace",
    "PIE" => "pie",
};

static BOXSCORE_MISC_HEADER_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "GAME_ID" => "game_id",
    "TEAM_ABBREVIATION" => "team_tricode",
    "PLAYER_ID" => "player_id",
    "PLAYER_NAME" => "player_slug",
    "PTS_OFF_TOV" => "pts_off_tov",
    "PTS_2ND_CHANCE" => "pts_2nd_chance",
    "PTS_FB" => "pts_fb",
    "PTS_PAINT" => "pts_paint",
    "OPP_PTS_OFF_TOV" => "opp_pts_off_tov",
    "OPP_PTS_2ND_CHANCE" => "opp_pts_2nd_chance",
    "OPP_PTS_FB" => "opp_pts_fb",
    "OPP_PTS_PAINT" => "opp_pts_paint",
};

static BOXSCORE_USAGE_HEADER_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "GAME_ID" => "game_id",
    "TEAM_ABBREVIATION" => "team_tricode",
    "PLAYER_ID" => "player_id",
    "PLAYER_NAME" => "player_slug",
    "USG_PCT" => "usg_pct",
    "PCT_FGM" => "pct_fgm",
    "PCT_FGA" => "pct_fga",
    "PCT_FG3M" => "pct_fg3m",
    "PCT_FG3A" => "pct_fg3a",
    "PCT_FTM" => "pct_ftm",
    "PCT_FTA" => "pct_fta",
    "PCT_OREB" => "pct_oreb",
    "PCT_DREB" => "pct_dreb",
    "PCT_REB" => "pct_reb",
    "PCT_AST" => "pct_ast",
    "PCT_TOV" => "pct_tov",
    "PCT_STL" => "pct_stl",
    "PCT_BLK" => "pct_blk",
    "PCT_PF" => "pct_pf",
    "PCT_PTS" => "pct_pts",
};

static INJURY_HEADER_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "GAME_ID" => "game_id",
    "TEAM_ABBREVIATION" => "team_tricode",
    "PLAYER_ID" => "player_id",
    "PLAYER_NAME" => "player_slug",
    "CURRENT_STATUS" => "status",
    "REASON" => "note",
};

fn extract_result_set(root: &Value, name: &str, header_map: &phf::Map<&'static str, &'static str>) -> Vec<RowDict> {
    let Some(result_sets) = root.get("resultSets").and_then(Value::as_array) else {
        return Vec::new();
    };

    let Some(set) = result_sets
        .iter()
        .find(|s| s.get("name").and_then(Value::as_str) == Some(name))
    else {
        return Vec::new();
    };

    let Some(headers) = set.get("headers").and_then(Value::as_array) else {
        return Vec::new();
    };
    let Some(rows) = set.get("rowSet").and_then(Value::as_array) else {
        return Vec::new();
    };

    let keys: Vec<Option<&'static str>> = headers
        .iter()
        .map(|h| h.as_str().and_then(|h| header_map.get(h).copied()))
        .collect();

    rows.iter()
        .filter_map(Value::as_array)
        .map(|row| {
            let mut dict = RowDict::new();
            for (value, key) in row.iter().zip(keys.iter()) {
                if let Some(key) = key {
                    dict.insert(*key, RawValue::from_json(value));
                }
            }
            dict
        })
        .collect()
}

pub fn extract_pbp(root: &Value) -> Vec<RowDict> {
    extract_result_set(root, "PlayByPlay", &PBP_HEADER_MAP)
}

pub fn extract_boxscore_players(root: &Value) -> Vec<RowDict> {
    extract_result_set(root, "PlayerStats", &BOXSCORE_PLAYER_HEADER_MAP)
}

pub fn extract_shots(root: &Value) -> Vec<RowDict> {
    extract_result_set(root, "Shot_Chart_Detail", &SHOT_HEADER_MAP)
}

pub fn extract_scoreboard(root: &Value) -> Vec<RowDict> {
    extract_result_set(root, "GameHeader", &SCOREBOARD_HEADER_MAP)
}

pub fn extract_injury_report(root: &Value) -> Vec<RowDict> {
    extract_result_set(root, "InjuryReport", &INJURY_HEADER_MAP)
}

pub fn extract_boxscore_advanced(root: &Value) -> Vec<RowDict> {
    extract_result_set(root, "PlayerStats", &BOXSCORE_ADVANCED_HEADER_MAP)
}

pub fn extract_boxscore_misc(root: &Value) -> Vec<RowDict> {
    extract_result_set(root, "PlayerStats", &BOXSCORE_MISC_HEADER_MAP)
}

pub fn extract_boxscore_usage(root: &Value) -> Vec<RowDict> {
    extract_result_set(root, "PlayerStats", &BOXSCORE_USAGE_HEADER_MAP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_rows_by_header_name() {
        let root = json!({
            "resultSets": [
                {
                    "name": "PlayByPlay",
                    "headers": ["GAME_ID", "EVENTNUM", "EVENTMSGTYPE", "PERIOD", "PCTIMESTRING"],
                    "rowSet": [
                        ["0022300123", 1, 12, 1, "12:00"],
                        ["0022300123", 2, 1, 1, "11:45"],
                    ],
                }
            ]
        });

        let rows = extract_pbp(&root);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("game_id"), Some(&RawValue::Str("0022300123".to_string())));
        assert_eq!(rows[1].get("event_type_code"), Some(&RawValue::Int(1)));
    }

    #[test]
    fn missing_result_set_yields_empty() {
        let root = json!({"resultSets": []});
        assert!(extract_pbp(&root).is_empty());
    }
}
