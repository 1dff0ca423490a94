use nba_db::enums::NBA_STATS_EVENT_CODES;
use nba_db::models::NewPbpEvent;

use crate::derived::possession::{PossessionEvent, PossessionTracker};
use crate::preprocess::PreprocessedRow;
use crate::transform::clock::{parse_clock_ms, seconds_elapsed};
use crate::transform::shot_zone;

/// Builds the canonical PBP event rows for one game, in vendor event
/// order. Possession is tracked across the whole ordered sequence so
/// `possession_team` reflects the state machine in `derived::possession`
/// rather than a per-event guess.
pub fn transform_events(game_id: &str, home_tricode: &str, away_tricode: &str, rows: &[PreprocessedRow]) -> Vec<NewPbpEvent> {
    let mut tracker = PossessionTracker::new(home_tricode, away_tricode);
    let mut out = Vec::with_capacity(rows.len());
    let (mut home_score, mut away_score) = (0i32, 0i32);
    // Team that took the most recent missed shot still awaiting a rebound;
    // compared against the rebounding team to tell offensive from
    // defensive boards. Cleared once a rebound consumes it or another shot
    // supersedes it.
    let mut pending_miss_team: Option<String> = None;

    for row in rows {
        let period = row.int("period").unwrap_or(1) as i32;
        let clock_display = row.str("clock_display").unwrap_or("0:00").to_string();
        let clock_remaining_ms = parse_clock_ms(&clock_display).unwrap_or(0);
        let event_type_code = row.int("event_type_code").unwrap_or(-1);
        let event_type = NBA_STATS_EVENT_CODES
            .get(&event_type_code)
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let team_tricode = row.str("team_tricode").map(str::to_string);

        let (shot_made, shot_value, shot_zone_val, shot_distance_ft) = if event_type == "shot" {
            let distance = row.float("shot_distance_ft").unwrap_or(0.0);
            let x = row.float("shot_x").unwrap_or(0.0);
            let zone = shot_zone::classify(x, distance);
            let made = row.bool("shot_made").unwrap_or(row.str("home_description").is_some());
            let value = if row
                .str("home_description")
                .or_else(|| row.str("away_description"))
                .map(|d| d.contains("3PT"))
                .unwrap_or(false)
            {
                3
            } else {
                2
            };
            (Some(made), Some(value), Some(zone.to_string()), Some(distance))
        } else {
            (None, None, None, None)
        };

        let possession_event = classify_possession_event(
            &event_type,
            team_tricode.as_deref(),
            period,
            &mut pending_miss_team,
            shot_made,
        );
        let possession_team = tracker.advance(possession_event).map(str::to_string);

        // Vendor `SCORE` carries "<away> - <home>" and is only populated on
        // scoring plays; carry the running total forward otherwise.
        if let Some(score) = row.str("score") {
            if let Some((away, home)) = score.split_once('-') {
                if let (Ok(away), Ok(home)) = (away.trim().parse::<i32>(), home.trim().parse::<i32>()) {
                    away_score = away;
                    home_score = home;
                }
            }
        }

        out.push(NewPbpEvent {
            game_id: game_id.to_string(),
            period,
            event_idx: row.int("event_idx").unwrap_or(0) as i32,
            clock_remaining_ms: clock_remaining_ms as i32,
            clock_display,
            seconds_elapsed: seconds_elapsed(period, clock_remaining_ms),
            home_score,
            away_score,
            event_type,
            event_subtype: row.int("event_subtype_code").map(|c| c.to_string()),
            player1_slug: row.str("player1_slug").map(str::to_string),
            player1_id: row.int("player1_id"),
            player2_slug: row.str("player2_slug").map(str::to_string),
            player2_id: row.int("player2_id"),
            player3_slug: row.str("player3_slug").map(str::to_string),
            player3_id: row.int("player3_id"),
            team_tricode,
            shot_made,
            shot_value,
            shot_type: row.str("shot_type").map(str::to_string),
            shot_zone: shot_zone_val,
            shot_distance_ft,
            shot_x: row.float("shot_x"),
            shot_y: row.float("shot_y"),
            is_transition: None,
            is_early_clock: None,
            shot_clock_seconds: None,
            possession_team,
        });
    }

    out
}

/// Rebound direction isn't a field the vendor feed carries directly; it's
/// derived by comparing the rebounding team against the team that missed
/// the shot the rebound follows.
fn classify_possession_event<'a>(
    event_type: &str,
    team: Option<&'a str>,
    _period: i32,
    pending_miss_team: &mut Option<String>,
    shot_made: Option<bool>,
) -> PossessionEvent<'a> {
    let event = match (event_type, team) {
        ("period_start", Some(team)) => PossessionEvent::PeriodBegin { team },
        ("jump_ball", Some(team)) => PossessionEvent::JumpBallWon { team },
        ("shot", Some(team)) => PossessionEvent::MadeShot { team },
        ("turnover", Some(team)) => PossessionEvent::Turnover { team },
        ("rebound", Some(team)) => {
            if pending_miss_team.as_deref() == Some(team) {
                PossessionEvent::OffensiveRebound { team }
            } else {
                PossessionEvent::DefensiveRebound { team }
            }
        }
        _ => PossessionEvent::Other,
    };

    match (event_type, shot_made, team) {
        ("shot", Some(false), Some(team)) => *pending_miss_team = Some(team.to_string()),
        ("shot", Some(true), _) => *pending_miss_team = None,
        ("rebound", _, _) => *pending_miss_team = None,
        _ => {}
    }

    event
}
