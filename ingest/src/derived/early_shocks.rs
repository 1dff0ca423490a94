//! Early-shock detection (§4.9, first 6:00 of Q1 only): a second personal
//! foul within 360s of a player's first, a technical/flagrant, or a
//! mid-quarter injury departure. Zips the canonical event stream against
//! the preprocessed rows it was built from so description text (not
//! carried on [`NewPbpEvent`]) is still available for keyword matching.

use std::collections::HashMap;

use nba_db::enums::EarlyShockType;
use nba_db::models::NewEarlyShock;
use nba_db::models::NewPbpEvent;

use crate::preprocess::PreprocessedRow;

const EARLY_SHOCK_WINDOW_SECONDS: f64 = 360.0;
const INJURY_KEYWORDS: &[&str] = &["injury", "hurt", "twisted", "sprain", "strain", "collision"];

struct FoulState {
    first_seconds: f64,
    first_event_idx: i32,
}

pub fn detect(game_id: &str, events: &[NewPbpEvent], rows: &[PreprocessedRow]) -> Vec<NewEarlyShock> {
    let mut shocks = Vec::new();
    let mut open_fouls: HashMap<String, FoulState> = HashMap::new();
    let mut sequence = 0i32;
    let mut last_seen_idx: HashMap<String, i32> = HashMap::new();

    for (idx, event) in events.iter().enumerate() {
        if event.period != 1 || event.seconds_elapsed > EARLY_SHOCK_WINDOW_SECONDS {
            continue;
        }
        let description = rows
            .get(idx)
            .and_then(|row| row.str("home_description").or_else(|| row.str("away_description")))
            .unwrap_or("");

        if event.event_type != "foul" {
            if let Some(player) = event.player1_slug.as_deref() {
                last_seen_idx.insert(player.to_string(), event.event_idx);
            }
            continue;
        }

        let Some(player) = event.player1_slug.clone() else { continue };
        last_seen_idx.insert(player.clone(), event.event_idx);

        let lower = description.to_ascii_lowercase();
        if lower.contains("technical") {
            sequence += 1;
            shocks.push(NewEarlyShock {
                game_id: game_id.to_string(),
                shock_type: EarlyShockType::Technical.to_string(),
                period: event.period,
                seconds_elapsed: event.seconds_elapsed,
                player_slug: player.clone(),
                sequence_number: sequence,
                event_idx_start: event.event_idx,
                event_idx_end: None,
                immediate_sub_followed: None,
                possessions_elapsed_since: None,
            });
            continue;
        }
        if lower.contains("flagrant") {
            sequence += 1;
            shocks.push(NewEarlyShock {
                game_id: game_id.to_string(),
                shock_type: EarlyShockType::Flagrant.to_string(),
                period: event.period,
                seconds_elapsed: event.seconds_elapsed,
                player_slug: player.clone(),
                sequence_number: sequence,
                event_idx_start: event.event_idx,
                event_idx_end: None,
                immediate_sub_followed: None,
                possessions_elapsed_since: None,
            });
            continue;
        }

        match open_fouls.get(&player) {
            None => {
                open_fouls.insert(
                    player.clone(),
                    FoulState { first_seconds: event.seconds_elapsed, first_event_idx: event.event_idx },
                );
            }
            Some(first) if event.seconds_elapsed - first.first_seconds <= EARLY_SHOCK_WINDOW_SECONDS => {
                let immediate_sub = events
                    .iter()
                    .skip(idx + 1)
                    .take_while(|e| e.seconds_elapsed - event.seconds_elapsed <= 60.0)
                    .any(|e| e.event_type == "substitution" && e.player2_slug.as_deref() == Some(player.as_str()));

                shocks.push(NewEarlyShock {
                    game_id: game_id.to_string(),
                    shock_type: EarlyShockType::TwoPersonalFoulsEarly.to_string(),
                    period: event.period,
                    seconds_elapsed: event.seconds_elapsed,
                    player_slug: player.clone(),
                    sequence_number: 0,
                    event_idx_start: first.first_event_idx,
                    event_idx_end: Some(event.event_idx),
                    immediate_sub_followed: Some(immediate_sub),
                    possessions_elapsed_since: None,
                });
                open_fouls.remove(&player);
            }
            Some(_) => {
                // past the 360s threshold: this foul starts a fresh window
                open_fouls.insert(
                    player.clone(),
                    FoulState { first_seconds: event.seconds_elapsed, first_event_idx: event.event_idx },
                );
            }
        }
    }

    shocks.extend(detect_injury_leaves(game_id, events, rows, &last_seen_idx));
    shocks
}

fn detect_injury_leaves(
    game_id: &str,
    events: &[NewPbpEvent],
    rows: &[PreprocessedRow],
    last_seen_idx: &HashMap<String, i32>,
) -> Vec<NewEarlyShock> {
    let mut out = Vec::new();

    for (idx, event) in events.iter().enumerate() {
        if event.period != 1 || event.seconds_elapsed > EARLY_SHOCK_WINDOW_SECONDS {
            continue;
        }
        let Some(player) = event.player1_slug.as_deref() else { continue };
        let description = rows
            .get(idx)
            .and_then(|row| row.str("home_description").or_else(|| row.str("away_description")))
            .unwrap_or("")
            .to_ascii_lowercase();

        if !INJURY_KEYWORDS.iter().any(|kw| description.contains(kw)) {
            continue;
        }

        // Confirm absence by counting possession changes after this
        // event in which the player never reappears in any of the three
        // participant slots.
        let mut possessions_since = 0;
        let mut reappeared = false;
        let mut last_possession = event.possession_team.clone();
        for later in &events[idx + 1..] {
            if later.possession_team != last_possession && later.possession_team.is_some() {
                possessions_since += 1;
                last_possession = later.possession_team.clone();
            }
            if later.player1_slug.as_deref() == Some(player)
                || later.player2_slug.as_deref() == Some(player)
                || later.player3_slug.as_deref() == Some(player)
            {
                reappeared = true;
                break;
            }
            if possessions_since >= 6 {
                break;
            }
        }

        if reappeared || possessions_since < 6 {
            continue;
        }

        out.push(NewEarlyShock {
            game_id: game_id.to_string(),
            shock_type: EarlyShockType::InjuryLeave.to_string(),
            period: event.period,
            seconds_elapsed: event.seconds_elapsed,
            player_slug: player.to_string(),
            sequence_number: 0,
            event_idx_start: event.event_idx,
            event_idx_end: last_seen_idx.get(player).copied(),
            immediate_sub_followed: None,
            possessions_elapsed_since: Some(possessions_since as i32),
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foul_event(event_idx: i32, seconds_elapsed: f64, player: &str) -> NewPbpEvent {
        NewPbpEvent {
            game_id: "0022300123".to_string(),
            period: 1,
            event_idx,
            clock_remaining_ms: 0,
            clock_display: "0:00".to_string(),
            seconds_elapsed,
            home_score: 0,
            away_score: 0,
            event_type: "foul".to_string(),
            event_subtype: None,
            player1_slug: Some(player.to_string()),
            player1_id: None,
            player2_slug: None,
            player2_id: None,
            player3_slug: None,
            player3_id: None,
            team_tricode: Some("BOS".to_string()),
            shot_made: None,
            shot_value: None,
            shot_type: None,
            shot_zone: None,
            shot_distance_ft: None,
            shot_x: None,
            shot_y: None,
            is_transition: None,
            is_early_clock: None,
            shot_clock_seconds: None,
            possession_team: None,
        }
    }

    #[test]
    fn second_personal_foul_within_360s_emits_one_shock() {
        let events = vec![foul_event(10, 45.0, "player-p"), foul_event(20, 210.0, "player-p")];
        let rows = vec![PreprocessedRow::default(), PreprocessedRow::default()];
        let shocks = detect("0022300123", &events, &rows);
        assert_eq!(shocks.len(), 1);
        assert_eq!(shocks[0].shock_type, "two-personal-fouls-early");
        assert_eq!(shocks[0].event_idx_start, 10);
        assert_eq!(shocks[0].event_idx_end, Some(20));
    }

    #[test]
    fn third_foul_past_threshold_does_not_chain_another_shock() {
        let events = vec![
            foul_event(10, 45.0, "player-p"),
            foul_event(20, 210.0, "player-p"),
            foul_event(30, 800.0, "player-p"),
        ];
        let rows = vec![PreprocessedRow::default(), PreprocessedRow::default(), PreprocessedRow::default()];
        let shocks = detect("0022300123", &events, &rows);
        assert_eq!(shocks.iter().filter(|s| s.shock_type == "two-personal-fouls-early").count(), 1);
    }
}
