//! Q1 window derivation (§4.9): possessions, pace, eFG%, turnover/free-throw
//! rate, rebound percentages, bonus-time and transition/early-clock rates
//! for the 12:00->8:00 slice of the first period.

use std::collections::HashSet;

use nba_db::models::{NewPbpEvent, NewQ1Window};

const WINDOW_START_MS: i64 = 720_000;
const WINDOW_END_MS: i64 = 480_000;
const WINDOW_MINUTES: f64 = 4.0;

/// Broadcast-second-safe window predicate: 8:00.000 remaining is inside
/// the window, 7:59.999 is not.
pub fn in_window(clock_ms: i64, start: i64, end: i64) -> bool {
    clock_ms <= start && (clock_ms == end || clock_ms >= end + 1_000)
}

#[derive(Debug, Default)]
struct TeamTally {
    fgm: i32,
    fga: i32,
    three_pm: i32,
    ftm: i32,
    fta: i32,
    oreb: i32,
    dreb: i32,
    tov: i32,
    fouls: i32,
    bonus_trigger_ms: Option<i64>,
    transition_events: i32,
    early_clock_events: i32,
    total_shot_events: i32,
}

impl TeamTally {
    fn possessions(&self) -> f64 {
        (self.fga as f64 + (0.44 * self.fta as f64).floor() - self.oreb as f64 + self.tov as f64).max(1.0)
    }

    fn efg(&self) -> f64 {
        if self.fga == 0 {
            return 0.0;
        }
        (self.fgm as f64 + 0.5 * self.three_pm as f64) / self.fga as f64
    }

    fn to_rate(&self) -> f64 {
        self.tov as f64 / self.possessions()
    }

    fn ft_rate(&self) -> f64 {
        if self.fga == 0 {
            return 0.0;
        }
        self.fta as f64 / self.fga as f64
    }
}

/// Computes the Q1-window row for a game from its full ordered PBP
/// stream, given each team's tricode. Dedupes events that collapse to
/// the same `(period, clock_ms_remaining, event_type, team_tricode)` key
/// before tallying, keeping the first occurrence.
pub fn compute(game_id: &str, home_tricode: &str, away_tricode: &str, events: &[NewPbpEvent]) -> NewQ1Window {
    let mut seen = HashSet::new();
    let mut home = TeamTally::default();
    let mut away = TeamTally::default();
    // Tracks the team of the most recent missed shot in period 1, the same
    // way transform/pbp.rs does, so a later rebound can be attributed as
    // offensive or defensive. Updated for every period-1 shot regardless of
    // window so a miss just before the window opens still pairs correctly
    // with a rebound just inside it.
    let mut pending_miss_team: Option<String> = None;

    for event in events {
        if event.period != 1 {
            continue;
        }

        if event.event_type == "shot" {
            match event.shot_made {
                Some(false) => pending_miss_team = event.team_tricode.clone(),
                Some(true) => pending_miss_team = None,
                None => {}
            }
        }
        let rebound_is_offensive = event.event_type == "rebound" && pending_miss_team == event.team_tricode;
        if event.event_type == "rebound" {
            pending_miss_team = None;
        }

        if !in_window(event.clock_remaining_ms as i64, WINDOW_START_MS, WINDOW_END_MS) {
            continue;
        }

        let key = (
            event.period,
            event.clock_remaining_ms,
            event.event_type.clone(),
            event.team_tricode.clone(),
        );
        if !seen.insert(key) {
            continue;
        }

        let Some(team_tricode) = event.team_tricode.as_deref() else { continue };
        let tally = if team_tricode == home_tricode {
            &mut home
        } else if team_tricode == away_tricode {
            &mut away
        } else {
            continue
        };

        match event.event_type.as_str() {
            "shot" => {
                tally.fga += 1;
                tally.total_shot_events += 1;
                if event.shot_made == Some(true) {
                    tally.fgm += 1;
                }
                if event.shot_value == Some(3) {
                    tally.three_pm += if event.shot_made == Some(true) { 1 } else { 0 };
                }
                if event.is_transition == Some(true) {
                    tally.transition_events += 1;
                }
                if event.is_early_clock == Some(true) {
                    tally.early_clock_events += 1;
                }
            }
            "free_throw" => {
                tally.fta += 1;
                if event.shot_made == Some(true) {
                    tally.ftm += 1;
                }
            }
            "rebound" => {
                if rebound_is_offensive {
                    tally.oreb += 1;
                } else {
                    tally.dreb += 1;
                }
            }
            "turnover" => tally.tov += 1,
            "foul" => {
                tally.fouls += 1;
                if tally.fouls == 4 && tally.bonus_trigger_ms.is_none() {
                    tally.bonus_trigger_ms = Some(event.clock_remaining_ms as i64);
                }
            }
            _ => {}
        }
    }

    let bonus_seconds = |tally: &TeamTally| -> f64 {
        tally
            .bonus_trigger_ms
            .map(|trigger| ((trigger - WINDOW_END_MS).max(0)) as f64 / 1000.0)
            .unwrap_or(0.0)
    };

    let oreb_pct = |offense: &TeamTally, defense: &TeamTally| -> f64 {
        let denom = offense.oreb as f64 + defense.dreb as f64;
        if denom == 0.0 { 0.0 } else { offense.oreb as f64 / denom }
    };

    let total_possessions = home.possessions() + away.possessions();
    let total_shot_events = (home.total_shot_events + away.total_shot_events) as f64;
    let transition_rate = if total_shot_events == 0.0 {
        0.0
    } else {
        (home.transition_events + away.transition_events) as f64 / total_shot_events
    };
    let early_clock_rate = if total_shot_events == 0.0 {
        0.0
    } else {
        (home.early_clock_events + away.early_clock_events) as f64 / total_shot_events
    };

    NewQ1Window {
        game_id: game_id.to_string(),
        possessions_elapsed: total_possessions.round() as i32,
        expected_pace: total_possessions / WINDOW_MINUTES * 48.0,
        actual_pace_home: home.possessions() / WINDOW_MINUTES * 48.0,
        actual_pace_away: away.possessions() / WINDOW_MINUTES * 48.0,
        efg_home: home.efg(),
        efg_away: away.efg(),
        to_rate_home: home.to_rate(),
        to_rate_away: away.to_rate(),
        ft_rate_home: home.ft_rate(),
        ft_rate_away: away.ft_rate(),
        oreb_pct_home: oreb_pct(&home, &away),
        oreb_pct_away: oreb_pct(&away, &home),
        dreb_pct_home: 1.0 - oreb_pct(&away, &home),
        dreb_pct_away: 1.0 - oreb_pct(&home, &away),
        bonus_seconds_home: bonus_seconds(&home),
        bonus_seconds_away: bonus_seconds(&away),
        transition_rate,
        early_clock_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_boundary_matches_spec_examples() {
        assert!(in_window(720_000, WINDOW_START_MS, WINDOW_END_MS));
        assert!(in_window(600_000, WINDOW_START_MS, WINDOW_END_MS));
        assert!(in_window(480_000, WINDOW_START_MS, WINDOW_END_MS));
        assert!(!in_window(480_001, WINDOW_START_MS, WINDOW_END_MS));
        assert!(!in_window(479_000, WINDOW_START_MS, WINDOW_END_MS));
    }

    #[test]
    fn possession_estimate_matches_spec_example() {
        let mut tally = TeamTally::default();
        tally.fga = 10;
        tally.fta = 6;
        tally.oreb = 2;
        tally.tov = 3;
        assert_eq!(tally.possessions(), 13.0);
    }
}
