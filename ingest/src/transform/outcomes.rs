use nba_db::models::{NewPbpEvent, NewOutcome};

/// Derives the outcome row from a game's finished PBP stream: final
/// score from the last event carrying a score, Q1 score from the last
/// event in period 1, OT count from the highest period number beyond 4.
pub fn derive_outcome(game_id: &str, events: &[NewPbpEvent]) -> Option<NewOutcome> {
    let last = events.iter().filter(|e| e.home_score > 0 || e.away_score > 0).next_back()?;
    let q1_last = events.iter().filter(|e| e.period == 1).next_back();
    let max_period = events.iter().map(|e| e.period).max().unwrap_or(1);

    Some(NewOutcome {
        game_id: game_id.to_string(),
        home_final: last.home_score,
        away_final: last.away_score,
        home_q1: q1_last.map(|e| e.home_score).unwrap_or(0),
        away_q1: q1_last.map(|e| e.away_score).unwrap_or(0),
        margin: (last.home_score - last.away_score).abs(),
        ot_count: (max_period - 4).max(0),
    })
}
