//! Schedule/travel fatigue derivation (§4.9): days rest, haversine
//! distance, timezone shift, altitude delta, back-to-back/3-in-4/5-in-7
//! flags, and the circadian-index composite.

use chrono::NaiveDate;
use chrono_tz::Tz;
use nba_db::aliases::Venue;
use nba_db::models::NewScheduleTravel;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// One game for a team, in chronological order, carrying just enough to
/// compute the next game's travel record.
pub struct ScheduleEntry<'a> {
    pub game_id: &'a str,
    pub local_date: NaiveDate,
    pub local_start_hour: u32,
    pub venue: Venue<'a>,
}

fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) = (lat1.to_radians(), lon1.to_radians(), lat2.to_radians(), lon2.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// Positive = eastward (UTC offset increases when travelling from `from`
/// to `to`, e.g. Pacific -> Eastern).
fn tz_shift_hours(from: Tz, to: Tz, on: NaiveDate) -> f64 {
    let noon = on.and_hms_opt(12, 0, 0).expect("valid noon");
    use chrono::Offset;
    let from_offset = from.offset_from_local_datetime(&noon).single().map(|o| o.fix().local_minus_utc()).unwrap_or(0);
    let to_offset = to.offset_from_local_datetime(&noon).single().map(|o| o.fix().local_minus_utc()).unwrap_or(0);
    (to_offset - from_offset) as f64 / 3600.0
}

fn circadian_index(tz_shift: f64, distance_km: f64, altitude_gain_m: f64, days_rest: i32, local_start_hour: u32) -> f64 {
    let eastward = tz_shift > 0.0;
    let mut base = (tz_shift.abs() / 3.0).min(1.0) * if eastward { 1.5 } else { 1.0 };
    base += (distance_km / 5000.0).clamp(0.0, 0.3);
    if altitude_gain_m > 1000.0 {
        base += (altitude_gain_m / 2000.0).clamp(0.0, 0.2);
    }

    let rest_mult = match days_rest {
        0 => 1.5,
        1 => 1.0,
        2 => 0.8,
        _ => 0.5,
    };
    let late_game_mult = if eastward && local_start_hour >= 22 { 1.2 } else { 1.0 };

    (base * rest_mult * late_game_mult).clamp(0.0, 1.0)
}

/// Computes one travel record for `current` given the team's immediately
/// preceding game, and the full chronological schedule up to and
/// including `current` (used for 3-in-4 / 5-in-7 windows).
pub fn compute(
    game_id: &str,
    team_tricode: &str,
    history: &[ScheduleEntry],
    current_index: usize,
    current_tz: Tz,
) -> NewScheduleTravel {
    let current = &history[current_index];
    let prev = if current_index == 0 { None } else { Some(&history[current_index - 1]) };

    let days_rest = prev.map(|p| (current.local_date - p.local_date).num_days() as i32 - 1).unwrap_or(7);
    let back_to_back = days_rest == 0;

    let window_count = |span_days: i64| -> usize {
        history[..=current_index]
            .iter()
            .rev()
            .take_while(|entry| (current.local_date - entry.local_date).num_days() < span_days)
            .count()
    };
    let three_in_four = window_count(4) >= 3;
    let five_in_seven = window_count(7) >= 5;

    let (tz_shift, distance_km, altitude_change_m, prev_lat, prev_lon) = match prev {
        Some(prev) => {
            let prev_tz: Tz = prev.venue.tz.parse().unwrap_or(chrono_tz::UTC);
            (
                tz_shift_hours(prev_tz, current_tz, current.local_date),
                haversine_km(prev.venue.lat, prev.venue.lon, current.venue.lat, current.venue.lon),
                current.venue.altitude_m - prev.venue.altitude_m,
                Some(prev.venue.lat),
                Some(prev.venue.lon),
            )
        }
        None => (0.0, 0.0, 0.0, None, None),
    };

    NewScheduleTravel {
        game_id: game_id.to_string(),
        team_tricode: team_tricode.to_string(),
        back_to_back,
        three_in_four,
        five_in_seven,
        days_rest,
        tz_shift_hours: tz_shift,
        circadian_index: circadian_index(tz_shift, distance_km, altitude_change_m, days_rest, current.local_start_hour),
        altitude_change_m,
        haversine_km: distance_km,
        prev_venue_lat: prev_lat,
        prev_venue_lon: prev_lon,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_to_back_west_coast_trip_matches_spec_example() {
        let tz_shift = -3.0_f64;
        let distance_km = 4334.0_f64;
        let index = circadian_index(tz_shift, distance_km, 15.0, 0, 19);
        assert!((index - 1.0).abs() < 1e-9, "expected clamp to 1.0, got {index}");
    }

    #[test]
    fn haversine_boston_to_sacramento_is_roughly_right() {
        // BOS (42.366, -71.062) -> SAC (38.649, -121.518)
        let km = haversine_km(42.366, -71.062, 38.649, -121.518);
        assert!((4200.0..4500.0).contains(&km), "got {km}");
    }
}
