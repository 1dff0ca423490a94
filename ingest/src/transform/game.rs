//! Game-record transform (§4.6): tricode resolution through the alias
//! table, local-date derivation via the arena's IANA timezone, and
//! status-code mapping.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use log::warn;
use nba_db::aliases::{TeamAliasTable, VenueTable};
use nba_db::enums::{GameStatus, NBA_STATS_STATUS_CODES};
use nba_db::models::NewGame;

use crate::error::{IngestFatalError, IngestResult};

pub fn resolve_tricode(aliases: &TeamAliasTable, source_name: &'static str, vendor_code: &str) -> IngestResult<String> {
    Ok(aliases.resolve(source_name, vendor_code)?)
}

pub fn status_from_code(code: &str) -> GameStatus {
    NBA_STATS_STATUS_CODES.get(code).copied().unwrap_or(GameStatus::Scheduled)
}

/// Converts a UTC instant to the arena-local calendar date via the
/// venue's IANA timezone. A caller-supplied explicit local date always
/// wins; this is only used to fill one in, or to sanity-check one that
/// was supplied. A discrepancy of more than a day is a hard error per
/// §4.6's invariant (tolerances of up to a day only cover the
/// UTC-crosses-midnight case near a venue's zone boundary).
pub fn derive_local_date(
    game_id: &str,
    start_time_utc: DateTime<Utc>,
    explicit_local_date: Option<chrono::NaiveDate>,
    tz: Tz,
) -> IngestResult<chrono::NaiveDate> {
    let from_utc = start_time_utc.with_timezone(&tz).date_naive();

    match explicit_local_date {
        None => Ok(from_utc),
        Some(explicit) => {
            let diff_days = (explicit - from_utc).num_days().abs();
            if diff_days > 1 {
                return Err(IngestFatalError::DateMismatch {
                    game_id: game_id.to_string(),
                    local: explicit.to_string(),
                    from_utc: from_utc.to_string(),
                });
            }
            if diff_days == 1 {
                warn!("arena-local date {explicit} differs from UTC-derived date {from_utc} by one day for {game_id}");
            }
            Ok(explicit)
        }
    }
}

pub fn build_new_game(
    game_id: &str,
    season: &str,
    start_time_utc: DateTime<Utc>,
    arena_date: chrono::NaiveDate,
    arena_tz: &str,
    home_tricode: &str,
    away_tricode: &str,
    status: GameStatus,
    period: i32,
    source_name: &str,
    source_url: Option<&str>,
) -> NewGame {
    NewGame {
        game_id: game_id.to_string(),
        season: season.to_string(),
        start_time_utc,
        arena_date,
        arena_tz: arena_tz.to_string(),
        home_tricode: home_tricode.to_string(),
        away_tricode: away_tricode.to_string(),
        status: status.to_string(),
        period,
        source: source_name.to_string(),
        source_url: source_url.map(str::to_string),
        ingested_at: Utc::now(),
    }
}

pub fn venue_tz(venues: &VenueTable, home_tricode: &str) -> Option<Tz> {
    venues.get(home_tricode).and_then(|v| v.tz.parse().ok())
}
