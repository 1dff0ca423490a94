use diesel::prelude::*;
use log::info;

use crate::completeness::game_is_complete;
use crate::error::DbResult;
use crate::models::{NewEarlyShock, NewQ1Window, NewScheduleTravel};
use crate::validation::filter_known_games;

/// Writes a Q1-window row only if `game_is_complete` passes, per §4.8.
/// An incomplete game is skipped with a `derived_loader.skip` log line
/// carrying the reasons rather than failing the caller.
pub fn upsert_q1_window(conn: &mut PgConnection, row: NewQ1Window) -> DbResult<bool> {
    use crate::schema::core::q1_windows::dsl;

    let (complete, reasons) = game_is_complete(conn, &row.game_id)?;
    if !complete {
        info!("derived_loader.skip game_id={} reasons={reasons:?}", row.game_id);
        return Ok(false);
    }

    diesel::insert_into(dsl::q1_windows)
        .values(&row)
        .on_conflict(dsl::game_id)
        .do_update()
        .set(&row)
        .filter(
            dsl::possessions_elapsed
                .is_distinct_from(row.possessions_elapsed)
                .or(dsl::expected_pace.is_distinct_from(row.expected_pace))
                .or(dsl::actual_pace_home.is_distinct_from(row.actual_pace_home))
                .or(dsl::actual_pace_away.is_distinct_from(row.actual_pace_away))
                .or(dsl::efg_home.is_distinct_from(row.efg_home))
                .or(dsl::efg_away.is_distinct_from(row.efg_away))
                .or(dsl::to_rate_home.is_distinct_from(row.to_rate_home))
                .or(dsl::to_rate_away.is_distinct_from(row.to_rate_away))
                .or(dsl::ft_rate_home.is_distinct_from(row.ft_rate_home))
                .or(dsl::ft_rate_away.is_distinct_from(row.ft_rate_away))
                .or(dsl::oreb_pct_home.is_distinct_from(row.oreb_pct_home))
                .or(dsl::oreb_pct_away.is_distinct_from(row.oreb_pct_away))
                .or(dsl::dreb_pct_home.is_distinct_from(row.dreb_pct_home))
                .or(dsl::dreb_pct_away.is_distinct_from(row.dreb_pct_away))
                .or(dsl::bonus_seconds_home.is_distinct_from(row.bonus_seconds_home))
                .or(dsl::bonus_seconds_away.is_distinct_from(row.bonus_seconds_away))
                .or(dsl::transition_rate.is_distinct_from(row.transition_rate))
                .or(dsl::early_clock_rate.is_distinct_from(row.early_clock_rate)),
        )
        .execute(conn)?;
    Ok(true)
}

pub fn insert_early_shocks(conn: &mut PgConnection, game_id: &str, shocks: Vec<NewEarlyShock>) -> DbResult<usize> {
    use crate::schema::core::early_shocks::dsl;

    let (complete, reasons) = game_is_complete(conn, game_id)?;
    if !complete {
        info!("skipping early_shocks write for {game_id}, incomplete: {reasons:?}");
        return Ok(0);
    }

    let (kept, warnings) = filter_known_games(conn, shocks, |s| s.game_id.as_str())?;
    for warning in &warnings {
        log::warn!("{warning}");
    }

    diesel::delete(dsl::early_shocks.filter(dsl::game_id.eq(game_id))).execute(conn)?;
    if kept.is_empty() {
        return Ok(0);
    }
    Ok(diesel::insert_into(dsl::early_shocks).values(&kept).execute(conn)?)
}

pub fn upsert_schedule_travel(conn: &mut PgConnection, rows: Vec<NewScheduleTravel>) -> DbResult<usize> {
    use crate::schema::core::schedule_travel::dsl;

    let (kept, warnings) = filter_known_games(conn, rows, |r| r.game_id.as_str())?;
    for warning in &warnings {
        log::warn!("{warning}");
    }

    let mut total = 0;
    for row in &kept {
        total += diesel::insert_into(dsl::schedule_travel)
            .values(row)
            .on_conflict((dsl::game_id, dsl::team_tricode))
            .do_update()
            .set(row)
            .filter(
                dsl::back_to_back
                    .is_distinct_from(row.back_to_back)
                    .or(dsl::three_in_four.is_distinct_from(row.three_in_four))
                    .or(dsl::five_in_seven.is_distinct_from(row.five_in_seven))
                    .or(dsl::days_rest.is_distinct_from(row.days_rest))
                    .or(dsl::tz_shift_hours.is_distinct_from(row.tz_shift_hours))
                    .or(dsl::circadian_index.is_distinct_from(row.circadian_index))
                    .or(dsl::altitude_change_m.is_distinct_from(row.altitude_change_m))
                    .or(dsl::haversine_km.is_distinct_from(row.haversine_km))
                    .or(dsl::prev_venue_lat.is_distinct_from(row.prev_venue_lat))
                    .or(dsl::prev_venue_lon.is_distinct_from(row.prev_venue_lon)),
            )
            .execute(conn)?;
    }
    Ok(total)
}
