use diesel::prelude::*;

use crate::error::DbResult;
use crate::models::NewPbpEvent;
use crate::schema::core::pbp_events::dsl;

const DEFAULT_BULK_BATCH_SIZE: usize = 1000;

/// Bulk diff-aware upsert of one game's play-by-play events, keyed on
/// `(game_id, period, event_idx)`. Batches at `batch_size` chunked
/// `insert_into(...).values(...)` calls, per §4.7's bulk-load note.
pub fn upsert_events(conn: &mut PgConnection, events: &[NewPbpEvent]) -> DbResult<usize> {
    upsert_events_batched(conn, events, DEFAULT_BULK_BATCH_SIZE)
}

pub fn upsert_events_batched(
    conn: &mut PgConnection,
    events: &[NewPbpEvent],
    batch_size: usize,
) -> DbResult<usize> {
    let mut total = 0;
    for chunk in events.chunks(batch_size.max(1)) {
        total += diesel::insert_into(dsl::pbp_events)
            .values(chunk)
            .on_conflict((dsl::game_id, dsl::period, dsl::event_idx))
            .do_update()
            .set((
                dsl::clock_remaining_ms.eq(diesel::pg::expression::dsl::excluded(dsl::clock_remaining_ms)),
                dsl::clock_display.eq(diesel::pg::expression::dsl::excluded(dsl::clock_display)),
                dsl::seconds_elapsed.eq(diesel::pg::expression::dsl::excluded(dsl::seconds_elapsed)),
                dsl::home_score.eq(diesel::pg::expression::dsl::excluded(dsl::home_score)),
                dsl::away_score.eq(diesel::pg::expression::dsl::excluded(dsl::away_score)),
                dsl::event_type.eq(diesel::pg::expression::dsl::excluded(dsl::event_type)),
                dsl::event_subtype.eq(diesel::pg::expression::dsl::excluded(dsl::event_subtype)),
                dsl::player1_slug.eq(diesel::pg::expression::dsl::excluded(dsl::player1_slug)),
                dsl::player1_id.eq(diesel::pg::expression::dsl::excluded(dsl::player1_id)),
                dsl::player2_slug.eq(diesel::pg::expression::dsl::excluded(dsl::player2_slug)),
                dsl::player2_id.eq(diesel::pg::expression::dsl::excluded(dsl::player2_id)),
                dsl::player3_slug.eq(diesel::pg::expression::dsl::excluded(dsl::player3_slug)),
                dsl::player3_id.eq(diesel::pg::expression::dsl::excluded(dsl::player3_id)),
                dsl::team_tricode.eq(diesel::pg::expression::dsl::excluded(dsl::team_tricode)),
                dsl::shot_made.eq(diesel::pg::expression::dsl::excluded(dsl::shot_made)),
                dsl::shot_value.eq(diesel::pg::expression::dsl::excluded(dsl::shot_value)),
                dsl::shot_type.eq(diesel::pg::expression::dsl::excluded(dsl::shot_type)),
                dsl::shot_zone.eq(diesel::pg::expression::dsl::excluded(dsl::shot_zone)),
                dsl::shot_distance_ft.eq(diesel::pg::expression::dsl::excluded(dsl::shot_distance_ft)),
                dsl::shot_x.eq(diesel::pg::expression::dsl::excluded(dsl::shot_x)),
                dsl::shot_y.eq(diesel::pg::expression::dsl::excluded(dsl::shot_y)),
                dsl::is_transition.eq(diesel::pg::expression::dsl::excluded(dsl::is_transition)),
                dsl::is_early_clock.eq(diesel::pg::expression::dsl::excluded(dsl::is_early_clock)),
                dsl::shot_clock_seconds.eq(diesel::pg::expression::dsl::excluded(dsl::shot_clock_seconds)),
                dsl::possession_team.eq(diesel::pg::expression::dsl::excluded(dsl::possession_team)),
            ))
            .filter(
                dsl::clock_remaining_ms
                    .is_distinct_from(diesel::pg::expression::dsl::excluded(dsl::clock_remaining_ms))
                    .or(dsl::home_score.is_distinct_from(diesel::pg::expression::dsl::excluded(dsl::home_score)))
                    .or(dsl::away_score.is_distinct_from(diesel::pg::expression::dsl::excluded(dsl::away_score)))
                    .or(dsl::event_type.is_distinct_from(diesel::pg::expression::dsl::excluded(dsl::event_type)))
                    .or(dsl::event_subtype.is_distinct_from(diesel::pg::expression::dsl::excluded(dsl::event_subtype)))
                    .or(dsl::player1_slug.is_distinct_from(diesel::pg::expression::dsl::excluded(dsl::player1_slug)))
                    .or(dsl::player2_slug.is_distinct_from(diesel::pg::expression::dsl::excluded(dsl::player2_slug)))
                    .or(dsl::player3_slug.is_distinct_from(diesel::pg::expression::dsl::excluded(dsl::player3_slug)))
                    .or(dsl::team_tricode.is_distinct_from(diesel::pg::expression::dsl::excluded(dsl::team_tricode)))
                    .or(dsl::shot_made.is_distinct_from(diesel::pg::expression::dsl::excluded(dsl::shot_made)))
                    .or(dsl::shot_zone.is_distinct_from(diesel::pg::expression::dsl::excluded(dsl::shot_zone)))
                    .or(dsl::possession_team.is_distinct_from(diesel::pg::expression::dsl::excluded(dsl::possession_team))),
            )
            .execute(conn)?;
    }
    Ok(total)
}

pub fn delete_events_for_game(conn: &mut PgConnection, game_id: &str) -> DbResult<usize> {
    Ok(diesel::delete(dsl::pbp_events.filter(dsl::game_id.eq(game_id))).execute(conn)?)
}
