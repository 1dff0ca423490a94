use diesel::prelude::*;

use crate::error::DbResult;
use crate::models::{DbGame, NewGame};
use crate::schema::core::games::dsl;

/// Diff-aware upsert on `game_id`: the `DO UPDATE` carries a `WHERE`
/// guard so a row whose content already matches the incoming payload is
/// left untouched — no version bump, no downstream change event.
/// `source`/`source_url`/`ingested_at` are deliberately excluded from
/// the guard: they record *when and from where* this payload arrived,
/// and including them would make every re-ingest look "different" by
/// timestamp alone, defeating the point of the guard.
pub fn upsert_game(conn: &mut PgConnection, new_game: &NewGame) -> DbResult<DbGame> {
    let row = diesel::insert_into(dsl::games)
        .values(new_game)
        .on_conflict(dsl::game_id)
        .do_update()
        .set(new_game)
        .filter(
            dsl::season
                .is_distinct_from(&new_game.season)
                .or(dsl::start_time_utc.is_distinct_from(new_game.start_time_utc))
                .or(dsl::arena_date.is_distinct_from(new_game.arena_date))
                .or(dsl::arena_tz.is_distinct_from(&new_game.arena_tz))
                .or(dsl::home_tricode.is_distinct_from(&new_game.home_tricode))
                .or(dsl::away_tricode.is_distinct_from(&new_game.away_tricode))
                .or(dsl::status.is_distinct_from(&new_game.status))
                .or(dsl::period.is_distinct_from(new_game.period)),
        )
        .get_result(conn)
        .optional()?;
    match row {
        Some(row) => Ok(row),
        None => find_game(conn, &new_game.game_id)?.ok_or_else(|| crate::error::DbError::MissingRow {
            table: "games",
            key: new_game.game_id.clone(),
        }),
    }
}

pub fn upsert_crosswalk(
    conn: &mut PgConnection,
    new_crosswalk: &crate::models::NewGameCrosswalk,
) -> DbResult<()> {
    use crate::schema::core::game_crosswalk::dsl as cw;

    diesel::insert_into(cw::game_crosswalk)
        .values(new_crosswalk)
        .on_conflict(cw::game_id)
        .do_update()
        .set(new_crosswalk)
        .filter(
            cw::bref_game_id
                .is_distinct_from(&new_crosswalk.bref_game_id)
                .or(cw::other_ids.is_distinct_from(&new_crosswalk.other_ids)),
        )
        .execute(conn)?;
    Ok(())
}

pub fn find_game(conn: &mut PgConnection, game_id: &str) -> DbResult<Option<DbGame>> {
    let row = dsl::games.filter(dsl::game_id.eq(game_id)).first(conn).optional()?;
    Ok(row)
}
