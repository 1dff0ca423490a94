use diesel::prelude::*;

use crate::error::DbResult;
use crate::models::{NewRefereeAlternate, NewRefereeAssignment};

/// Referee rows for one game are rewritten wholesale on each ingest
/// rather than diffed column-by-column: a clean delete of the game's
/// existing rows followed by a fresh insert of the current set.
pub fn replace_assignments(
    conn: &mut PgConnection,
    game_id: &str,
    assignments: &[NewRefereeAssignment],
) -> DbResult<usize> {
    use crate::schema::core::referee_assignments::dsl;

    diesel::delete(dsl::referee_assignments.filter(dsl::game_id.eq(game_id))).execute(conn)?;
    if assignments.is_empty() {
        return Ok(0);
    }
    Ok(diesel::insert_into(dsl::referee_assignments).values(assignments).execute(conn)?)
}

pub fn replace_alternates(
    conn: &mut PgConnection,
    game_id: &str,
    alternates: &[NewRefereeAlternate],
) -> DbResult<usize> {
    use crate::schema::core::referee_alternates::dsl;

    diesel::delete(dsl::referee_alternates.filter(dsl::game_id.eq(game_id))).execute(conn)?;
    if alternates.is_empty() {
        return Ok(0);
    }
    Ok(diesel::insert_into(dsl::referee_alternates).values(alternates).execute(conn)?)
}
