use diesel::prelude::*;

use crate::error::DbResult;
use crate::models::NewStartingLineup;

pub fn replace_lineup(
    conn: &mut PgConnection,
    game_id: &str,
    lineup: &[NewStartingLineup],
) -> DbResult<usize> {
    use crate::schema::core::starting_lineups::dsl;

    diesel::delete(dsl::starting_lineups.filter(dsl::game_id.eq(game_id))).execute(conn)?;
    if lineup.is_empty() {
        return Ok(0);
    }
    Ok(diesel::insert_into(dsl::starting_lineups).values(lineup).execute(conn)?)
}
