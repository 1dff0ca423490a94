use diesel::prelude::*;

use crate::error::DbResult;
use crate::models::NewOutcome;
use crate::schema::core::outcomes::dsl;

/// Diff-aware: a re-ingest of an unchanged final box score updates zero
/// rows rather than rewriting a row whose content hasn't moved.
pub fn upsert_outcome(conn: &mut PgConnection, row: &NewOutcome) -> DbResult<usize> {
    Ok(diesel::insert_into(dsl::outcomes)
        .values(row)
        .on_conflict(dsl::game_id)
        .do_update()
        .set(row)
        .filter(
            dsl::home_final
                .is_distinct_from(row.home_final)
                .or(dsl::away_final.is_distinct_from(row.away_final))
                .or(dsl::home_q1.is_distinct_from(row.home_q1))
                .or(dsl::away_q1.is_distinct_from(row.away_q1))
                .or(dsl::margin.is_distinct_from(row.margin))
                .or(dsl::ot_count.is_distinct_from(row.ot_count)),
        )
        .execute(conn)?)
}
