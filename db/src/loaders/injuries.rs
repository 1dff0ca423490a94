use diesel::prelude::*;

use crate::error::DbResult;
use crate::models::NewInjuryStatusSnapshot;

/// Injury-report snapshots are append-only: each pregame report is a new
/// point-in-time row, never an update of a prior one, so this is a plain
/// insert rather than a delete-then-insert or upsert.
pub fn insert_snapshots(conn: &mut PgConnection, snapshots: &[NewInjuryStatusSnapshot]) -> DbResult<usize> {
    use crate::schema::core::injury_status_snapshots::dsl;

    if snapshots.is_empty() {
        return Ok(0);
    }
    Ok(diesel::insert_into(dsl::injury_status_snapshots).values(snapshots).execute(conn)?)
}
