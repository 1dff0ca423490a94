//! Mandatory pipeline checkpointing (§4.10, Open Question resolved in
//! favor of "always on" — see DESIGN.md). Every orchestrator writes a row
//! before starting a unit of work and updates it to `completed`/`failed`
//! on exit; resume mode re-selects `pending`/`failed` rows.

use chrono::Utc;
use diesel::prelude::*;

use crate::error::DbResult;
use crate::models::{DbCheckpoint, NewCheckpoint};
use crate::schema::meta::pipeline_checkpoints::dsl;

pub fn start(conn: &mut PgConnection, pipeline_name: &str, work_key: &str, step: &str) -> DbResult<DbCheckpoint> {
    let new_row = NewCheckpoint {
        pipeline_name: pipeline_name.to_string(),
        work_key: work_key.to_string(),
        step: step.to_string(),
        status: "pending".to_string(),
        started_at: Utc::now(),
        completed_at: None,
        error_message: None,
    };

    let row = diesel::insert_into(dsl::pipeline_checkpoints)
        .values(&new_row)
        .on_conflict((dsl::pipeline_name, dsl::work_key, dsl::step))
        .do_update()
        .set((dsl::status.eq("pending"), dsl::started_at.eq(Utc::now()), dsl::completed_at.eq(None::<chrono::DateTime<Utc>>), dsl::error_message.eq(None::<String>)))
        .get_result(conn)?;

    Ok(row)
}

pub fn complete(conn: &mut PgConnection, checkpoint_id: i64) -> DbResult<()> {
    diesel::update(dsl::pipeline_checkpoints.find(checkpoint_id))
        .set((dsl::status.eq("completed"), dsl::completed_at.eq(Utc::now())))
        .execute(conn)?;
    Ok(())
}

pub fn fail(conn: &mut PgConnection, checkpoint_id: i64, error_message: &str) -> DbResult<()> {
    diesel::update(dsl::pipeline_checkpoints.find(checkpoint_id))
        .set((
            dsl::status.eq("failed"),
            dsl::completed_at.eq(Utc::now()),
            dsl::error_message.eq(error_message),
        ))
        .execute(conn)?;
    Ok(())
}

/// Resume mode: `pending` and `failed` checkpoints for a pipeline are
/// candidates for reprocessing, `completed` ones are skipped unless the
/// caller passes `force_refresh`.
pub fn pending_work(conn: &mut PgConnection, pipeline_name: &str, force_refresh: bool) -> DbResult<Vec<DbCheckpoint>> {
    let mut query = dsl::pipeline_checkpoints
        .filter(dsl::pipeline_name.eq(pipeline_name))
        .into_boxed();

    if !force_refresh {
        query = query.filter(dsl::status.eq_any(["pending", "failed"]));
    }

    Ok(query.load(conn)?)
}
