//! Batch validators (§4.11). Each check is independent and returns a
//! [`ValidationResult`]; `run_all` collects every check into one summary
//! that the ingest crate logs and persists to `meta.validation_results`.

use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};
use log::info;
use serde_json::json;

use crate::error::DbResult;
use crate::models::NewValidationResult;
use crate::schema::meta::validation_results::dsl as vr_dsl;

#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub check: &'static str,
    pub ok: bool,
    pub details: Vec<String>,
}

impl ValidationResult {
    fn pass(check: &'static str) -> Self {
        Self { check, ok: true, details: vec![] }
    }

    fn fail(check: &'static str, details: Vec<String>) -> Self {
        Self { check, ok: false, details }
    }
}

#[derive(QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

#[derive(QueryableByName)]
struct TextRow {
    #[diesel(sql_type = Text)]
    value: String,
}

pub fn check_fk_validity(conn: &mut PgConnection) -> DbResult<ValidationResult> {
    let orphans: Vec<TextRow> = diesel::sql_query(
        "SELECT DISTINCT p.game_id AS value FROM core.pbp_events p \
         LEFT JOIN core.games g ON g.game_id = p.game_id WHERE g.game_id IS NULL LIMIT 50",
    )
    .load(conn)?;

    if orphans.is_empty() {
        Ok(ValidationResult::pass("fk_validity"))
    } else {
        Ok(ValidationResult::fail(
            "fk_validity",
            orphans.into_iter().map(|r| format!("orphaned game_id {}", r.value)).collect(),
        ))
    }
}

pub fn check_uniqueness(conn: &mut PgConnection) -> DbResult<ValidationResult> {
    let dup_bref: Vec<TextRow> = diesel::sql_query(
        "SELECT bref_game_id AS value FROM core.game_crosswalk \
         WHERE bref_game_id IS NOT NULL GROUP BY bref_game_id HAVING COUNT(*) > 1",
    )
    .load(conn)?;

    let dup_refs: Vec<CountRow> = diesel::sql_query(
        "SELECT COUNT(*) AS count FROM ( \
            SELECT game_id, referee_slug, role FROM core.referee_assignments \
            GROUP BY game_id, referee_slug, role HAVING COUNT(*) > 1 \
         ) dupes",
    )
    .load(conn)?;

    let mut details: Vec<String> = dup_bref.into_iter().map(|r| format!("duplicate bref_game_id {}", r.value)).collect();
    if dup_refs.first().map(|r| r.count).unwrap_or(0) > 0 {
        details.push("duplicate (game_id, referee_slug, role) rows".to_string());
    }

    if details.is_empty() {
        Ok(ValidationResult::pass("uniqueness"))
    } else {
        Ok(ValidationResult::fail("uniqueness", details))
    }
}

/// Within `(game_id, period)`, `event_idx` must be gapless and
/// duplicate-free, and `seconds_elapsed` must be non-decreasing (a
/// single ≤5s backward step is tolerated for simultaneous events).
pub fn check_pbp_monotonicity(conn: &mut PgConnection) -> DbResult<ValidationResult> {
    let regressions: Vec<CountRow> = diesel::sql_query(
        "SELECT COUNT(*) AS count FROM ( \
            SELECT game_id, period, seconds_elapsed, \
                LAG(seconds_elapsed) OVER (PARTITION BY game_id, period ORDER BY event_idx) AS prev \
            FROM core.pbp_events \
         ) t WHERE prev IS NOT NULL AND t.seconds_elapsed < t.prev - 5.0",
    )
    .load(conn)?;

    let dup_idx: Vec<CountRow> = diesel::sql_query(
        "SELECT COUNT(*) AS count FROM ( \
            SELECT game_id, period, event_idx FROM core.pbp_events \
            GROUP BY game_id, period, event_idx HAVING COUNT(*) > 1 \
         ) dupes",
    )
    .load(conn)?;

    let mut details = Vec::new();
    if regressions.first().map(|r| r.count).unwrap_or(0) > 0 {
        details.push(format!("{} clock regressions beyond tolerance", regressions[0].count));
    }
    if dup_idx.first().map(|r| r.count).unwrap_or(0) > 0 {
        details.push(format!("{} duplicate event_idx values", dup_idx[0].count));
    }

    if details.is_empty() {
        Ok(ValidationResult::pass("pbp_monotonicity"))
    } else {
        Ok(ValidationResult::fail("pbp_monotonicity", details))
    }
}

pub fn check_completeness_share(conn: &mut PgConnection) -> DbResult<ValidationResult> {
    let total: CountRow = diesel::sql_query("SELECT COUNT(*) AS count FROM core.games").get_result(conn)?;
    let with_outcomes: CountRow =
        diesel::sql_query("SELECT COUNT(DISTINCT game_id) AS count FROM core.outcomes").get_result(conn)?;

    let share = if total.count > 0 {
        with_outcomes.count as f64 / total.count as f64
    } else {
        1.0
    };

    if share >= 0.9 {
        Ok(ValidationResult::pass("completeness_share"))
    } else {
        Ok(ValidationResult::fail(
            "completeness_share",
            vec![format!("only {:.1}% of games have outcomes recorded", share * 100.0)],
        ))
    }
}

pub fn check_freshness(conn: &mut PgConnection, hours: i64) -> DbResult<ValidationResult> {
    let latest: Vec<CountRow> = diesel::sql_query(
        "SELECT COUNT(*) AS count FROM core.games WHERE ingested_at > NOW() - INTERVAL '1 hour' * $1",
    )
    .bind::<BigInt, _>(hours)
    .load(conn)?;

    if latest.first().map(|r| r.count).unwrap_or(0) > 0 {
        Ok(ValidationResult::pass("freshness"))
    } else {
        Ok(ValidationResult::fail(
            "freshness",
            vec![format!("no games ingested in the last {hours} hours")],
        ))
    }
}

pub fn check_cross_table_consistency(conn: &mut PgConnection) -> DbResult<ValidationResult> {
    let mismatches: Vec<TextRow> = diesel::sql_query(
        "SELECT DISTINCT s.game_id AS value FROM core.schedule_travel s \
         JOIN core.games g ON g.game_id = s.game_id \
         WHERE s.team_tricode NOT IN (g.home_tricode, g.away_tricode) LIMIT 50",
    )
    .load(conn)?;

    if mismatches.is_empty() {
        Ok(ValidationResult::pass("cross_table_consistency"))
    } else {
        Ok(ValidationResult::fail(
            "cross_table_consistency",
            mismatches.into_iter().map(|r| format!("tricode mismatch for game {}", r.value)).collect(),
        ))
    }
}

pub fn run_all(conn: &mut PgConnection, freshness_window_hours: i64) -> DbResult<Vec<ValidationResult>> {
    let results = vec![
        check_fk_validity(conn)?,
        check_uniqueness(conn)?,
        check_pbp_monotonicity(conn)?,
        check_completeness_share(conn)?,
        check_freshness(conn, freshness_window_hours)?,
        check_cross_table_consistency(conn)?,
    ];

    for result in &results {
        info!("validation check {} -> ok={} details={:?}", result.check, result.ok, result.details);
        let row = NewValidationResult {
            check_name: result.check.to_string(),
            ran_at: Utc::now(),
            ok: result.ok,
            details: json!(result.details),
        };
        diesel::insert_into(vr_dsl::validation_results)
            .values(&row)
            .execute(conn)?;
    }

    Ok(results)
}

/// Pre-insert filter used by derived loaders: keeps only rows whose
/// `game_id` exists in `core.games`, returning the filtered rows plus a
/// warning per dropped row.
pub fn filter_known_games<T>(
    conn: &mut PgConnection,
    rows: Vec<T>,
    game_id_of: impl Fn(&T) -> &str,
) -> DbResult<(Vec<T>, Vec<String>)> {
    use crate::schema::core::games::dsl as g;

    let ids: Vec<String> = rows.iter().map(|r| game_id_of(r).to_string()).collect();
    let known: Vec<String> = g::games.filter(g::game_id.eq_any(&ids)).select(g::game_id).load(conn)?;
    let known: std::collections::HashSet<String> = known.into_iter().collect();

    let mut kept = Vec::with_capacity(rows.len());
    let mut warnings = Vec::new();
    for row in rows {
        if known.contains(game_id_of(&row)) {
            kept.push(row);
        } else {
            warnings.push(format!("dropping row for unknown game_id {}", game_id_of(&row)));
        }
    }

    Ok((kept, warnings))
}

pub fn freshness_default_window() -> Duration {
    Duration::hours(48)
}

pub fn is_stale(last_ingested_at: DateTime<Utc>) -> bool {
    Utc::now() - last_ingested_at > freshness_default_window()
}
