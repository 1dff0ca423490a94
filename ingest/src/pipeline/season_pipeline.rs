//! Season pipeline (§4.10): discovers every game_id in a season (or an
//! optional narrower date range) day by day via the scoreboard endpoint,
//! filters to games that still need work, and runs them through the
//! per-game pipeline in batches with an inter-batch pause. Once raw
//! ingestion for the range is done, it recomputes the schedule/travel
//! table per team across the range, since that derived table needs
//! cross-game history the per-game pipeline doesn't have.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use diesel::prelude::*;
use fetch::SourceClient;
use log::{info, warn};
use nba_db::models::DbGame;
use nba_db::{checkpoint, loaders};

use crate::derived::travel::{self, ScheduleEntry};
use crate::error::IngestResult;
use crate::extractors::nba_stats as nba_stats_extractor;
use crate::pipeline::worker::run_bounded;
use crate::pipeline::{game_pipeline, PipelineContext, PipelineResult};
use crate::preprocess::preprocess_row;

const PIPELINE_NAME: &str = "season_pipeline";

/// Oct 1 -> Jun 30 of the following year, per §4.6's season-derivation
/// convention.
fn season_bounds(season: &str) -> Option<(NaiveDate, NaiveDate)> {
    let start_year: i32 = season.split('-').next()?.parse().ok()?;
    let start = NaiveDate::from_ymd_opt(start_year, 10, 1)?;
    let end = NaiveDate::from_ymd_opt(start_year + 1, 6, 30)?;
    Some((start, end))
}

async fn discover_games_for_date(ctx: &PipelineContext, date: NaiveDate) -> IngestResult<Vec<String>> {
    let date_str = date.format("%Y-%m-%d").to_string();
    let json = ctx.nba_stats.scoreboard(&date_str).await?;
    let rows: Vec<String> = nba_stats_extractor::extract_scoreboard(&json)
        .iter()
        .map(preprocess_row)
        .filter_map(|row| row.str("game_id").map(str::to_string))
        .collect();
    Ok(rows)
}

fn should_process_game(conn: &mut nba_db::PgConnection, game_id: &str, force_refresh: bool) -> IngestResult<bool> {
    let existing = loaders::games::find_game(conn, game_id)?;
    Ok(match existing {
        None => true,
        Some(game) => game.status != "Final" || force_refresh,
    })
}

pub async fn run(ctx: &PipelineContext, season: &str, date_range: Option<(NaiveDate, NaiveDate)>) -> PipelineResult {
    let started = Instant::now();
    let mut result = PipelineResult::default();

    let Some((start, end)) = date_range.or_else(|| season_bounds(season)) else {
        result.error = Some(format!("could not determine date bounds for season {season}"));
        result.duration = started.elapsed();
        return result;
    };

    let config = ctx.config.season_pipeline.clone();

    let mut conn = match ctx.pool.get() {
        Ok(conn) => conn,
        Err(err) => {
            result.error = Some(err.to_string());
            result.duration = started.elapsed();
            return result;
        }
    };

    let mut game_ids: Vec<String> = Vec::new();
    let mut date = start;
    while date <= end {
        let date_key = date.format("%Y-%m-%d").to_string();
        let checkpoint_row = match checkpoint::start(&mut conn, PIPELINE_NAME, &date_key, "discover") {
            Ok(row) => row,
            Err(err) => {
                warn!("could not write discovery checkpoint for {date_key}: {err}");
                date = date.succ_opt().expect("date within a season never overflows");
                continue;
            }
        };

        match discover_games_for_date(ctx, date).await {
            Ok(ids) => {
                let _ = checkpoint::complete(&mut conn, checkpoint_row.id);
                game_ids.extend(ids);
            }
            Err(err) => {
                warn!("scoreboard discovery failed for {date_key}: {err}");
                let _ = checkpoint::fail(&mut conn, checkpoint_row.id, &err.to_string());
            }
        }

        date = date.succ_opt().expect("date within a season never overflows");
    }

    let mut filtered = Vec::new();
    for game_id in game_ids {
        match should_process_game(&mut conn, &game_id, config.force_refresh) {
            Ok(true) => filtered.push(game_id),
            Ok(false) => {}
            Err(err) => warn!("should_process_game check failed for {game_id}: {err}"),
        }
    }
    drop(conn);

    info!("season {season}: {} games to process", filtered.len());

    for batch in filtered.chunks(config.batch_size.max(1)) {
        let outcomes = run_bounded(batch.to_vec(), config.worker_concurrency, {
            let ctx = ctx.clone();
            move |game_id: String| {
                let ctx = ctx.clone();
                async move { game_pipeline::ingest_game(&ctx, &game_id).await }
            }
        })
        .await;

        for (_game_id, game_result) in outcomes {
            result.games_attempted += game_result.games_attempted;
            result.games_succeeded += game_result.games_succeeded;
            result.games_failed.extend(game_result.games_failed);
            result.merge_table_counts(game_result.table_counts);
        }

        tokio::time::sleep(Duration::from_secs(config.inter_batch_pause_secs)).await;
    }

    if let Err(err) = recompute_travel(ctx, season) {
        warn!("schedule/travel recomputation failed for season {season}: {err}");
    }

    result.success = result.games_failed.is_empty();
    result.duration = started.elapsed();
    result
}

fn recompute_travel(ctx: &PipelineContext, season: &str) -> IngestResult<()> {
    use nba_db::schema::core::games::dsl;

    let mut conn = ctx.pool.get().map_err(nba_db::DbError::from)?;

    let season_games: Vec<DbGame> = dsl::games
        .filter(dsl::season.eq(season))
        .order(dsl::arena_date.asc())
        .load(&mut conn)
        .map_err(nba_db::DbError::from)?;

    let mut team_tricodes: Vec<String> = Vec::new();
    for game in &season_games {
        for tricode in [&game.home_tricode, &game.away_tricode] {
            if !team_tricodes.contains(tricode) {
                team_tricodes.push(tricode.clone());
            }
        }
    }

    for team in &team_tricodes {
        let schedule: Vec<&DbGame> = season_games
            .iter()
            .filter(|g| &g.home_tricode == team || &g.away_tricode == team)
            .collect();

        let mut entries = Vec::with_capacity(schedule.len());
        for game in &schedule {
            let Some(venue) = ctx.venues.get(&game.home_tricode) else { continue };
            entries.push(ScheduleEntry { game_id: &game.game_id, local_date: game.arena_date, local_start_hour: 19, venue });
        }

        let mut rows = Vec::with_capacity(entries.len());
        for (idx, game) in schedule.iter().enumerate() {
            if idx >= entries.len() {
                continue;
            }
            let Ok(current_tz): Result<chrono_tz::Tz, _> = entries[idx].venue.tz.parse() else { continue };
            rows.push(travel::compute(&game.game_id, team, &entries, idx, current_tz));
        }

        if let Err(err) = loaders::derived::upsert_schedule_travel(&mut conn, rows) {
            warn!("schedule/travel upsert failed for team {team} in season {season}: {err}");
        }
    }

    Ok(())
}
