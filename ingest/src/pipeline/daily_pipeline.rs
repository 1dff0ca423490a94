//! Daily pipeline (§4.10): resolves a single date to its list of games
//! via the scoreboard endpoint, then delegates straight to the per-game
//! pipeline in batches, mirroring `season_pipeline`'s batching but over
//! one day's worth of games rather than a whole season's date range.

use std::time::Instant;

use chrono::NaiveDate;
use fetch::SourceClient;
use log::warn;
use nba_db::checkpoint;

use crate::extractors::nba_stats as nba_stats_extractor;
use crate::pipeline::worker::run_bounded;
use crate::pipeline::{game_pipeline, PipelineContext, PipelineResult};
use crate::preprocess::preprocess_row;

const PIPELINE_NAME: &str = "daily_pipeline";

pub async fn run(ctx: &PipelineContext, date: NaiveDate) -> PipelineResult {
    let started = Instant::now();
    let mut result = PipelineResult::default();
    let date_key = date.format("%Y-%m-%d").to_string();
    let config = ctx.config.daily_pipeline.clone();

    let mut conn = match ctx.pool.get() {
        Ok(conn) => conn,
        Err(err) => {
            result.error = Some(err.to_string());
            result.duration = started.elapsed();
            return result;
        }
    };

    let checkpoint_row = match checkpoint::start(&mut conn, PIPELINE_NAME, &date_key, "discover") {
        Ok(row) => row,
        Err(err) => {
            result.error = Some(err.to_string());
            result.duration = started.elapsed();
            return result;
        }
    };
    drop(conn);

    let game_ids = match ctx.nba_stats.scoreboard(&date_key).await {
        Ok(json) => nba_stats_extractor::extract_scoreboard(&json)
            .iter()
            .map(preprocess_row)
            .filter_map(|row| row.str("game_id").map(str::to_string))
            .collect::<Vec<_>>(),
        Err(err) => {
            warn!("scoreboard fetch failed for {date_key}: {err}");
            if let Ok(mut conn) = ctx.pool.get() {
                let _ = checkpoint::fail(&mut conn, checkpoint_row.id, &err.to_string());
            }
            result.error = Some(err.to_string());
            result.duration = started.elapsed();
            return result;
        }
    };

    if let Ok(mut conn) = ctx.pool.get() {
        let _ = checkpoint::complete(&mut conn, checkpoint_row.id);
    }

    for batch in game_ids.chunks(config.batch_size.max(1)) {
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

        tokio::time::sleep(std::time::Duration::from_secs(config.inter_batch_pause_secs)).await;
    }

    result.success = result.games_failed.is_empty();
    result.duration = started.elapsed();
    result
}
