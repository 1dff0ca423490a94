mod config;
mod derived;
mod error;
mod extractors;
mod pipeline;
mod preprocess;
mod transform;

use std::process::ExitCode;
use std::sync::Arc;

use chrono::NaiveDate;
use fetch::{FetchConfig, HttpFetcher};
use log::{error, info};
use miette::IntoDiagnostic;

use crate::config::IngestConfig;
use crate::pipeline::{daily_pipeline, game_pipeline, season_pipeline, PipelineContext, PipelineResult};

/// Entry point dispatch is a small fixed set of subcommands, not a full
/// CLI grammar (§4's Non-goals rule out a `clap`-based surface): `season
/// <season> [start end]`, `daily <date>`, `game <game_id>`, `validate`,
/// or `rollback <game_id> [--dry-run]`.
enum Command {
    Season { season: String, range: Option<(NaiveDate, NaiveDate)> },
    Daily { date: NaiveDate },
    Game { game_id: String },
    Validate,
    Rollback { game_id: String, dry_run: bool },
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command, String> {
    let _bin = args.next();
    let verb = args.next().ok_or("usage: nba-ingest <season|daily|game> ...")?;

    match verb.as_str() {
        "season" => {
            let season = args.next().ok_or("season requires a <season> argument, e.g. 2023-24")?;
            let range = match (args.next(), args.next()) {
                (Some(start), Some(end)) => Some((parse_date(&start)?, parse_date(&end)?)),
                _ => None,
            };
            Ok(Command::Season { season, range })
        }
        "daily" => {
            let date = args.next().ok_or("daily requires a <date> argument, e.g. 2024-01-15")?;
            Ok(Command::Daily { date: parse_date(&date)? })
        }
        "game" => {
            let game_id = args.next().ok_or("game requires a <game_id> argument")?;
            Ok(Command::Game { game_id })
        }
        "validate" => Ok(Command::Validate),
        "rollback" => {
            let game_id = args.next().ok_or("rollback requires a <game_id> argument")?;
            let dry_run = args.next().as_deref() == Some("--dry-run");
            Ok(Command::Rollback { game_id, dry_run })
        }
        other => Err(format!("unknown subcommand {other}; expected season, daily, game, validate, or rollback")),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| format!("could not parse date {raw} as YYYY-MM-DD"))
}

fn log_result(label: &str, result: &PipelineResult) {
    if result.success {
        info!(
            "{label} finished: {}/{} games succeeded in {:.1}s",
            result.games_succeeded,
            result.games_attempted,
            result.duration.as_secs_f64()
        );
    } else {
        error!(
            "{label} finished with failures: {}/{} games succeeded, {} failed in {:.1}s",
            result.games_succeeded,
            result.games_attempted,
            result.games_failed.len(),
            result.duration.as_secs_f64()
        );
        for (game_id, err) in &result.games_failed {
            error!("  game {game_id} failed: {err}");
        }
    }
    for (table, count) in &result.table_counts {
        info!("  {table}: {count} rows written");
    }
    if let Some(err) = &result.error {
        error!("{label} aborted early: {err}");
    }
}

#[tokio::main]
async fn main() -> miette::Result<ExitCode> {
    env_logger::init();

    let command = match parse_args(std::env::args()) {
        Ok(command) => command,
        Err(message) => {
            error!("{message}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let ingest_config = IngestConfig::load().into_diagnostic()?;
    let fetch_config = FetchConfig::load().into_diagnostic()?;
    let freshness_window_hours = ingest_config.freshness_window_hours;

    let pool = nba_db::get_pool(ingest_config.db_pool_size).into_diagnostic()?;

    if let Command::Validate = command {
        let mut conn = pool.get().into_diagnostic()?;
        let results = nba_db::validation::run_all(&mut conn, freshness_window_hours).into_diagnostic()?;
        let all_ok = results.iter().all(|r| r.ok);
        for r in &results {
            if r.ok {
                info!("validation.{} passed", r.check);
            } else {
                error!("validation.{} failed: {:?}", r.check, r.details);
            }
        }
        return Ok(if all_ok { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }

    if let Command::Rollback { game_id, dry_run } = &command {
        let mut conn = pool.get().into_diagnostic()?;
        if *dry_run {
            let counts = nba_db::loaders::rollback::count_game_rows(&mut conn, game_id).into_diagnostic()?;
            info!("rollback dry-run for {game_id}: would delete {} rows total", counts.total());
            info!("  {counts:?}");
        } else {
            let counts = conn
                .transaction::<_, nba_db::DbError, _>(|conn| Ok(nba_db::loaders::rollback::rollback_game(conn, game_id)?))
                .into_diagnostic()?;
            info!("rolled back {game_id}: deleted {} rows total", counts.total());
            info!("  {counts:?}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let fetcher = Arc::new(HttpFetcher::new(fetch_config));
    let ctx = PipelineContext::new(ingest_config, pool, fetcher).into_diagnostic()?;

    let result = match command {
        Command::Season { season, range } => {
            info!("starting season pipeline for {season}");
            season_pipeline::run(&ctx, &season, range).await
        }
        Command::Daily { date } => {
            info!("starting daily pipeline for {date}");
            daily_pipeline::run(&ctx, date).await
        }
        Command::Game { game_id } => {
            info!("starting single-game pipeline for {game_id}");
            game_pipeline::ingest_game(&ctx, &game_id).await
        }
        Command::Validate | Command::Rollback { .. } => {
            unreachable!("handled above before the pipeline context is built")
        }
    };

    log_result("pipeline", &result);

    Ok(if result.success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
