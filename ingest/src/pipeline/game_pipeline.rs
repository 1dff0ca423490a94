//! Per-game pipeline (§4.10): fetches one `game_id` across the NBA-Stats
//! and gamebooks sources, extracts, transforms, and loads inside a
//! single transaction in parent-then-child order, per §4.7's ordering
//! invariant (games, crosswalk, refs, lineups, injuries, pbp, stats,
//! outcomes). Derived Q1 and
//! early-shock analysis runs immediately after, gated by the
//! completeness check, since at single-game granularity that is
//! equivalent to the "separate pass after a date range" language in §2 —
//! schedule/travel needs cross-game history and is computed by the
//! season/daily orchestrators instead.

use std::collections::HashMap;
use std::time::Instant;

use chrono::{NaiveDate, TimeZone, Utc};
use fetch::SourceClient;
use log::{info, warn};
use nba_db::models::{NewEarlyShock, NewPbpEvent, NewQ1Window};
use nba_db::{checkpoint, loaders};

use crate::derived::{early_shocks, q1_window};
use crate::error::{IngestFatalError, IngestResult};
use crate::extractors::{gamebooks as gamebooks_extractor, nba_stats as nba_stats_extractor};
use crate::pipeline::{PipelineContext, PipelineResult};
use crate::preprocess::{preprocess_row, PreprocessedRow};
use crate::transform::{crosswalk, game as game_transform, injuries, lineups, outcomes, pbp, refs, season, stats};

const PIPELINE_NAME: &str = "game_pipeline";

fn gamebook_url_for(game_id: &str) -> String {
    // The live referee-assignments index page's discovery protocol is
    // not part of this contract (§9's open question); games are fetched
    // from the NBA's conventional per-game gamebook PDF path.
    format!("https://official.nba.com/referee-assignments/{game_id}.pdf")
}

fn preprocess_all(rows: &[crate::extractors::RowDict]) -> Vec<PreprocessedRow> {
    rows.iter().map(preprocess_row).collect()
}

/// Ingests one game's raw facts, then attempts the Q1-window and
/// early-shock derived writes. Returns a `PipelineResult` describing
/// table counts even when the game itself fails, per §7's "always
/// returns a result" contract for the batch-level callers.
pub async fn ingest_game(ctx: &PipelineContext, game_id: &str) -> PipelineResult {
    let started = Instant::now();
    let mut result = PipelineResult { games_attempted: 1, ..Default::default() };

    match ingest_game_inner(ctx, game_id).await {
        Ok(counts) => {
            result.success = true;
            result.games_succeeded = 1;
            result.merge_table_counts(counts);
        }
        Err(err) => {
            warn!("game {game_id} failed ingestion: {err}");
            result.games_failed.push((game_id.to_string(), err.to_string()));
        }
    }

    result.duration = started.elapsed();
    result
}

async fn ingest_game_inner(ctx: &PipelineContext, game_id: &str) -> IngestResult<HashMap<&'static str, usize>> {
    let mut conn = ctx.pool.get().map_err(nba_db::DbError::from)?;
    let checkpoint_row = checkpoint::start(&mut conn, PIPELINE_NAME, game_id, "fetch")?;

    let result = ingest_game_fetch_and_load(ctx, game_id, &mut conn).await;

    match &result {
        Ok(_) => checkpoint::complete(&mut conn, checkpoint_row.id)?,
        Err(err) => checkpoint::fail(&mut conn, checkpoint_row.id, &err.to_string())?,
    }

    result
}

async fn ingest_game_fetch_and_load(
    ctx: &PipelineContext,
    game_id: &str,
    conn: &mut nba_db::PgConnection,
) -> IngestResult<HashMap<&'static str, usize>> {
    let (summary_json, boxscore_json, pbp_json, shots_json) = futures::try_join!(
        ctx.nba_stats.lineups(game_id),
        ctx.nba_stats.boxscore(game_id),
        ctx.nba_stats.pbp(game_id),
        ctx.nba_stats.shots(game_id),
    )?;

    let gamebooks_result = ctx.gamebooks.referees(&gamebook_url_for(game_id)).await.ok();
    if gamebooks_result.is_none() {
        info!("no gamebook PDF available for {game_id}; referee assignments will be empty");
    }

    // Advanced/misc/usage box scores are a supplementary vendor surface
    // (unavailable for older seasons); a fetch failure here degrades to
    // null stat columns rather than failing the whole game.
    let (advanced_json, misc_json, usage_json) = futures::join!(
        ctx.nba_stats.boxscore_advanced(game_id),
        ctx.nba_stats.boxscore_misc(game_id),
        ctx.nba_stats.boxscore_usage(game_id),
    );

    let summary_rows = preprocess_all(&nba_stats_extractor::extract_scoreboard(&summary_json));
    let boxscore_rows = preprocess_all(&nba_stats_extractor::extract_boxscore_players(&boxscore_json));
    let pbp_rows = preprocess_all(&nba_stats_extractor::extract_pbp(&pbp_json));
    let _shot_rows = preprocess_all(&nba_stats_extractor::extract_shots(&shots_json));
    let advanced_rows = advanced_json
        .map(|v| preprocess_all(&nba_stats_extractor::extract_boxscore_advanced(&v)))
        .unwrap_or_default();
    let misc_rows = misc_json
        .map(|v| preprocess_all(&nba_stats_extractor::extract_boxscore_misc(&v)))
        .unwrap_or_default();
    let usage_rows = usage_json
        .map(|v| preprocess_all(&nba_stats_extractor::extract_boxscore_usage(&v)))
        .unwrap_or_default();

    let summary = summary_rows.first().ok_or_else(|| IngestFatalError::MissingField {
        field: "GameHeader",
        context: format!("boxscore summary for {game_id}"),
    })?;

    let mut tricodes = Vec::new();
    for row in &boxscore_rows {
        if let Some(tricode) = row.str("team_tricode") {
            if !tricodes.iter().any(|t: &String| t == tricode) {
                tricodes.push(tricode.to_string());
            }
        }
    }
    let [away_tricode, home_tricode] = tricodes.as_slice() else {
        return Err(IngestFatalError::MissingField {
            field: "team_tricode",
            context: format!("expected exactly 2 teams in boxscore for {game_id}"),
        });
    };
    let home_tricode = game_transform::resolve_tricode(&ctx.aliases, "nba_stats", home_tricode)?;
    let away_tricode = game_transform::resolve_tricode(&ctx.aliases, "nba_stats", away_tricode)?;

    let arena_date_str = summary.str("arena_date").unwrap_or("1970-01-01");
    let arena_date = NaiveDate::parse_from_str(&arena_date_str[..10.min(arena_date_str.len())], "%Y-%m-%d")
        .map_err(|_| IngestFatalError::MissingField { field: "arena_date", context: game_id.to_string() })?;

    let tz = game_transform::venue_tz(&ctx.venues, &home_tricode).unwrap_or(chrono_tz::UTC);
    let start_time_utc = Utc.from_utc_datetime(&arena_date.and_hms_opt(0, 0, 0).expect("midnight is always valid"));
    let local_date = game_transform::derive_local_date(game_id, start_time_utc, Some(arena_date), tz)?;

    let status = game_transform::status_from_code(summary.int("status_code").map(|c| c.to_string()).as_deref().unwrap_or(""));
    let period = summary.int("period").unwrap_or(1) as i32;
    let season = season::season_from_game_id(game_id).unwrap_or_else(|| season::season_from_date(local_date));

    let new_game = game_transform::build_new_game(
        game_id,
        &season,
        start_time_utc,
        local_date,
        tz.name(),
        &home_tricode,
        &away_tricode,
        status,
        period,
        "nba_stats",
        None,
    );

    let lineup_rows = lineups::transform_lineup(game_id, &boxscore_rows);
    let player_stats =
        stats::transform_player_stats_with_supplements(game_id, &boxscore_rows, &advanced_rows, &misc_rows, &usage_rows);
    let team_stats = stats::aggregate_team_stats(game_id, &home_tricode, &away_tricode, &player_stats);
    let events = pbp::transform_events(game_id, &home_tricode, &away_tricode, &pbp_rows);
    let outcome = outcomes::derive_outcome(game_id, &events);
    let new_crosswalk = crosswalk::build_new_crosswalk(game_id, local_date, &ctx.aliases, &home_tricode);

    let (assignments, alternates) = match &gamebooks_result {
        Some(parsed) => {
            let assignment_rows = preprocess_all(&gamebooks_extractor::extract_referee_assignments(parsed));
            let alternate_rows = preprocess_all(&gamebooks_extractor::extract_referee_alternates(parsed));
            (
                refs::transform_assignments(game_id, &assignment_rows),
                refs::transform_alternates(game_id, &alternate_rows),
            )
        }
        None => (Vec::new(), Vec::new()),
    };

    let injury_date_key = local_date.format("%Y-%m-%d").to_string();
    let injury_json = ctx.nba_stats.injury_report(&injury_date_key).await.ok();
    let injury_rows = injury_json
        .as_ref()
        .map(|json| preprocess_all(&nba_stats_extractor::extract_injury_report(json)))
        .unwrap_or_default();
    let injury_snapshots = injuries::transform_snapshots(game_id, &injury_rows);

    let mut counts = HashMap::new();
    conn.transaction::<_, nba_db::DbError, _>(|conn| {
        loaders::games::upsert_game(conn, &new_game)?;
        counts.insert("games", 1);

        loaders::games::upsert_crosswalk(conn, &new_crosswalk)?;
        counts.insert("game_crosswalk", 1);

        let ref_count = loaders::referees::replace_assignments(conn, game_id, &assignments)?;
        loaders::referees::replace_alternates(conn, game_id, &alternates)?;
        counts.insert("referee_assignments", ref_count);

        let lineup_count = loaders::lineups::replace_lineup(conn, game_id, &lineup_rows)?;
        counts.insert("starting_lineups", lineup_count);

        let injury_count = loaders::injuries::insert_snapshots(conn, &injury_snapshots)?;
        counts.insert("injury_status_snapshots", injury_count);

        let event_count = loaders::pbp::upsert_events_batched(conn, &events, ctx.config.bulk_batch_size)?;
        counts.insert("pbp_events", event_count);

        let team_stat_count = loaders::stats::upsert_team_stats(conn, &team_stats)?;
        counts.insert("team_game_stats", team_stat_count);
        let player_stat_count = loaders::stats::upsert_player_stats(conn, &player_stats)?;
        counts.insert("player_game_stats", player_stat_count);

        if let Some(outcome) = &outcome {
            loaders::outcomes::upsert_outcome(conn, outcome)?;
            counts.insert("outcomes", 1);
        }

        Ok(())
    })?;

    derive_for_game(ctx, game_id, &home_tricode, &away_tricode, &events, conn, &pbp_rows, &mut counts)?;

    Ok(counts)
}

fn derive_for_game(
    _ctx: &PipelineContext,
    game_id: &str,
    home_tricode: &str,
    away_tricode: &str,
    events: &[NewPbpEvent],
    conn: &mut nba_db::PgConnection,
    pbp_rows: &[PreprocessedRow],
    counts: &mut HashMap<&'static str, usize>,
) -> IngestResult<()> {
    let q1_row: NewQ1Window = q1_window::compute(game_id, home_tricode, away_tricode, events);
    if loaders::derived::upsert_q1_window(conn, q1_row)? {
        counts.insert("q1_windows", 1);
    }

    let shocks: Vec<NewEarlyShock> = early_shocks::detect(game_id, events, pbp_rows);
    let shock_count = loaders::derived::insert_early_shocks(conn, game_id, shocks)?;
    counts.insert("early_shocks", shock_count);

    Ok(())
}
