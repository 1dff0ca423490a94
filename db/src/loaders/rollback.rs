use diesel::prelude::*;

use crate::error::DbResult;

/// Per-table row counts touched by a rollback, keyed by table name in
/// parent-then-child delete order (reported child-first since that's
/// the order the deletes actually run in).
#[derive(Debug, Clone, Default)]
pub struct RollbackCounts {
    pub pbp_events: i64,
    pub player_game_stats: i64,
    pub team_game_stats: i64,
    pub starting_lineups: i64,
    pub injury_status_snapshots: i64,
    pub referee_assignments: i64,
    pub referee_alternates: i64,
    pub game_crosswalk: i64,
    pub outcomes: i64,
    pub q1_windows: i64,
    pub early_shocks: i64,
    pub schedule_travel: i64,
    pub games: i64,
}

impl RollbackCounts {
    pub fn total(&self) -> i64 {
        self.pbp_events
            + self.player_game_stats
            + self.team_game_stats
            + self.starting_lineups
            + self.injury_status_snapshots
            + self.referee_assignments
            + self.referee_alternates
            + self.game_crosswalk
            + self.outcomes
            + self.q1_windows
            + self.early_shocks
            + self.schedule_travel
            + self.games
    }
}

/// Counts every row a rollback of `game_id` would touch, without deleting
/// anything — used both to report a dry run and to short-circuit a real
/// rollback when there is nothing to do.
pub fn count_game_rows(conn: &mut PgConnection, game_id: &str) -> DbResult<RollbackCounts> {
    use crate::schema::core::*;

    Ok(RollbackCounts {
        pbp_events: pbp_events::table.filter(pbp_events::game_id.eq(game_id)).count().get_result(conn)?,
        player_game_stats: player_game_stats::table
            .filter(player_game_stats::game_id.eq(game_id))
            .count()
            .get_result(conn)?,
        team_game_stats: team_game_stats::table
            .filter(team_game_stats::game_id.eq(game_id))
            .count()
            .get_result(conn)?,
        starting_lineups: starting_lineups::table
            .filter(starting_lineups::game_id.eq(game_id))
            .count()
            .get_result(conn)?,
        injury_status_snapshots: injury_status_snapshots::table
            .filter(injury_status_snapshots::game_id.eq(game_id))
            .count()
            .get_result(conn)?,
        referee_assignments: referee_assignments::table
            .filter(referee_assignments::game_id.eq(game_id))
            .count()
            .get_result(conn)?,
        referee_alternates: referee_alternates::table
            .filter(referee_alternates::game_id.eq(game_id))
            .count()
            .get_result(conn)?,
        game_crosswalk: game_crosswalk::table.filter(game_crosswalk::game_id.eq(game_id)).count().get_result(conn)?,
        outcomes: outcomes::table.filter(outcomes::game_id.eq(game_id)).count().get_result(conn)?,
        q1_windows: q1_windows::table.filter(q1_windows::game_id.eq(game_id)).count().get_result(conn)?,
        early_shocks: early_shocks::table.filter(early_shocks::game_id.eq(game_id)).count().get_result(conn)?,
        schedule_travel: schedule_travel::table
            .filter(schedule_travel::game_id.eq(game_id))
            .count()
            .get_result(conn)?,
        games: games::table.filter(games::game_id.eq(game_id)).count().get_result(conn)?,
    })
}

/// Deletes a game and every row owned by it, child-first, inside the
/// caller's transaction. The canonical schema declares `ON DELETE
/// CASCADE` from every child table to `games.game_id` (§3's ownership
/// invariant), so the explicit per-table deletes below are redundant
/// with a plain `DELETE FROM games`; they're kept anyway so the
/// per-table counts returned to the operator are exact, and so rollback
/// still behaves correctly against a schema that hasn't wired cascade.
pub fn rollback_game(conn: &mut PgConnection, game_id: &str) -> DbResult<RollbackCounts> {
    use crate::schema::core::*;

    let pbp_events = diesel::delete(pbp_events::table.filter(pbp_events::game_id.eq(game_id))).execute(conn)? as i64;
    let player_game_stats =
        diesel::delete(player_game_stats::table.filter(player_game_stats::game_id.eq(game_id))).execute(conn)? as i64;
    let team_game_stats =
        diesel::delete(team_game_stats::table.filter(team_game_stats::game_id.eq(game_id))).execute(conn)? as i64;
    let starting_lineups =
        diesel::delete(starting_lineups::table.filter(starting_lineups::game_id.eq(game_id))).execute(conn)? as i64;
    let injury_status_snapshots =
        diesel::delete(injury_status_snapshots::table.filter(injury_status_snapshots::game_id.eq(game_id)))
            .execute(conn)? as i64;
    let referee_assignments =
        diesel::delete(referee_assignments::table.filter(referee_assignments::game_id.eq(game_id))).execute(conn)?
            as i64;
    let referee_alternates =
        diesel::delete(referee_alternates::table.filter(referee_alternates::game_id.eq(game_id))).execute(conn)?
            as i64;
    let game_crosswalk =
        diesel::delete(game_crosswalk::table.filter(game_crosswalk::game_id.eq(game_id))).execute(conn)? as i64;
    let outcomes = diesel::delete(outcomes::table.filter(outcomes::game_id.eq(game_id))).execute(conn)? as i64;
    let q1_windows = diesel::delete(q1_windows::table.filter(q1_windows::game_id.eq(game_id))).execute(conn)? as i64;
    let early_shocks =
        diesel::delete(early_shocks::table.filter(early_shocks::game_id.eq(game_id))).execute(conn)? as i64;
    let schedule_travel =
        diesel::delete(schedule_travel::table.filter(schedule_travel::game_id.eq(game_id))).execute(conn)? as i64;
    let games = diesel::delete(games::table.filter(games::game_id.eq(game_id))).execute(conn)? as i64;

    Ok(RollbackCounts {
        pbp_events,
        player_game_stats,
        team_game_stats,
        starting_lineups,
        injury_status_snapshots,
        referee_assignments,
        referee_alternates,
        game_crosswalk,
        outcomes,
        q1_windows,
        early_shocks,
        schedule_travel,
        games,
    })
}
