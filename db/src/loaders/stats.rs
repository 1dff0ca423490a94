use diesel::prelude::*;

use crate::error::DbResult;
use crate::models::{NewPlayerGameStats, NewTeamGameStats};

/// Diff-aware upsert keyed on (game_id, team_tricode): rows are written
/// one at a time so each gets its own `WHERE` guard comparing every
/// counting-stat column against the incoming value.
pub fn upsert_team_stats(conn: &mut PgConnection, rows: &[NewTeamGameStats]) -> DbResult<usize> {
    use crate::schema::core::team_game_stats::dsl;

    let mut total = 0;
    for row in rows {
        total += diesel::insert_into(dsl::team_game_stats)
            .values(row)
            .on_conflict((dsl::game_id, dsl::team_tricode))
            .do_update()
            .set(row)
            .filter(
                dsl::is_home
                    .is_distinct_from(row.is_home)
                    .or(dsl::points.is_distinct_from(row.points))
                    .or(dsl::field_goals_made.is_distinct_from(row.field_goals_made))
                    .or(dsl::field_goals_attempted.is_distinct_from(row.field_goals_attempted))
                    .or(dsl::three_pm.is_distinct_from(row.three_pm))
                    .or(dsl::three_pa.is_distinct_from(row.three_pa))
                    .or(dsl::ft_made.is_distinct_from(row.ft_made))
                    .or(dsl::ft_attempted.is_distinct_from(row.ft_attempted))
                    .or(dsl::oreb.is_distinct_from(row.oreb))
                    .or(dsl::dreb.is_distinct_from(row.dreb))
                    .or(dsl::ast.is_distinct_from(row.ast))
                    .or(dsl::stl.is_distinct_from(row.stl))
                    .or(dsl::blk.is_distinct_from(row.blk))
                    .or(dsl::tov.is_distinct_from(row.tov))
                    .or(dsl::pf.is_distinct_from(row.pf))
                    .or(dsl::advanced_stats.is_distinct_from(&row.advanced_stats))
                    .or(dsl::misc_stats.is_distinct_from(&row.misc_stats))
                    .or(dsl::usage_stats.is_distinct_from(&row.usage_stats)),
            )
            .execute(conn)?;
    }
    Ok(total)
}

pub fn upsert_player_stats(conn: &mut PgConnection, rows: &[NewPlayerGameStats]) -> DbResult<usize> {
    use crate::schema::core::player_game_stats::dsl;

    let mut total = 0;
    for row in rows {
        total += diesel::insert_into(dsl::player_game_stats)
            .values(row)
            .on_conflict((dsl::game_id, dsl::team_tricode, dsl::player_slug))
            .do_update()
            .set(row)
            .filter(
                dsl::player_id
                    .is_distinct_from(row.player_id)
                    .or(dsl::starter.is_distinct_from(row.starter))
                    .or(dsl::seconds_played.is_distinct_from(row.seconds_played))
                    .or(dsl::points.is_distinct_from(row.points))
                    .or(dsl::field_goals_made.is_distinct_from(row.field_goals_made))
                    .or(dsl::field_goals_attempted.is_distinct_from(row.field_goals_attempted))
                    .or(dsl::three_pm.is_distinct_from(row.three_pm))
                    .or(dsl::three_pa.is_distinct_from(row.three_pa))
                    .or(dsl::ft_made.is_distinct_from(row.ft_made))
                    .or(dsl::ft_attempted.is_distinct_from(row.ft_attempted))
                    .or(dsl::oreb.is_distinct_from(row.oreb))
                    .or(dsl::dreb.is_distinct_from(row.dreb))
                    .or(dsl::ast.is_distinct_from(row.ast))
                    .or(dsl::stl.is_distinct_from(row.stl))
                    .or(dsl::blk.is_distinct_from(row.blk))
                    .or(dsl::tov.is_distinct_from(row.tov))
                    .or(dsl::pf.is_distinct_from(row.pf))
                    .or(dsl::advanced_stats.is_distinct_from(&row.advanced_stats))
                    .or(dsl::misc_stats.is_distinct_from(&row.misc_stats))
                    .or(dsl::usage_stats.is_distinct_from(&row.usage_stats)),
            )
            .execute(conn)?;
    }
    Ok(total)
}
