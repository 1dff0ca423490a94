use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value as Json;

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::core::games)]
pub struct NewGame {
    pub game_id: String,
    pub season: String,
    pub start_time_utc: DateTime<Utc>,
    pub arena_date: NaiveDate,
    pub arena_tz: String,
    pub home_tricode: String,
    pub away_tricode: String,
    pub status: String,
    pub period: i32,
    pub source: String,
    pub source_url: Option<String>,
    pub ingested_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = crate::schema::core::games)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DbGame {
    pub id: i64,
    pub game_id: String,
    pub season: String,
    pub start_time_utc: DateTime<Utc>,
    pub arena_date: NaiveDate,
    pub arena_tz: String,
    pub home_tricode: String,
    pub away_tricode: String,
    pub status: String,
    pub period: i32,
    pub source: String,
    pub source_url: Option<String>,
    pub ingested_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::core::pbp_events)]
pub struct NewPbpEvent {
    pub game_id: String,
    pub period: i32,
    pub event_idx: i32,
    pub clock_remaining_ms: i32,
    pub clock_display: String,
    pub seconds_elapsed: f64,
    pub home_score: i32,
    pub away_score: i32,
    pub event_type: String,
    pub event_subtype: Option<String>,
    pub player1_slug: Option<String>,
    pub player1_id: Option<i64>,
    pub player2_slug: Option<String>,
    pub player2_id: Option<i64>,
    pub player3_slug: Option<String>,
    pub player3_id: Option<i64>,
    pub team_tricode: Option<String>,
    pub shot_made: Option<bool>,
    pub shot_value: Option<i32>,
    pub shot_type: Option<String>,
    pub shot_zone: Option<String>,
    pub shot_distance_ft: Option<f64>,
    pub shot_x: Option<f64>,
    pub shot_y: Option<f64>,
    pub is_transition: Option<bool>,
    pub is_early_clock: Option<bool>,
    pub shot_clock_seconds: Option<f64>,
    pub possession_team: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = crate::schema::core::pbp_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DbPbpEvent {
    pub id: i64,
    pub game_id: String,
    pub period: i32,
    pub event_idx: i32,
    pub clock_remaining_ms: i32,
    pub clock_display: String,
    pub seconds_elapsed: f64,
    pub home_score: i32,
    pub away_score: i32,
    pub event_type: String,
    pub event_subtype: Option<String>,
    pub player1_slug: Option<String>,
    pub player1_id: Option<i64>,
    pub player2_slug: Option<String>,
    pub player2_id: Option<i64>,
    pub player3_slug: Option<String>,
    pub player3_id: Option<i64>,
    pub team_tricode: Option<String>,
    pub shot_made: Option<bool>,
    pub shot_value: Option<i32>,
    pub shot_type: Option<String>,
    pub shot_zone: Option<String>,
    pub shot_distance_ft: Option<f64>,
    pub shot_x: Option<f64>,
    pub shot_y: Option<f64>,
    pub is_transition: Option<bool>,
    pub is_early_clock: Option<bool>,
    pub shot_clock_seconds: Option<f64>,
    pub possession_team: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::core::referee_assignments)]
pub struct NewRefereeAssignment {
    pub game_id: String,
    pub referee_slug: String,
    pub role: String,
    pub crew_position: Option<i32>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::core::referee_alternates)]
pub struct NewRefereeAlternate {
    pub game_id: String,
    pub referee_slug: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::core::starting_lineups)]
pub struct NewStartingLineup {
    pub game_id: String,
    pub team_tricode: String,
    pub player_slug: String,
    pub player_id: Option<i64>,
    pub position: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::core::injury_status_snapshots)]
pub struct NewInjuryStatusSnapshot {
    pub game_id: String,
    pub player_slug: String,
    pub team_tricode: String,
    pub status: String,
    pub snapshot_at: DateTime<Utc>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::core::game_crosswalk)]
pub struct NewGameCrosswalk {
    pub game_id: String,
    pub bref_game_id: Option<String>,
    pub other_ids: Option<Json>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::core::team_game_stats)]
pub struct NewTeamGameStats {
    pub game_id: String,
    pub team_tricode: String,
    pub is_home: bool,
    pub points: i32,
    pub field_goals_made: i32,
    pub field_goals_attempted: i32,
    pub three_pm: i32,
    pub three_pa: i32,
    pub ft_made: i32,
    pub ft_attempted: i32,
    pub oreb: i32,
    pub dreb: i32,
    pub ast: i32,
    pub stl: i32,
    pub blk: i32,
    pub tov: i32,
    pub pf: i32,
    pub advanced_stats: Option<Json>,
    pub misc_stats: Option<Json>,
    pub usage_stats: Option<Json>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = crate::schema::core::team_game_stats)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DbTeamGameStats {
    pub id: i64,
    pub game_id: String,
    pub team_tricode: String,
    pub is_home: bool,
    pub points: i32,
    pub field_goals_made: i32,
    pub field_goals_attempted: i32,
    pub three_pm: i32,
    pub three_pa: i32,
    pub ft_made: i32,
    pub ft_attempted: i32,
    pub oreb: i32,
    pub dreb: i32,
    pub ast: i32,
    pub stl: i32,
    pub blk: i32,
    pub tov: i32,
    pub pf: i32,
    pub advanced_stats: Option<Json>,
    pub misc_stats: Option<Json>,
    pub usage_stats: Option<Json>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::core::player_game_stats)]
pub struct NewPlayerGameStats {
    pub game_id: String,
    pub team_tricode: String,
    pub player_slug: String,
    pub player_id: Option<i64>,
    pub starter: bool,
    pub seconds_played: i32,
    pub points: i32,
    pub field_goals_made: i32,
    pub field_goals_attempted: i32,
    pub three_pm: i32,
    pub three_pa: i32,
    pub ft_made: i32,
    pub ft_attempted: i32,
    pub oreb: i32,
    pub dreb: i32,
    pub ast: i32,
    pub stl: i32,
    pub blk: i32,
    pub tov: i32,
    pub pf: i32,
    pub advanced_stats: Option<Json>,
    pub misc_stats: Option<Json>,
    pub usage_stats: Option<Json>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::core::outcomes)]
pub struct NewOutcome {
    pub game_id: String,
    pub home_final: i32,
    pub away_final: i32,
    pub home_q1: i32,
    pub away_q1: i32,
    pub margin: i32,
    pub ot_count: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = crate::schema::core::outcomes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DbOutcome {
    pub id: i64,
    pub game_id: String,
    pub home_final: i32,
    pub away_final: i32,
    pub home_q1: i32,
    pub away_q1: i32,
    pub margin: i32,
    pub ot_count: i32,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::core::q1_windows)]
pub struct NewQ1Window {
    pub game_id: String,
    pub possessions_elapsed: i32,
    pub expected_pace: f64,
    pub actual_pace_home: f64,
    pub actual_pace_away: f64,
    pub efg_home: f64,
    pub efg_away: f64,
    pub to_rate_home: f64,
    pub to_rate_away: f64,
    pub ft_rate_home: f64,
    pub ft_rate_away: f64,
    pub oreb_pct_home: f64,
    pub oreb_pct_away: f64,
    pub dreb_pct_home: f64,
    pub dreb_pct_away: f64,
    pub bonus_seconds_home: f64,
    pub bonus_seconds_away: f64,
    pub transition_rate: f64,
    pub early_clock_rate: f64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::core::early_shocks)]
pub struct NewEarlyShock {
    pub game_id: String,
    pub shock_type: String,
    pub period: i32,
    pub seconds_elapsed: f64,
    pub player_slug: String,
    pub sequence_number: i32,
    pub event_idx_start: i32,
    pub event_idx_end: Option<i32>,
    pub immediate_sub_followed: Option<bool>,
    pub possessions_elapsed_since: Option<i32>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::core::schedule_travel)]
pub struct NewScheduleTravel {
    pub game_id: String,
    pub team_tricode: String,
    pub back_to_back: bool,
    pub three_in_four: bool,
    pub five_in_seven: bool,
    pub days_rest: i32,
    pub tz_shift_hours: f64,
    pub circadian_index: f64,
    pub altitude_change_m: f64,
    pub haversine_km: f64,
    pub prev_venue_lat: Option<f64>,
    pub prev_venue_lon: Option<f64>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::meta::pipeline_checkpoints)]
pub struct NewCheckpoint {
    pub pipeline_name: String,
    pub work_key: String,
    pub step: String,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, AsChangeset)]
#[diesel(table_name = crate::schema::meta::pipeline_checkpoints)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DbCheckpoint {
    pub id: i64,
    pub pipeline_name: String,
    pub work_key: String,
    pub step: String,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::meta::validation_results)]
pub struct NewValidationResult {
    pub check_name: String,
    pub ran_at: DateTime<Utc>,
    pub ok: bool,
    pub details: Json,
}
