// Canonical relational schema. Schema evolution itself is out of scope
// for the ingestion core — this module describes the tables the core
// assumes already exist, owned by a separate migrations step.

pub mod core {
    diesel::table! {
        core.games (id) {
            id -> Int8,
            game_id -> Text,
            season -> Text,
            start_time_utc -> Timestamptz,
            arena_date -> Date,
            arena_tz -> Text,
            home_tricode -> Text,
            away_tricode -> Text,
            status -> Text,
            period -> Int4,
            source -> Text,
            source_url -> Nullable<Text>,
            ingested_at -> Timestamptz,
        }
    }

    diesel::table! {
        core.pbp_events (id) {
            id -> Int8,
            game_id -> Text,
            period -> Int4,
            event_idx -> Int4,
            clock_remaining_ms -> Int4,
            clock_display -> Text,
            seconds_elapsed -> Float8,
            home_score -> Int4,
            away_score -> Int4,
            event_type -> Text,
            event_subtype -> Nullable<Text>,
            player1_slug -> Nullable<Text>,
            player1_id -> Nullable<Int8>,
            player2_slug -> Nullable<Text>,
            player2_id -> Nullable<Int8>,
            player3_slug -> Nullable<Text>,
            player3_id -> Nullable<Int8>,
            team_tricode -> Nullable<Text>,
            shot_made -> Nullable<Bool>,
            shot_value -> Nullable<Int4>,
            shot_type -> Nullable<Text>,
            shot_zone -> Nullable<Text>,
            shot_distance_ft -> Nullable<Float8>,
            shot_x -> Nullable<Float8>,
            shot_y -> Nullable<Float8>,
            is_transition -> Nullable<Bool>,
            is_early_clock -> Nullable<Bool>,
            shot_clock_seconds -> Nullable<Float8>,
            possession_team -> Nullable<Text>,
        }
    }

    diesel::table! {
        core.referee_assignments (id) {
            id -> Int8,
            game_id -> Text,
            referee_slug -> Text,
            role -> Text,
            crew_position -> Nullable<Int4>,
        }
    }

    diesel::table! {
        core.referee_alternates (id) {
            id -> Int8,
            game_id -> Text,
            referee_slug -> Text,
        }
    }

    diesel::table! {
        core.starting_lineups (id) {
            id -> Int8,
            game_id -> Text,
            team_tricode -> Text,
            player_slug -> Text,
            player_id -> Nullable<Int8>,
            position -> Nullable<Text>,
        }
    }

    diesel::table! {
        core.injury_status_snapshots (id) {
            id -> Int8,
            game_id -> Text,
            player_slug -> Text,
            team_tricode -> Text,
            status -> Text,
            snapshot_at -> Timestamptz,
            note -> Nullable<Text>,
        }
    }

    diesel::table! {
        core.game_crosswalk (id) {
            id -> Int8,
            game_id -> Text,
            bref_game_id -> Nullable<Text>,
            other_ids -> Nullable<Jsonb>,
        }
    }

    diesel::table! {
        core.team_game_stats (id) {
            id -> Int8,
            game_id -> Text,
            team_tricode -> Text,
            is_home -> Bool,
            points -> Int4,
            field_goals_made -> Int4,
            field_goals_attempted -> Int4,
            three_pm -> Int4,
            three_pa -> Int4,
            ft_made -> Int4,
            ft_attempted -> Int4,
            oreb -> Int4,
            dreb -> Int4,
            ast -> Int4,
            stl -> Int4,
            blk -> Int4,
            tov -> Int4,
            pf -> Int4,
            advanced_stats -> Nullable<Jsonb>,
            misc_stats -> Nullable<Jsonb>,
            usage_stats -> Nullable<Jsonb>,
        }
    }

    diesel::table! {
        core.player_game_stats (id) {
            id -> Int8,
            game_id -> Text,
            team_tricode -> Text,
            player_slug -> Text,
            player_id -> Nullable<Int8>,
            starter -> Bool,
            seconds_played -> Int4,
            points -> Int4,
            field_goals_made -> Int4,
            field_goals_attempted -> Int4,
            three_pm -> Int4,
            three_pa -> Int4,
            ft_made -> Int4,
            ft_attempted -> Int4,
            oreb -> Int4,
            dreb -> Int4,
            ast -> Int4,
            stl -> Int4,
            blk -> Int4,
            tov -> Int4,
            pf -> Int4,
            advanced_stats -> Nullable<Jsonb>,
            misc_stats -> Nullable<Jsonb>,
            usage_stats -> Nullable<Jsonb>,
        }
    }

    diesel::table! {
        core.outcomes (id) {
            id -> Int8,
            game_id -> Text,
            home_final -> Int4,
            away_final -> Int4,
            home_q1 -> Int4,
            away_q1 -> Int4,
            margin -> Int4,
            ot_count -> Int4,
        }
    }

    diesel::table! {
        core.q1_windows (id) {
            id -> Int8,
            game_id -> Text,
            possessions_elapsed -> Int4,
            expected_pace -> Float8,
            actual_pace_home -> Float8,
            actual_pace_away -> Float8,
            efg_home -> Float8,
            efg_away -> Float8,
            to_rate_home -> Float8,
            to_rate_away -> Float8,
            ft_rate_home -> Float8,
            ft_rate_away -> Float8,
            oreb_pct_home -> Float8,
            oreb_pct_away -> Float8,
            dreb_pct_home -> Float8,
            dreb_pct_away -> Float8,
            bonus_seconds_home -> Float8,
            bonus_seconds_away -> Float8,
            transition_rate -> Float8,
            early_clock_rate -> Float8,
        }
    }

    diesel::table! {
        core.early_shocks (id) {
            id -> Int8,
            game_id -> Text,
            shock_type -> Text,
            period -> Int4,
            seconds_elapsed -> Float8,
            player_slug -> Text,
            sequence_number -> Int4,
            event_idx_start -> Int4,
            event_idx_end -> Nullable<Int4>,
            immediate_sub_followed -> Nullable<Bool>,
            possessions_elapsed_since -> Nullable<Int4>,
        }
    }

    diesel::table! {
        core.schedule_travel (id) {
            id -> Int8,
            game_id -> Text,
            team_tricode -> Text,
            back_to_back -> Bool,
            three_in_four -> Bool,
            five_in_seven -> Bool,
            days_rest -> Int4,
            tz_shift_hours -> Float8,
            circadian_index -> Float8,
            altitude_change_m -> Float8,
            haversine_km -> Float8,
            prev_venue_lat -> Nullable<Float8>,
            prev_venue_lon -> Nullable<Float8>,
        }
    }
}

pub mod meta {
    diesel::table! {
        meta.pipeline_checkpoints (id) {
            id -> Int8,
            pipeline_name -> Text,
            work_key -> Text,
            step -> Text,
            status -> Text,
            started_at -> Timestamptz,
            completed_at -> Nullable<Timestamptz>,
            error_message -> Nullable<Text>,
        }
    }

    diesel::table! {
        meta.validation_results (id) {
            id -> Int8,
            check_name -> Text,
            ran_at -> Timestamptz,
            ok -> Bool,
            details -> Jsonb,
        }
    }
}
