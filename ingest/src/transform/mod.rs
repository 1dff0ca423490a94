pub mod clock;
pub mod crosswalk;
pub mod game;
pub mod injuries;
pub mod lineups;
pub mod outcomes;
pub mod pbp;
pub mod refs;
pub mod season;
pub mod shot_zone;
pub mod stats;
