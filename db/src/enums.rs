//! Canonical enum types for values that arrive from vendors as
//! inconsistent codes or free text, plus the static code tables that map
//! vendor spellings onto them. Written by hand as a closed enum + static
//! lookup table per vocabulary, since there are only a handful of small
//! vendor vocabularies here rather than dozens of interdependent ones.

use phf::phf_map;
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum EventType {
    Shot,
    Rebound,
    Turnover,
    Foul,
    FreeThrow,
    Substitution,
    Timeout,
    JumpBall,
    Violation,
    PeriodStart,
    PeriodEnd,
    Ejection,
    Unknown,
}

/// `stats.nba.com` play-by-play `EVENTMSGTYPE` codes, per the vendor's
/// (undocumented but stable) integer enumeration.
pub static NBA_STATS_EVENT_CODES: phf::Map<i64, EventType> = phf_map! {
    1i64 => EventType::Shot,
    2i64 => EventType::Shot,
    3i64 => EventType::FreeThrow,
    4i64 => EventType::Rebound,
    5i64 => EventType::Turnover,
    6i64 => EventType::Foul,
    7i64 => EventType::Violation,
    8i64 => EventType::Substitution,
    9i64 => EventType::Timeout,
    10i64 => EventType::JumpBall,
    11i64 => EventType::Ejection,
    12i64 => EventType::PeriodStart,
    13i64 => EventType::PeriodEnd,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum GameStatus {
    Scheduled,
    InProgress,
    Final,
    Postponed,
}

pub static NBA_STATS_STATUS_CODES: phf::Map<&'static str, GameStatus> = phf_map! {
    "1" => GameStatus::Scheduled,
    "2" => GameStatus::InProgress,
    "3" => GameStatus::Final,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum ShotZone {
    RestrictedArea,
    Paint,
    MidRange,
    CornerThree,
    AboveBreakThree,
    Backcourt,
}

/// `stats.nba.com` `SHOT_ZONE_BASIC` free-text values, lowercased and
/// stripped of spaces before lookup.
pub static NBA_STATS_SHOT_ZONE_CODES: phf::Map<&'static str, ShotZone> = phf_map! {
    "restrictedarea" => ShotZone::RestrictedArea,
    "intheapint" => ShotZone::Paint,
    "inthepaint(nonra)" => ShotZone::Paint,
    "midrange" => ShotZone::MidRange,
    "leftcorner3" => ShotZone::CornerThree,
    "rightcorner3" => ShotZone::CornerThree,
    "abovethebreak3" => ShotZone::AboveBreakThree,
    "backcourt" => ShotZone::Backcourt,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum RefereeRole {
    CrewChief,
    Referee,
    Umpire,
    Official,
}

/// Early-shock categories (§4.9): the `shock_type` values `derived::early_shocks`
/// writes, as a closed enum rather than raw string literals at each call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum EarlyShockType {
    Technical,
    Flagrant,
    TwoPersonalFoulsEarly,
    InjuryLeave,
}

pub fn shot_zone_from_vendor_text(raw: &str) -> Option<ShotZone> {
    let key = raw.to_ascii_lowercase().replace([' ', '-'], "");
    NBA_STATS_SHOT_ZONE_CODES.get(key.as_str()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_codes_map_known_values() {
        assert_eq!(NBA_STATS_EVENT_CODES.get(&1), Some(&EventType::Shot));
        assert_eq!(NBA_STATS_EVENT_CODES.get(&6), Some(&EventType::Foul));
        assert_eq!(NBA_STATS_EVENT_CODES.get(&999), None);
    }

    #[test]
    fn shot_zone_normalizes_casing_and_spaces() {
        assert_eq!(shot_zone_from_vendor_text("Mid-Range"), Some(ShotZone::MidRange));
        assert_eq!(shot_zone_from_vendor_text("Left Corner 3"), Some(ShotZone::CornerThree));
        assert_eq!(shot_zone_from_vendor_text("nonsense"), None);
    }
}
