//! Season derivation (§4.6): from the NBA's 10-character game_id format
//! (digits 2-4 are the season start year minus 2000), or from a
//! calendar date when no game_id is available yet.

use chrono::{Datelike, NaiveDate};

pub fn season_from_game_id(game_id: &str) -> Option<String> {
    let year_digits = game_id.get(1..4)?;
    let start_year: i32 = year_digits.parse().ok()?;
    let start_year = 2000 + start_year;
    Some(format!("{}-{:02}", start_year, (start_year + 1) % 100))
}

/// Oct-Dec marks the season starting that calendar year; Jan-Sep belongs
/// to the season that started the previous year.
pub fn season_from_date(date: NaiveDate) -> String {
    let start_year = if date.month() >= 10 { date.year() } else { date.year() - 1 };
    format!("{}-{:02}", start_year, (start_year + 1) % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_from_game_id() {
        assert_eq!(season_from_game_id("0022300123").as_deref(), Some("2023-24"));
    }

    #[test]
    fn derives_from_date_around_the_new_year() {
        assert_eq!(season_from_date(NaiveDate::from_ymd_opt(2023, 11, 1).unwrap()), "2023-24");
        assert_eq!(season_from_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()), "2023-24");
    }
}
