//! Game-ID crosswalk transform. The Basketball-Reference box-score ID
//! is a deterministic convention — the arena-local date followed by a
//! `0` and the home team's Bref tricode, e.g. `202312250BOS` — so this
//! crosswalk entry is built without fetching or scraping a Bref page
//! at all.

use chrono::NaiveDate;
use nba_db::aliases::TeamAliasTable;
use nba_db::models::NewGameCrosswalk;

pub fn bref_game_id(local_date: NaiveDate, bref_home_code: &str) -> String {
    format!("{}0{}", local_date.format("%Y%m%d"), bref_home_code)
}

pub fn build_new_crosswalk(
    game_id: &str,
    local_date: NaiveDate,
    aliases: &TeamAliasTable,
    home_tricode: &str,
) -> NewGameCrosswalk {
    let bref_game_id = aliases
        .reverse_resolve("bref", home_tricode)
        .map(|code| bref_game_id(local_date, &code));

    NewGameCrosswalk { game_id: game_id.to_string(), bref_game_id, other_ids: None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_bref_id_with_home_code_and_date() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap();
        assert_eq!(bref_game_id(date, "BOS"), "202312250BOS");
    }
}
