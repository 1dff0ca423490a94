//! Reference data that isn't worth round-tripping through Postgres:
//! vendor tricode aliases and venue geography, loaded once at pipeline
//! startup from flat files under `reference/` per §6.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{DbError, DbResult, ReferenceParseError};

#[derive(Debug, Clone, Deserialize)]
struct TeamAliasEntry {
    canonical: String,
    aliases: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
struct TeamAliasFile {
    teams: Vec<TeamAliasEntry>,
}

/// Resolves a vendor-specific team code to the canonical tricode used
/// throughout the schema. Built once at startup and shared read-only
/// across every pipeline worker.
#[derive(Debug, Clone, Default)]
pub struct TeamAliasTable {
    by_source: HashMap<&'static str, HashMap<String, String>>,
}

impl TeamAliasTable {
    pub fn load(path: &Path) -> DbResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| DbError::ReferenceLoad {
            path: path.display().to_string(),
            source,
        })?;
        let parsed: TeamAliasFile =
            serde_yaml::from_str(&raw).map_err(|source| DbError::ReferenceParse {
                path: path.display().to_string(),
                source: ReferenceParseError::Yaml(source),
            })?;

        let mut by_source: HashMap<&'static str, HashMap<String, String>> = HashMap::new();
        for source_name in ["nba_stats", "bref", "gamebooks"] {
            by_source.insert(source_name, HashMap::new());
        }

        for team in parsed.teams {
            for (source_name, codes) in team.aliases {
                let bucket = by_source.entry(Self::intern_source(&source_name)).or_default();
                for code in codes {
                    bucket.insert(code, team.canonical.clone());
                }
            }
        }

        Ok(Self { by_source })
    }

    fn intern_source(name: &str) -> &'static str {
        match name {
            "nba_stats" => "nba_stats",
            "bref" => "bref",
            "gamebooks" => "gamebooks",
            other => panic!("unknown alias source {other:?} in team_aliases.yaml"),
        }
    }

    pub fn resolve(&self, source_name: &'static str, vendor_code: &str) -> DbResult<String> {
        self.by_source
            .get(source_name)
            .and_then(|bucket| bucket.get(vendor_code))
            .cloned()
            .ok_or_else(|| DbError::UnknownTeamAlias {
                alias: vendor_code.to_string(),
                source_name,
            })
    }

    /// Reverse lookup used by the crosswalk builder: the Basketball-Reference
    /// tricode for a canonical team, where it differs (e.g. `PHX` -> `PHO`).
    pub fn reverse_resolve(&self, source_name: &'static str, canonical: &str) -> Option<String> {
        self.by_source
            .get(source_name)?
            .iter()
            .find(|(_, canon)| canon.as_str() == canonical)
            .map(|(vendor_code, _)| vendor_code.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct VenueRecord {
    tricode: String,
    name: String,
    lat: f64,
    lon: f64,
    altitude_m: f64,
    tz: String,
}

/// Static venue geography (latitude/longitude/altitude/IANA timezone)
/// keyed by home-team tricode, used by the travel-fatigue derived table.
#[derive(Debug, Clone, Default)]
pub struct VenueTable {
    by_tricode: HashMap<String, VenueRecord>,
}

impl VenueTable {
    pub fn load(path: &Path) -> DbResult<Self> {
        let mut reader = csv::Reader::from_path(path).map_err(|source| DbError::ReferenceParse {
            path: path.display().to_string(),
            source: ReferenceParseError::Csv(source),
        })?;

        let mut by_tricode = HashMap::new();
        for result in reader.deserialize() {
            let record: VenueRecord = result.map_err(|source| DbError::ReferenceParse {
                path: path.display().to_string(),
                source: ReferenceParseError::Csv(source),
            })?;
            by_tricode.insert(record.tricode.clone(), record);
        }

        Ok(Self { by_tricode })
    }

    pub fn get(&self, tricode: &str) -> Option<Venue> {
        self.by_tricode.get(tricode).map(|record| Venue {
            name: &record.name,
            lat: record.lat,
            lon: record.lon,
            altitude_m: record.altitude_m,
            tz: &record.tz,
        })
    }
}

/// Borrowed view of a venue row; kept separate from [`VenueRecord`] so
/// callers in the ingest crate don't depend on the CSV deserialization
/// shape directly.
pub struct Venue<'a> {
    pub name: &'a str,
    pub lat: f64,
    pub lon: f64,
    pub altitude_m: f64,
    pub tz: &'a str,
}
