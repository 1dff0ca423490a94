use std::sync::Arc;

use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::FetchError;
use crate::http::HttpFetcher;
use crate::sources::Source;

/// Referee assignment parsed out of a gamebook PDF, per §3's referee
/// assignment / alternate entities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefereeAssignment {
    pub name: String,
    pub role: RefereeRole,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RefereeRole {
    CrewChief,
    Referee,
    Umpire,
    Official,
}

/// Structured, partial-tolerant result of parsing one gamebook PDF. Any
/// section the regexes failed to find is left `None`/empty rather than
/// failing the whole parse — low-confidence results are logged, not
/// dropped, per §4.4.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GamebooksParseResult {
    pub game_id: Option<String>,
    pub venue: Option<String>,
    pub matchup: Option<String>,
    pub referees: Vec<RefereeAssignment>,
    pub alternates: Vec<String>,
    pub technical_fouls: Vec<String>,
    pub confidence: f64,
    pub extraction_method: &'static str,
}

static GAME_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)game\s*(?:id|#)?\s*[:#]?\s*(\d{10})").unwrap());
static VENUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^\s*(?:at|venue)\s*[:\-]?\s*(.+)$").unwrap());
static MATCHUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([A-Z][A-Za-z .&'-]+)\s+(?:at|vs\.?)\s+([A-Z][A-Za-z .&'-]+)").unwrap());
static CREW_CHIEF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)crew\s*chief\s*[:\-]?\s*(.+)$").unwrap());
static REFEREE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^\s*referee\s*[:\-]?\s*(.+)$").unwrap());
static UMPIRE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^\s*umpire\s*[:\-]?\s*(.+)$").unwrap());
static ALTERNATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)alternate\s*[:\-]?\s*(.+)$").unwrap());
static TECHNICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)technical\s+foul\s*[:\-]?\s*(.+)$").unwrap());
static REFEREE_KEYWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(referee|official|crew chief|umpire)\b").unwrap());
static PROPER_NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]+\s[A-Z][a-z]+\b").unwrap());

/// PDF download + multi-method text extraction + section-detection
/// pipeline. Owns no operations from the uniform `SourceClient` facade
/// except refs/alternates, since a PDF scrape has no boxscore, pbp, or
/// shot-chart analog.
pub struct GamebooksClient {
    fetcher: Arc<HttpFetcher>,
}

impl GamebooksClient {
    pub fn new(fetcher: Arc<HttpFetcher>) -> Self {
        Self { fetcher }
    }

    pub fn source(&self) -> Source {
        Source::Gamebooks
    }

    /// Downloads the PDF at `url` (or reuses the cached copy) and parses
    /// it for referee assignments, alternates, and technical fouls.
    pub async fn referees(&self, url: &str) -> Result<GamebooksParseResult, FetchError> {
        let path = self.fetcher.cache().gamebooks_path_for(url);

        if !path.exists() {
            tokio::fs::create_dir_all(self.fetcher.cache().gamebooks_dir())
                .await
                .map_err(|source| FetchError::PdfRead {
                    path: path.display().to_string(),
                    source,
                })?;
            self.fetcher.download(Source::Gamebooks, url, &path).await?;
        } else {
            debug!("gamebook PDF already cached at {path:?}");
        }

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| FetchError::PdfRead {
                path: path.display().to_string(),
                source,
            })?;

        let (text, method) = extract_longest_text(&bytes, &path)?;
        Ok(parse_gamebook_text(&text, method))
    }
}

/// Tries several PDF text-extraction methods in order and keeps the
/// longest non-empty result, per §4.4. `pdf-extract` handles the common
/// case; `lopdf`'s raw content-stream walk is the fallback for PDFs
/// whose font encoding confuses the first method.
fn extract_longest_text(
    bytes: &[u8],
    path: &std::path::Path,
) -> Result<(String, &'static str), FetchError> {
    let mut candidates: Vec<(String, &'static str)> = Vec::new();

    match pdf_extract::extract_text_from_mem(bytes) {
        Ok(text) if !text.trim().is_empty() => candidates.push((text, "pdf-extract")),
        Ok(_) => debug!("pdf-extract produced empty text for {path:?}"),
        Err(err) => debug!("pdf-extract failed for {path:?}: {err}"),
    }

    match extract_text_with_lopdf(bytes) {
        Ok(text) if !text.trim().is_empty() => candidates.push((text, "lopdf")),
        Ok(_) => debug!("lopdf produced empty text for {path:?}"),
        Err(err) => debug!("lopdf failed for {path:?}: {err}"),
    }

    candidates
        .into_iter()
        .max_by_key(|(text, _)| text.len())
        .ok_or_else(|| FetchError::PdfExtractionFailed {
            path: path.display().to_string(),
        })
}

fn extract_text_with_lopdf(bytes: &[u8]) -> Result<String, lopdf::Error> {
    let doc = lopdf::Document::load_mem(bytes)?;
    let mut text = String::new();
    for (page_num, _) in doc.get_pages() {
        if let Ok(page_text) = doc.extract_text(&[page_num]) {
            text.push_str(&page_text);
            text.push('\n');
        }
    }
    Ok(text)
}

/// Regex-driven section detection over whichever extraction won. Every
/// field is optional; the confidence score is a weighted combination of
/// text length, referee-keyword hits, and proper-name matches, so a
/// thin or malformed PDF still yields a usable (if low-confidence)
/// partial result instead of an error.
fn parse_gamebook_text(text: &str, method: &'static str) -> GamebooksParseResult {
    let game_id = GAME_ID_RE.captures(text).map(|c| c[1].to_string());
    let venue = VENUE_RE.captures(text).map(|c| c[1].trim().to_string());
    let matchup = MATCHUP_RE
        .captures(text)
        .map(|c| format!("{} at {}", c[1].trim(), c[2].trim()));

    let mut referees = Vec::new();
    if let Some(c) = CREW_CHIEF_RE.captures(text) {
        referees.push(RefereeAssignment {
            name: clean_name(&c[1]),
            role: RefereeRole::CrewChief,
        });
    }
    for c in REFEREE_RE.captures_iter(text) {
        referees.push(RefereeAssignment {
            name: clean_name(&c[1]),
            role: RefereeRole::Referee,
        });
    }
    for c in UMPIRE_RE.captures_iter(text) {
        referees.push(RefereeAssignment {
            name: clean_name(&c[1]),
            role: RefereeRole::Umpire,
        });
    }

    let alternates = ALTERNATE_RE
        .captures_iter(text)
        .map(|c| clean_name(&c[1]))
        .collect();

    let technical_fouls = TECHNICAL_RE
        .captures_iter(text)
        .map(|c| c[1].trim().to_string())
        .collect();

    let confidence = score_confidence(text, &referees);

    if confidence < 0.4 {
        warn!(
            "low-confidence gamebook parse ({confidence:.2}) via {method}; game_id={:?}",
            game_id
        );
    }

    GamebooksParseResult {
        game_id,
        venue,
        matchup,
        referees,
        alternates,
        technical_fouls,
        confidence,
        extraction_method: method,
    }
}

fn clean_name(raw: &str) -> String {
    raw.split(|c: char| c == ',' || c == ';')
        .next()
        .unwrap_or(raw)
        .trim()
        .to_string()
}

/// Confidence is a bounded composite of three signals: enough extracted
/// text to plausibly be a whole gamebook, at least one referee-role
/// keyword present, and at least one proper-name match (someone's
/// actual name, not just a keyword).
fn score_confidence(text: &str, referees: &[RefereeAssignment]) -> f64 {
    let length_score = (text.len() as f64 / 2000.0).min(1.0) * 0.4;
    let keyword_score = if REFEREE_KEYWORD_RE.is_match(text) { 0.3 } else { 0.0 };
    let name_score = if !referees.is_empty() || PROPER_NAME_RE.is_match(text) {
        0.3
    } else {
        0.0
    };
    (length_score + keyword_score + name_score).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_gamebook_text() {
        let text = "\
NBA Official Game Book\n\
Game ID: 0022300123\n\
At: Crypto.com Arena\n\
Los Angeles Lakers at Boston Celtics\n\
Crew Chief: John Smith\n\
Referee: Jane Doe\n\
Umpire: Sam Lee\n\
Alternate: Pat Jones\n\
Technical Foul: Flagrant conduct, Q2\n\
";
        let result = parse_gamebook_text(text, "pdf-extract");
        assert_eq!(result.game_id.as_deref(), Some("0022300123"));
        assert!(result.venue.unwrap().contains("Crypto.com"));
        assert_eq!(result.referees.len(), 3);
        assert_eq!(result.referees[0].role, RefereeRole::CrewChief);
        assert_eq!(result.alternates, vec!["Pat Jones".to_string()]);
        assert!(result.confidence > 0.4);
    }

    #[test]
    fn missing_sections_yield_partial_not_error() {
        let result = parse_gamebook_text("garbled unrelated text", "lopdf");
        assert!(result.game_id.is_none());
        assert!(result.referees.is_empty());
        assert!(result.confidence < 0.4);
    }
}
