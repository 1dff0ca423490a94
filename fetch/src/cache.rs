use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::CacheConfig;

/// Endpoint TTL classes per §4.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheClass {
    /// Scoreboards and other live-ish data.
    Live,
    /// Boxscore, play-by-play, and other per-game data that never
    /// changes once the game is final.
    GameData,
    Other,
}

impl CacheClass {
    fn ttl(self, config: &CacheConfig) -> Duration {
        let secs = match self {
            CacheClass::Live => config.live_ttl_secs,
            CacheClass::GameData => config.game_data_ttl_secs,
            CacheClass::Other => config.other_ttl_secs,
        };
        Duration::from_secs(secs)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEnvelope {
    ingested_at: DateTime<Utc>,
    body: serde_json::Value,
}

/// Content-addressed response cache. Keys are SHA-256 over
/// `base_url || endpoint || sorted(params)`. Backed by one file per key
/// under `directory`, with an optional `sled` tree for a shared store.
/// Cache writes never fail the request that triggered them: every write
/// error is logged and swallowed.
pub struct ResponseCache {
    config: CacheConfig,
    shared: Option<sled::Db>,
}

impl ResponseCache {
    pub fn new(config: CacheConfig) -> Self {
        let shared = if config.use_shared_store {
            match sled::open(config.directory.join("shared.sled")) {
                Ok(db) => Some(db),
                Err(err) => {
                    warn!("failed to open shared cache store, continuing without it: {err}");
                    None
                }
            }
        } else {
            None
        };

        if let Err(err) = std::fs::create_dir_all(&config.directory) {
            warn!(
                "failed to create cache directory {:?}, caching will be best-effort: {err}",
                config.directory
            );
        }

        Self { config, shared }
    }

    pub fn key(base_url: &str, endpoint: &str, params: &[(&str, &str)]) -> String {
        let mut sorted = params.to_vec();
        sorted.sort_unstable();
        let mut hasher = Sha256::new();
        hasher.update(base_url.as_bytes());
        hasher.update(b"|");
        hasher.update(endpoint.as_bytes());
        for (k, v) in sorted {
            hasher.update(b"|");
            hasher.update(k.as_bytes());
            hasher.update(b"=");
            hasher.update(v.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.config.directory.join(format!("{key}.json"))
    }

    /// Returns the cached value if present and not past its TTL for
    /// `class`. A miss or expired entry returns `None` without removing
    /// the stale file (it will simply be overwritten on the next write).
    pub fn get(&self, key: &str, class: CacheClass) -> Option<serde_json::Value> {
        if let Some(value) = self.get_from_disk(key, class) {
            return Some(value);
        }
        self.get_from_shared(key, class)
    }

    fn get_from_disk(&self, key: &str, class: CacheClass) -> Option<serde_json::Value> {
        let path = self.path_for(key);
        let bytes = std::fs::read(&path).ok()?;
        let envelope: CacheEnvelope = serde_json::from_slice(&bytes).ok()?;
        if is_expired(envelope.ingested_at, class.ttl(&self.config)) {
            debug!("cache entry {key} expired ({:?} class)", class);
            return None;
        }
        Some(envelope.body)
    }

    fn get_from_shared(&self, key: &str, class: CacheClass) -> Option<serde_json::Value> {
        let db = self.shared.as_ref()?;
        let bytes = db.get(key).ok().flatten()?;
        let envelope: CacheEnvelope = serde_json::from_slice(&bytes).ok()?;
        if is_expired(envelope.ingested_at, class.ttl(&self.config)) {
            return None;
        }
        Some(envelope.body)
    }

    /// Writes `value` under `key`. Best-effort: failures are logged, not
    /// propagated.
    pub fn put(&self, key: &str, value: &serde_json::Value) {
        let envelope = CacheEnvelope {
            ingested_at: Utc::now(),
            body: value.clone(),
        };
        let Ok(bytes) = serde_json::to_vec(&envelope) else {
            warn!("failed to serialize cache entry {key}, skipping write");
            return;
        };

        if let Err(err) = std::fs::write(self.path_for(key), &bytes) {
            warn!("failed to write cache entry {key} to disk: {err}");
        }

        if let Some(db) = &self.shared {
            if let Err(err) = db.insert(key, bytes) {
                warn!("failed to write cache entry {key} to shared store: {err}");
            }
        }
    }

    /// Downloads (or reads from cache) a PDF by URL, keyed under
    /// `gamebooks_directory` by the last path segment of the URL, per §6.
    pub fn gamebooks_path_for(&self, url: &str) -> PathBuf {
        let filename = url
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("document.pdf");
        self.config.gamebooks_directory.join(filename)
    }

    pub fn gamebooks_dir(&self) -> &Path {
        &self.config.gamebooks_directory
    }
}

fn is_expired(ingested_at: DateTime<Utc>, ttl: Duration) -> bool {
    let age = Utc::now().signed_duration_since(ingested_at);
    match age.to_std() {
        Ok(age) => age > ttl,
        Err(_) => false, // clock skew put ingested_at in the future; treat as fresh
    }
}

#[allow(dead_code)]
fn system_time_to_chrono(t: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(dir: &Path) -> CacheConfig {
        CacheConfig {
            directory: dir.to_path_buf(),
            live_ttl_secs: 1,
            game_data_ttl_secs: 3600,
            other_ttl_secs: 1800,
            gamebooks_directory: dir.join("gamebooks"),
            use_shared_store: false,
        }
    }

    #[test]
    fn key_is_stable_regardless_of_param_order() {
        let a = ResponseCache::key("https://x", "boxscore", &[("a", "1"), ("b", "2")]);
        let b = ResponseCache::key("https://x", "boxscore", &[("b", "2"), ("a", "1")]);
        assert_eq!(a, b);
    }

    #[test]
    fn put_then_get_round_trips() {
        let dir = tempdir();
        let cache = ResponseCache::new(test_config(dir.path()));
        let key = ResponseCache::key("https://x", "boxscore", &[]);
        cache.put(&key, &serde_json::json!({"ok": true}));
        let got = cache.get(&key, CacheClass::GameData).unwrap();
        assert_eq!(got["ok"], serde_json::json!(true));
    }

    #[test]
    fn expired_entry_is_not_returned() {
        let dir = tempdir();
        let cache = ResponseCache::new(test_config(dir.path()));
        let key = ResponseCache::key("https://x", "scoreboard", &[]);
        cache.put(&key, &serde_json::json!({"ok": true}));
        std::thread::sleep(Duration::from_millis(1100));
        assert!(cache.get(&key, CacheClass::Live).is_none());
    }

    struct TempDir(PathBuf);
    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }
    impl TempDir {
        fn path(&self) -> &Path {
            &self.0
        }
    }
    fn tempdir() -> TempDir {
        let mut path = std::env::temp_dir();
        path.push(format!("fetch-cache-test-{:x}", rand_u64()));
        TempDir(path)
    }
    fn rand_u64() -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        std::process::id() as u64 ^ SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos() as u64
    }
}
