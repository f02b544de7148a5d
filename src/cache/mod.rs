//! Regeneration database
//!
//! Records when each generated output was last produced so a build can skip
//! outputs that are still inside their revalidation window. There is no other
//! invalidation: an output is regenerated once its interval has elapsed, or
//! when the build is forced.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// Cache directory, relative to the base directory
pub const CACHE_DIR: &str = ".blog-cache";

/// Cache file name
const CACHE_FILE: &str = ".blog-cache/db.json";

/// When an output was generated and how long it stays fresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedEntry {
    /// Generation time (as unix timestamp)
    pub generated_at: u64,
    /// Seconds the output stays fresh
    pub revalidate: Option<u64>,
}

impl GeneratedEntry {
    /// Whether the output is still fresh at `now`
    pub fn is_fresh(&self, now: u64) -> bool {
        match self.revalidate {
            Some(interval) => now < self.generated_at.saturating_add(interval),
            None => true,
        }
    }
}

/// Regeneration database, keyed by output path relative to the public dir
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RegenerationDb {
    /// Version of the cache format
    pub version: u32,
    /// Content backend the outputs were generated from
    pub endpoint: String,
    pub outputs: HashMap<String, GeneratedEntry>,
}

impl RegenerationDb {
    /// Current cache format version
    const VERSION: u32 = 1;

    /// Create a new cache with version set
    pub fn new(endpoint: &str) -> Self {
        Self {
            version: Self::VERSION,
            endpoint: endpoint.to_string(),
            outputs: HashMap::new(),
        }
    }

    /// Load the database from disk, or start an empty one.
    ///
    /// A database recorded against a different backend is discarded.
    pub fn load(base_dir: &Path, endpoint: &str) -> Self {
        let cache_path = base_dir.join(CACHE_FILE);
        if let Ok(content) = fs::read_to_string(&cache_path) {
            if let Ok(cache) = serde_json::from_str::<RegenerationDb>(&content) {
                if cache.version == Self::VERSION && cache.endpoint == endpoint {
                    return cache;
                }
                tracing::info!("Regeneration cache is stale, starting over");
            }
        }
        Self::new(endpoint)
    }

    /// Save the database to disk
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        fs::create_dir_all(base_dir.join(CACHE_DIR))?;

        let cache_path = base_dir.join(CACHE_FILE);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(cache_path, content)?;
        Ok(())
    }

    /// Whether `output` was generated recently enough to be kept
    pub fn is_fresh(&self, output: &str, now: u64) -> bool {
        self.outputs
            .get(output)
            .map(|entry| entry.is_fresh(now))
            .unwrap_or(false)
    }

    /// Record that `output` was just generated
    pub fn record(&mut self, output: &str, now: u64, revalidate: Option<u64>) {
        self.outputs.insert(
            output.to_string(),
            GeneratedEntry {
                generated_at: now,
                revalidate,
            },
        );
    }

    /// Drop entries for outputs that no longer exist on disk
    pub fn retain_existing(&mut self, public_dir: &Path) {
        self.outputs
            .retain(|output, _| public_dir.join(output).exists());
    }
}

/// Current time as unix timestamp
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_freshness() {
        let entry = GeneratedEntry {
            generated_at: 1_000,
            revalidate: Some(86_400),
        };
        assert!(entry.is_fresh(1_000));
        assert!(entry.is_fresh(87_399));
        assert!(!entry.is_fresh(87_400));

        let forever = GeneratedEntry {
            generated_at: 1_000,
            revalidate: None,
        };
        assert!(forever.is_fresh(u64::MAX));
    }

    #[test]
    fn test_unknown_output_is_not_fresh() {
        let db = RegenerationDb::new("https://x.io/api/v2");
        assert!(!db.is_fresh("index.html", 0));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = RegenerationDb::new("https://x.io/api/v2");
        db.record("index.html", 500, Some(60));
        db.save(dir.path()).unwrap();

        let loaded = RegenerationDb::load(dir.path(), "https://x.io/api/v2");
        assert!(loaded.is_fresh("index.html", 559));
        assert!(!loaded.is_fresh("index.html", 560));
    }

    #[test]
    fn test_load_discards_other_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = RegenerationDb::new("https://x.io/api/v2");
        db.record("index.html", 500, None);
        db.save(dir.path()).unwrap();

        let loaded = RegenerationDb::load(dir.path(), "https://other.io/api/v2");
        assert!(loaded.outputs.is_empty());
        assert_eq!(loaded.endpoint, "https://other.io/api/v2");
    }

    #[test]
    fn test_retain_existing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "x").unwrap();

        let mut db = RegenerationDb::new("");
        db.record("index.html", 1, None);
        db.record("post/gone/index.html", 1, None);
        db.retain_existing(dir.path());

        assert_eq!(db.outputs.len(), 1);
        assert!(db.outputs.contains_key("index.html"));
    }
}
