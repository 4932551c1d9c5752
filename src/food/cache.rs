use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::persist;

/// Per-100g macro profile for one canonical food name. Immutable once
/// computed; all four fields are always present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodInfo {
    pub calories_per_100g: f64,
    pub protein_per_100g: f64,
    pub carbs_per_100g: f64,
    pub fat_per_100g: f64,
}

impl FoodInfo {
    pub fn is_valid(&self) -> bool {
        [
            self.calories_per_100g,
            self.protein_per_100g,
            self.carbs_per_100g,
            self.fat_per_100g,
        ]
        .iter()
        .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Canonical form shared by cache keys and logged item names.
pub fn canonical_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Durable name -> FoodInfo store: in-memory map mirrored to a JSON
/// snapshot on every insert. Entries are never invalidated or evicted;
/// a personal food vocabulary stays small enough that the whole map is
/// rewritten per mutation.
pub struct FoodCache {
    path: PathBuf,
    entries: Mutex<HashMap<String, FoodInfo>>,
}

impl FoodCache {
    /// Loads the snapshot from disk. A missing file, unreadable JSON or
    /// an invalid entry starts an empty cache with a warning; a broken
    /// cache file never takes the process down.
    pub fn load(path: PathBuf) -> Self {
        let entries = match Self::read_snapshot(&path) {
            Ok(map) => map,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "invalid food cache, starting empty");
                HashMap::new()
            }
        };
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn read_snapshot(path: &Path) -> anyhow::Result<HashMap<String, FoodInfo>> {
        let raw = std::fs::read_to_string(path)?;
        let map: HashMap<String, FoodInfo> = serde_json::from_str(&raw)?;
        anyhow::ensure!(
            map.values().all(FoodInfo::is_valid),
            "cache holds negative or non-finite values"
        );
        Ok(map)
    }

    pub fn get(&self, name: &str) -> Option<FoodInfo> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
    }

    /// Write-through insert: both the in-memory map and the durable
    /// snapshot are updated before this returns, so a crash after a
    /// successful resolution never loses the entry.
    pub fn insert(&self, name: String, info: FoodInfo) -> anyhow::Result<()> {
        let snapshot = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            entries.insert(name.clone(), info);
            entries.clone()
        };
        self.flush(&snapshot)?;
        info!(name = %name, "added food info to cache");
        Ok(())
    }

    /// Rewrites the durable snapshot atomically.
    fn flush(&self, snapshot: &HashMap<String, FoodInfo>) -> anyhow::Result<()> {
        persist::write_json_atomic(&self.path, snapshot)
    }
}
