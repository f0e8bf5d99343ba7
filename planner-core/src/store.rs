//! Persistence for the planner blob.
//!
//! The store is the source of truth after a load. Saves replace the whole
//! blob at once.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;

use crate::data::PlannerData;
use crate::error::{PlannerError, PlannerResult};

/// Load/save of the whole planner state.
pub trait Store: Send + Sync {
    fn load(&self) -> PlannerResult<PlannerData>;

    fn save(&self, data: &PlannerData) -> PlannerResult<()>;
}

/// Pretty-printed JSON file, replaced atomically through a temp file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, data: &PlannerData) -> PlannerResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = data.to_json_pretty()?;
        let temp = self.path.with_extension("json.tmp");

        std::fs::write(&temp, content)?;
        if let Err(e) = std::fs::rename(&temp, &self.path) {
            let _ = std::fs::remove_file(&temp);
            return Err(e.into());
        }
        Ok(())
    }
}

impl Store for JsonFileStore {
    /// Reads the file, creating it with empty data on first use.
    fn load(&self) -> PlannerResult<PlannerData> {
        if !self.path.exists() {
            let mut data = PlannerData::default();
            data.last_updated = Some(Utc::now());
            self.write(&data).map_err(|e| {
                PlannerError::persistence(format!(
                    "Could not initialize {}: {}",
                    self.path.display(),
                    e
                ))
            })?;
            tracing::info!(path = %self.path.display(), "initialized data file");
            return Ok(data);
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            PlannerError::persistence(format!("Could not read {}: {}", self.path.display(), e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            PlannerError::Serialization(format!("{}: {}", self.path.display(), e))
        })
    }

    fn save(&self, data: &PlannerData) -> PlannerResult<()> {
        let mut stamped = data.clone();
        stamped.last_updated = Some(Utc::now());

        self.write(&stamped).map_err(|e| {
            PlannerError::persistence(format!("Could not write {}: {}", self.path.display(), e))
        })
    }
}

/// A primary store backed by a best-effort local cache.
///
/// A failed save is still a failure: the cache gets a copy, but the caller
/// receives `Persistence { cached, .. }` so it never mistakes the cache for
/// the durable write.
pub struct FallbackStore {
    primary: Box<dyn Store>,
    cache: Box<dyn Store>,
}

impl FallbackStore {
    pub fn new(primary: Box<dyn Store>, cache: Box<dyn Store>) -> Self {
        FallbackStore { primary, cache }
    }
}

impl Store for FallbackStore {
    fn load(&self) -> PlannerResult<PlannerData> {
        match self.primary.load() {
            Ok(data) => Ok(data),
            Err(primary_err) => {
                tracing::warn!(error = %primary_err, "primary store unavailable, loading local cache");
                self.cache.load().map_err(|_| primary_err)
            }
        }
    }

    fn save(&self, data: &PlannerData) -> PlannerResult<()> {
        let message = match self.primary.save(data) {
            Ok(()) => return Ok(()),
            Err(e) => e.to_string(),
        };

        let cached = match self.cache.save(data) {
            Ok(()) => true,
            Err(cache_err) => {
                tracing::warn!(error = %cache_err, "local cache write failed");
                false
            }
        };
        tracing::warn!(%message, cached, "durable save failed");

        Err(PlannerError::Persistence { message, cached })
    }
}

/// In-memory store, mainly for tests and embedding.
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<Option<PlannerData>>,
    failing: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: PlannerData) -> Self {
        MemoryStore {
            data: Mutex::new(Some(data)),
            failing: Mutex::new(false),
        }
    }

    /// Make every subsequent load and save fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        if let Ok(mut flag) = self.failing.lock() {
            *flag = failing;
        }
    }

    /// The last successfully saved data, if any.
    pub fn saved(&self) -> Option<PlannerData> {
        self.data.lock().ok().and_then(|d| d.clone())
    }

    fn is_failing(&self) -> bool {
        self.failing.lock().map(|f| *f).unwrap_or(true)
    }
}

impl Store for MemoryStore {
    fn load(&self) -> PlannerResult<PlannerData> {
        if self.is_failing() {
            return Err(PlannerError::persistence("store unavailable"));
        }
        Ok(self.saved().unwrap_or_default())
    }

    fn save(&self, data: &PlannerData) -> PlannerResult<()> {
        if self.is_failing() {
            return Err(PlannerError::persistence("store rejected write"));
        }
        let mut slot = self
            .data
            .lock()
            .map_err(|_| PlannerError::persistence("store lock poisoned"))?;
        *slot = Some(data.clone());
        Ok(())
    }
}

/// Shared handle, so a caller can keep inspecting a store it handed over.
impl<S: Store + ?Sized> Store for std::sync::Arc<S> {
    fn load(&self) -> PlannerResult<PlannerData> {
        (**self).load()
    }

    fn save(&self, data: &PlannerData) -> PlannerResult<()> {
        (**self).save(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_key::DateKey;
    use std::sync::Arc;

    #[test]
    fn file_store_initializes_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("planner-data.json");
        let store = JsonFileStore::new(&path);

        let data = store.load().unwrap();

        assert!(path.exists());
        assert!(data.confirmed_plans.is_empty());
        assert_eq!(data.version, "1.0");
    }

    #[test]
    fn file_store_round_trips_and_stamps() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("planner-data.json"));

        let mut data = PlannerData::default();
        data.availability
            .mark_unavailable(DateKey::parse("2025-06-01").unwrap());
        store.save(&data).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.availability, data.availability);
        assert!(loaded.last_updated.is_some());
        assert!(!dir.path().join("planner-data.json.tmp").exists());
    }

    #[test]
    fn failed_rename_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner-data.json");
        // a non-empty directory in the way makes the rename fail
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "").unwrap();

        let err = JsonFileStore::new(&path).save(&PlannerData::default()).unwrap_err();

        assert!(matches!(err, PlannerError::Persistence { .. }));
        assert!(!dir.path().join("planner-data.json.tmp").exists());
    }

    #[test]
    fn file_store_reports_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner-data.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, PlannerError::Serialization(_)));
    }

    #[test]
    fn fallback_caches_but_still_fails() {
        let primary = Arc::new(MemoryStore::new());
        let cache = Arc::new(MemoryStore::new());
        primary.set_failing(true);

        let store = FallbackStore::new(Box::new(primary.clone()), Box::new(cache.clone()));
        let data = PlannerData::default();

        let err = store.save(&data).unwrap_err();

        assert!(matches!(err, PlannerError::Persistence { cached: true, .. }));
        assert_eq!(cache.saved(), Some(data));
    }

    #[test]
    fn fallback_reports_uncached_failure() {
        let primary = Arc::new(MemoryStore::new());
        let cache = Arc::new(MemoryStore::new());
        primary.set_failing(true);
        cache.set_failing(true);

        let store = FallbackStore::new(Box::new(primary), Box::new(cache));
        let err = store.save(&PlannerData::default()).unwrap_err();

        assert!(matches!(err, PlannerError::Persistence { cached: false, .. }));
    }

    #[test]
    fn fallback_loads_cache_when_primary_is_down() {
        let mut cached = PlannerData::default();
        cached.calendar_connected = true;

        let primary = Arc::new(MemoryStore::new());
        primary.set_failing(true);
        let store = FallbackStore::new(
            Box::new(primary),
            Box::new(MemoryStore::with_data(cached.clone())),
        );

        assert_eq!(store.load().unwrap(), cached);
    }
}
