//! # Client Storage
//!
//! Key/value persistence for the few things that outlive a request: the
//! session token, theme, language, UI preferences and recent searches.
//!
//! Two scopes exist, mirroring browser storage:
//!
//! - **local**: survives restarts ([`FileBackend`], one JSON file)
//! - **session**: lives as long as the process ([`MemoryBackend`])
//!
//! Values are stored as JSON text under `<prefix>_<key>`. Reads that fail to
//! decode are logged and treated as absent; writes report success as `bool`
//! so callers can carry on when the disk is unavailable.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::app::slices::ui::Theme;
use crate::config::{RECENT_SEARCHES_LIMIT, STORAGE_PREFIX};
use crate::core::error::{AppError, Result};

pub const AUTH_TOKEN_KEY: &str = "auth_token";
pub const THEME_KEY: &str = "theme";
pub const LANGUAGE_KEY: &str = "language";
pub const RECENT_SEARCHES_KEY: &str = "recent_searches";
pub const PREFERENCES_KEY: &str = "user_preferences";

const STORAGE_FILE: &str = "storage.json";

/// Raw string store behind a [`Storage`] view.
pub trait StorageBackend: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn keys(&self) -> Vec<String>;
}

/// Process-lifetime storage.
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }
}

/// Persistent storage in a single JSON object file, rewritten on every
/// mutation.
pub struct FileBackend {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileBackend {
    /// Open (or create) `<dir>/storage.json`. A corrupt file is logged and
    /// replaced by an empty store on the next write.
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(STORAGE_FILE);

        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Discarding unreadable storage file");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Storage opened");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let raw = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value);
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock();
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }
}

/// Prefixed, typed view over a backend.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn StorageBackend>,
    prefix: String,
}

impl Storage {
    pub fn new(backend: Arc<dyn StorageBackend>, prefix: &str) -> Self {
        Self {
            backend,
            prefix: prefix.to_string(),
        }
    }

    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()), STORAGE_PREFIX)
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}_{}", self.prefix, key)
    }

    pub fn get_item<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.backend.get(&self.full_key(key))?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring undecodable storage value");
                None
            }
        }
    }

    pub fn set_item<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let result = serde_json::to_string(value)
            .map_err(AppError::from)
            .and_then(|raw| self.backend.set(&self.full_key(key), raw));
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(key, error = %e, "Failed to write storage value");
                false
            }
        }
    }

    pub fn remove_item(&self, key: &str) -> bool {
        match self.backend.remove(&self.full_key(key)) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(key, error = %e, "Failed to remove storage value");
                false
            }
        }
    }

    /// Remove every key under this prefix; foreign keys are left alone.
    pub fn clear(&self) -> bool {
        self.all_keys().iter().fold(true, |ok, key| self.remove_item(key) && ok)
    }

    /// Present values for `keys`; missing or undecodable ones are skipped.
    pub fn get_items<T: DeserializeOwned>(&self, keys: &[&str]) -> BTreeMap<String, T> {
        keys.iter()
            .filter_map(|key| self.get_item(key).map(|v| (key.to_string(), v)))
            .collect()
    }

    pub fn set_items<'a, T, I>(&self, items: I) -> bool
    where
        T: Serialize + 'a,
        I: IntoIterator<Item = (&'a str, &'a T)>,
    {
        items
            .into_iter()
            .fold(true, |ok, (key, value)| self.set_item(key, value) && ok)
    }

    pub fn has_item(&self, key: &str) -> bool {
        self.get_item::<Value>(key).is_some_and(|v| !v.is_null())
    }

    /// Keys under this prefix, prefix stripped.
    pub fn all_keys(&self) -> Vec<String> {
        let prefix = format!("{}_", self.prefix);
        self.backend
            .keys()
            .into_iter()
            .filter_map(|k| k.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }
}

/// Both storage scopes plus the typed helpers the app uses.
#[derive(Clone)]
pub struct ClientStorage {
    pub local: Storage,
    pub session: Storage,
}

impl ClientStorage {
    pub fn new(local: Storage, session: Storage) -> Self {
        Self { local, session }
    }

    /// Memory-only storage for both scopes.
    pub fn in_memory() -> Self {
        Self::new(Storage::memory(), Storage::memory())
    }

    /// File-backed local scope under `dir`, memory-backed session scope.
    pub fn open(dir: &Path) -> Result<Self> {
        let file = FileBackend::open(dir)?;
        Ok(Self::new(
            Storage::new(Arc::new(file), STORAGE_PREFIX),
            Storage::memory(),
        ))
    }

    pub fn token(&self) -> Option<String> {
        self.local.get_item(AUTH_TOKEN_KEY)
    }

    pub fn set_token(&self, token: &str) -> bool {
        self.local.set_item(AUTH_TOKEN_KEY, token)
    }

    pub fn remove_token(&self) -> bool {
        self.local.remove_item(AUTH_TOKEN_KEY)
    }

    pub fn has_token(&self) -> bool {
        self.local.has_item(AUTH_TOKEN_KEY)
    }

    pub fn theme(&self) -> Option<Theme> {
        self.local.get_item(THEME_KEY)
    }

    pub fn set_theme(&self, theme: Theme) -> bool {
        self.local.set_item(THEME_KEY, &theme)
    }

    pub fn language(&self) -> Option<String> {
        self.local.get_item(LANGUAGE_KEY)
    }

    pub fn set_language(&self, language: &str) -> bool {
        self.local.set_item(LANGUAGE_KEY, language)
    }

    pub fn preferences(&self) -> Map<String, Value> {
        self.local.get_item(PREFERENCES_KEY).unwrap_or_default()
    }

    pub fn set_preferences(&self, preferences: &Map<String, Value>) -> bool {
        self.local.set_item(PREFERENCES_KEY, preferences)
    }

    /// Shallow merge: top-level keys in `updates` replace stored ones.
    pub fn update_preferences(&self, updates: Map<String, Value>) -> bool {
        let mut current = self.preferences();
        current.extend(updates);
        self.set_preferences(&current)
    }

    pub fn recent_searches(&self) -> Vec<String> {
        self.local.get_item(RECENT_SEARCHES_KEY).unwrap_or_default()
    }

    /// Put `search` first, drop older duplicates, keep at most ten. Blank
    /// queries are not recorded.
    pub fn add_recent_search(&self, search: &str) -> Vec<String> {
        let search = search.trim();
        let mut searches = self.recent_searches();
        if search.is_empty() {
            return searches;
        }
        searches.retain(|s| s != search);
        searches.insert(0, search.to_string());
        searches.truncate(RECENT_SEARCHES_LIMIT);
        self.local.set_item(RECENT_SEARCHES_KEY, &searches);
        searches
    }

    pub fn clear_recent_searches(&self) -> bool {
        self.local.remove_item(RECENT_SEARCHES_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_are_prefixed() {
        let backend = Arc::new(MemoryBackend::new());
        let storage = Storage::new(backend.clone(), "toagro");
        assert!(storage.set_item("theme", "dark"));
        assert_eq!(backend.keys(), vec!["toagro_theme".to_string()]);
        assert_eq!(storage.all_keys(), vec!["theme".to_string()]);
    }

    #[test]
    fn clear_leaves_foreign_keys() {
        let backend = Arc::new(MemoryBackend::new());
        backend.set("other_key", "1".to_string()).unwrap();
        let storage = Storage::new(backend.clone(), "toagro");
        storage.set_item("a", &1);
        storage.set_item("b", &2);

        assert!(storage.clear());
        assert!(storage.all_keys().is_empty());
        assert_eq!(backend.keys(), vec!["other_key".to_string()]);
    }

    #[test]
    fn undecodable_value_reads_as_absent() {
        let backend = Arc::new(MemoryBackend::new());
        backend.set("toagro_count", "{not json".to_string()).unwrap();
        let storage = Storage::new(backend, "toagro");
        assert_eq!(storage.get_item::<u32>("count"), None);
        assert!(!storage.has_item("count"));
    }

    #[test]
    fn bulk_get_and_set() {
        let storage = Storage::memory();
        assert!(storage.set_items([("a", &1), ("b", &2)]));
        let items: BTreeMap<String, i32> = storage.get_items(&["a", "b", "missing"]);
        assert_eq!(items.len(), 2);
        assert_eq!(items["b"], 2);
    }

    #[test]
    fn token_helpers() {
        let storage = ClientStorage::in_memory();
        assert!(!storage.has_token());
        storage.set_token("jwt");
        assert_eq!(storage.token().as_deref(), Some("jwt"));
        storage.remove_token();
        assert!(storage.token().is_none());
    }

    #[test]
    fn preferences_merge_shallowly() {
        let storage = ClientStorage::in_memory();
        let mut initial = Map::new();
        initial.insert("view".into(), json!("grid"));
        initial.insert("filters".into(), json!({"region": "Kyiv"}));
        storage.set_preferences(&initial);

        let mut patch = Map::new();
        patch.insert("filters".into(), json!({"price": 10}));
        storage.update_preferences(patch);

        let merged = storage.preferences();
        assert_eq!(merged["view"], json!("grid"));
        assert_eq!(merged["filters"], json!({"price": 10}));
    }

    #[test]
    fn recent_searches_are_deduped_and_bounded() {
        let storage = ClientStorage::in_memory();
        for i in 0..12 {
            storage.add_recent_search(&format!("q{i}"));
        }
        let searches = storage.add_recent_search("q5");

        assert_eq!(searches.len(), 10);
        assert_eq!(searches[0], "q5");
        assert_eq!(searches.iter().filter(|s| *s == "q5").count(), 1);
        assert_eq!(storage.recent_searches(), searches);

        storage.clear_recent_searches();
        assert!(storage.recent_searches().is_empty());
    }

    #[test]
    fn theme_round_trips() {
        let storage = ClientStorage::in_memory();
        assert!(storage.theme().is_none());
        storage.set_theme(Theme::Dark);
        assert_eq!(storage.theme(), Some(Theme::Dark));
    }
}
