//! The preference store.
//!
//! `Preferences` reads and writes typed keys through a [`PreferenceBackend`]
//! and publishes every write to observers via `tokio::sync::watch` cells.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::keys::{PrefKey, PrefValue, ThreadCount, THREADS};
use crate::db::Database;

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Preference backend unavailable: {0}")]
    Backend(String),
}

// ============================================================================
// Backends
// ============================================================================

/// Raw key/value persistence behind the preference store.
///
/// Single-key reads and writes must be atomic and immediately visible.
pub trait PreferenceBackend: Send {
    fn read(&self, key: &str) -> Result<Option<String>, PreferenceError>;

    fn write(&self, key: &str, value: &str) -> Result<(), PreferenceError>;

    fn remove(&self, key: &str) -> Result<(), PreferenceError>;
}

impl PreferenceBackend for Database {
    fn read(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.get_preference(key)?)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        Ok(self.set_preference(key, value)?)
    }

    fn remove(&self, key: &str) -> Result<(), PreferenceError> {
        Ok(self.delete_preference(key)?)
    }
}

/// A database shared with the config writer. The in-memory fallback
/// database only exists on its one connection, so both must use it.
pub type SharedDatabase = Arc<Mutex<Database>>;

impl PreferenceBackend for SharedDatabase {
    fn read(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let db = self
            .lock()
            .map_err(|e| PreferenceError::Backend(e.to_string()))?;
        db.read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let db = self
            .lock()
            .map_err(|e| PreferenceError::Backend(e.to_string()))?;
        db.write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), PreferenceError> {
        let db = self
            .lock()
            .map_err(|e| PreferenceError::Backend(e.to_string()))?;
        db.remove(key)
    }
}

/// In-memory backend, used in tests and when no database is available.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let values = self
            .values
            .lock()
            .map_err(|e| PreferenceError::Backend(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| PreferenceError::Backend(e.to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PreferenceError> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| PreferenceError::Backend(e.to_string()))?;
        values.remove(key);
        Ok(())
    }
}

// ============================================================================
// Preferences
// ============================================================================

/// Typed access to persisted preferences.
pub struct Preferences {
    backend: Box<dyn PreferenceBackend>,
    /// One `watch::Sender<T>` per observed key, type-erased.
    cells: HashMap<&'static str, Box<dyn Any + Send>>,
}

impl Preferences {
    pub fn new(backend: impl PreferenceBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            cells: HashMap::new(),
        }
    }

    /// A store backed by a fresh [`MemoryBackend`].
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Read a preference, falling back to its default.
    ///
    /// Backend failures and undecodable values are logged and yield the
    /// default; screens always get something to render.
    pub fn get_value<T: PrefValue>(&self, key: &PrefKey<T>) -> T {
        match self.try_get_value(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = key.name(), error = %e, "Failed to read preference, using default");
                key.default_value()
            }
        }
    }

    /// Read a preference, surfacing backend errors.
    pub fn try_get_value<T: PrefValue>(&self, key: &PrefKey<T>) -> Result<T, PreferenceError> {
        let raw = self.backend.read(key.name())?;
        Ok(match raw {
            Some(raw) => T::decode(&raw).unwrap_or_else(|| {
                warn!(
                    key = key.name(),
                    expected = %key.value_type(),
                    raw = %raw,
                    "Stored preference has the wrong type, using default"
                );
                key.default_value()
            }),
            None => key.default_value(),
        })
    }

    /// Persist a preference and notify observers.
    pub fn update_value<T: PrefValue>(
        &self,
        key: &PrefKey<T>,
        value: T,
    ) -> Result<(), PreferenceError> {
        self.backend.write(key.name(), &value.encode())?;
        debug!(key = key.name(), value = ?value, "Preference updated");
        self.publish(key, value);
        Ok(())
    }

    /// Remove a stored preference so it reads as its default again.
    pub fn reset<T: PrefValue>(&self, key: &PrefKey<T>) -> Result<(), PreferenceError> {
        self.backend.remove(key.name())?;
        self.publish(key, key.default_value());
        Ok(())
    }

    /// Flip a boolean preference, returning the new value.
    pub fn toggle(&self, key: &PrefKey<bool>) -> Result<bool, PreferenceError> {
        let next = !self.try_get_value(key)?;
        self.update_value(key, next)?;
        Ok(next)
    }

    /// Observe a preference.
    ///
    /// The receiver starts at the current stored value and sees every later
    /// write made through this store.
    pub fn watch<T: PrefValue>(&mut self, key: &PrefKey<T>) -> watch::Receiver<T> {
        if let Some(sender) = self
            .cells
            .get(key.name())
            .and_then(|cell| cell.downcast_ref::<watch::Sender<T>>())
        {
            return sender.subscribe();
        }

        let (sender, receiver) = watch::channel(self.get_value(key));
        self.cells.insert(key.name(), Box::new(sender));
        receiver
    }

    pub fn thread_count(&self) -> ThreadCount {
        ThreadCount::new(self.get_value(&THREADS))
    }

    /// Store a thread count. The type guarantees the bound, so nothing out of
    /// range ever reaches the backend.
    pub fn set_thread_count(&self, threads: ThreadCount) -> Result<(), PreferenceError> {
        self.update_value(&THREADS, threads.get())
    }

    fn publish<T: PrefValue>(&self, key: &PrefKey<T>, value: T) {
        if let Some(sender) = self
            .cells
            .get(key.name())
            .and_then(|cell| cell.downcast_ref::<watch::Sender<T>>())
        {
            sender.send_replace(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::keys::{DEBUG, GEO_BYPASS, LANGUAGE, MAX_THREADS, MIN_THREADS, UPDATE_CHANNEL};
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn setup_db_prefs() -> (TempDir, Preferences) {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open_at(temp_dir.path().join("prefs.db")).unwrap();
        db.migrate().unwrap();
        (temp_dir, Preferences::new(db))
    }

    #[test]
    fn test_defaults_when_nothing_stored() {
        let prefs = Preferences::in_memory();
        assert!(!prefs.get_value(&DEBUG));
        assert_eq!(prefs.get_value(&UPDATE_CHANNEL), 0);
        assert_eq!(prefs.get_value(&LANGUAGE), "");
    }

    #[test]
    fn test_update_then_read_with_database() {
        let (_temp, prefs) = setup_db_prefs();

        prefs.update_value(&GEO_BYPASS, true).unwrap();
        prefs.update_value(&LANGUAGE, "es-ES".to_string()).unwrap();

        assert!(prefs.get_value(&GEO_BYPASS));
        assert_eq!(prefs.get_value(&LANGUAGE), "es-ES");
    }

    #[test]
    fn test_in_memory_database_shared_with_config_writer() {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        let shared: SharedDatabase = Arc::new(Mutex::new(db));
        let prefs = Preferences::new(Arc::clone(&shared));

        prefs.update_value(&GEO_BYPASS, true).unwrap();

        let db = shared.lock().unwrap();
        let config = crate::AppConfig {
            download_dir: Some("/home/user/Music".to_string()),
            ..crate::AppConfig::default()
        };
        config.save(&db).unwrap();

        assert_eq!(crate::AppConfig::load(&db), config);
        assert_eq!(db.get_preference(GEO_BYPASS.name()).unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn test_wrong_type_in_storage_reads_default() {
        let backend = MemoryBackend::new();
        backend.write(UPDATE_CHANNEL.name(), "not a number").unwrap();
        let prefs = Preferences::new(backend);

        assert_eq!(prefs.get_value(&UPDATE_CHANNEL), 0);
    }

    #[test]
    fn test_reset_restores_default() {
        let prefs = Preferences::in_memory();
        prefs.update_value(&DEBUG, true).unwrap();
        prefs.reset(&DEBUG).unwrap();
        assert!(!prefs.get_value(&DEBUG));
    }

    #[test]
    fn test_double_toggle_returns_to_original() {
        let prefs = Preferences::in_memory();
        let original = prefs.get_value(&DEBUG);

        assert_eq!(prefs.toggle(&DEBUG).unwrap(), !original);
        assert_eq!(prefs.toggle(&DEBUG).unwrap(), original);
        assert_eq!(prefs.get_value(&DEBUG), original);
    }

    #[test]
    fn test_watch_sees_later_writes() {
        let mut prefs = Preferences::in_memory();
        let mut rx = prefs.watch(&DEBUG);
        assert!(!*rx.borrow());

        prefs.update_value(&DEBUG, true).unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(*rx.borrow_and_update());
    }

    #[test]
    fn test_watch_subscribers_share_one_cell() {
        let mut prefs = Preferences::in_memory();
        let first = prefs.watch(&UPDATE_CHANNEL);
        let second = prefs.watch(&UPDATE_CHANNEL);

        prefs.update_value(&UPDATE_CHANNEL, 1).unwrap();

        assert_eq!(*first.borrow(), 1);
        assert_eq!(*second.borrow(), 1);
    }

    #[test]
    fn test_watch_starts_at_stored_value() {
        let mut prefs = Preferences::in_memory();
        prefs.update_value(&LANGUAGE, "fr".to_string()).unwrap();

        let rx = prefs.watch(&LANGUAGE);
        assert_eq!(*rx.borrow(), "fr");
    }

    #[test]
    fn test_thread_count_read_is_clamped() {
        let backend = MemoryBackend::new();
        backend.write(THREADS.name(), "14").unwrap();
        let prefs = Preferences::new(backend);

        assert_eq!(prefs.thread_count().get(), MAX_THREADS);
    }

    proptest! {
        #[test]
        fn prop_toggle_sequence_is_xor_fold(initial in any::<bool>(), toggles in 0usize..64) {
            let prefs = Preferences::in_memory();
            prefs.update_value(&DEBUG, initial).unwrap();

            for _ in 0..toggles {
                prefs.toggle(&DEBUG).unwrap();
            }

            prop_assert_eq!(prefs.get_value(&DEBUG), initial ^ (toggles % 2 == 1));
        }

        #[test]
        fn prop_thread_writes_are_bounded(raw in any::<i32>()) {
            let prefs = Preferences::in_memory();
            prefs.set_thread_count(ThreadCount::new(raw)).unwrap();

            let stored = prefs.get_value(&THREADS);
            prop_assert!((MIN_THREADS..=MAX_THREADS).contains(&stored));
        }

        #[test]
        fn prop_slider_writes_are_bounded(raw in -1000.0f32..1000.0) {
            let prefs = Preferences::in_memory();
            prefs.set_thread_count(ThreadCount::from_slider(raw)).unwrap();

            let stored = prefs.get_value(&THREADS);
            prop_assert!((MIN_THREADS..=MAX_THREADS).contains(&stored));
        }
    }
}
