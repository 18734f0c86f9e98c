//! Application configuration for Spowlo.
//!
//! Unlike user preferences, these are deployment knobs (where releases are
//! published, which library executable to run). They are persisted to the
//! SQLite database as one JSON document.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Database key of the config document.
const CONFIG_KEY: &str = "app_config";

pub const ENV_SPOTDL_PATH: &str = "SPOWLO_SPOTDL_PATH";
/// `owner/repo` of the release repository.
pub const ENV_RELEASE_REPO: &str = "SPOWLO_RELEASE_REPO";

// =============================================================================
// App Config
// =============================================================================

/// Application configuration - persisted to database as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// GitHub owner of the release repository.
    pub release_owner: String,

    /// GitHub name of the release repository.
    pub release_repo: String,

    /// spotDL executable, a bare name resolved on `PATH` or a full path.
    pub library_executable: String,

    /// Timeout for release metadata requests.
    pub request_timeout_secs: u64,

    /// Timeout for a single library invocation.
    pub library_timeout_secs: u64,

    /// Where downloads and update packages are written.
    pub download_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            release_owner: "BobbyESP".to_string(),
            release_repo: "Spowlo".to_string(),
            library_executable: "spotdl".to_string(),
            request_timeout_secs: 30,
            library_timeout_secs: 600,
            download_dir: None,
        }
    }
}

impl AppConfig {
    /// Load config from database, using defaults for missing values.
    ///
    /// If the document doesn't exist or can't be parsed, returns defaults.
    /// The result is always validated.
    pub fn load(db: &crate::db::Database) -> Self {
        let mut config = Self::default();

        match db.get_config(CONFIG_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<AppConfig>(&json) {
                Ok(loaded) => config = loaded,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to parse app config, using defaults");
                }
            },
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to read app config, using defaults"),
        }

        config.validate();
        config
    }

    /// Save config to database.
    pub fn save(&self, db: &crate::db::Database) -> anyhow::Result<()> {
        let json = serde_json::to_string(self)?;
        db.set_config(CONFIG_KEY, &json)?;
        Ok(())
    }

    /// Validate and clamp config to valid ranges.
    pub fn validate(&mut self) {
        self.request_timeout_secs = self.request_timeout_secs.clamp(5, 300);
        self.library_timeout_secs = self.library_timeout_secs.clamp(10, 3600);

        let defaults = Self::default();
        if self.release_owner.trim().is_empty() || self.release_repo.trim().is_empty() {
            self.release_owner = defaults.release_owner;
            self.release_repo = defaults.release_repo;
        }
        if self.library_executable.trim().is_empty() {
            self.library_executable = defaults.library_executable;
        }
        if self
            .download_dir
            .as_deref()
            .is_some_and(|d| d.trim().is_empty())
        {
            self.download_dir = None;
        }
    }

    /// The config used at runtime: a copy with environment overrides
    /// applied. `self` stays as stored, so saving it never persists them.
    pub fn with_env(&self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// A copy with overrides from `lookup` applied.
    pub fn with_overrides(&self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut effective = self.clone();
        effective.apply_overrides(lookup);
        effective
    }

    /// Apply overrides from `lookup`. Malformed values are logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(ENV_SPOTDL_PATH).filter(|p| !p.trim().is_empty()) {
            tracing::info!(executable = %path, "Library executable overridden from environment");
            self.library_executable = path;
        }

        if let Some(repo) = lookup(ENV_RELEASE_REPO) {
            match repo.trim().split_once('/') {
                Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                    self.release_owner = owner.to_string();
                    self.release_repo = name.to_string();
                }
                _ => tracing::warn!(value = %repo, "Ignoring malformed {}", ENV_RELEASE_REPO),
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn library_timeout(&self) -> Duration {
        Duration::from_secs(self.library_timeout_secs)
    }

    /// The configured download directory, else the user's music or
    /// downloads folder.
    pub fn effective_download_dir(&self) -> Option<PathBuf> {
        self.download_dir
            .as_ref()
            .map(PathBuf::from)
            .or_else(dirs::audio_dir)
            .or_else(dirs::download_dir)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn setup_test_db() -> (TempDir, crate::db::Database) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = crate::db::Database::open_at(db_path).unwrap();
        db.migrate().unwrap();
        (temp_dir, db)
    }

    #[test]
    fn test_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.release_owner, "BobbyESP");
        assert_eq!(config.release_repo, "Spowlo");
        assert_eq!(config.library_executable, "spotdl");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.download_dir.is_none());
    }

    #[test]
    fn test_config_save_and_load_roundtrip() {
        let (_temp, db) = setup_test_db();

        let mut original = AppConfig::default();
        original.library_executable = "/opt/spotdl/bin/spotdl".to_string();
        original.request_timeout_secs = 12;
        original.download_dir = Some("/home/user/Music".to_string());
        original.save(&db).unwrap();

        assert_eq!(AppConfig::load(&db), original);
    }

    #[test]
    fn test_config_load_returns_defaults_when_missing() {
        let (_temp, db) = setup_test_db();
        assert_eq!(AppConfig::load(&db), AppConfig::default());
    }

    #[test]
    fn test_config_load_returns_defaults_on_invalid_json() {
        let (_temp, db) = setup_test_db();
        db.set_config("app_config", "not valid json {{").unwrap();
        assert_eq!(AppConfig::load(&db), AppConfig::default());
    }

    #[test]
    fn test_config_load_fills_missing_fields() {
        let (_temp, db) = setup_test_db();
        db.set_config("app_config", r#"{"request_timeout_secs": 1}"#)
            .unwrap();

        let config = AppConfig::load(&db);
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.library_executable, "spotdl");
    }

    #[test]
    fn test_validate_restores_blank_fields() {
        let mut config = AppConfig {
            release_owner: " ".to_string(),
            library_executable: String::new(),
            library_timeout_secs: 1_000_000,
            download_dir: Some(String::new()),
            ..AppConfig::default()
        };
        config.validate();

        assert_eq!(config.release_owner, "BobbyESP");
        assert_eq!(config.library_executable, "spotdl");
        assert_eq!(config.library_timeout_secs, 3600);
        assert!(config.download_dir.is_none());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_SPOTDL_PATH, "/usr/local/bin/spotdl"),
            (ENV_RELEASE_REPO, "someone/fork"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.library_executable, "/usr/local/bin/spotdl");
        assert_eq!(config.release_owner, "someone");
        assert_eq!(config.release_repo, "fork");
    }

    #[test]
    fn test_saving_after_overrides_keeps_stored_values() {
        let (_temp, db) = setup_test_db();
        let env: HashMap<&str, &str> = [
            (ENV_SPOTDL_PATH, "/usr/local/bin/spotdl"),
            (ENV_RELEASE_REPO, "someone/fork"),
        ]
        .into_iter()
        .collect();

        let mut stored = AppConfig::load(&db);
        let effective = stored.with_overrides(|name| env.get(name).map(|v| v.to_string()));
        assert_eq!(effective.library_executable, "/usr/local/bin/spotdl");

        stored.download_dir = Some("/home/user/Music".to_string());
        stored.save(&db).unwrap();

        let loaded = AppConfig::load(&db);
        assert_eq!(loaded.library_executable, "spotdl");
        assert_eq!(loaded.release_owner, "BobbyESP");
        assert_eq!(loaded.release_repo, "Spowlo");
        assert_eq!(loaded.download_dir.as_deref(), Some("/home/user/Music"));
    }

    #[test]
    fn test_malformed_repo_override_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(|name| {
            (name == ENV_RELEASE_REPO).then(|| "not-a-repo".to_string())
        });
        assert_eq!(config.release_owner, "BobbyESP");
        assert_eq!(config.release_repo, "Spowlo");
    }

    #[test]
    fn test_configured_download_dir_wins() {
        let config = AppConfig {
            download_dir: Some("/srv/music".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(config.effective_download_dir(), Some(PathBuf::from("/srv/music")));
    }
}
