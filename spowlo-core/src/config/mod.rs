//! Configuration module for Spowlo.
//!
//! Manages application configuration stored in SQLite.

mod settings;

pub use settings::{AppConfig, ENV_RELEASE_REPO, ENV_SPOTDL_PATH};
