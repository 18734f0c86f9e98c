//! Typed, persisted user preferences.
//!
//! Keys are declared in [`keys`]; [`Preferences`] reads and writes them
//! through a [`PreferenceBackend`] (normally the SQLite [`crate::Database`]).

pub mod keys;
mod store;

pub use keys::{PrefKey, PrefValue, ThreadCount, ValueType, MAX_THREADS, MIN_THREADS};
pub use store::{MemoryBackend, PreferenceBackend, PreferenceError, Preferences, SharedDatabase};
