//! Typed preference keys.
//!
//! Every persisted setting is declared here exactly once, with its value type
//! and default. The type is part of the key (`PrefKey<bool>` etc.), so a key
//! can never be read or written as a different type.

use std::fmt;

// ============================================================================
// Value Types
// ============================================================================

/// The storage type of a preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Bool,
    Int,
    Text,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// A value that can be stored in the preference store.
///
/// Values are persisted as text; `decode` returns `None` when the stored
/// text doesn't parse as this type.
pub trait PrefValue: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    const TYPE: ValueType;

    fn encode(&self) -> String;

    fn decode(raw: &str) -> Option<Self>;
}

impl PrefValue for bool {
    const TYPE: ValueType = ValueType::Bool;

    fn encode(&self) -> String {
        self.to_string()
    }

    fn decode(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl PrefValue for i32 {
    const TYPE: ValueType = ValueType::Int;

    fn encode(&self) -> String {
        self.to_string()
    }

    fn decode(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl PrefValue for String {
    const TYPE: ValueType = ValueType::Text;

    fn encode(&self) -> String {
        self.clone()
    }

    fn decode(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

// ============================================================================
// Preference Key
// ============================================================================

/// A typed preference key with its default value.
#[derive(Debug, Clone)]
pub struct PrefKey<T> {
    name: &'static str,
    default: T,
}

impl<T: PrefValue> PrefKey<T> {
    pub const fn new(name: &'static str, default: T) -> Self {
        Self { name, default }
    }

    /// The storage name of this key.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The value returned when nothing has been stored yet.
    pub fn default_value(&self) -> T {
        self.default.clone()
    }

    pub fn value_type(&self) -> ValueType {
        T::TYPE
    }
}

// ============================================================================
// Declared Keys
// ============================================================================

/// Print detailed error reports from the library.
pub const DEBUG: PrefKey<bool> = PrefKey::new("debug", false);
/// Let the library reuse its metadata cache.
pub const USE_CACHING: PrefKey<bool> = PrefKey::new("use_caching", true);
/// Skip the library's result filtering.
pub const DONT_FILTER_RESULTS: PrefKey<bool> = PrefKey::new("dont_filter_results", false);
/// Ask the library's extractor to bypass geographic restrictions.
pub const GEO_BYPASS: PrefKey<bool> = PrefKey::new("geo_bypass", false);
/// Parallel download threads, clamped to [`MIN_THREADS`]..=[`MAX_THREADS`].
pub const THREADS: PrefKey<i32> = PrefKey::new("threads", 1);

/// Replace generated library options with a user template.
pub const CUSTOM_COMMAND: PrefKey<bool> = PrefKey::new("custom_command", false);
/// The template used in custom command mode.
pub const CUSTOM_COMMAND_TEMPLATE: PrefKey<String> =
    PrefKey::new("custom_command_template", String::new());
/// Index into [`crate::library::AudioFormat::all`].
pub const AUDIO_FORMAT: PrefKey<i32> = PrefKey::new("audio_format", 0);
/// Index into [`crate::library::AudioQuality::all`].
pub const AUDIO_QUALITY: PrefKey<i32> = PrefKey::new("audio_quality", 0);

/// Check for updates once at startup.
pub const AUTO_UPDATE: PrefKey<bool> = PrefKey::new("auto_update", true);
/// 0 = stable, 1 = pre-release.
pub const UPDATE_CHANNEL: PrefKey<i32> = PrefKey::new("update_channel", 0);

/// Use the platform palette instead of the stored seed.
pub const DYNAMIC_COLOR: PrefKey<bool> = PrefKey::new("dynamic_color", false);
/// Seed color, ARGB bit pattern stored as a signed int.
pub const THEME_COLOR: PrefKey<i32> =
    PrefKey::new("theme_color", crate::theme::DEFAULT_SEED_COLOR as i32);
/// Index into [`crate::theme::PaletteStyle::all`].
pub const PALETTE_STYLE: PrefKey<i32> = PrefKey::new("palette_style", 0);
/// 1 = follow system, 2 = on, 3 = off.
pub const DARK_THEME_VALUE: PrefKey<i32> = PrefKey::new("dark_theme_value", 1);
pub const HIGH_CONTRAST: PrefKey<bool> = PrefKey::new("high_contrast", false);

/// Locale tag; empty follows the system language.
pub const LANGUAGE: PrefKey<String> = PrefKey::new("language", String::new());

/// Every declared key with its storage type.
pub const ALL_KEYS: &[(&str, ValueType)] = &[
    ("debug", ValueType::Bool),
    ("use_caching", ValueType::Bool),
    ("dont_filter_results", ValueType::Bool),
    ("geo_bypass", ValueType::Bool),
    ("threads", ValueType::Int),
    ("custom_command", ValueType::Bool),
    ("custom_command_template", ValueType::Text),
    ("audio_format", ValueType::Int),
    ("audio_quality", ValueType::Int),
    ("auto_update", ValueType::Bool),
    ("update_channel", ValueType::Int),
    ("dynamic_color", ValueType::Bool),
    ("theme_color", ValueType::Int),
    ("palette_style", ValueType::Int),
    ("dark_theme_value", ValueType::Int),
    ("high_contrast", ValueType::Bool),
    ("language", ValueType::Text),
];

// ============================================================================
// Thread Count
// ============================================================================

pub const MIN_THREADS: i32 = 1;
pub const MAX_THREADS: i32 = 10;
/// Intervals on the thread slider (10 discrete values).
pub const THREAD_SLIDER_STEPS: usize = 9;

/// A thread count that is always within [`MIN_THREADS`]..=[`MAX_THREADS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ThreadCount(i32);

impl ThreadCount {
    pub fn new(raw: i32) -> Self {
        Self(raw.clamp(MIN_THREADS, MAX_THREADS))
    }

    /// Converts a raw slider position, rounding to the nearest step.
    pub fn from_slider(raw: f32) -> Self {
        if raw.is_nan() {
            return Self(MIN_THREADS);
        }
        let clamped = raw.clamp(MIN_THREADS as f32, MAX_THREADS as f32);
        Self::new(clamped.round() as i32)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl Default for ThreadCount {
    fn default() -> Self {
        Self(MIN_THREADS)
    }
}

impl fmt::Display for ThreadCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
