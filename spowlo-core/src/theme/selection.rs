//! Persisted theme selection: seed swatch, dynamic color and dark mode.

use tracing::info;

use super::palette::{PaletteStyle, TonalPalette};
use crate::prefs::keys::{DARK_THEME_VALUE, DYNAMIC_COLOR, HIGH_CONTRAST, PALETTE_STYLE, THEME_COLOR};
use crate::prefs::{PreferenceError, Preferences};

// ============================================================================
// Dark Theme
// ============================================================================

/// When the dark color scheme is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DarkThemePreference {
    #[default]
    FollowSystem,
    On,
    Off,
}

impl DarkThemePreference {
    pub fn all() -> &'static [DarkThemePreference] {
        &[Self::FollowSystem, Self::On, Self::Off]
    }

    pub fn value(self) -> i32 {
        match self {
            Self::FollowSystem => 1,
            Self::On => 2,
            Self::Off => 3,
        }
    }

    pub fn from_value(value: i32) -> Self {
        match value {
            2 => Self::On,
            3 => Self::Off,
            _ => Self::FollowSystem,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::FollowSystem => "Follow system",
            Self::On => "On",
            Self::Off => "Off",
        }
    }

    /// Resolve against the system's current preference.
    pub fn is_dark(self, system_dark: bool) -> bool {
        match self {
            Self::FollowSystem => system_dark,
            Self::On => true,
            Self::Off => false,
        }
    }
}

// ============================================================================
// Selection
// ============================================================================

/// The selected-indicator state of the appearance page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveIndicator {
    /// The platform palette is in effect.
    Dynamic,
    /// A swatch is in effect.
    Swatch { seed: u32, style: PaletteStyle },
}

/// Snapshot of the persisted theme preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeSelection {
    pub seed: u32,
    pub style: PaletteStyle,
    pub dynamic_color: bool,
    pub dark_theme: DarkThemePreference,
    pub high_contrast: bool,
}

impl ThemeSelection {
    pub fn load(prefs: &Preferences) -> Self {
        Self {
            seed: prefs.get_value(&THEME_COLOR) as u32,
            style: PaletteStyle::from_index(prefs.get_value(&PALETTE_STYLE)),
            dynamic_color: prefs.get_value(&DYNAMIC_COLOR),
            dark_theme: DarkThemePreference::from_value(prefs.get_value(&DARK_THEME_VALUE)),
            high_contrast: prefs.get_value(&HIGH_CONTRAST),
        }
    }

    /// Choose a swatch. Turns dynamic color off and stores the pair.
    pub fn select_seed(
        prefs: &Preferences,
        seed: u32,
        style: PaletteStyle,
    ) -> Result<Self, PreferenceError> {
        prefs.update_value(&DYNAMIC_COLOR, false)?;
        prefs.update_value(&THEME_COLOR, seed as i32)?;
        prefs.update_value(&PALETTE_STYLE, style.index())?;
        info!(seed = %format!("{:#010X}", seed), style = %style, "Theme seed selected");
        Ok(Self::load(prefs))
    }

    /// Switch dynamic color. The stored seed and style stay untouched.
    pub fn set_dynamic_color(prefs: &Preferences, enabled: bool) -> Result<Self, PreferenceError> {
        prefs.update_value(&DYNAMIC_COLOR, enabled)?;
        Ok(Self::load(prefs))
    }

    pub fn set_dark_theme(
        prefs: &Preferences,
        mode: DarkThemePreference,
    ) -> Result<Self, PreferenceError> {
        prefs.update_value(&DARK_THEME_VALUE, mode.value())?;
        Ok(Self::load(prefs))
    }

    /// Whether the swatch for `(seed, style)` renders as selected.
    pub fn is_selected(&self, seed: u32, style: PaletteStyle) -> bool {
        !self.dynamic_color && self.seed == seed && self.style == style
    }

    /// Exactly one indicator is active at any time.
    ///
    /// Dynamic color only wins when the platform actually supplies a seed.
    pub fn active_indicator(&self, dynamic_available: bool) -> ActiveIndicator {
        if self.dynamic_color && dynamic_available {
            ActiveIndicator::Dynamic
        } else {
            ActiveIndicator::Swatch {
                seed: self.seed,
                style: self.style,
            }
        }
    }

    /// The palette in effect, given the platform's dynamic seed if any.
    pub fn effective_palette(&self, dynamic_seed: Option<u32>) -> TonalPalette {
        match dynamic_seed {
            Some(seed) if self.dynamic_color => TonalPalette::derive(seed, PaletteStyle::TonalSpot),
            _ => TonalPalette::derive(self.seed, self.style),
        }
    }
}
