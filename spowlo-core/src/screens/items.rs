//! Renderer-agnostic descriptions of settings controls.

use crate::prefs::keys::{
    AUTO_UPDATE, CUSTOM_COMMAND, DEBUG, DONT_FILTER_RESULTS, GEO_BYPASS, HIGH_CONTRAST,
    USE_CACHING,
};
use crate::prefs::PrefKey;

/// Identifies a control across renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingId {
    LibraryVersion,
    PrintDetails,
    UseCache,
    GeoBypass,
    DontFilterResults,
    Threads,
    AudioFormat,
    AudioQuality,
    CustomCommand,
    CustomCommandHint,
    DynamicColor,
    DarkTheme,
    HighContrast,
    Language,
    AutoUpdate,
    ChannelStable,
    ChannelPreRelease,
    CheckForUpdates,
}

impl SettingId {
    /// The boolean preference behind a switch, if this is one.
    pub fn toggle_key(self) -> Option<PrefKey<bool>> {
        match self {
            Self::PrintDetails => Some(DEBUG),
            Self::UseCache => Some(USE_CACHING),
            Self::GeoBypass => Some(GEO_BYPASS),
            Self::DontFilterResults => Some(DONT_FILTER_RESULTS),
            Self::CustomCommand => Some(CUSTOM_COMMAND),
            Self::HighContrast => Some(HIGH_CONTRAST),
            Self::AutoUpdate => Some(AUTO_UPDATE),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    /// Read-only text row.
    Info,
    Toggle { checked: bool },
    /// Discrete slider; `steps` is the number of intervals.
    Slider {
        value: f32,
        min: f32,
        max: f32,
        steps: usize,
    },
    /// Opens a dialog listing choices; shows the current one.
    Choice { current: String },
    /// One option of an inline single-choice group.
    Radio { selected: bool },
    /// A button; `busy` shows a progress indicator in place of the icon.
    Button { busy: bool },
}

/// One row on a settings page.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingItem {
    pub id: SettingId,
    pub label: &'static str,
    pub description: Option<String>,
    /// Glyph drawn beside the label.
    pub icon: &'static str,
    pub enabled: bool,
    pub kind: ItemKind,
}

impl SettingItem {
    pub fn new(id: SettingId, label: &'static str, icon: &'static str, kind: ItemKind) -> Self {
        Self {
            id,
            label,
            description: None,
            icon,
            enabled: true,
            kind,
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn toggle(
        id: SettingId,
        label: &'static str,
        icon: &'static str,
        checked: bool,
    ) -> Self {
        Self::new(id, label, icon, ItemKind::Toggle { checked })
    }

    pub fn is_checked(&self) -> Option<bool> {
        match self.kind {
            ItemKind::Toggle { checked } => Some(checked),
            _ => None,
        }
    }
}

/// Finds an item by id.
pub fn find_item(items: &[SettingItem], id: SettingId) -> Option<&SettingItem> {
    items.iter().find(|item| item.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_keys() {
        assert_eq!(SettingId::PrintDetails.toggle_key().unwrap().name(), "debug");
        assert_eq!(SettingId::AutoUpdate.toggle_key().unwrap().name(), "auto_update");
        assert!(SettingId::Threads.toggle_key().is_none());
    }

    #[test]
    fn test_builder() {
        let item = SettingItem::toggle(SettingId::UseCache, "Use cache", "⟳", true)
            .describe("Reuse metadata")
            .enabled(false);
        assert_eq!(item.is_checked(), Some(true));
        assert_eq!(item.description.as_deref(), Some("Reuse metadata"));
        assert!(!item.enabled);
    }
}
