//! Settings pages as plain view models.
//!
//! Each page is a function from current preference state to a list of
//! [`SettingItem`]s; interactions come back as [`SettingsAction`]s. Nothing
//! here depends on the GUI toolkit.

mod actions;
mod appearance;
mod format;
mod general;
mod items;
mod notification;
mod updater;

pub use actions::{dispatch, SettingsAction};
pub use appearance::{appearance_view, AppearanceView, Swatch};
pub use format::{format_items, CUSTOM_COMMAND_HINT};
pub use general::{general_items, LibraryVersionQuery, LibraryVersionState};
pub use items::{find_item, ItemKind, SettingId, SettingItem};
pub use notification::{Notification, NotificationLevel};
pub use updater::{
    updater_items, UpdateInstaller, UpdaterController, UPDATE_FAILED_MESSAGE, UP_TO_DATE_MESSAGE,
};

/// A page in the settings hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsPage {
    General,
    Format,
    Appearance,
    Updater,
}

impl SettingsPage {
    pub fn all() -> &'static [SettingsPage] {
        &[Self::General, Self::Format, Self::Appearance, Self::Updater]
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Format => "Format",
            Self::Appearance => "Appearance",
            Self::Updater => "Updates",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::General => "spotDL version, cache, threads",
            Self::Format => "Audio format and quality",
            Self::Appearance => "Theme color, dark theme, language",
            Self::Updater => "Auto update and update channel",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::General => "⚙",
            Self::Format => "🎵",
            Self::Appearance => "🎨",
            Self::Updater => "🔄",
        }
    }
}
