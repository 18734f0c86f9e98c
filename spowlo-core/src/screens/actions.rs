//! User interactions on settings pages and how they are persisted.
//!
//! Every action is a single synchronous write through [`Preferences`]; a
//! failed write leaves the previous value in place.

use tracing::debug;

use super::items::SettingId;
use crate::library::{AudioFormat, AudioQuality};
use crate::prefs::keys::{AUDIO_FORMAT, AUDIO_QUALITY, CUSTOM_COMMAND_TEMPLATE, LANGUAGE, UPDATE_CHANNEL};
use crate::prefs::{PreferenceError, Preferences, ThreadCount};
use crate::theme::{Capabilities, DarkThemePreference, PaletteStyle, ThemeSelection};
use crate::update::UpdateChannel;

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsAction {
    /// Flip the switch identified by the id.
    Toggle(SettingId),
    /// Raw slider position; clamped and rounded before it is stored.
    SetThreads(f32),
    SetAudioFormat(AudioFormat),
    SetAudioQuality(AudioQuality),
    SetCustomTemplate(String),
    SelectSwatch { seed: u32, style: PaletteStyle },
    SetDynamicColor(bool),
    SetDarkTheme(DarkThemePreference),
    SetLanguage(String),
    SetUpdateChannel(UpdateChannel),
}

/// Persist an action.
pub fn dispatch(
    prefs: &Preferences,
    caps: &Capabilities,
    action: SettingsAction,
) -> Result<(), PreferenceError> {
    debug!(?action, "Settings action");
    match action {
        SettingsAction::Toggle(id) => {
            if let Some(key) = id.toggle_key() {
                prefs.toggle(&key)?;
            }
        }
        SettingsAction::SetThreads(raw) => {
            prefs.set_thread_count(ThreadCount::from_slider(raw))?;
        }
        SettingsAction::SetAudioFormat(format) => {
            prefs.update_value(&AUDIO_FORMAT, format.index())?;
        }
        SettingsAction::SetAudioQuality(quality) => {
            prefs.update_value(&AUDIO_QUALITY, quality.index())?;
        }
        SettingsAction::SetCustomTemplate(template) => {
            prefs.update_value(&CUSTOM_COMMAND_TEMPLATE, template)?;
        }
        SettingsAction::SelectSwatch { seed, style } => {
            ThemeSelection::select_seed(prefs, seed, style)?;
        }
        SettingsAction::SetDynamicColor(enabled) => {
            // No platform palette, nothing to switch to.
            if caps.supports_dynamic_color() || !enabled {
                ThemeSelection::set_dynamic_color(prefs, enabled)?;
            }
        }
        SettingsAction::SetDarkTheme(mode) => {
            ThemeSelection::set_dark_theme(prefs, mode)?;
        }
        SettingsAction::SetLanguage(tag) => {
            if caps.supports_language_selection() {
                prefs.update_value(&LANGUAGE, tag.clone())?;
                caps.apply_locale(&tag);
            }
        }
        SettingsAction::SetUpdateChannel(channel) => {
            prefs.update_value(&UPDATE_CHANNEL, channel.value())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::keys::{DEBUG, DYNAMIC_COLOR, THEME_COLOR, THREADS};
    use crate::theme::PRESET_SEEDS;

    fn desktop() -> Capabilities {
        Capabilities {
            platform_version: 33,
            dynamic_seed: Some(0xFF44_5566),
        }
    }

    #[test]
    fn test_toggle_writes_negation() {
        let prefs = Preferences::in_memory();
        dispatch(&prefs, &desktop(), SettingsAction::Toggle(SettingId::PrintDetails)).unwrap();
        assert!(prefs.get_value(&DEBUG));
    }

    #[test]
    fn test_toggle_on_non_switch_is_noop() {
        let prefs = Preferences::in_memory();
        dispatch(&prefs, &desktop(), SettingsAction::Toggle(SettingId::Threads)).unwrap();
        assert_eq!(prefs.get_value(&THREADS), 1);
    }

    #[test]
    fn test_slider_raw_14_is_clamped() {
        let prefs = Preferences::in_memory();
        dispatch(&prefs, &desktop(), SettingsAction::SetThreads(14.0)).unwrap();
        assert!(prefs.get_value(&THREADS) <= 10);
        assert_eq!(prefs.get_value(&THREADS), 10);
    }

    #[test]
    fn test_swatch_then_dynamic_round_trip() {
        let prefs = Preferences::in_memory();
        let caps = desktop();
        dispatch(
            &prefs,
            &caps,
            SettingsAction::SelectSwatch {
                seed: PRESET_SEEDS[2],
                style: PaletteStyle::FruitSalad,
            },
        )
        .unwrap();
        dispatch(&prefs, &caps, SettingsAction::SetDynamicColor(true)).unwrap();
        dispatch(&prefs, &caps, SettingsAction::SetDynamicColor(false)).unwrap();

        let selection = ThemeSelection::load(&prefs);
        assert!(selection.is_selected(PRESET_SEEDS[2], PaletteStyle::FruitSalad));
        assert_eq!(prefs.get_value(&THEME_COLOR) as u32, PRESET_SEEDS[2]);
    }

    #[test]
    fn test_dynamic_color_needs_platform_palette() {
        let prefs = Preferences::in_memory();
        let caps = Capabilities {
            platform_version: 33,
            dynamic_seed: None,
        };
        dispatch(&prefs, &caps, SettingsAction::SetDynamicColor(true)).unwrap();
        assert!(!prefs.get_value(&DYNAMIC_COLOR));
    }

    #[test]
    fn test_language_ignored_on_old_platform() {
        let prefs = Preferences::in_memory();
        let caps = Capabilities {
            platform_version: 21,
            dynamic_seed: None,
        };
        dispatch(&prefs, &caps, SettingsAction::SetLanguage("de-DE".into())).unwrap();
        assert_eq!(prefs.get_value(&LANGUAGE), "");

        dispatch(&prefs, &desktop(), SettingsAction::SetLanguage("de-DE".into())).unwrap();
        assert_eq!(prefs.get_value(&LANGUAGE), "de-DE");
    }

    #[test]
    fn test_channel_and_formats() {
        let prefs = Preferences::in_memory();
        let caps = desktop();
        dispatch(&prefs, &caps, SettingsAction::SetUpdateChannel(UpdateChannel::PreRelease)).unwrap();
        dispatch(&prefs, &caps, SettingsAction::SetAudioFormat(AudioFormat::M4a)).unwrap();
        dispatch(&prefs, &caps, SettingsAction::SetAudioQuality(AudioQuality::Kbps128)).unwrap();

        assert_eq!(prefs.get_value(&UPDATE_CHANNEL), 1);
        assert_eq!(prefs.get_value(&AUDIO_FORMAT), AudioFormat::M4a.index());
        assert_eq!(prefs.get_value(&AUDIO_QUALITY), AudioQuality::Kbps128.index());
    }
}
