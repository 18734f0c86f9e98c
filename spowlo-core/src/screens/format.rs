//! Format settings page.

use super::items::{ItemKind, SettingId, SettingItem};
use crate::library::{AudioFormat, AudioQuality};
use crate::prefs::keys::{AUDIO_FORMAT, AUDIO_QUALITY, CUSTOM_COMMAND};
use crate::prefs::Preferences;

pub const CUSTOM_COMMAND_HINT: &str =
    "Custom command mode is on. Format options are ignored while it is enabled.";

/// Rows of the format page. Format choices are disabled in custom command
/// mode, and a hint row explains why.
pub fn format_items(prefs: &Preferences) -> Vec<SettingItem> {
    let custom_command = prefs.get_value(&CUSTOM_COMMAND);
    let format = AudioFormat::from_index(prefs.get_value(&AUDIO_FORMAT));
    let quality = AudioQuality::from_index(prefs.get_value(&AUDIO_QUALITY));

    let mut items = Vec::with_capacity(4);
    if custom_command {
        items.push(
            SettingItem::new(SettingId::CustomCommandHint, "Custom command", "ℹ", ItemKind::Info)
                .describe(CUSTOM_COMMAND_HINT),
        );
    }

    items.push(
        SettingItem::new(
            SettingId::AudioFormat,
            "Audio format",
            "🎵",
            ItemKind::Choice {
                current: format.to_string(),
            },
        )
        .describe(format!("Convert downloads to {}", format))
        .enabled(!custom_command),
    );
    items.push(
        SettingItem::new(
            SettingId::AudioQuality,
            "Audio quality",
            "⭐",
            ItemKind::Choice {
                current: quality.to_string(),
            },
        )
        .describe(if format.is_lossless() {
            "Ignored for lossless formats".to_string()
        } else {
            format!("Bitrate: {}", quality)
        })
        .enabled(!custom_command),
    );
    items.push(
        SettingItem::toggle(
            SettingId::CustomCommand,
            "Use custom command",
            "⌨",
            custom_command,
        )
        .describe("Pass your own options to spotDL instead of the ones above"),
    );

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::items::find_item;

    #[test]
    fn test_format_items_enabled_by_default() {
        let prefs = Preferences::in_memory();
        let items = format_items(&prefs);

        assert!(find_item(&items, SettingId::CustomCommandHint).is_none());
        assert!(find_item(&items, SettingId::AudioFormat).unwrap().enabled);
        assert!(find_item(&items, SettingId::AudioQuality).unwrap().enabled);
    }

    #[test]
    fn test_custom_command_disables_format_choices() {
        let prefs = Preferences::in_memory();
        prefs.update_value(&CUSTOM_COMMAND, true).unwrap();

        let items = format_items(&prefs);

        assert_eq!(items[0].id, SettingId::CustomCommandHint);
        assert!(!find_item(&items, SettingId::AudioFormat).unwrap().enabled);
        assert!(!find_item(&items, SettingId::AudioQuality).unwrap().enabled);
        assert!(find_item(&items, SettingId::CustomCommand).unwrap().enabled);
    }

    #[test]
    fn test_current_choices_shown() {
        let prefs = Preferences::in_memory();
        prefs.update_value(&AUDIO_FORMAT, AudioFormat::Opus.index()).unwrap();
        prefs.update_value(&AUDIO_QUALITY, AudioQuality::Kbps192.index()).unwrap();

        let items = format_items(&prefs);

        assert_eq!(
            find_item(&items, SettingId::AudioFormat).unwrap().kind,
            ItemKind::Choice { current: "OPUS".into() }
        );
        assert_eq!(
            find_item(&items, SettingId::AudioQuality).unwrap().kind,
            ItemKind::Choice { current: "192kbps".into() }
        );
    }
}
