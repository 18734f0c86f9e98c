//! Appearance page: swatches, dynamic color, dark theme and language.

use super::items::{ItemKind, SettingId, SettingItem};
use crate::prefs::keys::LANGUAGE;
use crate::prefs::Preferences;
use crate::theme::{
    language_label, Capabilities, PaletteStyle, ThemeSelection, TonalPalette, PRESET_SEEDS,
};

/// One selectable (seed, style) swatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swatch {
    pub seed: u32,
    pub style: PaletteStyle,
    /// Primary, secondary and tertiary preview colors (ARGB).
    pub colors: [u32; 3],
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppearanceView {
    /// One row per preset seed, one swatch per palette style.
    pub swatches: Vec<Vec<Swatch>>,
    pub items: Vec<SettingItem>,
}

pub fn appearance_view(prefs: &Preferences, caps: &Capabilities) -> AppearanceView {
    let selection = ThemeSelection::load(prefs);
    // Without a platform palette the dynamic flag has no effect.
    let dynamic_active = selection.dynamic_color && caps.supports_dynamic_color();

    let swatches = PRESET_SEEDS
        .iter()
        .map(|&seed| {
            PaletteStyle::all()
                .iter()
                .map(|&style| Swatch {
                    seed,
                    style,
                    colors: TonalPalette::derive(seed, style).swatch(),
                    selected: !dynamic_active && selection.seed == seed && selection.style == style,
                })
                .collect()
        })
        .collect();

    let mut items = Vec::with_capacity(4);

    if caps.supports_dynamic_color() {
        items.push(
            SettingItem::toggle(
                SettingId::DynamicColor,
                "Dynamic color",
                "🎨",
                selection.dynamic_color,
            )
            .describe("Use the accent color from your desktop"),
        );
    }

    items.push(
        SettingItem::new(
            SettingId::DarkTheme,
            "Dark theme",
            "🌙",
            ItemKind::Choice {
                current: selection.dark_theme.label().to_string(),
            },
        )
        .describe(selection.dark_theme.label()),
    );

    items.push(
        SettingItem::toggle(
            SettingId::HighContrast,
            "High contrast",
            "◐",
            selection.high_contrast,
        )
        .describe("Pure black backgrounds in dark theme"),
    );

    // Hidden rather than disabled on platforms that can't switch language.
    if caps.supports_language_selection() {
        let language = prefs.get_value(&LANGUAGE);
        items.push(
            SettingItem::new(
                SettingId::Language,
                "Language",
                "🌐",
                ItemKind::Choice {
                    current: language_label(&language).to_string(),
                },
            )
            .describe(language_label(&language).to_string()),
        );
    }

    AppearanceView { swatches, items }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::items::find_item;
    use crate::theme::DEFAULT_SEED_COLOR;

    fn caps(platform_version: u32, dynamic_seed: Option<u32>) -> Capabilities {
        Capabilities {
            platform_version,
            dynamic_seed,
        }
    }

    fn selected(view: &AppearanceView) -> Vec<Swatch> {
        view.swatches
            .iter()
            .flatten()
            .filter(|s| s.selected)
            .copied()
            .collect()
    }

    #[test]
    fn test_grid_shape() {
        let prefs = Preferences::in_memory();
        let view = appearance_view(&prefs, &caps(33, None));
        assert_eq!(view.swatches.len(), PRESET_SEEDS.len());
        assert!(view
            .swatches
            .iter()
            .all(|row| row.len() == PaletteStyle::all().len()));
    }

    #[test]
    fn test_default_swatch_selected() {
        let prefs = Preferences::in_memory();
        let view = appearance_view(&prefs, &caps(33, None));

        let chosen = selected(&view);
        assert_eq!(chosen.len(), 1);
        assert_eq!(chosen[0].seed, DEFAULT_SEED_COLOR);
        assert_eq!(chosen[0].style, PaletteStyle::TonalSpot);
    }

    #[test]
    fn test_dynamic_color_clears_swatch_selection() {
        let prefs = Preferences::in_memory();
        ThemeSelection::set_dynamic_color(&prefs, true).unwrap();

        let view = appearance_view(&prefs, &caps(33, Some(0xFF12_3456)));

        assert!(selected(&view).is_empty());
        assert_eq!(
            find_item(&view.items, SettingId::DynamicColor)
                .unwrap()
                .is_checked(),
            Some(true)
        );
    }

    #[test]
    fn test_dynamic_toggle_hidden_without_platform_palette() {
        let prefs = Preferences::in_memory();
        ThemeSelection::set_dynamic_color(&prefs, true).unwrap();

        let view = appearance_view(&prefs, &caps(33, None));

        assert!(find_item(&view.items, SettingId::DynamicColor).is_none());
        assert_eq!(selected(&view).len(), 1);
    }

    #[test]
    fn test_language_hidden_on_old_platform() {
        let prefs = Preferences::in_memory();
        let old = appearance_view(&prefs, &caps(23, None));
        let new = appearance_view(&prefs, &caps(24, None));

        assert!(find_item(&old.items, SettingId::Language).is_none());
        assert!(find_item(&new.items, SettingId::Language).is_some());
    }
}
