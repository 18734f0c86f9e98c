//! Theming: swatches, tonal palettes, dark mode and platform capabilities.

mod capabilities;
mod palette;
mod selection;

pub use capabilities::{
    language_label, parse_hex_color, Capabilities, LANGUAGE_MIN_PLATFORM_VERSION,
    SUPPORTED_LANGUAGES,
};
pub use palette::{
    argb_channels, PaletteStyle, TonalPalette, TonalRamp, DEFAULT_SEED_COLOR, PRESET_SEEDS,
};
pub use selection::{ActiveIndicator, DarkThemePreference, ThemeSelection};
