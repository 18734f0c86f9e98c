//! Seed colors, palette styles and tonal palette derivation.

use std::fmt;

// ============================================================================
// Seeds
// ============================================================================

/// The seed used until the user picks a swatch.
pub const DEFAULT_SEED_COLOR: u32 = 0xFFA3_D48D;

/// Swatch seeds offered on the appearance page, in display order.
pub const PRESET_SEEDS: [u32; 8] = [
    DEFAULT_SEED_COLOR,
    0xFF00_00FF, // blue
    0xFFF0_9A5C, // warm orange
    0xFF6E_A07A, // sage
    0xFF00_FFFF, // cyan
    0xFFFF_0000, // red
    0xFFFF_FF00, // yellow
    0xFFFF_00FF, // magenta
];

// ============================================================================
// Palette Style
// ============================================================================

/// How accent tones are spread around the seed hue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaletteStyle {
    #[default]
    TonalSpot,
    Spritz,
    FruitSalad,
    Vibrant,
}

impl PaletteStyle {
    pub fn all() -> &'static [PaletteStyle] {
        &[
            Self::TonalSpot,
            Self::Spritz,
            Self::FruitSalad,
            Self::Vibrant,
        ]
    }

    /// The persisted index of this style.
    pub fn index(self) -> i32 {
        match self {
            Self::TonalSpot => 0,
            Self::Spritz => 1,
            Self::FruitSalad => 2,
            Self::Vibrant => 3,
        }
    }

    /// Resolve a persisted index. Unknown indices fall back to the default.
    pub fn from_index(index: i32) -> Self {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::all().get(i).copied())
            .unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TonalSpot => "Tonal spot",
            Self::Spritz => "Spritz",
            Self::FruitSalad => "Fruit salad",
            Self::Vibrant => "Vibrant",
        }
    }

    /// (hue shift in degrees, saturation factor) for the three accents.
    fn accent_shape(self) -> [(f32, f32); 3] {
        match self {
            Self::TonalSpot => [(0.0, 0.75), (0.0, 0.3), (60.0, 0.5)],
            Self::Spritz => [(0.0, 0.25), (0.0, 0.15), (0.0, 0.2)],
            Self::FruitSalad => [(-50.0, 1.0), (-50.0, 0.6), (0.0, 0.7)],
            Self::Vibrant => [(0.0, 1.0), (15.0, 0.5), (30.0, 0.6)],
        }
    }
}

impl fmt::Display for PaletteStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Tonal Palette
// ============================================================================

/// A hue/saturation pair that can be rendered at any tone (0 = black,
/// 100 = white).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TonalRamp {
    hue: f32,
    saturation: f32,
}

impl TonalRamp {
    /// ARGB color at the given tone.
    pub fn tone(&self, tone: u8) -> u32 {
        let lightness = f32::from(tone.min(100)) / 100.0;
        hsl_to_argb(self.hue, self.saturation, lightness)
    }
}

/// Primary, secondary and tertiary accent ramps derived from a seed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TonalPalette {
    pub primary: TonalRamp,
    pub secondary: TonalRamp,
    pub tertiary: TonalRamp,
}

impl TonalPalette {
    /// Derive the accent ramps for a seed color and style.
    ///
    /// Deterministic: the same inputs always produce the same palette.
    pub fn derive(seed: u32, style: PaletteStyle) -> Self {
        let (hue, saturation, _) = argb_to_hsl(seed);
        let [a1, a2, a3] = style.accent_shape().map(|(shift, factor)| TonalRamp {
            hue: (hue + shift).rem_euclid(360.0),
            saturation: (saturation * factor).clamp(0.0, 1.0),
        });

        Self {
            primary: a1,
            secondary: a2,
            tertiary: a3,
        }
    }

    /// The three swatch colors (primary 80, secondary 90, tertiary 60).
    pub fn swatch(&self) -> [u32; 3] {
        [
            self.primary.tone(80),
            self.secondary.tone(90),
            self.tertiary.tone(60),
        ]
    }
}

/// Split an ARGB color into (r, g, b) bytes.
pub fn argb_channels(argb: u32) -> (u8, u8, u8) {
    (
        ((argb >> 16) & 0xFF) as u8,
        ((argb >> 8) & 0xFF) as u8,
        (argb & 0xFF) as u8,
    )
}

fn argb_to_hsl(argb: u32) -> (f32, f32, f32) {
    let (r, g, b) = argb_channels(argb);
    let r = f32::from(r) / 255.0;
    let g = f32::from(g) / 255.0;
    let b = f32::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (max + min) / 2.0;
    let delta = max - min;

    if delta <= f32::EPSILON {
        return (0.0, 0.0, lightness);
    }

    let saturation = delta / (1.0 - (2.0 * lightness - 1.0).abs());
    let hue = if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    (hue, saturation.clamp(0.0, 1.0), lightness)
}

fn hsl_to_argb(hue: f32, saturation: f32, lightness: f32) -> u32 {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = chroma * (1.0 - ((hue / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = lightness - chroma / 2.0;

    let (r, g, b) = match (hue / 60.0) as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    let to_byte = |v: f32| ((v + m).clamp(0.0, 1.0) * 255.0).round() as u32;
    0xFF00_0000 | (to_byte(r) << 16) | (to_byte(g) << 8) | to_byte(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_index_round_trip_and_fallback() {
        for style in PaletteStyle::all() {
            assert_eq!(PaletteStyle::from_index(style.index()), *style);
        }
        assert_eq!(PaletteStyle::from_index(-1), PaletteStyle::TonalSpot);
        assert_eq!(PaletteStyle::from_index(42), PaletteStyle::TonalSpot);
    }

    #[test]
    fn test_preset_seeds_are_distinct_and_opaque() {
        for (i, seed) in PRESET_SEEDS.iter().enumerate() {
            assert_eq!(seed >> 24, 0xFF);
            assert!(!PRESET_SEEDS[i + 1..].contains(seed));
        }
    }

    #[test]
    fn test_derive_is_deterministic() {
        let a = TonalPalette::derive(0xFF12_34AB, PaletteStyle::Vibrant);
        let b = TonalPalette::derive(0xFF12_34AB, PaletteStyle::Vibrant);
        assert_eq!(a, b);
    }

    #[test]
    fn test_styles_produce_different_swatches() {
        let spot = TonalPalette::derive(0xFF00_00FF, PaletteStyle::TonalSpot).swatch();
        let salad = TonalPalette::derive(0xFF00_00FF, PaletteStyle::FruitSalad).swatch();
        assert_ne!(spot, salad);
    }

    #[test]
    fn test_tone_extremes() {
        let palette = TonalPalette::derive(0xFFFF_0000, PaletteStyle::Vibrant);
        assert_eq!(palette.primary.tone(0), 0xFF00_0000);
        assert_eq!(palette.primary.tone(100), 0xFFFF_FFFF);
        assert_eq!(palette.primary.tone(50), 0xFFFF_0000);
    }

    #[test]
    fn test_gray_seed_has_no_saturation() {
        let palette = TonalPalette::derive(0xFF80_8080, PaletteStyle::TonalSpot);
        let (r, g, b) = argb_channels(palette.primary.tone(40));
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn test_hsl_round_trip_on_primaries() {
        for argb in [0xFFFF_0000u32, 0xFF00_FF00, 0xFF00_00FF, 0xFFFF_FF00] {
            let (h, s, l) = argb_to_hsl(argb);
            assert_eq!(hsl_to_argb(h, s, l), argb);
        }
    }
}
