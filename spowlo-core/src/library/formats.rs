//! Output format and bitrate choices offered to the user.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AudioFormat {
    #[default]
    Mp3,
    Flac,
    Ogg,
    Opus,
    M4a,
}

impl AudioFormat {
    pub fn all() -> &'static [AudioFormat] {
        &[Self::Mp3, Self::Flac, Self::Ogg, Self::Opus, Self::M4a]
    }

    /// The value passed to `--format`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Flac => "flac",
            Self::Ogg => "ogg",
            Self::Opus => "opus",
            Self::M4a => "m4a",
        }
    }

    pub fn index(self) -> i32 {
        Self::all()
            .iter()
            .position(|f| *f == self)
            .map_or(0, |i| i as i32)
    }

    /// Unknown indices fall back to mp3.
    pub fn from_index(index: i32) -> Self {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::all().get(i).copied())
            .unwrap_or_default()
    }

    /// Lossless formats ignore the bitrate setting.
    pub fn is_lossless(self) -> bool {
        matches!(self, Self::Flac)
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AudioQuality {
    /// Let the library match the source bitrate.
    #[default]
    Auto,
    Kbps128,
    Kbps192,
    Kbps256,
    Kbps320,
}

impl AudioQuality {
    pub fn all() -> &'static [AudioQuality] {
        &[
            Self::Auto,
            Self::Kbps128,
            Self::Kbps192,
            Self::Kbps256,
            Self::Kbps320,
        ]
    }

    /// The value passed to `--bitrate`, or `None` for auto.
    pub fn bitrate(self) -> Option<&'static str> {
        match self {
            Self::Auto => None,
            Self::Kbps128 => Some("128k"),
            Self::Kbps192 => Some("192k"),
            Self::Kbps256 => Some("256k"),
            Self::Kbps320 => Some("320k"),
        }
    }

    pub fn index(self) -> i32 {
        Self::all()
            .iter()
            .position(|q| *q == self)
            .map_or(0, |i| i as i32)
    }

    pub fn from_index(index: i32) -> Self {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::all().get(i).copied())
            .unwrap_or_default()
    }
}

impl fmt::Display for AudioQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bitrate() {
            Some(rate) => write!(f, "{}bps", rate),
            None => write!(f, "Auto"),
        }
    }
}
