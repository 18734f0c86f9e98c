//! Release metadata: channels, descriptors, assets and platform matching.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::version::Version;

// ============================================================================
// Update Channel
// ============================================================================

/// Which releases the user wants to be offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UpdateChannel {
    #[default]
    Stable,
    PreRelease,
}

impl UpdateChannel {
    pub fn all() -> &'static [UpdateChannel] {
        &[Self::Stable, Self::PreRelease]
    }

    /// The persisted preference value.
    pub fn value(self) -> i32 {
        match self {
            Self::Stable => 0,
            Self::PreRelease => 1,
        }
    }

    /// Unknown values are treated as stable.
    pub fn from_value(value: i32) -> Self {
        match value {
            1 => Self::PreRelease,
            _ => Self::Stable,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Stable => "Stable",
            Self::PreRelease => "Pre-release",
        }
    }

    /// Stable releases are always eligible; pre-releases only on the
    /// pre-release channel.
    pub fn accepts(self, release: &ReleaseDescriptor) -> bool {
        !release.prerelease || self == Self::PreRelease
    }
}

impl fmt::Display for UpdateChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Platform Detection
// ============================================================================

/// Represents a supported platform (OS + architecture).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    LinuxX64,
    LinuxArm64,
    MacosX64,
    MacosArm64,
    WindowsX64,
}

impl Platform {
    /// Detects the current platform at runtime.
    ///
    /// Returns `None` if the platform is unsupported.
    pub fn detect() -> Option<Self> {
        #[cfg(all(target_os = "linux", target_arch = "x86_64"))]
        {
            Some(Platform::LinuxX64)
        }
        #[cfg(all(target_os = "linux", target_arch = "aarch64"))]
        {
            Some(Platform::LinuxArm64)
        }
        #[cfg(all(target_os = "macos", target_arch = "x86_64"))]
        {
            Some(Platform::MacosX64)
        }
        #[cfg(all(target_os = "macos", target_arch = "aarch64"))]
        {
            Some(Platform::MacosArm64)
        }
        #[cfg(all(target_os = "windows", target_arch = "x86_64"))]
        {
            Some(Platform::WindowsX64)
        }
        #[cfg(not(any(
            all(target_os = "linux", target_arch = "x86_64"),
            all(target_os = "linux", target_arch = "aarch64"),
            all(target_os = "macos", target_arch = "x86_64"),
            all(target_os = "macos", target_arch = "aarch64"),
            all(target_os = "windows", target_arch = "x86_64"),
        )))]
        {
            None
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::LinuxX64 => "Linux (x86_64)",
            Self::LinuxArm64 => "Linux (ARM64)",
            Self::MacosX64 => "macOS (Intel)",
            Self::MacosArm64 => "macOS (Apple Silicon)",
            Self::WindowsX64 => "Windows (x86_64)",
        }
    }

    /// Lowercase fragments an asset name must contain: one OS alias and one
    /// architecture alias.
    fn asset_markers(&self) -> (&'static [&'static str], &'static [&'static str]) {
        const X64: &[&str] = &["x86_64", "amd64", "x64"];
        const ARM64: &[&str] = &["aarch64", "arm64"];
        match self {
            Self::LinuxX64 => (&["linux"], X64),
            Self::LinuxArm64 => (&["linux"], ARM64),
            Self::MacosX64 => (&["macos", "darwin", "apple"], X64),
            Self::MacosArm64 => (&["macos", "darwin", "apple"], ARM64),
            Self::WindowsX64 => (&["windows", "win64", ".exe", ".msi"], X64),
        }
    }

    fn matches_asset(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        let (os, arch) = self.asset_markers();
        os.iter().any(|m| lower.contains(m)) && arch.iter().any(|m| lower.contains(m))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Release Descriptor
// ============================================================================

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAsset {
    pub name: String,
    pub download_url: String,
    pub size: u64,
    pub content_type: Option<String>,
    /// Lowercase hex SHA-256, when the source publishes one.
    pub sha256: Option<String>,
}

/// Metadata about a published release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDescriptor {
    pub version: Version,
    pub tag: String,
    pub name: String,
    /// Release notes (markdown).
    pub body: String,
    pub prerelease: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub page_url: String,
    pub assets: Vec<ReleaseAsset>,
}

impl ReleaseDescriptor {
    pub fn channel(&self) -> UpdateChannel {
        if self.prerelease {
            UpdateChannel::PreRelease
        } else {
            UpdateChannel::Stable
        }
    }

    /// The asset built for `platform`, if the release ships one.
    pub fn asset_for(&self, platform: Platform) -> Option<&ReleaseAsset> {
        self.assets.iter().find(|a| platform.matches_asset(&a.name))
    }

    /// Title shown in the update dialog.
    pub fn display_title(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.tag
        } else {
            &self.name
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{asset, release};
    use super::*;

    #[test]
    fn test_channel_values() {
        for channel in UpdateChannel::all() {
            assert_eq!(UpdateChannel::from_value(channel.value()), *channel);
        }
        assert_eq!(UpdateChannel::from_value(7), UpdateChannel::Stable);
    }

    #[test]
    fn test_channel_eligibility() {
        let stable = release("v4.0.0", false);
        let beta = release("v4.1.0-beta.1", true);

        assert!(UpdateChannel::Stable.accepts(&stable));
        assert!(!UpdateChannel::Stable.accepts(&beta));
        assert!(UpdateChannel::PreRelease.accepts(&stable));
        assert!(UpdateChannel::PreRelease.accepts(&beta));
        assert_eq!(beta.channel(), UpdateChannel::PreRelease);
    }

    #[test]
    fn test_asset_for_platform() {
        let mut rel = release("v4.0.0", false);
        rel.assets = vec![
            asset("spowlo-4.0.0-linux-x86_64.tar.gz"),
            asset("spowlo-4.0.0-linux-aarch64.tar.gz"),
            asset("spowlo-4.0.0-darwin-arm64.zip"),
            asset("Spowlo-4.0.0-x64.msi"),
        ];

        assert_eq!(
            rel.asset_for(Platform::LinuxArm64).unwrap().name,
            "spowlo-4.0.0-linux-aarch64.tar.gz"
        );
        assert_eq!(
            rel.asset_for(Platform::MacosArm64).unwrap().name,
            "spowlo-4.0.0-darwin-arm64.zip"
        );
        assert_eq!(
            rel.asset_for(Platform::WindowsX64).unwrap().name,
            "Spowlo-4.0.0-x64.msi"
        );
        assert!(rel.asset_for(Platform::MacosX64).is_none());
    }

    #[test]
    fn test_display_title_falls_back_to_tag() {
        let mut rel = release("v4.0.0", false);
        rel.name = "  ".to_string();
        assert_eq!(rel.display_title(), "v4.0.0");
    }

    #[test]
    fn test_platform_detect_does_not_panic() {
        let _ = Platform::detect();
    }
}
