//! Release version parsing and ordering.
//!
//! Accepts tags such as `v1.2.3`, `1.2.3-beta.2`, `v1.3.0-rc.1` and
//! `1.0.0-alpha`. Ordering is numeric on major/minor/patch, then by stage
//! (alpha < beta < rc < stable), then by build number.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid version: {0:?}")]
pub struct ParseVersionError(pub String);

/// Pre-release stage. Declaration order is the ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Alpha,
    Beta,
    ReleaseCandidate,
    Stable,
}

impl Stage {
    fn suffix(self) -> Option<&'static str> {
        match self {
            Self::Alpha => Some("alpha"),
            Self::Beta => Some("beta"),
            Self::ReleaseCandidate => Some("rc"),
            Self::Stable => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub stage: Stage,
    /// Pre-release build number; 0 when absent.
    pub build: u32,
}

fn version_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[vV]?(\d+)\.(\d+)\.(\d+)(?:-(alpha|beta|rc)(?:\.?(\d+))?)?$").ok()
    })
    .as_ref()
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            stage: Stage::Stable,
            build: 0,
        }
    }

    pub const fn with_stage(mut self, stage: Stage, build: u32) -> Self {
        self.stage = stage;
        self.build = build;
        self
    }

    pub fn parse(raw: &str) -> Result<Self, ParseVersionError> {
        let invalid = || ParseVersionError(raw.to_string());
        let caps = version_regex()
            .and_then(|re| re.captures(raw.trim()))
            .ok_or_else(invalid)?;

        let number = |i: usize| -> Result<u32, ParseVersionError> {
            caps.get(i)
                .map_or(Ok(0), |m| m.as_str().parse().map_err(|_| invalid()))
        };

        let stage = match caps.get(4).map(|m| m.as_str()) {
            Some("alpha") => Stage::Alpha,
            Some("beta") => Stage::Beta,
            Some("rc") => Stage::ReleaseCandidate,
            _ => Stage::Stable,
        };

        Ok(Self {
            major: number(1)?,
            minor: number(2)?,
            patch: number(3)?,
            stage,
            build: number(5)?,
        })
    }

    pub fn is_prerelease(&self) -> bool {
        self.stage != Stage::Stable
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch, self.stage, self.build).cmp(&(
            other.major,
            other.minor,
            other.patch,
            other.stage,
            other.build,
        ))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(suffix) = self.stage.suffix() {
            write!(f, "-{}", suffix)?;
            if self.build > 0 {
                write!(f, ".{}", self.build)?;
            }
        }
        Ok(())
    }
}
