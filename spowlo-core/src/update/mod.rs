//! Update checking against published releases.
//!
//! [`UpdateChecker`] fetches releases from an [`UpdateSource`], keeps the ones
//! the user's [`UpdateChannel`] accepts and compares the newest against the
//! running build. Accepted updates are fetched with [`download_asset`].

mod checker;
mod downloader;
mod release;
mod source;
mod version;

pub use checker::{select_latest_eligible, UpdateChecker};
pub use downloader::{asset_destination, download_asset, DownloadProgress};
pub use release::{Platform, ReleaseAsset, ReleaseDescriptor, UpdateChannel};
pub use source::{parse_releases, GithubReleases, UpdateError, UpdateSource};
pub use version::{ParseVersionError, Stage, Version};

#[cfg(test)]
pub(crate) use checker::testing;
#[cfg(test)]
pub(crate) use release::fixtures;
