//! Comparing published releases against the running build.

use std::sync::Arc;

use tracing::{debug, info};

use super::release::{ReleaseDescriptor, UpdateChannel};
use super::source::{UpdateError, UpdateSource};
use super::version::Version;

/// Checks an [`UpdateSource`] for releases newer than the running build.
///
/// Cheap to clone; clones share the source.
#[derive(Clone)]
pub struct UpdateChecker {
    source: Arc<dyn UpdateSource>,
    current: Version,
}

impl UpdateChecker {
    pub fn new(source: Arc<dyn UpdateSource>, current: Version) -> Self {
        Self { source, current }
    }

    /// A checker comparing against this build's crate version.
    pub fn for_running_build(source: Arc<dyn UpdateSource>) -> Result<Self, UpdateError> {
        Ok(Self::new(source, Version::parse(crate::VERSION)?))
    }

    pub fn current_version(&self) -> Version {
        self.current
    }

    /// The newest release eligible on `channel`, if it is newer than the
    /// running build. An equal version counts as up to date.
    pub async fn check_for_update(
        &self,
        channel: UpdateChannel,
    ) -> Result<Option<ReleaseDescriptor>, UpdateError> {
        let releases = self.source.fetch_releases().await?;
        debug!(count = releases.len(), channel = %channel, "Evaluating releases");

        let update = select_latest_eligible(releases, channel)
            .filter(|release| release.version > self.current);

        match &update {
            Some(release) => info!(
                current = %self.current,
                available = %release.version,
                "Update available"
            ),
            None => info!(current = %self.current, channel = %channel, "Up to date"),
        }

        Ok(update)
    }
}

/// The highest-versioned release that `channel` accepts.
pub fn select_latest_eligible(
    releases: Vec<ReleaseDescriptor>,
    channel: UpdateChannel,
) -> Option<ReleaseDescriptor> {
    releases
        .into_iter()
        .filter(|release| channel.accepts(release))
        .max_by(|a, b| a.version.cmp(&b.version))
}


#[cfg(test)]
mod tests {
    use super::testing::{CountingSource, FakeSource};
    use super::*;
    use crate::update::release::fixtures::release;
    use proptest::prelude::*;

    fn checker(releases: Vec<ReleaseDescriptor>, current: &str) -> UpdateChecker {
        let source = Arc::new(CountingSource::new(FakeSource::Releases(releases)));
        UpdateChecker::new(source, Version::parse(current).unwrap())
    }

    #[tokio::test]
    async fn test_newer_stable_release_is_offered() {
        let checker = checker(vec![release("v4.0.0", false)], "3.9.0");

        let update = checker.check_for_update(UpdateChannel::Stable).await.unwrap();

        assert_eq!(update.unwrap().version, Version::new(4, 0, 0));
    }

    #[tokio::test]
    async fn test_prerelease_hidden_on_stable_channel() {
        let checker = checker(vec![release("v4.1.0-beta.1", true)], "3.9.0");

        let update = checker.check_for_update(UpdateChannel::Stable).await.unwrap();

        assert!(update.is_none());
    }

    #[tokio::test]
    async fn test_prerelease_offered_on_prerelease_channel() {
        let checker = checker(
            vec![release("v4.0.0", false), release("v4.1.0-beta.1", true)],
            "3.9.0",
        );

        let update = checker
            .check_for_update(UpdateChannel::PreRelease)
            .await
            .unwrap();

        assert_eq!(update.unwrap().tag, "v4.1.0-beta.1");
    }

    #[tokio::test]
    async fn test_stable_channel_skips_newer_prerelease_for_older_stable() {
        let checker = checker(
            vec![release("v4.1.0-beta.1", true), release("v4.0.0", false)],
            "3.9.0",
        );

        let update = checker.check_for_update(UpdateChannel::Stable).await.unwrap();

        assert_eq!(update.unwrap().tag, "v4.0.0");
    }

    #[tokio::test]
    async fn test_equal_version_is_up_to_date() {
        let checker = checker(vec![release("v4.0.0", false)], "4.0.0");
        assert!(checker
            .check_for_update(UpdateChannel::Stable)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_older_release_is_up_to_date() {
        let checker = checker(vec![release("v3.0.0", false)], "3.9.0");
        assert!(checker
            .check_for_update(UpdateChannel::PreRelease)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_source_error_propagates() {
        let source = Arc::new(CountingSource::new(FakeSource::TimesOut));
        let checker = UpdateChecker::new(source, Version::new(1, 0, 0));

        let err = checker
            .check_for_update(UpdateChannel::Stable)
            .await
            .unwrap_err();

        assert!(matches!(err, UpdateError::Timeout(_)));
    }

    #[test]
    fn test_for_running_build() {
        let source = Arc::new(CountingSource::new(FakeSource::Releases(Vec::new())));
        let checker = UpdateChecker::for_running_build(source).unwrap();
        assert_eq!(checker.current_version().to_string(), crate::VERSION);
    }

    fn arb_release() -> impl Strategy<Value = ReleaseDescriptor> {
        (0u32..5, 0u32..5, 0u32..5, prop::option::of(0usize..3), 0u32..4).prop_map(
            |(major, minor, patch, stage, build)| {
                let tag = match stage {
                    None => format!("v{}.{}.{}", major, minor, patch),
                    Some(s) => format!(
                        "v{}.{}.{}-{}.{}",
                        major,
                        minor,
                        patch,
                        ["alpha", "beta", "rc"][s],
                        build
                    ),
                };
                release(&tag, stage.is_some())
            },
        )
    }

    proptest! {
        #[test]
        fn prop_stable_channel_never_yields_prerelease(
            releases in prop::collection::vec(arb_release(), 0..12)
        ) {
            let selected = select_latest_eligible(releases, UpdateChannel::Stable);
            prop_assert!(selected.map_or(true, |r| !r.prerelease));
        }

        #[test]
        fn prop_selection_is_maximal(releases in prop::collection::vec(arb_release(), 1..12)) {
            let selected = select_latest_eligible(releases.clone(), UpdateChannel::PreRelease);
            let best = selected.map(|r| r.version);
            prop_assert_eq!(best, releases.iter().map(|r| r.version).max());
        }
    }
}
