//! General settings page: library version and library behaviour.

use std::sync::Arc;

use tracing::warn;

use super::items::{ItemKind, SettingId, SettingItem};
use crate::library::{library_version, DownloadLibrary, LibraryError};
use crate::prefs::keys::{
    DEBUG, DONT_FILTER_RESULTS, GEO_BYPASS, MAX_THREADS, MIN_THREADS, THREAD_SLIDER_STEPS,
    USE_CACHING,
};
use crate::prefs::Preferences;
use crate::tasks::{ScreenScope, ScreenTask, TaskPoll};

/// What is known about the installed library's version.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LibraryVersionState {
    #[default]
    Loading,
    Known(String),
    Failed(String),
}

impl LibraryVersionState {
    pub fn description(&self) -> &str {
        match self {
            Self::Loading => "Loading…",
            Self::Known(version) => version,
            Self::Failed(message) => message,
        }
    }
}

/// Queries the library version once per visit to the page.
#[derive(Debug, Default)]
pub struct LibraryVersionQuery {
    state: LibraryVersionState,
    task: Option<ScreenTask<Result<String, LibraryError>>>,
}

impl LibraryVersionQuery {
    pub fn state(&self) -> &LibraryVersionState {
        &self.state
    }

    /// Start a query unless one is already running.
    pub fn start(&mut self, scope: &ScreenScope, library: Arc<dyn DownloadLibrary>) {
        if self.task.is_some() {
            return;
        }
        self.state = LibraryVersionState::Loading;
        self.task = Some(scope.spawn("library-version", async move {
            library_version(library.as_ref()).await
        }));
    }

    /// Apply a finished query. Returns true when the state changed.
    pub fn poll(&mut self) -> bool {
        let Some(task) = self.task.as_mut() else {
            return false;
        };
        let next = match task.poll() {
            TaskPoll::Pending => return false,
            TaskPoll::Ready(Ok(version)) => LibraryVersionState::Known(version),
            TaskPoll::Ready(Err(e)) => {
                warn!(error = %e, "Failed to query library version");
                LibraryVersionState::Failed(e.to_string())
            }
            TaskPoll::Lost => LibraryVersionState::Failed("Version query was cancelled".into()),
        };
        self.task = None;
        self.state = next;
        true
    }
}

/// Rows of the general page, in display order.
pub fn general_items(prefs: &Preferences, version: &LibraryVersionState) -> Vec<SettingItem> {
    let print_details = prefs.get_value(&DEBUG);
    let threads = prefs.thread_count();

    vec![
        SettingItem::new(SettingId::LibraryVersion, "spotDL version", "ℹ", ItemKind::Info)
            .describe(version.description()),
        SettingItem::toggle(
            SettingId::PrintDetails,
            "Print details",
            if print_details { "🖨" } else { "🚫" },
            print_details,
        )
        .describe("Show detailed error reports when a download fails"),
        SettingItem::toggle(
            SettingId::UseCache,
            "Use cache",
            "⟳",
            prefs.get_value(&USE_CACHING),
        )
        .describe("Reuse cached metadata to speed up repeated downloads"),
        SettingItem::toggle(
            SettingId::GeoBypass,
            "Geo bypass",
            "📍",
            prefs.get_value(&GEO_BYPASS),
        )
        .describe("Try to get around region restrictions"),
        SettingItem::toggle(
            SettingId::DontFilterResults,
            "Don't filter results",
            "⛃",
            prefs.get_value(&DONT_FILTER_RESULTS),
        )
        .describe("Accept every search result instead of the best match only"),
        SettingItem::new(
            SettingId::Threads,
            "Threads",
            "⚙",
            ItemKind::Slider {
                value: threads.get() as f32,
                min: MIN_THREADS as f32,
                max: MAX_THREADS as f32,
                steps: THREAD_SLIDER_STEPS,
            },
        )
        .describe(format!("Number of threads: {}", threads)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{SpotDlRequest, SpotDlResponse};
    use crate::prefs::keys::THREADS;
    use crate::screens::items::find_item;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::runtime::Handle;

    struct FixedLibrary(Result<&'static str, ()>);

    #[async_trait]
    impl DownloadLibrary for FixedLibrary {
        async fn execute(&self, request: &SpotDlRequest) -> Result<SpotDlResponse, LibraryError> {
            assert_eq!(request.build_args(), vec!["-v"]);
            match self.0 {
                Ok(output) => Ok(SpotDlResponse {
                    output: output.to_string(),
                    error_output: String::new(),
                    exit_code: 0,
                    elapsed: Duration::from_millis(1),
                }),
                Err(()) => Err(LibraryError::Timeout(Duration::from_secs(1))),
            }
        }
    }

    async fn settle(query: &mut LibraryVersionQuery) {
        for _ in 0..200 {
            if query.poll() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("query never finished");
    }

    #[tokio::test]
    async fn test_version_query_success() {
        let scope = ScreenScope::new("general", Handle::current());
        let mut query = LibraryVersionQuery::default();
        assert_eq!(query.state().description(), "Loading…");

        query.start(&scope, Arc::new(FixedLibrary(Ok("4.2.5"))));
        settle(&mut query).await;

        assert_eq!(query.state(), &LibraryVersionState::Known("4.2.5".into()));
    }

    #[tokio::test]
    async fn test_version_query_failure_shows_message() {
        let scope = ScreenScope::new("general", Handle::current());
        let mut query = LibraryVersionQuery::default();

        query.start(&scope, Arc::new(FixedLibrary(Err(()))));
        settle(&mut query).await;

        assert!(matches!(query.state(), LibraryVersionState::Failed(m) if m.contains("timed out")));
    }

    #[test]
    fn test_items_reflect_preferences() {
        let prefs = Preferences::in_memory();
        prefs.update_value(&GEO_BYPASS, true).unwrap();
        prefs.update_value(&THREADS, 14).unwrap();

        let items = general_items(&prefs, &LibraryVersionState::Loading);

        assert_eq!(
            find_item(&items, SettingId::GeoBypass).unwrap().is_checked(),
            Some(true)
        );
        assert_eq!(
            find_item(&items, SettingId::UseCache).unwrap().is_checked(),
            Some(true)
        );
        match &find_item(&items, SettingId::Threads).unwrap().kind {
            ItemKind::Slider { value, max, steps, .. } => {
                assert_eq!(*value, 10.0);
                assert_eq!(*max, 10.0);
                assert_eq!(*steps, 9);
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }
}
