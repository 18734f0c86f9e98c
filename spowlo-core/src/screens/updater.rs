//! Updater page: channel selection, update checks and update downloads.

use std::path::{Path, PathBuf};

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::items::{ItemKind, SettingId, SettingItem};
use super::notification::Notification;
use crate::prefs::keys::{AUTO_UPDATE, UPDATE_CHANNEL};
use crate::prefs::Preferences;
use crate::tasks::{ScreenScope, ScreenTask, TaskPoll};
use crate::update::{
    download_asset, DownloadProgress, Platform, ReleaseDescriptor, UpdateChannel, UpdateChecker,
    UpdateError,
};

pub const UP_TO_DATE_MESSAGE: &str = "Spowlo is up to date";
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to check for updates";

/// Rows of the updater page.
pub fn updater_items(prefs: &Preferences, checking: bool) -> Vec<SettingItem> {
    let channel = UpdateChannel::from_value(prefs.get_value(&UPDATE_CHANNEL));

    vec![
        SettingItem::toggle(
            SettingId::AutoUpdate,
            "Enable auto update",
            "🔄",
            prefs.get_value(&AUTO_UPDATE),
        )
        .describe("Check for a new version every time Spowlo starts"),
        SettingItem::new(
            SettingId::ChannelStable,
            "Stable",
            "",
            ItemKind::Radio {
                selected: channel == UpdateChannel::Stable,
            },
        ),
        SettingItem::new(
            SettingId::ChannelPreRelease,
            "Pre-release",
            "",
            ItemKind::Radio {
                selected: channel == UpdateChannel::PreRelease,
            },
        )
        .describe("Pre-releases get new features first but may be unstable"),
        SettingItem::new(
            SettingId::CheckForUpdates,
            "Check for updates",
            "⬆",
            ItemKind::Button { busy: checking },
        ),
    ]
}

// ============================================================================
// Update Check
// ============================================================================

type CheckResult = Result<Option<ReleaseDescriptor>, UpdateError>;

/// Drives the "check for updates" button and the update dialog.
pub struct UpdaterController {
    checker: UpdateChecker,
    task: Option<ScreenTask<CheckResult>>,
    silent: bool,
    latest_release: Option<ReleaseDescriptor>,
    show_update_dialog: bool,
}

impl UpdaterController {
    pub fn new(checker: UpdateChecker) -> Self {
        Self {
            checker,
            task: None,
            silent: false,
            latest_release: None,
            show_update_dialog: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.task.is_some()
    }

    pub fn show_update_dialog(&self) -> bool {
        self.show_update_dialog
    }

    pub fn latest_release(&self) -> Option<&ReleaseDescriptor> {
        self.latest_release.as_ref()
    }

    /// Start a check on `channel`. Ignored (returns false) while one is in
    /// flight, but a running silent check then reports its result.
    pub fn start_check(&mut self, scope: &ScreenScope, channel: UpdateChannel) -> bool {
        self.start(scope, channel, false)
    }

    /// A check that only reports an available update; failures and
    /// "up to date" are logged.
    pub fn start_silent_check(&mut self, scope: &ScreenScope, channel: UpdateChannel) -> bool {
        self.start(scope, channel, true)
    }

    fn start(&mut self, scope: &ScreenScope, channel: UpdateChannel, silent: bool) -> bool {
        if self.is_loading() {
            if !silent && self.silent {
                debug!("Manual check joins the running silent check");
                self.silent = false;
            }
            return false;
        }
        let checker = self.checker.clone();
        self.silent = silent;
        self.task = Some(scope.spawn("update-check", async move {
            checker.check_for_update(channel).await
        }));
        info!(channel = %channel, silent, "Checking for updates");
        true
    }

    /// Apply a finished check, returning what to tell the user.
    pub fn poll(&mut self) -> Option<Notification> {
        let task = self.task.as_mut()?;
        let result = match task.poll() {
            TaskPoll::Pending => return None,
            TaskPoll::Ready(result) => result,
            TaskPoll::Lost => {
                self.task = None;
                warn!("Update check ended without a result");
                return None;
            }
        };
        self.task = None;

        match result {
            Ok(Some(release)) => {
                self.latest_release = Some(release);
                self.show_update_dialog = true;
                None
            }
            Ok(None) if self.silent => None,
            Ok(None) => Some(Notification::info(UP_TO_DATE_MESSAGE)),
            Err(e) => {
                error!(error = %e, "Update check failed");
                (!self.silent).then(|| Notification::error(format!("{}: {}", UPDATE_FAILED_MESSAGE, e)))
            }
        }
    }

    /// Close the dialog and forget the release.
    pub fn dismiss_dialog(&mut self) {
        self.show_update_dialog = false;
        self.latest_release = None;
    }

    /// Close the dialog, handing back the release to install.
    pub fn accept_update(&mut self) -> Option<ReleaseDescriptor> {
        self.show_update_dialog = false;
        self.latest_release.take()
    }
}

// ============================================================================
// Update Download
// ============================================================================

/// Downloads the accepted release's asset in the background.
#[derive(Debug)]
pub struct UpdateInstaller {
    task: ScreenTask<anyhow::Result<PathBuf>>,
    progress: watch::Receiver<Option<DownloadProgress>>,
    version: String,
}

impl UpdateInstaller {
    /// Start downloading the asset for `platform`.
    ///
    /// Returns a notification instead when the release has nothing for
    /// this platform.
    pub fn start(
        scope: &ScreenScope,
        release: &ReleaseDescriptor,
        platform: Option<Platform>,
        dest_dir: &Path,
    ) -> Result<Self, Notification> {
        let asset = platform
            .and_then(|p| release.asset_for(p))
            .cloned()
            .ok_or_else(|| {
                Notification::error(format!(
                    "Version {} has no download for this platform",
                    release.version
                ))
            })?;

        let (tx, rx) = watch::channel(None);
        let cancel = scope.child_token();
        let dest_dir = dest_dir.to_path_buf();

        let task = scope.spawn("update-download", async move {
            download_asset(&asset, &dest_dir, &cancel, |progress| {
                tx.send_replace(Some(progress));
            })
            .await
        });

        Ok(Self {
            task,
            progress: rx,
            version: release.version.to_string(),
        })
    }

    pub fn progress(&self) -> Option<DownloadProgress> {
        *self.progress.borrow()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// `Some` once the download has finished, successfully or not.
    pub fn poll(&mut self) -> Option<Notification> {
        match self.task.poll() {
            TaskPoll::Pending => None,
            TaskPoll::Ready(Ok(path)) => Some(Notification::info(format!(
                "Spowlo {} downloaded to {}",
                self.version,
                path.display()
            ))),
            TaskPoll::Ready(Err(e)) => {
                error!(error = %e, "Update download failed");
                Some(Notification::error(format!("Update download failed: {}", e)))
            }
            TaskPoll::Lost => Some(Notification::error("Update download was cancelled")),
        }
    }
}
