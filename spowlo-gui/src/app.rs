//! Main application state and update loop.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;

use eframe::egui;
use tokio::runtime::Runtime;
use tokio::sync::{oneshot, watch};
use tracing::{debug, error, info, warn};

use spowlo_core::library::build_download_request;
use spowlo_core::prefs::SharedDatabase;
use spowlo_core::prefs::keys::{
    AUTO_UPDATE, DARK_THEME_VALUE, DYNAMIC_COLOR, HIGH_CONTRAST, PALETTE_STYLE, THEME_COLOR,
    UPDATE_CHANNEL,
};
use spowlo_core::screens::{self, LibraryVersionQuery, UpdateInstaller, UpdaterController};
use spowlo_core::update::Platform;
use spowlo_core::{
    AppConfig, Capabilities, DownloadLibrary, GithubReleases, LibraryError,
    Notification, Preferences, ProcessLibrary, ScreenScope, ScreenTask, SettingsAction,
    SettingsPage, ShareIntent, SharedLink, SpotDlResponse, TaskPoll, ThemeSelection,
    UpdateChannel, UpdateChecker, Version,
};

use crate::ui;
use crate::ui::colors;
use crate::ui::dialogs::Dialog;

// =============================================================================
// Theme Observation
// =============================================================================

/// Receivers for every preference that affects the visuals.
struct ThemeWatch {
    dynamic_color: watch::Receiver<bool>,
    seed: watch::Receiver<i32>,
    style: watch::Receiver<i32>,
    dark_theme: watch::Receiver<i32>,
    high_contrast: watch::Receiver<bool>,
}

impl ThemeWatch {
    fn new(prefs: &mut Preferences) -> Self {
        Self {
            dynamic_color: prefs.watch(&DYNAMIC_COLOR),
            seed: prefs.watch(&THEME_COLOR),
            style: prefs.watch(&PALETTE_STYLE),
            dark_theme: prefs.watch(&DARK_THEME_VALUE),
            high_contrast: prefs.watch(&HIGH_CONTRAST),
        }
    }

    /// True if any theme preference was written since the last call.
    fn take_changed(&mut self) -> bool {
        take_change(&mut self.dynamic_color)
            | take_change(&mut self.seed)
            | take_change(&mut self.style)
            | take_change(&mut self.dark_theme)
            | take_change(&mut self.high_contrast)
    }
}

fn take_change<T>(rx: &mut watch::Receiver<T>) -> bool {
    let changed = rx.has_changed().unwrap_or(false);
    if changed {
        rx.borrow_and_update();
    }
    changed
}

// =============================================================================
// Application State
// =============================================================================

/// Main application state.
pub struct SpowloApp {
    /// Tokio runtime for async operations.
    pub runtime: Runtime,

    /// User preferences.
    pub prefs: Preferences,

    /// What the running desktop supports.
    pub caps: Capabilities,

    /// App configuration in effect (stored values plus environment
    /// overrides).
    pub config: AppConfig,

    /// App configuration as stored; the only copy ever saved.
    stored_config: AppConfig,

    /// Database shared with `prefs`.
    db: SharedDatabase,

    /// The spotDL subprocess client.
    library: Arc<dyn DownloadLibrary>,

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------
    /// Currently visible settings page.
    pub page: SettingsPage,

    /// Tasks owned by the visible page; cancelled on navigation.
    page_scope: ScreenScope,

    /// Tasks that outlive page changes (startup check, update download).
    app_scope: ScreenScope,

    // -------------------------------------------------------------------------
    // Page State
    // -------------------------------------------------------------------------
    pub version_query: LibraryVersionQuery,
    pub updater: UpdaterController,
    pub installer: Option<UpdateInstaller>,

    /// Open dialog, if any.
    pub dialog: Option<Dialog>,

    /// Text being edited in the custom command dialog.
    pub template_draft: String,

    // -------------------------------------------------------------------------
    // Shared Links
    // -------------------------------------------------------------------------
    /// The link most recently handed to the app.
    pub shared_link: Option<SharedLink>,

    /// Running download of the shared link.
    download: Option<ScreenTask<Result<SpotDlResponse, LibraryError>>>,

    // -------------------------------------------------------------------------
    // UI State
    // -------------------------------------------------------------------------
    /// Status message.
    pub status_message: Option<(Notification, chrono::DateTime<chrono::Utc>)>,

    theme_watch: ThemeWatch,

    /// Dark mode reported by the window system at startup.
    system_dark: bool,

    /// Pending folder selection result receiver.
    folder_result_rx: Option<oneshot::Receiver<Option<PathBuf>>>,
}

impl SpowloApp {
    /// Create a new application instance.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        runtime: Runtime,
        mut prefs: Preferences,
        stored_config: AppConfig,
        db: SharedDatabase,
        shared: Option<String>,
    ) -> Self {
        info!("Initializing SpowloApp");

        let config = stored_config.with_env();

        let caps = Capabilities::detect();

        let library: Arc<dyn DownloadLibrary> = Arc::new(ProcessLibrary::new(
            &config.library_executable,
            config.library_timeout(),
        ));

        let source = Arc::new(GithubReleases::new(
            &config.release_owner,
            &config.release_repo,
            config.request_timeout(),
        ));
        let checker = match UpdateChecker::for_running_build(source.clone()) {
            Ok(checker) => checker,
            Err(e) => {
                error!("Failed to read the running version: {}", e);
                UpdateChecker::new(source, Version::new(0, 0, 0))
            }
        };

        let app_scope = ScreenScope::new("app", runtime.handle().clone());
        let page_scope = ScreenScope::new(SettingsPage::General.title(), runtime.handle().clone());

        let theme_watch = ThemeWatch::new(&mut prefs);
        let system_dark = cc.egui_ctx.style().visuals.dark_mode;

        let mut style = (*cc.egui_ctx.style()).clone();
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        cc.egui_ctx.set_style(style);

        let mut app = Self {
            runtime,
            prefs,
            caps,
            config,
            stored_config,
            db,
            library,
            page: SettingsPage::General,
            page_scope,
            app_scope,
            version_query: LibraryVersionQuery::default(),
            updater: UpdaterController::new(checker),
            installer: None,
            dialog: None,
            template_draft: String::new(),
            shared_link: None,
            download: None,
            status_message: None,
            theme_watch,
            system_dark,
            folder_result_rx: None,
        };

        app.apply_theme(&cc.egui_ctx);
        app.version_query
            .start(&app.page_scope, Arc::clone(&app.library));

        if let Some(arg) = shared {
            app.handle_shared(ShareIntent::from_argument(&arg));
        }

        if app.prefs.get_value(&AUTO_UPDATE) {
            let channel = app.update_channel();
            app.updater.start_silent_check(&app.app_scope, channel);
        }

        app
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Show another page. Work owned by the old page is cancelled.
    pub fn navigate(&mut self, page: SettingsPage) {
        if self.page == page {
            return;
        }
        debug!(from = ?self.page, to = ?page, "Navigating");

        self.page_scope.cancel();
        self.page_scope = ScreenScope::new(page.title(), self.runtime.handle().clone());
        self.page = page;
        self.dialog = None;

        if page == SettingsPage::General {
            self.version_query = LibraryVersionQuery::default();
            self.version_query
                .start(&self.page_scope, Arc::clone(&self.library));
        }
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Persist a settings change.
    pub fn apply(&mut self, action: SettingsAction) {
        if let Err(e) = screens::dispatch(&self.prefs, &self.caps, action) {
            error!("Failed to save setting: {}", e);
            self.notify(Notification::error("Failed to save setting"));
        }
    }

    pub fn update_channel(&self) -> UpdateChannel {
        UpdateChannel::from_value(self.prefs.get_value(&UPDATE_CHANNEL))
    }

    /// Rebuild the visuals from the stored theme preferences.
    pub fn apply_theme(&self, ctx: &egui::Context) {
        let selection = ThemeSelection::load(&self.prefs);
        let dark = selection.dark_theme.is_dark(self.system_dark);
        let palette = selection.effective_palette(self.caps.dynamic_seed);

        let mut visuals = if dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };

        let accent = colors::from_argb(palette.primary.tone(if dark { 70 } else { 40 }));
        let container = colors::from_argb(palette.secondary.tone(if dark { 30 } else { 90 }));
        visuals.selection.bg_fill = accent;
        visuals.hyperlink_color = accent;
        visuals.widgets.active.bg_fill = accent;
        visuals.widgets.hovered.weak_bg_fill = container;

        if dark && selection.high_contrast {
            visuals.panel_fill = egui::Color32::BLACK;
            visuals.window_fill = egui::Color32::BLACK;
            visuals.extreme_bg_color = egui::Color32::BLACK;
        }

        debug!(dark, high_contrast = selection.high_contrast, "Applying theme");
        ctx.set_visuals(visuals);
    }

    // =========================================================================
    // Updates
    // =========================================================================

    /// Run a user-requested update check. Ignored while one is running.
    pub fn check_for_updates(&mut self) {
        let channel = self.update_channel();
        if !self.updater.start_check(&self.page_scope, channel) {
            debug!("Update check already running");
        }
    }

    /// Open the release page of the offered update.
    pub fn view_release(&mut self) {
        let Some(url) = self.updater.latest_release().map(|r| r.page_url.clone()) else {
            return;
        };
        if let Err(e) = webbrowser::open(&url) {
            warn!("Failed to open browser: {}", e);
            self.notify(Notification::error(format!("Could not open {}", url)));
        }
    }

    /// Download the offered update.
    pub fn install_update(&mut self) {
        let Some(release) = self.updater.accept_update() else {
            return;
        };
        let dest = self
            .config
            .effective_download_dir()
            .unwrap_or_else(std::env::temp_dir);

        match UpdateInstaller::start(&self.app_scope, &release, Platform::detect(), &dest) {
            Ok(installer) => {
                info!(version = %release.version, dest = %dest.display(), "Downloading update");
                self.notify(Notification::info(format!(
                    "Downloading Spowlo {}...",
                    release.version
                )));
                self.installer = Some(installer);
            }
            Err(notification) => self.notify(notification),
        }
    }

    // =========================================================================
    // Shared Links
    // =========================================================================

    /// Accept a link from the command line or shared text.
    pub fn handle_shared(&mut self, intent: ShareIntent) {
        match SharedLink::resolve(&intent, self.shared_link.as_ref()) {
            Some(link) => {
                info!(url = link.url(), "Received shared link");
                self.notify(Notification::info(format!("Link ready: {}", link.url())));
                self.shared_link = Some(link);
            }
            None => debug!(?intent, "Nothing new in shared content"),
        }
    }

    pub fn is_downloading(&self) -> bool {
        self.download.is_some()
    }

    /// Download the shared link with the current format settings.
    pub fn start_download(&mut self) {
        if self.download.is_some() {
            return;
        }
        let Some(link) = self.shared_link.as_ref() else {
            return;
        };

        let output_dir = self.config.effective_download_dir();
        let request = build_download_request(&self.prefs, link.url(), output_dir.as_deref());
        let library = Arc::clone(&self.library);

        info!(url = link.url(), "Starting download");
        self.download = Some(self.app_scope.spawn("download", async move {
            library.execute(&request).await
        }));
    }

    fn check_download(&mut self) {
        let Some(task) = self.download.as_mut() else {
            return;
        };
        let notification = match task.poll() {
            TaskPoll::Pending => return,
            TaskPoll::Ready(Ok(response)) => {
                info!(elapsed = ?response.elapsed, "Download finished");
                Notification::info("Download finished")
            }
            TaskPoll::Ready(Err(e)) => {
                error!("Download failed: {}", e);
                Notification::error(format!("Download failed: {}", e))
            }
            TaskPoll::Lost => Notification::error("Download was cancelled"),
        };
        self.download = None;
        self.notify(notification);
    }

    // =========================================================================
    // Download Directory
    // =========================================================================

    /// Open a native folder picker for the download directory.
    pub fn open_folder_dialog(&mut self) {
        // Don't open another dialog if one is pending
        if self.folder_result_rx.is_some() {
            return;
        }

        let (tx, rx) = oneshot::channel();
        self.folder_result_rx = Some(rx);

        self.runtime.spawn(async move {
            let folder = rfd::AsyncFileDialog::new()
                .pick_folder()
                .await
                .map(|f| f.path().to_path_buf());
            let _ = tx.send(folder);
        });
    }

    /// Check for folder selection completion.
    fn check_folder_selection(&mut self) {
        if let Some(mut rx) = self.folder_result_rx.take() {
            match rx.try_recv() {
                Ok(Some(folder)) => {
                    info!("Download directory: {}", folder.display());
                    self.stored_config.download_dir = Some(folder.to_string_lossy().to_string());
                    self.save_config();
                }
                Ok(None) => {
                    debug!("Folder selection cancelled");
                }
                Err(oneshot::error::TryRecvError::Empty) => {
                    // Still waiting
                    self.folder_result_rx = Some(rx);
                }
                Err(oneshot::error::TryRecvError::Closed) => {
                    warn!("Folder selection channel closed unexpectedly");
                }
            }
        }
    }

    /// Save the stored app config and refresh the one in effect.
    pub fn save_config(&mut self) {
        let saved = match self.db.lock() {
            Ok(db) => self.stored_config.save(&db),
            Err(e) => Err(anyhow!("Database lock poisoned: {e}")),
        };
        self.config = self.stored_config.with_env();
        match saved {
            Ok(()) => self.notify(Notification::info("Settings saved")),
            Err(e) => {
                error!("Failed to save config: {:#}", e);
                self.notify(Notification::error("Failed to save settings"));
            }
        }
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// Show a notification in the status bar.
    pub fn notify(&mut self, notification: Notification) {
        self.status_message = Some((notification, chrono::Utc::now()));
    }

    /// Clear old status messages.
    pub fn clear_old_status(&mut self) {
        if let Some((_, time)) = &self.status_message {
            if chrono::Utc::now() - *time > chrono::Duration::seconds(5) {
                self.status_message = None;
            }
        }
    }

    /// Apply finished background work.
    fn poll_background(&mut self) {
        self.version_query.poll();

        if let Some(notification) = self.updater.poll() {
            self.notify(notification);
        }

        if let Some(installer) = self.installer.as_mut() {
            if let Some(notification) = installer.poll() {
                self.installer = None;
                self.notify(notification);
            }
        }

        self.check_download();
        self.check_folder_selection();
    }

    fn is_busy(&self) -> bool {
        matches!(
            self.version_query.state(),
            screens::LibraryVersionState::Loading
        ) || self.updater.is_loading()
            || self.installer.is_some()
            || self.download.is_some()
            || self.folder_result_rx.is_some()
    }
}

impl eframe::App for SpowloApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_background();
        self.clear_old_status();

        if self.theme_watch.take_changed() {
            self.apply_theme(ctx);
        }

        // Top panel with menu
        egui::TopBottomPanel::top("menu_panel").show(ctx, |ui| {
            ui::menu::render(self, ui, ctx);
        });

        // Status bar at bottom
        egui::TopBottomPanel::bottom("status_panel")
            .max_height(24.0)
            .show(ctx, |ui| {
                ui::status::render(self, ui);
            });

        // Page list
        egui::SidePanel::left("nav_panel")
            .resizable(false)
            .exact_width(200.0)
            .show(ctx, |ui| {
                ui::menu::render_nav(self, ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match self.page {
                SettingsPage::General => ui::general::render(self, ui),
                SettingsPage::Format => ui::format::render(self, ui),
                SettingsPage::Appearance => ui::appearance::render(self, ui),
                SettingsPage::Updater => ui::updater::render(self, ui),
            });
        });

        ui::dialogs::render(self, ctx);

        // Request repaint while waiting for async ops
        if self.is_busy() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
