//! Spowlo GUI Application
//!
//! Desktop settings and updater for the spotDL front-end.

mod app;
mod ui;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use spowlo_core::prefs::SharedDatabase;
use spowlo_core::{AppConfig, Database, Preferences};
use tracing_subscriber::EnvFilter;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "spowlo", version, about = "Desktop front-end for spotDL")]
struct Args {
    /// A link, or text containing one, to open on startup.
    shared: Option<String>,

    /// Use this database instead of the default one.
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("spowlo=debug,spowlo_core=debug,info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    tracing::info!("Starting Spowlo v{}", spowlo_core::VERSION);

    let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let _guard = runtime.enter();

    let db = open_database(args.db)?;

    let stored_config = AppConfig::load(&db);
    tracing::debug!(?stored_config, "Loaded app config");

    let db: SharedDatabase = Arc::new(Mutex::new(db));
    let prefs = Preferences::new(Arc::clone(&db));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Spowlo"),
        renderer: eframe::Renderer::Glow,
        ..Default::default()
    };

    eframe::run_native(
        "Spowlo",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::SpowloApp::new(
                cc,
                runtime,
                prefs,
                stored_config,
                db,
                args.shared,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run the window: {e}"))
}

/// Open and migrate the database, falling back to an in-memory one so the
/// app still starts with defaults.
fn open_database(path: Option<PathBuf>) -> anyhow::Result<Database> {
    let opened = match path {
        Some(path) => Database::open_at(path),
        None => Database::open(),
    };

    match opened.and_then(|db| db.migrate().map(|_| db)) {
        Ok(db) => {
            tracing::info!(path = %db.path().display(), "Database ready");
            Ok(db)
        }
        Err(e) => {
            tracing::error!("Failed to open database: {e:#}, using in-memory fallback");
            let db = Database::open_in_memory().context("Failed to create in-memory database")?;
            db.migrate()?;
            Ok(db)
        }
    }
}
