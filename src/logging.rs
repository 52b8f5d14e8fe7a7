use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::app_dirs::AppDirs;

/// Route `tracing` output to a log file. The terminal belongs to the UI, so
/// when no file can be opened logging is simply off.
///
/// Returns the log file path when file logging is active.
pub fn init_tracing() -> Option<PathBuf> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Some((path, file)) = AppDirs::log_path().and_then(|p| open_log_file(&p).map(|f| (p, f)))
    else {
        tracing_subscriber::registry().with(env_filter).init();
        return None;
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(env_filter)
        .init();

    tracing::info!(path = %path.display(), "logging initialized");
    Some(path)
}

fn open_log_file(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}
