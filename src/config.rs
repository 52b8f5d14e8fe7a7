use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::countdown::{Countdown, Variant};

/// Startup defaults for the timer. Countdown state itself is never saved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub duration_secs: i64,
    pub variant: Variant,
    pub muted: bool,
    pub bell: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration_secs: 60,
            variant: Variant::Extended,
            muted: false,
            bell: true,
        }
    }
}

impl Config {
    /// A fresh countdown at rest with these settings
    pub fn countdown(&self) -> Countdown {
        Countdown::new(self.duration_secs, self.variant).with_muted(self.muted)
    }

    /// Whether expiry should ring the terminal bell
    pub fn rings_bell(&self) -> bool {
        self.bell && self.variant.has_alarm()
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "tminus") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("tminus_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "no config file, using defaults");
                return Config::default();
            }
        };
        serde_json::from_slice::<Config>(&bytes).unwrap_or_else(|err| {
            debug!(path = %self.path.display(), error = %err, "unreadable config, using defaults");
            Config::default()
        })
    }

    fn save(&self, cfg: &Config) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
