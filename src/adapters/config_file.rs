//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] over a JSON document on a filesystem (SPIFFS /
//! FAT partition on the ESP32, a plain file on the host).  Validation runs
//! on both load and save so a hand-edited file cannot smuggle in
//! out-of-range timings.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::MonitorConfig;

pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<MonitorConfig, ConfigError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ConfigError::NotFound
            } else {
                warn!("Config read {} failed: {}", self.path.display(), e);
                ConfigError::IoError
            }
        })?;
        let config: MonitorConfig = serde_json::from_str(&text).map_err(|e| {
            warn!("Config {} unparseable: {}", self.path.display(), e);
            ConfigError::Corrupted
        })?;
        config.validate()?;
        Ok(config)
    }

    fn save(&self, config: &MonitorConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let text = serde_json::to_string_pretty(config).map_err(|_| ConfigError::Corrupted)?;
        std::fs::write(&self.path, text).map_err(|e| {
            warn!("Config write {} failed: {}", self.path.display(), e);
            ConfigError::IoError
        })?;
        info!("Config saved to {}", self.path.display());
        Ok(())
    }
}
