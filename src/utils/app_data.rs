use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "ccml";
const CONFIG_FILE: &str = "config.json";
const METHODS_DIR: &str = "methods";

/// Application configuration stored in the app data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the `methods-X.ccml` files.
    /// If None, uses `methods/` inside the app data directory
    #[serde(default)]
    pub methods_dir: Option<PathBuf>,

    /// Search results shown per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Characters of each title shown in result lists
    #[serde(default = "default_title_width")]
    pub title_width: usize,

    /// Files checked in parallel by `ccml check`.
    /// If 0, uses the number of CPU cores
    #[serde(default = "default_parallel_files")]
    pub parallel_files: usize,
}

fn default_page_size() -> usize {
    7
}

fn default_title_width() -> usize {
    22
}

fn default_parallel_files() -> usize {
    0 // 0 means use CPU count
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            methods_dir: None,
            page_size: default_page_size(),
            title_width: default_title_width(),
            parallel_files: default_parallel_files(),
        }
    }
}

impl AppConfig {
    /// Load config from the app data directory, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    /// Load config from an explicit path, or return default if not found
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = fs::read_to_string(config_path)
                .context("Failed to read config file")?;
            let config: AppConfig = serde_json::from_str(&content)
                .context("Failed to parse config file")?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the app data directory
    pub fn save(&self) -> Result<()> {
        self.save_to(&get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize config")?;
        fs::write(config_path, content)
            .context("Failed to write config file")?;
        Ok(())
    }

    /// Get the effective methods directory (resolves None to the app data default)
    pub fn effective_methods_dir(&self) -> Result<PathBuf> {
        match &self.methods_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(get_app_data_dir()?.join(METHODS_DIR)),
        }
    }

    /// Get the effective parallel file count (resolves 0 to CPU count)
    pub fn effective_parallel_files(&self) -> usize {
        if self.parallel_files == 0 {
            num_cpus()
        } else {
            self.parallel_files
        }
    }
}

/// Get the number of CPUs available
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    let app_dir = get_app_data_dir()?;
    Ok(app_dir.join(CONFIG_FILE))
}

/// Get the application data directory
pub fn get_app_data_dir() -> Result<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir()
            .map(|h| h.join("Library").join("Application Support"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
    } else {
        // Linux/Unix: use XDG_DATA_HOME or ~/.local/share
        dirs::data_dir()
    };

    let base = base.context("Could not determine app data directory")?;
    let app_dir = base.join(APP_NAME);

    fs::create_dir_all(&app_dir)?;
    Ok(app_dir)
}
