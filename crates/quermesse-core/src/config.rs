use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory that marks a quermesse project root.
pub const PROJECT_DIR: &str = ".quermesse";

/// The fair's stall roster as it appeared on the original decrease form.
const DEFAULT_STALLS: [&str; 14] = [
    "Fogaça",
    "Cachorro quente",
    "Pizza",
    "Sopa",
    "Milho",
    "Churrasco",
    "Doces",
    "Pastel",
    "Vinho e quentão",
    "Bebidas",
    "Bingo",
    "Brincadeiras - Boca do palhaço",
    "Brincadeiras - Canaleta",
    "Brincadeiras - pesca",
];

/// Which durable store backs the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// CSV worksheet pair, compatible with the legacy spreadsheet export.
    Sheet,
    /// Single SQLite database with transactional saves.
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default = "default_stalls")]
    pub stalls: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            stalls: default_stalls(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,
    /// Data location relative to the project dir (worksheet directory for
    /// `sheet`, database file for `sqlite`).
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: None,
        }
    }
}

const fn default_backend() -> StoreBackend {
    StoreBackend::Sheet
}

fn default_stalls() -> Vec<String> {
    DEFAULT_STALLS.iter().map(|s| (*s).to_string()).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    /// Preferred output mode when no flag is given ("human" or "json").
    #[serde(default)]
    pub output: Option<String>,
}

/// Load the project config, falling back to defaults when no file exists.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(PROJECT_DIR).join("config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the per-user config from the platform config dir, defaulting when
/// absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("quermesse/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Walk up from `start` looking for a `.quermesse` directory.
#[must_use]
pub fn discover_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(PROJECT_DIR).is_dir() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

/// Resolve the configured data location to an absolute path.
#[must_use]
pub fn resolve_store_path(project_root: &Path, config: &ProjectConfig) -> PathBuf {
    let default_name = match config.store.backend {
        StoreBackend::Sheet => PathBuf::from("data"),
        StoreBackend::Sqlite => PathBuf::from("ledger.sqlite3"),
    };
    let relative = config.store.path.clone().unwrap_or(default_name);
    project_root.join(PROJECT_DIR).join(relative)
}
