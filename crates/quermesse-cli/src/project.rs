//! Project discovery and store selection shared by all commands.

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use quermesse_core::config::{self, ProjectConfig, StoreBackend};
use quermesse_core::{LedgerStore, SheetStore, SqliteStore};

use crate::output::{CliError, OutputMode, render_error};

/// An opened project: root directory, parsed config, and its ledger store.
pub struct Project {
    pub root: PathBuf,
    pub config: ProjectConfig,
    store: Box<dyn LedgerStore>,
}

impl Project {
    /// Open the project containing `start`, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the project config cannot be read or parsed.
    pub fn discover(start: &Path) -> Result<Option<Self>> {
        let Some(root) = config::discover_project_root(start) else {
            return Ok(None);
        };
        let config = config::load_project_config(&root)?;
        let store = open_store(&root, &config);
        Ok(Some(Self {
            root,
            config,
            store,
        }))
    }

    #[must_use]
    pub fn store(&self) -> &dyn LedgerStore {
        self.store.as_ref()
    }
}

/// Build the configured store implementation for a project root.
#[must_use]
pub fn open_store(root: &Path, config: &ProjectConfig) -> Box<dyn LedgerStore> {
    let path = config::resolve_store_path(root, config);
    match config.store.backend {
        StoreBackend::Sheet => Box::new(SheetStore::new(path)),
        StoreBackend::Sqlite => Box::new(SqliteStore::new(path)),
    }
}

/// Open the project for a command that requires one, rendering the
/// `NotInitialized` error surface when discovery fails.
///
/// # Errors
///
/// Bails after rendering when no project is found or the config is broken.
pub fn require_project(output: OutputMode) -> Result<Project> {
    let cwd = std::env::current_dir().context("determine current directory")?;
    match Project::discover(&cwd) {
        Ok(Some(project)) => Ok(project),
        Ok(None) => {
            let code = quermesse_core::ErrorCode::NotInitialized;
            render_error(
                output,
                &CliError::with_details(
                    code.message(),
                    code.hint().unwrap_or_default(),
                    code.code(),
                ),
            )?;
            anyhow::bail!("{}", code.message());
        }
        Err(err) => {
            let code = quermesse_core::ErrorCode::ConfigParseError;
            render_error(
                output,
                &CliError::with_details(
                    format!("{err:#}"),
                    code.hint().unwrap_or_default(),
                    code.code(),
                ),
            )?;
            Err(err)
        }
    }
}
