//! `qm init` — initialize a quermesse project.

use anyhow::{Context as _, Result};
use clap::Args;
use std::path::Path;
use tracing::info;

use quermesse_core::config::{PROJECT_DIR, ProjectConfig, StoreBackend};
use quermesse_core::Ledger;

use crate::output::{OutputMode, render_success};
use crate::project::open_store;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Store backend: sheet (CSV worksheets) or sqlite.
    #[arg(long, default_value = "sheet")]
    pub store: String,
}

pub fn run_init(
    args: &InitArgs,
    output: OutputMode,
    quiet: bool,
    project_root: &Path,
) -> Result<()> {
    let marker = project_root.join(PROJECT_DIR);
    if marker.is_dir() {
        render_success(output, quiet, "Project already initialized")?;
        return Ok(());
    }

    let backend = match args.store.as_str() {
        "sheet" => StoreBackend::Sheet,
        "sqlite" => StoreBackend::Sqlite,
        other => anyhow::bail!("unknown store backend '{other}' (expected sheet or sqlite)"),
    };

    let mut config = ProjectConfig::default();
    config.store.backend = backend;

    std::fs::create_dir_all(&marker)
        .with_context(|| format!("create project directory {}", marker.display()))?;
    let config_path = marker.join("config.toml");
    let rendered = toml::to_string_pretty(&config).context("render default config")?;
    std::fs::write(&config_path, rendered)
        .with_context(|| format!("write {}", config_path.display()))?;

    // Materialize the empty tables so the first mutating command starts
    // from a well-formed store.
    let store = open_store(project_root, &config);
    store.save(&Ledger::new()).context("write empty ledger")?;

    info!(root = %project_root.display(), backend = ?backend, "initialized project");
    render_success(output, quiet, "Initialized quermesse project")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::InitArgs;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: InitArgs,
    }

    #[test]
    fn init_args_default_to_sheet() {
        let w = Wrapper::parse_from(["test"]);
        assert_eq!(w.args.store, "sheet");
    }

    #[test]
    fn init_args_accept_sqlite() {
        let w = Wrapper::parse_from(["test", "--store", "sqlite"]);
        assert_eq!(w.args.store, "sqlite");
    }
}
