//! `qm register` — register a new stock item.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::io::Write as _;

use quermesse_core::StockItem;

use crate::output::{CliError, OutputMode, render, render_error};
use crate::project::require_project;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Name of the new item.
    pub name: String,

    /// Unit of measure (e.g. Kg, Lata, Unid).
    #[arg(short, long)]
    pub unit: String,
}

#[derive(Debug, Serialize)]
struct RegisterResponse {
    ok: bool,
    item: StockItem,
}

pub fn run_register(args: &RegisterArgs, output: OutputMode, quiet: bool) -> Result<()> {
    let project = require_project(output)?;
    let mut session = project.store().load()?;

    let item = match session.register_item(&args.name, &args.unit) {
        Ok(item) => item,
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            anyhow::bail!("{err}");
        }
    };

    project.store().save(&session)?;

    if quiet && !output.is_json() {
        return Ok(());
    }
    render(
        output,
        &RegisterResponse { ok: true, item },
        |resp, w| {
            writeln!(
                w,
                "✓ Registered '{}' ({}), starting at 0",
                resp.item.name, resp.item.unit
            )
        },
    )
}
