//! `qm report` — the derived stock report.

use anyhow::Result;
use clap::Args;
use std::io::Write as _;
use std::path::PathBuf;

use quermesse_core::report;

use crate::output::{OutputMode, render, render_success};
use crate::project::require_project;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Write the CSV report to this path instead of rendering a table.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Stream the CSV report to stdout.
    #[arg(long)]
    pub csv: bool,
}

pub fn run_report(args: &ReportArgs, output: OutputMode, quiet: bool) -> Result<()> {
    let project = require_project(output)?;
    let session = project.store().load()?;

    if let Some(ref path) = args.output {
        let path = if path.is_dir() {
            path.join(report::REPORT_FILENAME)
        } else {
            path.clone()
        };
        report::write_csv_file(&session, &path)?;
        render_success(
            output,
            quiet,
            &format!("Report written to {}", path.display()),
        )?;
        return Ok(());
    }

    if args.csv {
        let stdout = std::io::stdout();
        report::write_csv(&session, stdout.lock())?;
        return Ok(());
    }

    render(output, &session.stock, |stock, w| {
        if stock.is_empty() {
            return writeln!(w, "No items registered.");
        }
        writeln!(w, "{:<32} {:>10}  {}", "ITEM", "QUANTITY", "UNIT")?;
        for item in stock {
            writeln!(w, "{:<32} {:>10}  {}", item.name, item.quantity, item.unit)?;
        }
        Ok(())
    })
}
