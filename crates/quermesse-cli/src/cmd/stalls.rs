//! `qm stalls` — the configured stall roster.

use anyhow::Result;
use std::io::Write as _;

use crate::output::{OutputMode, render};
use crate::project::require_project;

pub fn run_stalls(output: OutputMode) -> Result<()> {
    let project = require_project(output)?;

    render(output, &project.config.stalls, |stalls, w| {
        for stall in stalls {
            writeln!(w, "{stall}")?;
        }
        Ok(())
    })
}
