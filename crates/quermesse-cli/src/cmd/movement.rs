//! `qm in` / `qm out` — record stock movements.
//!
//! Both subcommands share one handler; only the [`Direction`] differs. Each
//! invocation is one full load-mutate-save cycle against the store.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::io::Write as _;
use tracing::warn;

use quermesse_core::{Direction, Movement};

use crate::output::{CliError, OutputMode, render, render_error};
use crate::project::require_project;

#[derive(Args, Debug)]
pub struct MovementArgs {
    /// Item name, exactly as registered.
    pub item: String,

    /// Quantity to move (whole number, at least 1).
    pub quantity: u64,

    /// Stall consuming or supplying the stock.
    #[arg(short, long)]
    pub stall: Option<String>,
}

#[derive(Debug, Serialize)]
struct MovementResponse {
    ok: bool,
    movement: Movement,
    remaining: u64,
}

pub fn run_movement(
    args: &MovementArgs,
    direction: Direction,
    output: OutputMode,
    quiet: bool,
) -> Result<()> {
    let project = require_project(output)?;

    if let Some(stall) = args.stall.as_deref()
        && !project.config.stalls.is_empty()
        && !project.config.stalls.iter().any(|s| s == stall)
    {
        // Free-text stalls are accepted; the roster only drives the hint.
        warn!(stall, "stall is not on the configured roster");
    }

    let mut session = project.store().load()?;

    let movement = match session.apply_movement(
        &args.item,
        args.quantity,
        direction,
        args.stall.as_deref(),
    ) {
        Ok(movement) => movement,
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            anyhow::bail!("{err}");
        }
    };

    project.store().save(&session)?;

    let remaining = session
        .item(&args.item)
        .map(|item| item.quantity)
        .unwrap_or_default();

    if quiet && !output.is_json() {
        return Ok(());
    }
    render(
        output,
        &MovementResponse {
            ok: true,
            movement,
            remaining,
        },
        |resp, w| {
            let sign = match resp.movement.direction {
                Direction::Increase => '+',
                Direction::Decrease => '-',
            };
            write!(
                w,
                "✓ {} recorded: {} {sign}{}",
                resp.movement.direction, resp.movement.item, resp.movement.quantity
            )?;
            if let Some(ref stall) = resp.movement.stall {
                write!(w, " for {stall}")?;
            }
            writeln!(w, " (now {})", resp.remaining)
        },
    )
}
