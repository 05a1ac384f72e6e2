//! `qm log` — the movement history.

use anyhow::Result;
use clap::Args;
use std::io::Write as _;

use quermesse_core::Direction;

use crate::output::{OutputMode, render};
use crate::project::require_project;

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Only show movements for this item.
    #[arg(long)]
    pub item: Option<String>,

    /// Show at most this many entries, newest last.
    #[arg(short = 'n', long, value_name = "COUNT")]
    pub limit: Option<usize>,
}

pub fn run_log(args: &LogArgs, output: OutputMode) -> Result<()> {
    let project = require_project(output)?;
    let session = project.store().load()?;

    let mut movements: Vec<_> = session
        .movements
        .iter()
        .filter(|m| args.item.as_deref().is_none_or(|item| m.item == item))
        .cloned()
        .collect();
    if let Some(limit) = args.limit {
        let skip = movements.len().saturating_sub(limit);
        movements.drain(..skip);
    }

    render(output, &movements, |movements, w| {
        if movements.is_empty() {
            return writeln!(w, "No movements recorded.");
        }
        for movement in movements {
            let sign = match movement.direction {
                Direction::Increase => '+',
                Direction::Decrease => '-',
            };
            write!(
                w,
                "{}  {:<32} {sign}{}",
                movement.timestamp.format("%Y-%m-%d %H:%M:%S"),
                movement.item,
                movement.quantity,
            )?;
            if let Some(ref stall) = movement.stall {
                write!(w, "  [{stall}]")?;
            }
            writeln!(w)?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::LogArgs;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: LogArgs,
    }

    #[test]
    fn log_args_defaults() {
        let w = Wrapper::parse_from(["test"]);
        assert!(w.args.item.is_none());
        assert!(w.args.limit.is_none());
    }

    #[test]
    fn log_limit_parses() {
        let w = Wrapper::parse_from(["test", "-n", "10", "--item", "Gelo"]);
        assert_eq!(w.args.limit, Some(10));
        assert_eq!(w.args.item.as_deref(), Some("Gelo"));
    }
}
