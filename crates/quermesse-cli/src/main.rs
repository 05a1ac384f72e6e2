#![forbid(unsafe_code)]

mod cmd;
mod output;
mod project;

use clap::{CommandFactory, Parser, Subcommand};
use output::OutputMode;
use quermesse_core::Direction;
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "qm: inventory ledger for community-fair stalls",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags and the user config.
    fn output_mode(&self) -> OutputMode {
        if self.json {
            return OutputMode::Json;
        }
        let prefers_json = quermesse_core::config::load_user_config()
            .ok()
            .and_then(|config| config.output)
            .is_some_and(|output| output.eq_ignore_ascii_case("json"));
        if prefers_json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Initialize a quermesse project",
        long_about = "Initialize a quermesse project in the current directory.",
        after_help = "EXAMPLES:\n    # Initialize with the worksheet (CSV) store\n    qm init\n\n    # Initialize with the SQLite store\n    qm init --store sqlite"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        about = "Register a new stock item",
        long_about = "Register a new stock item starting at quantity zero.",
        after_help = "EXAMPLES:\n    # Register ice, measured in kilograms\n    qm register Gelo --unit Kg\n\n    # Emit machine-readable output\n    qm register Gelo --unit Kg --json"
    )]
    Register(cmd::register::RegisterArgs),

    #[command(
        about = "Record a stock increase",
        long_about = "Add quantity to an item's stock and log the movement.",
        after_help = "EXAMPLES:\n    # Receive 10 kg of fogaça dough\n    qm in Fogaça 10\n\n    # Emit machine-readable output\n    qm in Fogaça 10 --json"
    )]
    In(cmd::movement::MovementArgs),

    #[command(
        about = "Record a stock decrease",
        long_about = "Subtract quantity from an item's stock and log the movement.\nRejected when the item's stock is smaller than the requested quantity.",
        after_help = "EXAMPLES:\n    # The pizza stall takes 3 kg\n    qm out Fogaça 3 --stall Pizza\n\n    # Stall is optional\n    qm out Fogaça 3"
    )]
    Out(cmd::movement::MovementArgs),

    #[command(
        about = "Show the stock report",
        long_about = "Render the current stock table, or export it as CSV.",
        after_help = "EXAMPLES:\n    # Table on the terminal\n    qm report\n\n    # CSV to a file\n    qm report --output estoque_quermesse.csv\n\n    # CSV to stdout\n    qm report --csv"
    )]
    Report(cmd::report::ReportArgs),

    #[command(
        about = "Show the movement history",
        long_about = "List recorded movements, oldest first.",
        after_help = "EXAMPLES:\n    # Full history\n    qm log\n\n    # Last five movements of one item\n    qm log --item Fogaça -n 5"
    )]
    Log(cmd::log::LogArgs),

    #[command(
        about = "List the configured stalls",
        long_about = "Print the stall roster from the project config."
    )]
    Stalls,

    #[command(
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    qm completions bash"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("QM_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "quermesse=debug,info"
        } else {
            "quermesse=info,warn"
        })
    });

    let format = env::var("QM_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = std::env::current_dir()?;
    let output = cli.output_mode();
    let quiet = cli.quiet;

    match cli.command {
        Commands::Init(ref args) => cmd::init::run_init(args, output, quiet, &project_root),
        Commands::Register(ref args) => cmd::register::run_register(args, output, quiet),
        Commands::In(ref args) => {
            cmd::movement::run_movement(args, Direction::Increase, output, quiet)
        }
        Commands::Out(ref args) => {
            cmd::movement::run_movement(args, Direction::Decrease, output, quiet)
        }
        Commands::Report(ref args) => cmd::report::run_report(args, output, quiet),
        Commands::Log(ref args) => cmd::log::run_log(args, output),
        Commands::Stalls => cmd::stalls::run_stalls(output),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_sets_output_mode() {
        let cli = Cli::parse_from(["qm", "--json", "report"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["qm", "report", "--json"]);
        assert!(cli.json);
    }

    #[test]
    fn quiet_flag_parsed() {
        let cli = Cli::parse_from(["qm", "-q", "report"]);
        assert!(cli.quiet);
    }

    #[test]
    fn in_subcommand_parses() {
        let cli = Cli::parse_from(["qm", "in", "Fogaça", "10"]);
        assert!(matches!(cli.command, Commands::In(_)));
    }

    #[test]
    fn out_subcommand_with_stall() {
        let cli = Cli::parse_from(["qm", "out", "Fogaça", "3", "--stall", "Pizza"]);
        let Commands::Out(args) = cli.command else {
            panic!("expected out subcommand");
        };
        assert_eq!(args.stall.as_deref(), Some("Pizza"));
    }

    #[test]
    fn register_subcommand_parses() {
        let cli = Cli::parse_from(["qm", "register", "Gelo", "--unit", "Kg"]);
        assert!(matches!(cli.command, Commands::Register(_)));
    }

    #[test]
    fn stalls_subcommand_parses() {
        let cli = Cli::parse_from(["qm", "stalls"]);
        assert!(matches!(cli.command, Commands::Stalls));
    }
}
