//! OncoTree CLI
//!
//! Command-line interface for reconciling curated OncoTree snapshots

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use oncotree_core::errors::ExError;
use oncotree_core::logging_facility::{self, Profile};

mod commands;
mod fetch;
mod prompt;
mod sink;

#[derive(Debug, Parser)]
#[command(name = "oncotree")]
#[command(about = "OncoTree - Snapshot validation and reconciliation", long_about = None)]
struct Cli {
    /// Log output format (logs always go to stderr)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate a modified export against the original and confirm the changes
    Validate(commands::validate::ValidateArgs),
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are not errors
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    logging_facility::init(match cli.log_format {
        LogFormat::Pretty => Profile::Interactive,
        LogFormat::Json => Profile::Production,
    });

    let result = match cli.command {
        Commands::Validate(args) => commands::validate::execute(args),
    };

    match result {
        Ok(status) => std::process::exit(status.code()),
        Err(e) => {
            if let Some(usage) = e.downcast_ref::<commands::UsageError>() {
                eprintln!("{}", usage);
                eprintln!("{}", validate_help());
            } else if let Some(ex) = e.downcast_ref::<ExError>() {
                eprintln!("ERROR: {}", ex.message());
                for detail in ex.details() {
                    eprintln!("\t{}", detail);
                }
                eprintln!("({})", ex.code());
            } else {
                eprintln!("ERROR: {:#}", e);
            }
            std::process::exit(1);
        }
    }
}

/// Help text of the `validate` subcommand, with the full `oncotree validate` usage line
fn validate_help() -> String {
    let mut cli = Cli::command();
    cli.build();
    cli.find_subcommand_mut("validate")
        .map(|validate| validate.render_help().to_string())
        .unwrap_or_default()
}
