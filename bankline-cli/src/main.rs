//! Bankline CLI - bank account management in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use bankline_core::LogEvent;
use commands::{account, admin, logs};

/// Bankline - bank account management in your terminal
#[derive(Parser)]
#[command(name = "bl", version, about, long_about = None)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a new account
    Create(account::CreateArgs),

    /// Show the public summary of an account
    Show {
        /// Account id
        id: String,
    },

    /// List public summaries of all accounts
    List,

    /// Deposit into an account
    Deposit {
        /// Account id
        id: String,
        /// Amount, e.g. 100 or 12.50
        amount: String,
    },

    /// Withdraw from an account
    Withdraw {
        /// Account id
        id: String,
        /// Amount, e.g. 100 or 12.50
        amount: String,
    },

    /// Administrative operations (requires BANKLINE_ROLE=admin)
    Admin {
        #[command(subcommand)]
        command: admin::AdminCommands,
    },

    /// View and manage the usage log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Create(_) => "create",
            Commands::Show { .. } => "show",
            Commands::List => "list",
            Commands::Deposit { .. } => "deposit",
            Commands::Withdraw { .. } => "withdraw",
            Commands::Admin { command } => command.name(),
            Commands::Logs { command } => command.name(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;
    let name = cli.command.name();

    let result = run(cli);

    // Opened only after the command is done: `bl logs` holds logs.duckdb itself
    let logger = commands::get_logger();
    match result {
        Ok(()) => {
            commands::log_event(&logger, LogEvent::new("command_executed").with_command(name));
            ExitCode::SUCCESS
        }
        Err(e) => {
            let err = commands::into_core_error(e);
            commands::log_event(&logger, LogEvent::for_failure(name, &err));
            commands::report_error(&err, json);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let json = cli.json;
    match cli.command {
        Commands::Create(args) => account::create(args, json),
        Commands::Show { id } => account::show(&id, json),
        Commands::List => account::list(json),
        Commands::Deposit { id, amount } => account::deposit(&id, &amount, json),
        Commands::Withdraw { id, amount } => account::withdraw(&id, &amount, json),
        Commands::Admin { command } => admin::run(command, json),
        Commands::Logs { command } => logs::run(command, json),
    }
}
