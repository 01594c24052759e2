//! tower-operator CLI
//!
//! Usage: tower-operator <COMMAND>
//!
//! Commands:
//!   moves      Print the move sequence for a disc count
//!   reconcile  Reconcile one challenge once
//!   status     Show the last written status of a challenge
//!   run        Keep every challenge converged until Ctrl+C

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::CommandContext;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let ctx = CommandContext::load(&cli)?;

    match &cli.command {
        Commands::Moves { discs } => commands::cmd_moves(&ctx, *discs),
        Commands::Reconcile { name } => commands::cmd_reconcile(&ctx, name),
        Commands::Status { name } => commands::cmd_status(&ctx, name),
        Commands::Run => commands::cmd_run(&ctx),
    }
}
