//! Papo Social Control - CLI for the Papo Social engines
//!
//! Runs name extraction, intent classification and XP progression locally,
//! and can check on a running papod.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use papo_shared::ProgressSnapshot;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Name { transcript } => commands::name(&transcript, cli.json),
        Commands::Intent { text } => commands::intent(&text, cli.json),
        Commands::Xp {
            amount,
            level,
            xp,
            next_level_xp,
        } => commands::xp(ProgressSnapshot::new(level, xp, next_level_xp), amount, cli.json),
        Commands::Status { url } => commands::status(&url, cli.json).await,
    }
}
