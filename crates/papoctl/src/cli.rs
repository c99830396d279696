//! CLI - Command-line argument parsing
//!
//! Keeps argument parsing separate from execution logic.

use clap::{Parser, Subcommand};
use papo_shared::progression::{STARTING_LEVEL, STARTING_NEXT_LEVEL_XP};

/// Papo Social CLI
#[derive(Parser)]
#[command(name = "papoctl")]
#[command(about = "Papo Social - try the onboarding and progression engines", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract a display name from an introduction transcript
    Name {
        /// Transcript, e.g. "meu nome é Maria Clara"
        transcript: String,
    },

    /// Classify a voice command
    Intent {
        /// Command text, e.g. "quero listar os residentes"
        text: String,
    },

    /// Apply XP to a progress snapshot
    Xp {
        /// XP to add (must be positive)
        #[arg(long, allow_hyphen_values = true)]
        amount: i64,

        /// Current level
        #[arg(long, default_value_t = STARTING_LEVEL)]
        level: u32,

        /// XP inside the current level
        #[arg(long, default_value_t = 0)]
        xp: u64,

        /// XP needed for the next level
        #[arg(long, default_value_t = STARTING_NEXT_LEVEL_XP)]
        next_level_xp: u64,
    },

    /// Show daemon health
    Status {
        /// Daemon base URL
        #[arg(long, default_value = "http://127.0.0.1:8000")]
        url: String,
    },
}
