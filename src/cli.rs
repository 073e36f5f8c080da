//! Command-line interface for tictac_arena.

use clap::{Parser, Subcommand};

/// Tic-tac-toe arena - concurrent game server with optimistic locking
#[derive(Parser, Debug)]
#[command(name = "tictac_arena")]
#[command(about = "HTTP tic-tac-toe server with optimistic concurrency", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database file (overrides config)
        #[arg(long, conflicts_with = "memory")]
        db_path: Option<String>,

        /// Keep games in memory only
        #[arg(long)]
        memory: bool,
    },

    /// Apply database migrations and exit
    Migrate {
        /// Path to the database file (created if it doesn't exist)
        #[arg(long, default_value = "tictac_arena.db")]
        db_path: String,
    },
}
