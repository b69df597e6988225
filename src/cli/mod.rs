//! Command-line interface.

mod commands;

pub use commands::{cmd_create_user, cmd_init};

use clap::{Parser, Subcommand};

/// Nimbus - multi-tenant weather API
#[derive(Parser)]
#[command(name = "nimbus")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default)
    Serve,

    /// Write a default config.toml in the current directory
    Init,

    /// Create an account with the given role
    CreateUser {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// Role name, e.g. `admin` or `user`
        #[arg(long, default_value = "user")]
        role: String,
    },
}
