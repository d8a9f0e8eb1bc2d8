//! CLI for the user accounts API

pub mod serve;

use clap::{Parser, Subcommand};

/// User Accounts API - CRUD service for user management
#[derive(Parser)]
#[command(name = "user-accounts-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,
}
