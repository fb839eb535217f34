//! CLI module
//!
//! Subcommands:
//! - `serve`: run the HTTP API server (default)

pub mod serve;

use clap::{Parser, Subcommand};

/// Farmdesk - account lifecycle and dashboard API for farmers
#[derive(Parser)]
#[command(name = "farmdesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,
}
