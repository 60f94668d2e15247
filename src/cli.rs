use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prodcat")]
#[command(about = "Small product catalog manager", long_about = None, version)]
pub struct Cli {
    /// Database file (defaults to the user data directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,
    /// Directory for the log file
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
    /// Seconds a status message stays visible in the TUI
    #[arg(
        long,
        global = true,
        value_name = "SECS",
        default_value_t = 3,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub message_secs: u64,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Open the terminal UI (default)
    #[command(alias = "t")]
    Tui,
    /// Add a new product
    #[command(alias = "a")]
    Add {
        /// Product name
        name: Option<String>,
        /// Product price
        price: Option<String>,
    },
    /// List all products sorted by name
    #[command(alias = "l")]
    List,
    /// Remove every product with the given name
    #[command(alias = "r")]
    Remove {
        /// Product name
        name: Option<String>,
    },
    /// Change the name and price of a product
    #[command(alias = "e")]
    Edit {
        /// Product name
        name: Option<String>,
    },
}
