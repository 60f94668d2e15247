pub mod catalog;
pub mod cli;
pub mod config;
pub mod db;
pub mod dialog;
pub mod error;
pub mod logging;
pub mod status;
pub mod tui;
pub mod utils;
