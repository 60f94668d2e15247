use prodcat::catalog::Catalog;
use prodcat::config::AppConfig;
use prodcat::db::Store;
use prodcat::{logging, tui};
use std::process;

fn main() {
    let config = AppConfig::default();
    let _guard = logging::init(&config.log_dir).ok();

    let store = Store::open(&config.db_path).unwrap_or_else(|e| {
        eprintln!("Failed to initialize database: {}", e);
        process::exit(1);
    });

    if let Err(e) = tui::run_tui(Catalog::new(store, config.message_ttl)) {
        eprintln!("TUI error: {:#}", e);
        process::exit(1);
    }
}
