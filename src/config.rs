use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::status::DEFAULT_TTL;

const APP_DIR: &str = "prodcat";
const DB_FILE: &str = "database.db";

/// Runtime settings resolved from flags and the platform data directory.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub message_ttl: Duration,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let mut config = Self::default();
        if let Some(db) = &cli.db {
            config.db_path = db.clone();
        }
        if let Some(dir) = &cli.log_dir {
            config.log_dir = dir.clone();
        }
        config.message_ttl = Duration::from_secs(cli.message_secs);
        config
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let base = data_dir();
        Self {
            db_path: base.join(DB_FILE),
            log_dir: base.join("logs"),
            message_ttl: DEFAULT_TTL,
        }
    }
}

// Falls back to the working directory when the platform has no data dir.
fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn defaults_live_under_the_data_dir() {
        let config = AppConfig::from_cli(&Cli::parse_from(["prodcat"]));
        assert!(config.db_path.ends_with("database.db"));
        assert!(config.log_dir.ends_with("logs"));
        assert_eq!(config.message_ttl, Duration::from_secs(3));
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "prodcat",
            "--db",
            "/tmp/shop.db",
            "--log-dir",
            "/tmp/logs",
            "--message-secs",
            "5",
            "list",
        ]);
        let config = AppConfig::from_cli(&cli);
        assert_eq!(config.db_path, PathBuf::from("/tmp/shop.db"));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/logs"));
        assert_eq!(config.message_ttl, Duration::from_secs(5));
    }
}
