//! Working directory layout.
//!
//! ```text
//! ~/.tamagoyaki_db/
//! ├── BTCUSD.db
//! ├── ETHUSD.db
//! └── logs/
//!     └── tamagoyaki.log
//! ```

use anyhow::{Context, Result, bail};
use directories::BaseDirs;
use std::fs;
use std::path::PathBuf;
use tamagoyaki_lib::SqliteStore;

const DIR_NAME: &str = ".tamagoyaki_db";
const LOG_FILE: &str = "tamagoyaki.log";

/// Directory holding one candle database per symbol plus the log file.
#[derive(Debug, Clone)]
pub(crate) struct Workspace {
    home: PathBuf,
    logs: PathBuf,
}

impl Workspace {
    /// Opens the workspace at `home`, or at the default location.
    ///
    /// Creates the directories if they don't exist.
    pub(crate) fn open(home: Option<PathBuf>) -> Result<Self> {
        let home = home.unwrap_or_else(Self::default_home);
        let logs = home.join("logs");

        for path in [&home, &logs] {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory {}", path.display()))?;
        }

        Ok(Self { home, logs })
    }

    /// Returns `~/.tamagoyaki_db`, falling back to the current directory
    /// when no home directory can be determined.
    pub(crate) fn default_home() -> PathBuf {
        BaseDirs::new().map_or_else(
            || PathBuf::from(".").join(DIR_NAME),
            |dirs| dirs.home_dir().join(DIR_NAME),
        )
    }

    pub(crate) fn log_path(&self) -> PathBuf {
        self.logs.join(LOG_FILE)
    }

    /// Returns the database path for a symbol.
    pub(crate) fn db_path(&self, symbol: &str) -> PathBuf {
        self.home.join(format!("{symbol}.db"))
    }

    /// Opens the symbol's database, creating it if needed.
    pub(crate) fn open_store(&self, symbol: &str) -> Result<SqliteStore> {
        let path = self.db_path(symbol);
        SqliteStore::open(&path)
            .with_context(|| format!("Failed to open database {}", path.display()))
    }

    /// Opens the symbol's database, failing if it was never created.
    pub(crate) fn open_existing_store(&self, symbol: &str) -> Result<SqliteStore> {
        let path = self.db_path(symbol);
        if !path.exists() {
            bail!(
                "No database for {symbol} in {}. Run `tamagoyaki update` first.",
                self.home.display()
            );
        }
        self.open_store(symbol)
    }
}
