//! tamagoyaki CLI - crypto candlestick database builder.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tamagoyaki_lib::{Interval, OutputFormat};

mod commands;
mod display;
mod logging;
mod workspace;

use workspace::Workspace;

#[derive(Debug, Parser)]
#[command(name = "tamagoyaki")]
#[command(about = "A CLI tool for managing crypto candlestick data", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Working directory for databases and logs [default: ~/.tamagoyaki_db]
    #[arg(long, env = "TAMAGOYAKI_HOME", global = true)]
    home: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Download trades and store candles for every missing day
    Update {
        /// Trading symbol (e.g., BTCUSD)
        symbol: String,

        /// First day (YYYYMMDD)
        begin: String,

        /// Last day, inclusive (YYYYMMDD)
        end: String,

        /// Candle length (e.g., 1, 60, 1s, 5m, 1h)
        #[arg(default_value = "1s")]
        interval: Interval,

        /// Maximum concurrent downloads
        #[arg(long, default_value = "4")]
        concurrency: usize,
    },

    /// Export stored candles resampled to a coarser interval
    Generate {
        /// Trading symbol (e.g., BTCUSD)
        symbol: String,

        /// First day (YYYYMMDD)
        begin: String,

        /// Last day, inclusive (YYYYMMDD)
        end: String,

        /// Target candle length (e.g., 1m, 15m, 4h, 1d)
        interval: Interval,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Output format (csv, json, ndjson, parquet)
        #[arg(short, long, default_value = "csv")]
        format: OutputFormat,
    },

    /// Show what is stored for a symbol
    Info {
        /// Trading symbol (e.g., BTCUSD)
        symbol: String,
    },

    /// Delete stored candles for a range of days
    Purge {
        /// Trading symbol (e.g., BTCUSD)
        symbol: String,

        /// First day (YYYYMMDD)
        begin: String,

        /// Last day, inclusive (YYYYMMDD)
        end: String,

        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let workspace = Workspace::open(cli.home)?;
    logging::init(&workspace, cli.verbose, cli.quiet)?;

    match command {
        Commands::Update {
            symbol,
            begin,
            end,
            interval,
            concurrency,
        } => {
            commands::update::update(
                &workspace,
                &symbol,
                &begin,
                &end,
                interval,
                concurrency,
                cli.quiet,
            )
            .await?;
            Ok(())
        }
        Commands::Generate {
            symbol,
            begin,
            end,
            interval,
            output_dir,
            format,
        } => {
            commands::generate::generate(
                &workspace,
                &symbol,
                &begin,
                &end,
                interval,
                &output_dir,
                format,
                cli.quiet,
            )?;
            Ok(())
        }
        Commands::Info { symbol } => commands::info::show_info(&workspace, &symbol),
        Commands::Purge {
            symbol,
            begin,
            end,
            yes,
        } => {
            commands::purge::purge(&workspace, &symbol, &begin, &end, yes)?;
            Ok(())
        }
    }
}
