//! Info command implementation.

use crate::commands::normalize_symbol;
use crate::workspace::Workspace;
use anyhow::Result;
use tamagoyaki_lib::prelude::*;

/// Show what is stored for a symbol.
pub(crate) fn show_info(workspace: &Workspace, symbol: &str) -> Result<()> {
    let symbol = normalize_symbol(symbol)?;
    let store = workspace.open_existing_store(&symbol)?;

    println!("Symbol:    {symbol}");
    println!("Exchange:  {EXCHANGE}");
    println!("Database:  {}", workspace.db_path(&symbol).display());

    let Some(summary) = store.summary(EXCHANGE, &symbol)? else {
        println!("\nNo candles stored.");
        return Ok(());
    };

    println!("Candles:   {}", summary.candles);
    println!("First:     {}", summary.first.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Last:      {}", summary.last.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Days:      {}", summary.days);

    Ok(())
}
