//! CLI command implementations.

use anyhow::{Result, bail};

pub(crate) mod generate;
pub(crate) mod info;
pub(crate) mod purge;
pub(crate) mod update;

/// Normalizes a user-supplied symbol to the archive naming (upper case).
pub(crate) fn normalize_symbol(symbol: &str) -> Result<String> {
    let symbol = symbol.trim();
    if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        bail!("Invalid symbol: '{symbol}'. Use letters and digits only, e.g. BTCUSD");
    }
    Ok(symbol.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol(" btcusd ").unwrap(), "BTCUSD");
        assert_eq!(normalize_symbol("ETHUSDT").unwrap(), "ETHUSDT");
        assert!(normalize_symbol("").is_err());
        assert!(normalize_symbol("../etc").is_err());
    }
}
