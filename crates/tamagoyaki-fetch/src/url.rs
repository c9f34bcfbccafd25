//! Bybit archive URL construction.

use chrono::NaiveDate;

/// Exchange name recorded on candles built from these archives.
pub const EXCHANGE: &str = "bybit";

/// Base URL for Bybit public trade archives.
pub const BASE_URL: &str = "https://public.bybit.com/trading";

/// Builds the archive file name for a symbol and day.
///
/// # Example
///
/// ```
/// use tamagoyaki_fetch::url::archive_name;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// assert_eq!(archive_name("BTCUSD", day), "BTCUSD2024-01-15.csv.gz");
/// ```
#[must_use]
pub fn archive_name(symbol: &str, day: NaiveDate) -> String {
    format!("{}{}.csv.gz", symbol.to_uppercase(), day.format("%Y-%m-%d"))
}

/// Builds the URL for a specific day's trade archive.
///
/// URL format: `{BASE_URL}/{SYMBOL}/{SYMBOL}{YYYY-MM-DD}.csv.gz`
///
/// # Example
///
/// ```
/// use tamagoyaki_fetch::url::trade_url;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let url = trade_url("btcusd", day);
/// assert_eq!(url, "https://public.bybit.com/trading/BTCUSD/BTCUSD2024-01-15.csv.gz");
/// ```
#[must_use]
pub fn trade_url(symbol: &str, day: NaiveDate) -> String {
    format!(
        "{}/{}/{}",
        BASE_URL,
        symbol.to_uppercase(),
        archive_name(symbol, day)
    )
}
