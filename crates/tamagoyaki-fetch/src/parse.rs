//! Trade parsing from archive CSV.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use tamagoyaki_types::{Side, Trade};
use thiserror::Error;

/// Errors that can occur during trade parsing.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Underlying CSV reader failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Header row lacks a required column.
    #[error("Missing column '{0}' in header")]
    MissingColumn(&'static str),

    /// A data row could not be interpreted.
    #[error("Invalid row at line {line}: {reason}")]
    InvalidRow {
        /// 1-based line number in the CSV file.
        line: u64,
        /// What was wrong with the row.
        reason: String,
    },
}

/// Column positions of the fields tamagoyaki uses.
#[derive(Debug, Clone, Copy)]
struct Columns {
    timestamp: usize,
    side: usize,
    size: usize,
    price: usize,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, ParseError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or(ParseError::MissingColumn(name))
        };
        Ok(Self {
            timestamp: find("timestamp")?,
            side: find("side")?,
            size: find("size")?,
            price: find("price")?,
        })
    }
}

/// Parses trades from a decompressed archive.
///
/// The archive is a CSV file with a header row naming at least the
/// `timestamp`, `side`, `size` and `price` columns, e.g.
///
/// ```text
/// timestamp,symbol,side,size,price,tickDirection,trdMatchID,grossValue,homeNotional,foreignNotional
/// 1585180700.0647,BTCUSD,Sell,1,6680.5,ZeroMinusTick,...
/// ```
///
/// Rows are returned in file order.
///
/// # Errors
///
/// Returns an error on a missing column or the first malformed row.
pub fn parse_trades(data: &[u8]) -> Result<Vec<Trade>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let columns = Columns::from_headers(reader.headers()?)?;
    let mut trades = Vec::new();
    let mut record = csv::StringRecord::new();

    while reader.read_record(&mut record)? {
        let line = record.position().map_or(0, csv::Position::line);
        trades.push(parse_record(&record, columns).map_err(|reason| ParseError::InvalidRow {
            line,
            reason,
        })?);
    }

    Ok(trades)
}

fn parse_record(record: &csv::StringRecord, columns: Columns) -> Result<Trade, String> {
    let field = |index: usize, name: &str| {
        record
            .get(index)
            .map(str::trim)
            .ok_or_else(|| format!("missing {name}"))
    };

    let timestamp = parse_timestamp(field(columns.timestamp, "timestamp")?)?;
    let side = Side::from_str(field(columns.side, "side")?).map_err(|e| e.to_string())?;
    let size = parse_decimal(field(columns.size, "size")?)?;
    let price = parse_decimal(field(columns.price, "price")?)?;

    if size.is_sign_negative() {
        return Err(format!("negative size {size}"));
    }
    if price <= Decimal::ZERO {
        return Err(format!("non-positive price {price}"));
    }

    Ok(Trade::new(timestamp, side, size, price))
}

fn parse_decimal(s: &str) -> Result<Decimal, String> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|e| format!("invalid decimal '{s}': {e}"))
}

/// Parses an epoch timestamp exactly, without going through floating point.
///
/// Accepts fractional seconds (`1585180700.0647`) and, for archives that use
/// them, integer milliseconds (13 or more digits).
///
/// # Errors
///
/// Returns a description of the problem if the value is not a valid instant.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    let invalid = || format!("invalid timestamp '{s}'");

    let (secs, nanos) = match s.split_once('.') {
        Some((whole, frac)) => {
            if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            let secs: i64 = whole.parse().map_err(|_| invalid())?;
            // Keep nanosecond precision, drop anything finer.
            let digits = &frac[..frac.len().min(9)];
            let nanos: u32 = digits.parse().map_err(|_| invalid())?;
            let nanos = nanos * 10u32.pow(9 - digits.len() as u32);
            // The fraction carries the sign of the whole value: -1.5 is 1.5s before the epoch.
            if whole.starts_with('-') && nanos > 0 {
                (secs - 1, 1_000_000_000 - nanos)
            } else {
                (secs, nanos)
            }
        }
        None => {
            let value: i64 = s.parse().map_err(|_| invalid())?;
            if s.trim_start_matches('-').len() >= 13 {
                let nanos = value.rem_euclid(1000) as u32 * 1_000_000;
                (value.div_euclid(1000), nanos)
            } else {
                (value, 0)
            }
        }
    };

    DateTime::from_timestamp(secs, nanos).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use rust_decimal_macros::dec;

    const HEADER: &str = "timestamp,symbol,side,size,price,tickDirection,trdMatchID,grossValue,homeNotional,foreignNotional\n";

    #[test]
    fn test_parse_archive_rows() {
        let csv = format!(
            "{HEADER}\
             1585180700.0647,BTCUSD,Sell,1,6680.5,ZeroMinusTick,a1,14970.0,1,0.00014970\n\
             1585180700.5,BTCUSD,Buy,25,6681,PlusTick,a2,374189.0,25,0.00374189\n"
        );

        let trades = parse_trades(csv.as_bytes()).unwrap();
        assert_eq!(trades.len(), 2);

        assert_eq!(trades[0].timestamp.timestamp(), 1_585_180_700);
        assert_eq!(trades[0].timestamp.nanosecond(), 64_700_000);
        assert_eq!(trades[0].side, Side::Sell);
        assert_eq!(trades[0].size, dec!(1));
        assert_eq!(trades[0].price, dec!(6680.5));

        assert_eq!(trades[1].side, Side::Buy);
        assert_eq!(trades[1].size, dec!(25));
        assert_eq!(trades[1].timestamp.nanosecond(), 500_000_000);
    }

    #[test]
    fn test_header_only() {
        let trades = parse_trades(HEADER.as_bytes()).unwrap();
        assert!(trades.is_empty());
    }

    #[test]
    fn test_missing_column() {
        let result = parse_trades(b"timestamp,symbol,size,price\n1,BTCUSD,1,1\n");
        assert!(matches!(result, Err(ParseError::MissingColumn("side"))));
    }

    #[test]
    fn test_invalid_row_reports_line() {
        let csv = format!("{HEADER}1585180700.1,BTCUSD,Buy,1,6680.5\n1585180701.1,BTCUSD,Hold,1,6680.5\n");
        let err = parse_trades(csv.as_bytes()).unwrap_err();
        match err {
            ParseError::InvalidRow { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("Hold"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_non_positive_price() {
        let csv = format!("{HEADER}1585180700.1,BTCUSD,Buy,1,0\n");
        assert!(matches!(
            parse_trades(csv.as_bytes()),
            Err(ParseError::InvalidRow { .. })
        ));
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("1585180700.123456789123").unwrap();
        assert_eq!(ts.timestamp(), 1_585_180_700);
        assert_eq!(ts.nanosecond(), 123_456_789);

        let ts = parse_timestamp("1672531200").unwrap();
        assert_eq!(ts.timestamp(), 1_672_531_200);

        let ts = parse_timestamp("1672531200123").unwrap();
        assert_eq!(ts.timestamp(), 1_672_531_200);
        assert_eq!(ts.nanosecond(), 123_000_000);

        assert!(parse_timestamp("abc").is_err());
        assert!(parse_timestamp("1585180700.").is_err());
        assert!(parse_timestamp("1585180700.1e3").is_err());
    }

    #[test]
    fn test_parse_timestamp_before_epoch() {
        let ts = parse_timestamp("-1.5").unwrap();
        assert_eq!(ts.timestamp(), -2);
        assert_eq!(ts.nanosecond(), 500_000_000);
        assert_eq!(ts.timestamp_millis(), -1500);

        let ts = parse_timestamp("-0.25").unwrap();
        assert_eq!(ts.timestamp_millis(), -250);

        let ts = parse_timestamp("-2.0").unwrap();
        assert_eq!(ts.timestamp(), -2);
        assert_eq!(ts.nanosecond(), 0);

        assert!(parse_timestamp("-0.25").unwrap() < parse_timestamp("0.25").unwrap());
    }

    #[test]
    fn test_scientific_decimal() {
        assert_eq!(parse_decimal("1.5e-3").unwrap(), dec!(0.0015));
        assert!(parse_decimal("n/a").is_err());
    }
}
