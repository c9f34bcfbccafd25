//! Date range and day iteration.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use crate::{DateRangeError, TamagoyakiError};

/// Calendar date format accepted on the command line (`YYYYMMDD`).
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Parses an 8-digit `YYYYMMDD` calendar date.
///
/// # Errors
///
/// Returns [`TamagoyakiError::InvalidDate`] for anything that is not exactly
/// eight digits forming a valid date.
pub fn parse_date(s: &str) -> Result<NaiveDate, TamagoyakiError> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TamagoyakiError::InvalidDate(s.to_string()));
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| TamagoyakiError::InvalidDate(s.to_string()))
}

/// Returns the half-open UTC instant range `[day 00:00, next day 00:00)`.
#[must_use]
pub fn day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_time(chrono::NaiveTime::MIN).and_utc();
    (start, start + TimeDelta::days(1))
}

/// A range of calendar days for ingestion or export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// Start date (inclusive).
    pub start: NaiveDate,
    /// End date (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a date range for a single day.
    #[must_use]
    pub const fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Parses a range from two `YYYYMMDD` strings.
    ///
    /// # Errors
    ///
    /// Returns an error if either date is malformed or begin > end.
    pub fn parse(begin: &str, end: &str) -> Result<Self, TamagoyakiError> {
        let start = parse_date(begin)?;
        let end = parse_date(end)?;
        Ok(Self::new(start, end)?)
    }

    /// Returns an iterator over all days in the date range.
    pub fn days(&self) -> DayIterator {
        DayIterator {
            current: self.start,
            end: self.end,
        }
    }

    /// Returns the total number of days in the range.
    #[must_use]
    pub fn total_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// Returns the half-open UTC instant range covered by these days.
    #[must_use]
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let (from, _) = day_bounds(self.start);
        let (_, to) = day_bounds(self.end);
        (from, to)
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Iterator over all days in a date range.
#[derive(Debug, Clone)]
pub struct DayIterator {
    current: NaiveDate,
    end: NaiveDate,
}

impl Iterator for DayIterator {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current > self.end {
            return None;
        }

        let result = self.current;
        match self.current.succ_opt() {
            Some(next) => self.current = next,
            // Past the last representable date; make the iterator empty.
            None => self.end = self.current.pred_opt().unwrap_or(self.current),
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.current > self.end {
            return (0, Some(0));
        }
        let days = (self.end - self.current).num_days() as usize + 1;
        (days, Some(days))
    }
}

impl ExactSizeIterator for DayIterator {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_date_range_new() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let range = DateRange::new(start, end).unwrap();

        assert_eq!(range.start, start);
        assert_eq!(range.end, end);
        assert_eq!(range.total_days(), 31);
    }

    #[test]
    fn test_date_range_invalid() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(DateRange::new(start, end).is_err());
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("20240229").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 2, 29));

        assert!(parse_date("2024-02-29").is_err());
        assert!(parse_date("20230229").is_err());
        assert!(parse_date("2024229").is_err());
        assert!(parse_date("+2024022").is_err());
    }

    #[test]
    fn test_parse_range() {
        let range = DateRange::parse("20240101", "20240103").unwrap();
        assert_eq!(range.total_days(), 3);
        assert!(matches!(
            DateRange::parse("20240103", "20240101"),
            Err(TamagoyakiError::DateRange(_))
        ));
    }

    #[test]
    fn test_day_iterator() {
        let range = DateRange::parse("20240227", "20240302").unwrap();
        let days: Vec<_> = range.days().collect();

        assert_eq!(range.days().len(), 5);
        assert_eq!(days.len(), 5);
        assert_eq!(days[2], NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(days[4], NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    }

    #[test]
    fn test_bounds() {
        let range = DateRange::parse("20240101", "20240102").unwrap();
        let (from, to) = range.bounds();
        assert_eq!(from.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(to.to_rfc3339(), "2024-01-03T00:00:00+00:00");
    }
}
