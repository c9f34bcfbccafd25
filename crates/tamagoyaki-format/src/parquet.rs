//! Apache Parquet output format.

use arrow::array::{Float64Array, StringArray, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::io::Write;
use std::sync::Arc;
use tamagoyaki_aggregate::Candle;

use crate::{FormatError, Formatter};

/// Parquet formatter.
#[derive(Debug, Clone)]
pub struct ParquetFormatter {
    /// Row group size (number of rows per group).
    row_group_size: usize,
    /// Compression codec.
    compression: Compression,
}

impl Default for ParquetFormatter {
    fn default() -> Self {
        Self {
            row_group_size: 100_000,
            compression: Compression::SNAPPY,
        }
    }
}

impl ParquetFormatter {
    /// Creates a new Parquet formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row group size.
    #[must_use]
    pub const fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Sets the compression codec.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Creates the Arrow schema for candle data.
    fn candle_schema() -> Schema {
        let mut fields = vec![
            Field::new(
                "timestamp",
                DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
                false,
            ),
            Field::new("exchange", DataType::Utf8, false),
            Field::new("symbol", DataType::Utf8, false),
        ];
        fields.extend(
            VALUE_COLUMNS
                .iter()
                .map(|(name, _)| Field::new(*name, DataType::Float64, false)),
        );
        Schema::new(fields)
    }

    /// Converts candles to an Arrow `RecordBatch`.
    fn candles_to_batch(candles: &[Candle]) -> Result<RecordBatch, FormatError> {
        let timestamps: Vec<_> = candles
            .iter()
            .map(|c| c.timestamp.timestamp_micros())
            .collect();
        let exchanges: Vec<_> = candles.iter().map(|c| c.exchange.as_str()).collect();
        let symbols: Vec<_> = candles.iter().map(|c| c.symbol.as_str()).collect();

        let mut columns: Vec<arrow::array::ArrayRef> = vec![
            Arc::new(TimestampMicrosecondArray::from(timestamps).with_timezone("UTC")),
            Arc::new(StringArray::from(exchanges)),
            Arc::new(StringArray::from(symbols)),
        ];
        for (name, get) in VALUE_COLUMNS {
            let values = candles
                .iter()
                .map(|c| to_f64(name, get(c)))
                .collect::<Result<Vec<_>, _>>()?;
            columns.push(Arc::new(Float64Array::from(values)));
        }

        RecordBatch::try_new(Arc::new(Self::candle_schema()), columns)
            .map_err(|e| FormatError::Parquet(e.to_string()))
    }
}

type Getter = fn(&Candle) -> Decimal;

const VALUE_COLUMNS: [(&str, Getter); 7] = [
    ("open", |c| c.open),
    ("high", |c| c.high),
    ("low", |c| c.low),
    ("close", |c| c.close),
    ("volume", |c| c.volume),
    ("buy_volume", |c| c.buy_volume),
    ("sell_volume", |c| c.sell_volume),
];

fn to_f64(column: &'static str, value: Decimal) -> Result<f64, FormatError> {
    value.to_f64().ok_or_else(|| FormatError::Float {
        column,
        value: value.to_string(),
    })
}

impl Formatter for ParquetFormatter {
    fn write_candles<W: Write + Send>(
        &self,
        candles: &[Candle],
        writer: W,
    ) -> Result<(), FormatError> {
        let schema = Arc::new(Self::candle_schema());
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut arrow_writer = ArrowWriter::try_new(writer, schema, Some(props))
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        for chunk in candles.chunks(self.row_group_size.max(1)) {
            let batch = Self::candles_to_batch(chunk)?;
            arrow_writer
                .write(&batch)
                .map_err(|e| FormatError::Parquet(e.to_string()))?;
        }

        arrow_writer
            .close()
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        Ok(())
    }

    fn extension(&self) -> &str {
        "parquet"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;
    use chrono::{TimeZone, Utc};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use rust_decimal_macros::dec;
    use std::io::Cursor;

    fn create_test_candle(minute: u32) -> Candle {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 15, 12, minute, 0).unwrap();
        Candle::new(
            "bybit",
            "BTCUSD",
            timestamp,
            dec!(42000.5),
            dec!(42010),
            dec!(41990),
            dec!(42005),
            dec!(1.25),
            dec!(0.75),
        )
    }

    #[test]
    fn test_parquet_candles() {
        let formatter = ParquetFormatter::new().with_row_group_size(1);
        let candles = vec![create_test_candle(0), create_test_candle(1)];
        let mut output = Cursor::new(Vec::new());

        formatter.write_candles(&candles, &mut output).unwrap();

        // Parquet files start with "PAR1" magic bytes
        let data = output.into_inner();
        assert!(data.len() > 4);
        assert_eq!(&data[0..4], b"PAR1");

        let reader = ParquetRecordBatchReaderBuilder::try_new(bytes::Bytes::from(data))
            .unwrap()
            .build()
            .unwrap();
        let batches: Vec<_> = reader.map(|b| b.unwrap()).collect();
        let rows: usize = batches.iter().map(RecordBatch::num_rows).sum();
        assert_eq!(rows, 2);

        let volume = batches[0]
            .column_by_name("volume")
            .unwrap()
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert!(!volume.is_null(0));
        assert!((volume.value(0) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_candle_schema() {
        let schema = ParquetFormatter::candle_schema();
        assert_eq!(schema.fields().len(), 10);
        assert!(schema.field_with_name("timestamp").is_ok());
        assert!(schema.field_with_name("buy_volume").is_ok());
        assert_eq!(
            schema.field_with_name("close").unwrap().data_type(),
            &DataType::Float64
        );
    }
}
