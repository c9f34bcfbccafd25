//! Gzip decompression for trade archives.

use flate2::read::MultiGzDecoder;
use std::io::Read;
use thiserror::Error;

/// Errors that can occur during decompression.
#[derive(Error, Debug)]
pub enum DecompressError {
    /// Gzip decompression failed.
    #[error("Gzip decompression failed: {0}")]
    Gzip(#[from] std::io::Error),

    /// Empty input data.
    #[error("Empty input data")]
    EmptyInput,
}

/// Decompresses a gzip-compressed trade archive.
///
/// Archives made of several concatenated gzip members are read to the end.
///
/// # Errors
///
/// Returns an error if the input is empty or not valid gzip.
///
/// # Example
///
/// ```ignore
/// use tamagoyaki_fetch::decompress_gzip;
///
/// let compressed = /* csv.gz body from HTTP */;
/// let csv = decompress_gzip(&compressed)?;
/// ```
pub fn decompress_gzip(compressed: &[u8]) -> Result<Vec<u8>, DecompressError> {
    if compressed.is_empty() {
        return Err(DecompressError::EmptyInput);
    }

    // Daily archives typically inflate around 5x.
    let mut decompressed = Vec::with_capacity(compressed.len().saturating_mul(5));
    MultiGzDecoder::new(compressed).read_to_end(&mut decompressed)?;

    Ok(decompressed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    #[test]
    fn test_empty_input() {
        let result = decompress_gzip(&[]);
        assert!(matches!(result, Err(DecompressError::EmptyInput)));
    }

    #[test]
    fn test_invalid_gzip() {
        let result = decompress_gzip(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(DecompressError::Gzip(_))));
    }

    #[test]
    fn test_decompress() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"timestamp,symbol,side,size,price\n").unwrap();
        let compressed = encoder.finish().unwrap();

        let result = decompress_gzip(&compressed).unwrap();
        assert_eq!(result, b"timestamp,symbol,side,size,price\n");
    }

    #[test]
    fn test_decompress_concatenated_members() {
        let member = |data: &[u8]| {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        };
        let mut compressed = member(b"timestamp,symbol,side,size,price\n");
        compressed.extend(member(b"1585180700.0647,BTCUSD,Buy,10,6698.5\n"));

        let result = decompress_gzip(&compressed).unwrap();
        assert_eq!(
            result,
            b"timestamp,symbol,side,size,price\n1585180700.0647,BTCUSD,Buy,10,6698.5\n"
        );
    }
}
