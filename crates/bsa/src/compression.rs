//! Decompression of entry data

use std::io::Read;

use flate2::read::ZlibDecoder;
use tracing::instrument;

use crate::error::{Error, Result};

/// Turns the stored bytes of a compressed entry back into its contents
pub trait Decompressor {
    /// Decompress `compressed`, which must expand to exactly `expected_len` bytes.
    ///
    /// Fails with [`Error::DecompressionFailure`] on malformed input or a length mismatch.
    fn decompress(&self, compressed: &[u8], expected_len: usize) -> Result<Vec<u8>>;
}

/// Identifies the storage format used for the data of an entry
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum CompressionMethod {
    /// Stores the data as it is
    None,

    /// Data compressed with Zlib
    #[default]
    Zlib,
}

impl Decompressor for CompressionMethod {
    #[instrument(skip(compressed), fields(compressed_len = compressed.len()), err)]
    fn decompress(&self, compressed: &[u8], expected_len: usize) -> Result<Vec<u8>> {
        let data = match self {
            CompressionMethod::None => compressed.to_vec(),
            CompressionMethod::Zlib => {
                let mut data = Vec::new();
                ZlibDecoder::new(compressed)
                    .take(expected_len as u64 + 1)
                    .read_to_end(&mut data)
                    .map_err(|e| Error::DecompressionFailure(e.to_string()))?;
                data
            }
        };

        if data.len() != expected_len {
            return Err(Error::DecompressionFailure(format!(
                "expected {expected_len} bytes but got {}{}",
                data.len(),
                if data.len() > expected_len { " or more" } else { "" }
            )));
        }

        Ok(data)
    }
}
