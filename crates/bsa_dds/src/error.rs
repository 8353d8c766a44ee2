//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(binrw::Error),

    /// The data does not start with a well formed DDS header
    #[error("Invalid DDS header: {0}")]
    #[diagnostic(help("DDS files start with \"DDS \" followed by a 124 byte header"))]
    InvalidHeader(String),
}

impl From<binrw::Error> for Error {
    fn from(value: binrw::Error) -> Self {
        let invalid = match value.root_cause() {
            binrw::Error::BadMagic { pos, .. } => Some(format!("missing magic at 0x{pos:X}")),
            binrw::Error::AssertFail { pos, message } => Some(format!("{message} at 0x{pos:X}")),
            _ => None,
        };

        match invalid {
            Some(reason) => Error::InvalidHeader(reason),
            None => Error::BinRWError(value),
        }
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
