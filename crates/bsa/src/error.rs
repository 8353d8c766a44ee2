//! Error types that can be emitted from this library

use std::{io, path::PathBuf};

use miette::Diagnostic;
use thiserror::Error;

use crate::archive::ArchiveState;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// a required argument was empty or malformed
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// unable to find requested file or entry
    #[error("unable to find requested item: {0}")]
    NotFound(#[from] NotFoundError),

    /// the archive is not in a state that allows the operation
    #[error("cannot {operation} while the archive is {state}")]
    InvalidState {
        /// The operation that was attempted
        operation: &'static str,
        /// The state the archive was in
        state: ArchiveState,
    },

    /// a seek targeted a position outside of a stream window
    #[error("position {position} is outside of the stream window of length {length}")]
    OutOfRange {
        /// The requested position, relative to the start of the window
        position: i128,
        /// The length of the window
        length: u64,
    },

    /// more bytes were requested than the source holds
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    /// compressed entry data could not be decoded
    #[error("failed to decompress entry data: {0}")]
    DecompressionFailure(String),

    /// the extraction target exists and overwriting was not allowed
    #[error("destination {0} already exists")]
    DestinationExists(PathBuf),

    /// the directory structure of the archive could not be parsed
    #[error("file is an invalid archive: {0}")]
    InvalidArchive(String),

    /// the operation is not supported by a read-only stream
    #[error("{0} is not supported")]
    Unsupported(&'static str),
}

/// Error type to provide further information when something has not been found
#[derive(Error, Diagnostic, Debug)]
#[error("unable to find requested item")]
pub enum NotFoundError {
    /// file {0} does not exist
    #[error("file {} does not exist", .0.display())]
    File(PathBuf),

    /// no entry named {0}
    #[error("no entry named {0}")]
    Entry(String),
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        if value.get_ref().is_some_and(|inner| inner.is::<Error>()) {
            if let Some(inner) = value.into_inner() {
                if let Ok(error) = inner.downcast::<Error>() {
                    return *error;
                }
            }
            return Error::IOError(io::Error::other("wrapped error was lost"));
        }

        Error::IOError(value)
    }
}

impl From<Error> for io::Error {
    fn from(value: Error) -> Self {
        let kind = match &value {
            Error::IOError(inner) => inner.kind(),
            Error::UnexpectedEndOfInput => io::ErrorKind::UnexpectedEof,
            Error::OutOfRange { .. } | Error::InvalidArgument(_) => io::ErrorKind::InvalidInput,
            Error::Unsupported(_) => io::ErrorKind::Unsupported,
            Error::NotFound(_) => io::ErrorKind::NotFound,
            Error::DestinationExists(_) => io::ErrorKind::AlreadyExists,
            _ => io::ErrorKind::Other,
        };

        match value {
            Error::IOError(inner) => inner,
            other => io::Error::new(kind, other),
        }
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
