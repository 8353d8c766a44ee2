//! A read-only window over part of a shared stream

use std::{
    fmt::{self, Debug},
    io::{self, Read, Seek, SeekFrom, Write},
    sync::{Arc, Mutex},
};

use tracing::{instrument, trace};

use crate::error::{Error, Result};

/// A base stream shared between every [`PartialStream`] created over it.
///
/// The mutex is the only synchronisation point: each view takes it for one
/// reposition-and-read pair.
pub type SharedStream<R> = Arc<Mutex<R>>;

/// Wraps a stream so that views can be created over it
pub fn share<R>(stream: R) -> SharedStream<R> {
    Arc::new(Mutex::new(stream))
}

/// Exposes the byte range `[start, start + length)` of a shared stream.
///
/// Each view keeps its own position, so any number of views over the same base stream can
/// be read in any order and from several threads. Positions reported by the view are
/// relative to `start`.
///
/// ```
/// # fn doit() -> bsa::error::Result<()> {
/// use std::io::{Cursor, Read};
/// use bsa::partial::{share, PartialStream};
///
/// let base = share(Cursor::new(b"Hello World".to_vec()));
/// let mut world = PartialStream::new(base.clone(), 6, 5)?;
///
/// let mut text = String::new();
/// world.read_to_string(&mut text)?;
/// assert_eq!(text, "World");
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct PartialStream<R> {
    base: SharedStream<R>,
    start: u64,
    end: u64,
    position: u64,
}

impl<R> Debug for PartialStream<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PartialStream")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("position", &self.position)
            .finish()
    }
}

impl<R> Clone for PartialStream<R> {
    fn clone(&self) -> Self {
        Self {
            base: Arc::clone(&self.base),
            start: self.start,
            end: self.end,
            position: self.position,
        }
    }
}

impl<R> PartialStream<R> {
    /// Create a view of `length` bytes beginning at absolute offset `start` of `base`
    pub fn new(base: SharedStream<R>, start: u64, length: u64) -> Result<Self> {
        let end = start.checked_add(length).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "window at {start} with length {length} overflows"
            ))
        })?;

        Ok(Self {
            base,
            start,
            end,
            position: start,
        })
    }

    /// Absolute offset of the first byte of the view in the base stream
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Number of bytes exposed by the view
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Whether the view exposes no bytes at all
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Current position, relative to the start of the view
    pub fn position(&self) -> u64 {
        self.position - self.start
    }

    /// Bytes left before the end of the view
    pub fn remaining(&self) -> u64 {
        self.end - self.position
    }

    /// The base stream the view reads from
    pub fn base(&self) -> &SharedStream<R> {
        &self.base
    }

    /// Moves the view, returning the new position relative to its start.
    ///
    /// Targets before the start of the view, and absolute targets past its end, fail with
    /// [`Error::OutOfRange`]. Relative targets past the end fail with [`Error::IOError`]. The
    /// position is left untouched on failure.
    pub fn seek_checked(&mut self, position: SeekFrom) -> Result<u64> {
        let target = match position {
            SeekFrom::Start(offset) => self.start as i128 + offset as i128,
            SeekFrom::Current(offset) => self.position as i128 + offset as i128,
            SeekFrom::End(offset) => self.end as i128 + offset as i128,
        };

        if target < self.start as i128 {
            return Err(Error::OutOfRange {
                position: target - self.start as i128,
                length: self.len(),
            });
        }

        if target > self.end as i128 {
            return match position {
                SeekFrom::Start(_) => Err(Error::OutOfRange {
                    position: target - self.start as i128,
                    length: self.len(),
                }),
                _ => Err(Error::IOError(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "cannot seek past the end",
                ))),
            };
        }

        self.position = target as u64;
        Ok(self.position())
    }

    /// Views cannot be resized
    pub fn set_len(&mut self, _length: u64) -> Result<()> {
        Err(Error::Unsupported("resizing a partial stream"))
    }
}

impl<R: Read + Seek> Read for PartialStream<R> {
    #[instrument(level = "trace", skip(self, buf), fields(len = buf.len()), err)]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining();
        if buf.is_empty() || remaining == 0 {
            return Ok(0);
        }

        let count = buf.len().min(usize::try_from(remaining).unwrap_or(usize::MAX));

        let read = {
            let mut base = self
                .base
                .lock()
                .map_err(|_| io::Error::other("base stream lock poisoned"))?;

            // The base stream may have been moved by another view since our last read
            base.seek(SeekFrom::Start(self.position))?;
            base.read(&mut buf[..count])?
        };

        trace!(offset = self.position, read, "read from base stream");
        self.position += read as u64;
        Ok(read)
    }
}

impl<R> Seek for PartialStream<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.seek_checked(pos).map_err(io::Error::from)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.position())
    }
}

impl<R> Write for PartialStream<R> {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(Error::Unsupported("writing to a partial stream").into())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
