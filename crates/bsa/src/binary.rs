//! Endian aware decoding of scalars and strings
//!
//! Directory tables store their names with one of a handful of string layouts. All of them are
//! decoded with a single-byte code page rather than UTF-8, which is how the game tools wrote them.
//!
//! | Layout     | Prefix  | Terminator              | Reader method       |
//! |------------|---------|-------------------------|---------------------|
//! | z-string   | none    | one `0x00`, consumed    | [`BinaryReader::read_zstring`]  |
//! | b-string   | 1 byte  | none                    | [`BinaryReader::read_bstring`]  |
//! | bz-string  | 1 byte  | trailing `0x00` stripped | [`BinaryReader::read_bzstring`] |
//! | w-string   | 2 bytes | none                    | [`BinaryReader::read_wstring`]  |
//! | wz-string  | 2 bytes | trailing `0x00` stripped | [`BinaryReader::read_wzstring`] |
//! | fixed      | none    | trailing `0x00` stripped | [`BinaryReader::read_fixed_string`] |
//!

use std::io::{self, Read, Seek, SeekFrom};

use binrw::BinRead;
use byteorder::{NativeEndian, ReadBytesExt};
use encoding_rs::{Encoding, WINDOWS_1252};
use tracing::trace;

use crate::{
    byteswap::{ByteOrder, ByteSwap},
    error::{Error, Result},
};

/// Width of the length prefix in front of a string
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LengthPrefix {
    /// No prefix, the string ends at the first `0x00`
    None,

    /// One unsigned byte
    U8,

    /// An unsigned 16-bit integer in the reader's byte order
    U16,

    /// An unsigned 32-bit integer in the reader's byte order
    U32,
}

mod private {
    pub trait Sealed {}
}

/// A fixed width integer that can be decoded by [`BinaryReader`]
pub trait Scalar: ByteSwap + Copy + private::Sealed {
    /// Reads the value with the bytes laid out in host order
    #[doc(hidden)]
    fn read_native<R: Read>(reader: &mut R) -> io::Result<Self>;
}

macro_rules! scalar {
    ($($ty:ty => $method:ident),+ $(,)?) => {
        $(
            impl private::Sealed for $ty {}

            impl Scalar for $ty {
                #[inline]
                fn read_native<R: Read>(reader: &mut R) -> io::Result<Self> {
                    reader.$method::<NativeEndian>()
                }
            }
        )+
    };
}

scalar!(
    u16 => read_u16,
    i16 => read_i16,
    u32 => read_u32,
    i32 => read_i32,
    u64 => read_u64,
    i64 => read_i64,
);

/// Rejects code pages that do not map every byte onto exactly one character
pub(crate) fn check_encoding(encoding: &'static Encoding) -> Result<()> {
    if encoding.is_single_byte() {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "{} is not a single-byte code page",
            encoding.name()
        )))
    }
}

fn end_of_input(error: io::Error) -> Error {
    match error.kind() {
        io::ErrorKind::UnexpectedEof => Error::UnexpectedEndOfInput,
        _ => Error::from(error),
    }
}

fn strip_trailing_nulls(data: &mut Vec<u8>) {
    let keep = data.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    data.truncate(keep);
}

/// Reads binary primitives from a byte source
///
/// ```
/// # fn doit() -> bsa::error::Result<()> {
/// use bsa::{binary::BinaryReader, ByteOrder};
///
/// let data = [0x00, 0x10, 0x05, b'a', b'b', b'c', b'd', 0x00];
/// let mut reader = BinaryReader::with_options(
///     &data[..],
///     ByteOrder::Big,
///     encoding_rs::WINDOWS_1252,
/// )?;
///
/// assert_eq!(reader.read_u16()?, 16);
/// assert_eq!(reader.read_bzstring()?, "abcd");
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug)]
pub struct BinaryReader<R> {
    inner: R,
    byte_order: ByteOrder,
    encoding: &'static Encoding,
}

impl<R> BinaryReader<R> {
    /// Creates a little endian reader decoding strings as Windows-1252
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            byte_order: ByteOrder::Little,
            encoding: WINDOWS_1252,
        }
    }

    /// Creates a reader with an explicit byte order and code page.
    ///
    /// Fails with [`Error::InvalidArgument`] if `encoding` is not a single-byte code page.
    pub fn with_options(
        inner: R,
        byte_order: ByteOrder,
        encoding: &'static Encoding,
    ) -> Result<Self> {
        check_encoding(encoding)?;
        Ok(Self {
            inner,
            byte_order,
            encoding,
        })
    }

    /// The byte order used by [`BinaryReader::read_scalar`] and string prefixes
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// The code page used for decoding strings
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Gets a reference to the underlying source
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Gets a mutable reference to the underlying source
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwrap and return the inner source
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Decodes raw bytes with the reader's code page
    pub fn decode(&self, data: &[u8]) -> String {
        self.encoding
            .decode_without_bom_handling(data)
            .0
            .into_owned()
    }
}

impl<R: Read> BinaryReader<R> {
    /// Reads a single byte
    pub fn read_u8(&mut self) -> Result<u8> {
        self.inner.read_u8().map_err(end_of_input)
    }

    /// Reads a single signed byte
    pub fn read_i8(&mut self) -> Result<i8> {
        self.inner.read_i8().map_err(end_of_input)
    }

    /// Reads a scalar stored in the given byte order
    pub fn read_scalar_in<T: Scalar>(&mut self, order: ByteOrder) -> Result<T> {
        let value = T::read_native(&mut self.inner).map_err(end_of_input)?;
        Ok(if order.is_foreign() {
            value.swap()
        } else {
            value
        })
    }

    /// Reads a scalar stored in the reader's byte order
    pub fn read_scalar<T: Scalar>(&mut self) -> Result<T> {
        self.read_scalar_in(self.byte_order)
    }

    /// Reads a big endian scalar regardless of the reader's byte order
    pub fn read_scalar_be<T: Scalar>(&mut self) -> Result<T> {
        self.read_scalar_in(ByteOrder::Big)
    }

    /// Reads a little endian scalar regardless of the reader's byte order
    pub fn read_scalar_le<T: Scalar>(&mut self) -> Result<T> {
        self.read_scalar_in(ByteOrder::Little)
    }

    /// Reads an unsigned 16-bit integer in the reader's byte order
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_scalar()
    }

    /// Reads a signed 16-bit integer in the reader's byte order
    pub fn read_i16(&mut self) -> Result<i16> {
        self.read_scalar()
    }

    /// Reads an unsigned 32-bit integer in the reader's byte order
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_scalar()
    }

    /// Reads a signed 32-bit integer in the reader's byte order
    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_scalar()
    }

    /// Reads an unsigned 64-bit integer in the reader's byte order
    pub fn read_u64(&mut self) -> Result<u64> {
        self.read_scalar()
    }

    /// Reads a signed 64-bit integer in the reader's byte order
    pub fn read_i64(&mut self) -> Result<i64> {
        self.read_scalar()
    }

    /// Reads exactly `count` bytes.
    ///
    /// The buffer only grows as bytes arrive, so a corrupt count cannot force a huge allocation.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        self.inner
            .by_ref()
            .take(count as u64)
            .read_to_end(&mut data)
            .map_err(end_of_input)?;

        if data.len() != count {
            return Err(Error::UnexpectedEndOfInput);
        }
        Ok(data)
    }

    /// Reads a string terminated by `0x00`.
    ///
    /// The terminator is consumed but not returned.
    pub fn read_zstring(&mut self) -> Result<String> {
        let mut raw = Vec::new();
        loop {
            let byte = self.read_u8()?;
            if byte == b'\0' {
                break;
            }
            raw.push(byte);
        }
        Ok(self.decode(&raw))
    }

    /// Reads a string with a length prefix, optionally dropping trailing `0x00` bytes.
    ///
    /// [`LengthPrefix::None`] reads a z-string and ignores `strip_nulls`.
    pub fn read_string(&mut self, prefix: LengthPrefix, strip_nulls: bool) -> Result<String> {
        let count = match prefix {
            LengthPrefix::None => return self.read_zstring(),
            LengthPrefix::U8 => self.read_u8()? as usize,
            LengthPrefix::U16 => self.read_u16()? as usize,
            LengthPrefix::U32 => self.read_u32()? as usize,
        };
        trace!(?prefix, count, "reading prefixed string");

        let mut raw = self.read_bytes(count)?;
        if strip_nulls {
            strip_trailing_nulls(&mut raw);
        }
        Ok(self.decode(&raw))
    }

    /// Reads a string prefixed by a one byte length
    pub fn read_bstring(&mut self) -> Result<String> {
        self.read_string(LengthPrefix::U8, false)
    }

    /// Reads a string prefixed by a one byte length that counts its null padding
    pub fn read_bzstring(&mut self) -> Result<String> {
        self.read_string(LengthPrefix::U8, true)
    }

    /// Reads a string prefixed by a two byte length
    pub fn read_wstring(&mut self) -> Result<String> {
        self.read_string(LengthPrefix::U16, false)
    }

    /// Reads a string prefixed by a two byte length that counts its null padding
    pub fn read_wzstring(&mut self) -> Result<String> {
        self.read_string(LengthPrefix::U16, true)
    }

    /// Reads a string stored in a field of exactly `length` bytes, padded with `0x00`
    pub fn read_fixed_string(&mut self, length: usize) -> Result<String> {
        if length == 0 {
            return Err(Error::InvalidArgument(
                "fixed string length must be at least 1".into(),
            ));
        }

        let mut raw = self.read_bytes(length)?;
        strip_trailing_nulls(&mut raw);
        Ok(self.decode(&raw))
    }
}

impl<R: Read + Seek> BinaryReader<R> {
    /// Reads a binrw structure using the reader's byte order
    pub fn read_struct<T>(&mut self) -> Result<T>
    where
        T: BinRead,
        for<'a> T::Args<'a>: Default,
    {
        T::read_options(&mut self.inner, self.byte_order.into(), Default::default()).map_err(
            |e| {
                let eof = matches!(
                    e.root_cause(),
                    binrw::Error::Io(io) if io.kind() == io::ErrorKind::UnexpectedEof
                );
                if eof {
                    Error::UnexpectedEndOfInput
                } else {
                    Error::from(e)
                }
            },
        )
    }

    /// Current position in the underlying source
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Moves the underlying source, returning the new position
    pub fn seek(&mut self, position: SeekFrom) -> Result<u64> {
        Ok(self.inner.seek(position)?)
    }
}

impl<R: Read> Read for BinaryReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::BinRead;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::{BinaryReader, LengthPrefix};
    use crate::{
        byteswap::ByteOrder,
        error::{Error, Result},
    };

    fn big(data: &[u8]) -> BinaryReader<&[u8]> {
        BinaryReader::with_options(data, ByteOrder::Big, encoding_rs::WINDOWS_1252).unwrap()
    }

    #[test]
    fn zstring_stops_at_first_null() -> Result<()> {
        let mut reader = BinaryReader::new(&[0x41, 0x42, 0x00, 0x43][..]);

        assert_eq!(reader.read_zstring()?, "AB");
        assert_eq!(reader.read_u8()?, 0x43);

        Ok(())
    }

    #[test]
    fn zstring_without_terminator_fails() {
        let mut reader = BinaryReader::new(&[0x41, 0x42][..]);
        assert!(matches!(
            reader.read_zstring(),
            Err(Error::UnexpectedEndOfInput)
        ));
    }

    #[test]
    fn bzstring_strips_padding() -> Result<()> {
        let data = [0x05, b'a', b'b', b'c', b'd', 0x00];

        assert_eq!(BinaryReader::new(&data[..]).read_bzstring()?, "abcd");
        assert_eq!(BinaryReader::new(&data[..]).read_bstring()?, "abcd\0");

        Ok(())
    }

    #[test]
    fn zero_prefix_is_empty() -> Result<()> {
        let mut reader = BinaryReader::new(&[0x00, 0x00, 0x00][..]);

        assert_eq!(reader.read_bstring()?, "");
        assert_eq!(reader.read_wzstring()?, "");

        Ok(())
    }

    #[test]
    fn wstring_prefix_follows_byte_order() -> Result<()> {
        #[rustfmt::skip]
        let little = [
            0x03, 0x00, b'f', b'o', b'o',
        ];
        #[rustfmt::skip]
        let swapped = [
            0x00, 0x04, b'b', b'a', b'r', 0x00,
        ];

        assert_eq!(BinaryReader::new(&little[..]).read_wstring()?, "foo");
        assert_eq!(big(&swapped).read_wzstring()?, "bar");

        Ok(())
    }

    #[test]
    fn prefix_longer_than_input_fails() {
        let mut reader = BinaryReader::new(&[0x08, b'a', b'b'][..]);
        assert!(matches!(
            reader.read_bstring(),
            Err(Error::UnexpectedEndOfInput)
        ));
    }

    #[test]
    fn scalars_honour_requested_order() -> Result<()> {
        let data = [0x12, 0x34, 0x12, 0x34];
        let mut reader = BinaryReader::new(&data[..]);

        assert_eq!(reader.read_scalar_be::<u16>()?, 0x1234);
        assert_eq!(reader.read_scalar_le::<u16>()?, 0x3412);

        #[rustfmt::skip]
        let data = [
            0x01, 0x02, 0x03, 0x04,
            0xFF, 0xFF, 0xFF, 0xFE,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00,
        ];
        let mut reader = big(&data);
        assert_eq!(reader.read_u32()?, 0x0102_0304);
        assert_eq!(reader.read_i32()?, -2);
        assert_eq!(reader.read_u64()?, 256);

        Ok(())
    }

    #[test]
    fn short_scalar_fails() {
        let mut reader = BinaryReader::new(&[0x01, 0x02, 0x03][..]);
        assert!(matches!(
            reader.read_u32(),
            Err(Error::UnexpectedEndOfInput)
        ));
    }

    #[test]
    fn decodes_with_code_page() -> Result<()> {
        let data = [0x80, 0xE9, 0x00];
        assert_eq!(BinaryReader::new(&data[..]).read_zstring()?, "\u{20AC}\u{E9}");

        let mut cyrillic = BinaryReader::with_options(
            &[0x01, 0xC0][..],
            ByteOrder::Little,
            encoding_rs::WINDOWS_1251,
        )?;
        assert_eq!(cyrillic.read_bstring()?, "\u{410}");

        Ok(())
    }

    #[test]
    fn rejects_multi_byte_encodings() {
        let reader =
            BinaryReader::with_options(&[0u8; 0][..], ByteOrder::Little, encoding_rs::UTF_8);
        assert!(matches!(reader, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn fixed_string_strips_padding() -> Result<()> {
        let mut reader = BinaryReader::new(&[b'D', b'X', b'T', 0x00, 0x00, 0x00, 0x00, 0x00][..]);

        assert_eq!(reader.read_fixed_string(5)?, "DXT");
        assert_eq!(reader.read_fixed_string(3)?, "");
        assert!(matches!(
            reader.read_fixed_string(0),
            Err(Error::InvalidArgument(_))
        ));

        Ok(())
    }

    #[test]
    fn general_string_with_u32_prefix() -> Result<()> {
        let mut reader = BinaryReader::new(&[0x02, 0x00, 0x00, 0x00, b'o', b'k'][..]);
        assert_eq!(reader.read_string(LengthPrefix::U32, false)?, "ok");
        Ok(())
    }

    #[derive(BinRead, Debug, PartialEq)]
    struct Record {
        id: u16,
        size: u32,
    }

    #[test]
    fn reads_binrw_structs_in_configured_order() -> Result<()> {
        let data = [0x00, 0x01, 0x00, 0x00, 0x00, 0x02];

        let mut reader = BinaryReader::with_options(
            Cursor::new(&data[..]),
            ByteOrder::Big,
            encoding_rs::WINDOWS_1252,
        )?;
        assert_eq!(reader.read_struct::<Record>()?, Record { id: 1, size: 2 });
        assert_eq!(reader.position()?, 6);

        let mut reader = BinaryReader::new(Cursor::new(&data[..4]));
        assert!(matches!(
            reader.read_struct::<Record>(),
            Err(Error::UnexpectedEndOfInput)
        ));

        Ok(())
    }

    proptest! {
        #[test]
        fn bzstring_round_trip(value in "[ -~]{0,200}", padding in 1usize..4) {
            let mut encoded = vec![(value.len() + padding) as u8];
            encoded.extend_from_slice(value.as_bytes());
            encoded.extend(std::iter::repeat(0u8).take(padding));

            let decoded = BinaryReader::new(&encoded[..]).read_bzstring().unwrap();
            prop_assert_eq!(decoded, value);
        }

        #[test]
        fn wzstring_round_trip(value in "[ -~]{0,1000}") {
            let length = (value.len() + 1) as u16;
            let mut encoded = length.to_be_bytes().to_vec();
            encoded.extend_from_slice(value.as_bytes());
            encoded.push(0);

            let decoded = big(&encoded).read_wzstring().unwrap();
            prop_assert_eq!(decoded, value);
        }
    }
}
