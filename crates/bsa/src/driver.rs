//! The boundary between the generic archive machinery and a concrete container format

use std::io::{Read, Seek, SeekFrom};

use tracing::{debug, instrument};

use crate::{
    archive::ArchiveOptions,
    binary::BinaryReader,
    compression::{CompressionMethod, Decompressor},
    entry::Entry,
    error::{Error, Result},
    folder::Directory,
};

/// Knows the on-disk layout of one container format
///
/// [`crate::Archive`] owns the file and hands the driver a [`BinaryReader`] positioned at the
/// start of it. The driver reads the directory table and returns the populated
/// [`Directory`]. Entry names must go through [`Entry::new`] so they are normalized the same
/// way lookups are, and every entry's `offset` and sizes must describe bytes that exist in
/// the file.
pub trait ArchiveFormatDriver {
    /// Check for the format's signature at the current position.
    ///
    /// The caller restores the stream position afterwards.
    fn probe<R: Read + Seek>(&self, reader: &mut BinaryReader<R>) -> Result<bool>;

    /// Parse the directory table of the archive
    fn read_directory<R: Read + Seek>(&self, reader: &mut BinaryReader<R>) -> Result<Directory>;

    /// How a compressed entry was stored
    fn compression(&self, entry: &Entry) -> CompressionMethod {
        if entry.is_compressed() {
            CompressionMethod::Zlib
        } else {
            CompressionMethod::None
        }
    }

    /// Turn the stored bytes of a compressed entry into its contents
    fn decompress(&self, entry: &Entry, data: Vec<u8>) -> Result<Vec<u8>> {
        self.compression(entry)
            .decompress(&data, entry.uncompressed_size() as usize)
    }
}

/// Ask `driver` whether `stream` holds one of its archives.
///
/// The stream is returned to its original position whatever the outcome, and a stream too
/// short to hold a signature is reported as `false`.
#[instrument(skip(driver, stream), err)]
pub fn probe<D, R>(driver: &D, stream: &mut R, options: &ArchiveOptions) -> Result<bool>
where
    D: ArchiveFormatDriver,
    R: Read + Seek,
{
    let position = stream.stream_position()?;

    let outcome = BinaryReader::with_options(&mut *stream, options.byte_order, options.encoding)
        .and_then(|mut reader| driver.probe(&mut reader));

    stream.seek(SeekFrom::Start(position))?;

    match outcome {
        Err(Error::UnexpectedEndOfInput) => {
            debug!("stream too short for a signature");
            Ok(false)
        }
        other => other,
    }
}

#[cfg(test)]
mod test {
    use std::io::{Cursor, Read, Seek, SeekFrom};

    use pretty_assertions::assert_eq;

    use super::{probe, ArchiveFormatDriver};
    use crate::{
        archive::ArchiveOptions,
        binary::BinaryReader,
        entry::Entry,
        error::{Error, Result},
        folder::Directory,
    };

    struct Magic;

    impl ArchiveFormatDriver for Magic {
        fn probe<R: Read + Seek>(&self, reader: &mut BinaryReader<R>) -> Result<bool> {
            Ok(reader.read_bytes(4)? == b"BSA\0")
        }

        fn read_directory<R: Read + Seek>(&self, _: &mut BinaryReader<R>) -> Result<Directory> {
            Err(Error::InvalidArchive("not needed".into()))
        }
    }

    #[test]
    fn probe_restores_position() -> Result<()> {
        let options = ArchiveOptions::default();
        let mut stream = Cursor::new(b"xxBSA\0rest".to_vec());

        stream.seek(SeekFrom::Start(2))?;
        assert!(probe(&Magic, &mut stream, &options)?);
        assert_eq!(stream.position(), 2);

        stream.seek(SeekFrom::Start(0))?;
        assert!(!probe(&Magic, &mut stream, &options)?);
        assert_eq!(stream.position(), 0);

        Ok(())
    }

    #[test]
    fn short_stream_is_not_an_archive() -> Result<()> {
        let mut stream = Cursor::new(b"BS".to_vec());
        stream.seek(SeekFrom::Start(1))?;

        assert!(!probe(&Magic, &mut stream, &ArchiveOptions::default())?);
        assert_eq!(stream.position(), 1);

        Ok(())
    }

    #[test]
    fn default_decompression_uses_zlib() -> Result<()> {
        #[rustfmt::skip]
        let compressed = vec![
            0x78, 0x9C, 0xF3, 0x48, 0xCD, 0xC9, 0xC9, 0x57, 0x08, 0xCF, 0x2F, 0xCA, 0x49, 0x01,
            0x00, 0x18, 0x0B, 0x04, 0x1D,
        ];
        let entry = Entry::new("hello.txt", 0, 19, 11)?;

        assert_eq!(Magic.decompress(&entry, compressed)?, b"Hello World");

        Ok(())
    }
}
