//! Types for reading archives
//!

use std::{
    fmt::{self, Debug, Display},
    fs::{self, File},
    io::{self, BufReader, Read, Seek, SeekFrom, Write},
    marker::PhantomData,
    path::{Path, PathBuf},
};

use bon::Builder;
use digest::{Digest, Output};
use encoding_rs::{Encoding, WINDOWS_1252};
use tracing::{debug, info, instrument};

use crate::{
    binary::{check_encoding, BinaryReader},
    byteswap::ByteOrder,
    driver::{self, ArchiveFormatDriver},
    entry::{Entry, SEPARATOR},
    error::{Error, NotFoundError, Result},
    filter::EntryFilter,
    folder::{self, Directory},
    partial::{share, PartialStream, SharedStream},
};

/// Options for how the archive's directory structures are decoded
#[derive(Debug, Clone, Copy, Builder)]
pub struct ArchiveOptions {
    /// Byte order of the integers in the directory table
    #[builder(default)]
    pub byte_order: ByteOrder,

    /// Single-byte code page used for every name stored in the archive
    #[builder(default = WINDOWS_1252)]
    pub encoding: &'static Encoding,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::Little,
            encoding: WINDOWS_1252,
        }
    }
}

/// Life cycle stage of an [`Archive`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ArchiveState {
    /// Created but [`Archive::open`] has not succeeded yet
    Unopened,

    /// The directory has been read and entries can be extracted
    Open,

    /// [`Archive::close`] released the file
    Closed,
}

impl Display for ArchiveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArchiveState::Unopened => "unopened",
            ArchiveState::Open => "open",
            ArchiveState::Closed => "closed",
        })
    }
}

#[derive(Debug)]
struct Opened {
    stream: SharedStream<File>,
    length: u64,
    directory: Directory,
}

#[derive(Debug)]
enum State {
    Unopened,
    Open(Opened),
    Closed,
}

/// Read-only access to the members of an archive file
///
/// The format specific work of parsing the directory table and decompressing entries is left
/// to an [`ArchiveFormatDriver`]. Entries can be extracted from several threads at once; each
/// extraction reads through its own [`PartialStream`] over the shared file handle.
///
/// ```no_run
/// use bsa::{Archive, ArchiveFormatDriver};
///
/// fn list_contents(driver: impl ArchiveFormatDriver) -> bsa::error::Result<()> {
///     let mut archive = Archive::new("Oblivion - Meshes.bsa", driver)?;
///     archive.open()?;
///
///     for entry in archive.entries()? {
///         println!("{} ({} bytes)", entry.name(), entry.uncompressed_size());
///     }
///
///     let data = archive.extract_path("meshes\\clutter\\apple.nif")?;
///     std::fs::write("apple.nif", data)?;
///
///     archive.close()
/// }
/// ```
pub struct Archive<D> {
    full_name: PathBuf,
    options: ArchiveOptions,
    driver: D,
    state: State,
}

impl<D> Debug for Archive<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Archive")
            .field("full_name", &self.full_name)
            .field("options", &self.options)
            .field("state", &self.state())
            .finish()
    }
}

impl<D> Archive<D> {
    /// Path the archive was created from
    pub fn full_name(&self) -> &Path {
        &self.full_name
    }

    /// Absolute, canonical path of the archive
    pub fn full_path(&self) -> Result<PathBuf> {
        Ok(fs::canonicalize(&self.full_name)?)
    }

    /// File name of the archive
    pub fn name(&self) -> Option<&str> {
        self.full_name.file_name().and_then(|n| n.to_str())
    }

    /// Byte order used for the directory structures
    pub fn byte_order(&self) -> ByteOrder {
        self.options.byte_order
    }

    /// Code page used for names
    pub fn encoding(&self) -> &'static Encoding {
        self.options.encoding
    }

    /// The driver handling the archive's format
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Current life cycle stage
    pub fn state(&self) -> ArchiveState {
        match self.state {
            State::Unopened => ArchiveState::Unopened,
            State::Open(_) => ArchiveState::Open,
            State::Closed => ArchiveState::Closed,
        }
    }

    /// Whether entries can currently be read
    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open(_))
    }

    /// Release the file. Only valid while open.
    #[instrument(skip(self), fields(path = %self.full_name.display()), err)]
    pub fn close(&mut self) -> Result<()> {
        self.opened("close")?;
        self.state = State::Closed;
        debug!("closed archive");
        Ok(())
    }

    fn opened(&self, operation: &'static str) -> Result<&Opened> {
        match &self.state {
            State::Open(opened) => Ok(opened),
            _ => Err(Error::InvalidState {
                operation,
                state: self.state(),
            }),
        }
    }

    /// The entry and folder tree
    pub fn directory(&self) -> Result<&Directory> {
        Ok(&self.opened("read the directory")?.directory)
    }

    /// Every entry, in folder traversal order
    pub fn entries(&self) -> Result<folder::Iter<'_>> {
        Ok(self.directory()?.iter())
    }

    /// Number of entries contained in the archive
    pub fn len(&self) -> Result<usize> {
        Ok(self.directory()?.len())
    }

    /// Whether the archive contains no entries
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.directory()?.is_empty())
    }

    /// Size of the archive file in bytes
    pub fn file_length(&self) -> Result<u64> {
        Ok(self.opened("query the file length")?.length)
    }

    /// Whether an entry exists at `path`
    pub fn has_entry(&self, path: &str) -> Result<bool> {
        Ok(self.directory()?.has_entry(path))
    }

    /// The entry stored at `path`, if there is one
    pub fn get_entry(&self, path: &str) -> Result<Option<&Entry>> {
        Ok(self.directory()?.get_entry(path))
    }

    /// Every entry found among `paths`, skipping the ones that do not exist
    pub fn get_entries<I, S>(&self, paths: I) -> Result<Vec<&Entry>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self.directory()?.get_entries(paths))
    }

    /// Every entry whose name satisfies `filter`
    pub fn get_matching_entries<F>(&self, filter: &F) -> Result<Vec<&Entry>>
    where
        F: EntryFilter + ?Sized,
    {
        Ok(self.directory()?.get_matching_entries(filter))
    }

    /// A raw window over the stored bytes of `entry`, valid while the archive is borrowed
    pub fn open_entry(&self, entry: &Entry) -> Result<EntryStream<'_>> {
        let opened = self.opened("open an entry")?;
        if !opened.directory.contains(entry) {
            return Err(NotFoundError::Entry(entry.name().to_owned()).into());
        }

        let inner = PartialStream::new(
            opened.stream.clone(),
            entry.offset(),
            entry.physical_size() as u64,
        )?;
        Ok(EntryStream {
            inner,
            archive: PhantomData,
        })
    }

    fn entry_by_path(&self, path: &str) -> Result<&Entry> {
        self.get_entry(path)?
            .ok_or_else(|| NotFoundError::Entry(path.to_owned()).into())
    }
}

impl<D: ArchiveFormatDriver> Archive<D> {
    /// Prepare to read the archive at `path` with the default options
    pub fn new(path: impl AsRef<Path>, driver: D) -> Result<Self> {
        Self::with_options(path, driver, ArchiveOptions::default())
    }

    /// Prepare to read the archive at `path`.
    ///
    /// Nothing is read until [`Archive::open`] is called.
    pub fn with_options(path: impl AsRef<Path>, driver: D, options: ArchiveOptions) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::InvalidArgument("archive path is empty".into()));
        }
        check_encoding(options.encoding)?;

        if !path.is_file() {
            return Err(NotFoundError::File(path.to_path_buf()).into());
        }

        Ok(Self {
            full_name: path.to_path_buf(),
            options,
            driver,
            state: State::Unopened,
        })
    }

    /// Open the file and read its directory. Only valid before the first open.
    ///
    /// On failure the archive stays unopened.
    #[instrument(skip(self), fields(path = %self.full_name.display()), err)]
    pub fn open(&mut self) -> Result<()> {
        if !matches!(self.state, State::Unopened) {
            return Err(Error::InvalidState {
                operation: "open",
                state: self.state(),
            });
        }

        let file = File::open(&self.full_name).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::from(NotFoundError::File(self.full_name.clone())),
            _ => Error::from(e),
        })?;
        let length = file.metadata()?.len();

        let mut reader = BinaryReader::with_options(
            BufReader::new(file),
            self.options.byte_order,
            self.options.encoding,
        )?;
        let directory = self.driver.read_directory(&mut reader)?;

        for entry in &directory {
            let end = entry.offset().checked_add(entry.physical_size() as u64);
            if end.map_or(true, |end| end > length) {
                return Err(Error::InvalidArchive(format!(
                    "entry {} at offset {} with size {} runs past the end of the file at {}",
                    entry.name(),
                    entry.offset(),
                    entry.physical_size(),
                    length
                )));
            }
        }

        debug!(entries = directory.len(), length, "read archive directory");
        self.state = State::Open(Opened {
            stream: share(reader.into_inner().into_inner()),
            length,
            directory,
        });

        Ok(())
    }

    /// Read the full contents of `entry`, decompressing it if needed
    #[instrument(skip(self, entry), fields(entry = entry.name()), err)]
    pub fn extract(&self, entry: &Entry) -> Result<Vec<u8>> {
        let mut stream = self.open_entry(entry)?;

        let mut data = Vec::with_capacity(entry.physical_size() as usize);
        stream.read_to_end(&mut data)?;
        if data.len() != entry.physical_size() as usize {
            return Err(Error::UnexpectedEndOfInput);
        }

        if entry.is_compressed() {
            self.driver.decompress(entry, data)
        } else {
            Ok(data)
        }
    }

    /// Read the full contents of the entry at `path`
    pub fn extract_path(&self, path: &str) -> Result<Vec<u8>> {
        self.extract(self.entry_by_path(path)?)
    }

    /// Write `entry` below `destination`, returning the path of the written file.
    ///
    /// Missing directories are created. If the file already exists and `overwrite` is not
    /// set, this fails with [`Error::DestinationExists`].
    pub fn extract_to(
        &self,
        entry: &Entry,
        destination: impl AsRef<Path>,
        overwrite: bool,
    ) -> Result<PathBuf> {
        let target = destination_for(destination.as_ref(), entry)?;
        if !overwrite && target.exists() {
            return Err(Error::DestinationExists(target));
        }

        let data = self.extract(entry)?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out = if overwrite {
            File::create(&target)?
        } else {
            File::create_new(&target).map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => Error::DestinationExists(target.clone()),
                _ => Error::from(e),
            })?
        };

        info!("writing {}", target.display());
        out.write_all(&data)?;

        Ok(target)
    }

    /// Write the entry at `path` below `destination`
    pub fn extract_path_to(
        &self,
        path: &str,
        destination: impl AsRef<Path>,
        overwrite: bool,
    ) -> Result<PathBuf> {
        self.extract_to(self.entry_by_path(path)?, destination, overwrite)
    }

    /// Write every entry named in `paths` below `destination`, stopping at the first failure
    pub fn extract_paths<I, S>(
        &self,
        paths: I,
        destination: impl AsRef<Path>,
        overwrite: bool,
    ) -> Result<Vec<PathBuf>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paths
            .into_iter()
            .map(|path| self.extract_path_to(path.as_ref(), destination.as_ref(), overwrite))
            .collect()
    }

    /// Write each of `entries` below `destination`, stopping at the first failure
    pub fn extract_entries<'a, I>(
        &self,
        entries: I,
        destination: impl AsRef<Path>,
        overwrite: bool,
    ) -> Result<Vec<PathBuf>>
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        entries
            .into_iter()
            .map(|entry| self.extract_to(entry, destination.as_ref(), overwrite))
            .collect()
    }

    /// Write every entry of the archive below `destination`
    #[instrument(skip(self, destination), fields(destination = %destination.as_ref().display()), err)]
    pub fn extract_to_folder(
        &self,
        destination: impl AsRef<Path>,
        overwrite: bool,
    ) -> Result<Vec<PathBuf>> {
        self.extract_entries(self.entries()?, destination, overwrite)
    }

    /// Write every entry accepted by `filter` below `destination`
    pub fn extract_matching<F>(
        &self,
        filter: &F,
        destination: impl AsRef<Path>,
        overwrite: bool,
    ) -> Result<Vec<PathBuf>>
    where
        F: EntryFilter + ?Sized,
    {
        self.extract_entries(self.get_matching_entries(filter)?, destination, overwrite)
    }

    /// Hash the contents of the entry at `path` with a fresh `H`.
    ///
    /// Returns `Ok(None)` if there is no such entry.
    pub fn get_entry_checksum<H: Digest>(&self, path: &str) -> Result<Option<Output<H>>> {
        self.get_entry_checksum_with(path, H::new())
    }

    /// Hash the contents of the entry at `path` with an already configured hasher.
    ///
    /// Returns `Ok(None)` if there is no such entry.
    pub fn get_entry_checksum_with<H: Digest>(
        &self,
        path: &str,
        hasher: H,
    ) -> Result<Option<Output<H>>> {
        let Some(entry) = self.get_entry(path)? else {
            debug!(path, "no entry to checksum");
            return Ok(None);
        };

        let data = self.extract(entry)?;
        Ok(Some(hasher.chain_update(&data).finalize()))
    }

    /// Hash the contents of `entry`
    pub fn get_entry_checksum_for<H: Digest>(&self, entry: &Entry) -> Result<Option<Output<H>>> {
        self.get_entry_checksum::<H>(entry.name())
    }

    /// Whether `stream` holds an archive of this archive's format.
    ///
    /// The stream position is restored before returning.
    pub fn is_archive<R: Read + Seek>(&self, stream: &mut R) -> Result<bool> {
        driver::probe(&self.driver, stream, &self.options)
    }

    /// Whether the file at `path` holds an archive of this archive's format.
    ///
    /// A missing file is not an archive.
    pub fn is_archive_file(&self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        if !path.is_file() {
            return Ok(false);
        }

        let mut file = BufReader::new(File::open(path)?);
        self.is_archive(&mut file)
    }
}

/// The stored bytes of one entry, read through the file handle of an open [`Archive`]
///
/// The stream borrows the archive, so the archive cannot be closed while it is alive:
///
/// ```compile_fail
/// # fn doit<D: bsa::ArchiveFormatDriver>(
/// #     mut archive: bsa::Archive<D>,
/// #     entry: bsa::Entry,
/// # ) -> bsa::error::Result<()> {
/// use std::io::Read;
///
/// let mut stream = archive.open_entry(&entry)?;
/// archive.close()?;
/// stream.read_to_end(&mut Vec::new())?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct EntryStream<'a> {
    inner: PartialStream<File>,
    archive: PhantomData<&'a ()>,
}

impl EntryStream<'_> {
    /// Absolute offset of the window in the archive file
    pub fn start(&self) -> u64 {
        self.inner.start()
    }

    /// Number of stored bytes
    pub fn len(&self) -> u64 {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Position relative to the start of the entry
    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    pub fn remaining(&self) -> u64 {
        self.inner.remaining()
    }
}

impl Read for EntryStream<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Seek for EntryStream<'_> {
    fn seek(&mut self, position: SeekFrom) -> io::Result<u64> {
        self.inner.seek(position)
    }
}

/// Build the on-disk location for `entry` below `destination`.
///
/// Names are untrusted, so any component that could leave `destination` is refused.
fn destination_for(destination: &Path, entry: &Entry) -> Result<PathBuf> {
    let mut target = destination.to_path_buf();
    for component in entry.name().split(SEPARATOR) {
        match component {
            "." => continue,
            "" | ".." => {
                return Err(Error::InvalidArgument(format!(
                    "entry {} does not name a location below the destination",
                    entry.name()
                )))
            }
            c if c.contains(':') => {
                return Err(Error::InvalidArgument(format!(
                    "entry {} contains a drive or stream separator",
                    entry.name()
                )))
            }
            c => target.push(c),
        }
    }
    Ok(target)
}
