//! Archive members and the path conventions they follow

use std::{
    cmp::Ordering,
    fmt::{self, Display},
    hash::{Hash, Hasher},
};

use crate::error::{Error, Result};

/// Separator used between the components of every stored name
pub const SEPARATOR: char = '\\';

/// Separator accepted on input and converted to [`SEPARATOR`]
pub const ALT_SEPARATOR: char = '/';

fn is_separator(c: char) -> bool {
    c == SEPARATOR || c == ALT_SEPARATOR
}

/// Removes a drive (`C:`, `C:\`) or UNC share (`\\server\share\`) root from a path
fn drop_path_root(path: &str) -> &str {
    let mut chars = path.char_indices();
    match (chars.next(), chars.next()) {
        (Some((_, a)), Some((_, b))) if is_separator(a) && is_separator(b) => {
            // \\server\share\rest
            let mut elements = 0;
            for (index, c) in path.char_indices().skip(2) {
                if is_separator(c) {
                    elements += 1;
                    if elements == 2 {
                        return &path[index + 1..];
                    }
                }
            }
            ""
        }
        (Some((_, a)), Some((_, ':'))) if a.is_ascii_alphabetic() => &path[2..],
        _ => path,
    }
}

/// Normalizes a member path to the form used for storage and lookup.
///
/// Drive and UNC roots are removed, `/` becomes `\` and leading separators are trimmed, so
/// the result is always relative. Roots and separators are stripped until neither is left,
/// so cleaning a cleaned name changes nothing.
///
/// ```
/// use bsa::entry::clean_name;
///
/// assert_eq!(clean_name("C:\\data\\tex.dds"), "data\\tex.dds");
/// assert_eq!(clean_name("/data/tex.dds"), "data\\tex.dds");
/// ```
pub fn clean_name(raw: &str) -> String {
    let mut rest = raw;
    loop {
        let next = drop_path_root(rest).trim_start_matches(is_separator);
        if next.len() == rest.len() {
            break;
        }
        rest = next;
    }
    rest.replace(ALT_SEPARATOR, "\\")
}

/// The case-insensitive key a member path is stored and looked up under
pub fn normalize_key(raw: &str) -> String {
    clean_name(raw).to_lowercase()
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// A single member of an archive
///
/// Created by a format driver while it parses the directory table, and never changed
/// afterwards.
#[derive(Debug, Clone)]
pub struct Entry {
    name: Box<str>,
    offset: u64,
    compressed_size: u32,
    uncompressed_size: u32,
    name_hash: Option<u64>,
    path_hash: Option<u64>,
}

impl Entry {
    /// Create an entry, normalizing `name` with [`clean_name`].
    ///
    /// A `compressed_size` of 0 marks the entry as stored. Fails with
    /// [`Error::InvalidArgument`] if the cleaned name is empty.
    pub fn new(
        name: &str,
        offset: u64,
        compressed_size: u32,
        uncompressed_size: u32,
    ) -> Result<Self> {
        let name = clean_name(name);
        if name.is_empty() {
            return Err(Error::InvalidArgument("entry name is empty".into()));
        }

        Ok(Self {
            name: name.into(),
            offset,
            compressed_size,
            uncompressed_size,
            name_hash: None,
            path_hash: None,
        })
    }

    /// Attach the name and folder path hashes stored by the directory table
    pub fn with_hashes(mut self, name_hash: u64, path_hash: u64) -> Self {
        self.name_hash = Some(name_hash);
        self.path_hash = Some(path_hash);
        self
    }

    /// Full archive-relative path of the entry
    ///
    /// # Warnings
    ///
    /// Archives are untrusted input. Use [`crate::Archive::extract_to`] rather than joining
    /// this name onto a directory yourself, since it may contain `..` components.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last component of the name
    pub fn file_name(&self) -> &str {
        self.name
            .rsplit_once(SEPARATOR)
            .map_or(&*self.name, |(_, file)| file)
    }

    /// Everything before the last separator, empty for top-level entries
    pub fn folder_path(&self) -> &str {
        self.name
            .rsplit_once(SEPARATOR)
            .map_or("", |(folder, _)| folder)
    }

    /// Text after the last `.` of the file name, if there is one
    pub fn extension(&self) -> Option<&str> {
        match self.file_name().rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
            _ => None,
        }
    }

    /// Absolute offset of the entry data in the archive
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Size of the stored data, 0 when the entry is not compressed
    pub fn compressed_size(&self) -> u32 {
        self.compressed_size
    }

    /// Size of the data once extracted
    pub fn uncompressed_size(&self) -> u32 {
        self.uncompressed_size
    }

    /// Whether the stored data has to be decompressed
    pub fn is_compressed(&self) -> bool {
        self.compressed_size > 0
    }

    /// Number of bytes the entry occupies in the archive
    pub fn physical_size(&self) -> u32 {
        if self.is_compressed() {
            self.compressed_size
        } else {
            self.uncompressed_size
        }
    }

    /// Hash of the file name, for formats that store one
    pub fn name_hash(&self) -> Option<u64> {
        self.name_hash
    }

    /// Hash of the folder path, for formats that store one
    pub fn path_hash(&self) -> Option<u64> {
        self.path_hash
    }

    /// The key this entry is indexed under
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

impl Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset
            && self.compressed_size == other.compressed_size
            && self.uncompressed_size == other.uncompressed_size
            && cmp_ignore_case(&self.name, &other.name) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl Hash for Entry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in self.name.chars().flat_map(char::to_lowercase) {
            c.hash(state);
        }
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_ignore_case(&self.name, &other.name)
            .then(self.offset.cmp(&other.offset))
            .then(self.compressed_size.cmp(&other.compressed_size))
            .then(self.uncompressed_size.cmp(&other.uncompressed_size))
    }
}
