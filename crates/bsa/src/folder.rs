//! The folder hierarchy of an archive
//!
//! A [`Directory`] owns every [`Entry`] and [`Folder`] of an archive. Folders refer to their
//! parent, children and entries through [`FolderId`] and [`EntryId`] indices into the
//! directory, and a parent is fixed when its child is created. Since folders are only ever
//! created by descending from the root, the hierarchy cannot contain cycles.

use indexmap::IndexMap;
use tracing::trace;

use crate::{
    entry::{normalize_key, Entry, SEPARATOR},
    error::{Error, Result},
    filter::EntryFilter,
};

/// Index of a folder inside its [`Directory`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FolderId(usize);

/// Index of an entry inside its [`Directory`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(usize);

/// A node of the folder hierarchy
#[derive(Debug, Clone)]
pub struct Folder {
    name: Box<str>,
    path: Box<str>,
    parent: Option<FolderId>,
    children: Vec<FolderId>,
    entries: Vec<EntryId>,
}

impl Folder {
    /// Last component of the folder path, empty for the root
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full path of the folder from the root, empty for the root
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The folder containing this one, `None` for the root
    pub fn parent(&self) -> Option<FolderId> {
        self.parent
    }

    /// Folders directly below this one, in insertion order
    pub fn children(&self) -> &[FolderId] {
        &self.children
    }

    /// Entries directly inside this folder, in insertion order
    pub fn entries(&self) -> &[EntryId] {
        &self.entries
    }

    /// Whether this is the root of the hierarchy
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// The populated entry and folder tree of an archive
#[derive(Debug, Clone)]
pub struct Directory {
    entries: Vec<Entry>,
    folders: Vec<Folder>,
    entry_index: IndexMap<Box<str>, EntryId>,
    folder_index: IndexMap<Box<str>, FolderId>,
}

impl Default for Directory {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            folders: vec![Folder {
                name: "".into(),
                path: "".into(),
                parent: None,
                children: Vec::new(),
                entries: Vec::new(),
            }],
            entry_index: IndexMap::new(),
            folder_index: IndexMap::from([(Box::<str>::from(""), Self::ROOT)]),
        }
    }
}

impl Directory {
    const ROOT: FolderId = FolderId(0);

    /// Start building a directory
    pub fn builder() -> DirectoryBuilder {
        DirectoryBuilder::default()
    }

    /// The root folder
    pub fn root(&self) -> &Folder {
        &self.folders[Self::ROOT.0]
    }

    /// Id of the root folder
    pub fn root_id(&self) -> FolderId {
        Self::ROOT
    }

    /// Look up a folder by id
    pub fn folder(&self, id: FolderId) -> Option<&Folder> {
        self.folders.get(id.0)
    }

    /// Look up an entry by id
    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries.get(id.0)
    }

    /// Number of entries in the archive
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive contains no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All folders, root first, in creation order
    pub fn folders(&self) -> impl Iterator<Item = &Folder> {
        self.folders.iter()
    }

    /// Find a folder by path, ignoring case and separator style
    pub fn find_folder(&self, path: &str) -> Option<&Folder> {
        let key = normalize_key(path);
        let key = key.trim_end_matches(SEPARATOR);
        self.folder_index
            .get(key)
            .and_then(|id| self.folder(*id))
    }

    /// Whether an entry exists at `path`
    pub fn has_entry(&self, path: &str) -> bool {
        self.entry_index.contains_key(normalize_key(path).as_str())
    }

    /// The entry stored at `path`, if there is one
    pub fn get_entry(&self, path: &str) -> Option<&Entry> {
        self.entry_index
            .get(normalize_key(path).as_str())
            .and_then(|id| self.entry(*id))
    }

    /// Every entry found among `paths`, skipping the ones that do not exist
    pub fn get_entries<I, S>(&self, paths: I) -> Vec<&Entry>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paths
            .into_iter()
            .filter_map(|path| self.get_entry(path.as_ref()))
            .collect()
    }

    /// Every entry whose name satisfies `filter`, in traversal order
    pub fn get_matching_entries<F>(&self, filter: &F) -> Vec<&Entry>
    where
        F: EntryFilter + ?Sized,
    {
        self.iter()
            .filter(|entry| filter.matches(entry.name()))
            .collect()
    }

    /// Iterate entries depth first: a folder's own entries, then each child folder in turn
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            directory: self,
            stack: vec![Self::ROOT],
            pending: Vec::new(),
        }
    }

    /// Whether `entry` is one of this directory's entries
    pub fn contains(&self, entry: &Entry) -> bool {
        self.entry_index
            .get(entry.key().as_str())
            .and_then(|id| self.entry(*id))
            == Some(entry)
    }
}

impl<'a> IntoIterator for &'a Directory {
    type Item = &'a Entry;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Depth first iterator over the entries of a [`Directory`]
#[derive(Debug)]
pub struct Iter<'a> {
    directory: &'a Directory,
    stack: Vec<FolderId>,
    pending: Vec<EntryId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(id) = self.pending.pop() {
                return self.directory.entry(id);
            }

            let folder = self.directory.folder(self.stack.pop()?)?;
            self.pending.extend(folder.entries.iter().rev());
            self.stack.extend(folder.children.iter().rev());
        }
    }
}

/// Builds a [`Directory`] one entry at a time
///
/// ```
/// # fn doit() -> bsa::error::Result<()> {
/// use bsa::{Directory, Entry};
///
/// let mut builder = Directory::builder();
/// builder.insert(Entry::new("meshes\\x.nif", 100, 0, 50)?)?;
/// let directory = builder.build();
///
/// assert!(directory.has_entry("MESHES/X.NIF"));
/// assert_eq!(directory.find_folder("meshes").unwrap().entries().len(), 1);
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug, Default)]
pub struct DirectoryBuilder {
    directory: Directory,
}

impl DirectoryBuilder {
    /// Add an entry, creating any folders on its path.
    ///
    /// Fails with [`Error::InvalidArgument`] if an entry with the same name already exists.
    pub fn insert(&mut self, entry: Entry) -> Result<EntryId> {
        let key: Box<str> = entry.key().into();
        if self.directory.entry_index.contains_key(&key) {
            return Err(Error::InvalidArgument(format!(
                "duplicate entry {}",
                entry.name()
            )));
        }

        let folder = self.folder_for(entry.folder_path());
        let id = EntryId(self.directory.entries.len());
        trace!(name = entry.name(), ?folder, "inserting entry");

        self.directory.folders[folder.0].entries.push(id);
        self.directory.entries.push(entry);
        self.directory.entry_index.insert(key, id);

        Ok(id)
    }

    /// Number of entries inserted so far
    pub fn len(&self) -> usize {
        self.directory.len()
    }

    /// Whether no entries were inserted yet
    pub fn is_empty(&self) -> bool {
        self.directory.is_empty()
    }

    /// Finish building
    pub fn build(self) -> Directory {
        self.directory
    }

    fn folder_for(&mut self, path: &str) -> FolderId {
        let mut current = Directory::ROOT;
        if path.is_empty() {
            return current;
        }

        for component in path.split(SEPARATOR).filter(|c| !c.is_empty()) {
            // Spell the path the way the existing parent folder does
            let parent = &self.directory.folders[current.0].path;
            let full = if parent.is_empty() {
                component.to_owned()
            } else {
                format!("{parent}{SEPARATOR}{component}")
            };

            let key = full.to_lowercase();
            current = match self.directory.folder_index.get(key.as_str()) {
                Some(id) => *id,
                None => {
                    let id = FolderId(self.directory.folders.len());
                    self.directory.folders.push(Folder {
                        name: component.into(),
                        path: full.as_str().into(),
                        parent: Some(current),
                        children: Vec::new(),
                        entries: Vec::new(),
                    });
                    self.directory.folders[current.0].children.push(id);
                    self.directory.folder_index.insert(key.into(), id);
                    id
                }
            };
        }

        current
    }
}

impl TryFrom<Vec<Entry>> for Directory {
    type Error = Error;

    fn try_from(value: Vec<Entry>) -> Result<Self> {
        let mut builder = Directory::builder();
        for entry in value {
            builder.insert(entry)?;
        }
        Ok(builder.build())
    }
}
