//! This library handles reading members out of the **BSA** style resource archives used by
//! *The Elder Scrolls* and *Fallout* games.
//!
//! # Archive Model
//!
//! An archive is a single file holding a directory table followed by the stored bytes of its
//! members. This crate does the work common to every variant of the format and leaves the
//! layout of the directory table to an [`ArchiveFormatDriver`].
//!
//! ## Pieces
//!
//! | Module          | Responsibility                                                       |
//! |-----------------|----------------------------------------------------------------------|
//! | [`archive`]     | Life cycle of an open archive, lookups and extraction                |
//! | [`binary`]      | Primitive and string decoding of directory structures                |
//! | [`byteswap`]    | Byte order selection and reversal of integers                        |
//! | [`compression`] | Inflating compressed entries                                         |
//! | [`driver`]      | The seam to a concrete format                                        |
//! | [`entry`]       | A single member and the normalization of its name                    |
//! | [`folder`]      | The folder hierarchy and the case-insensitive name index             |
//! | [`partial`]     | Windows over the shared file handle, one per extraction              |
//!
//! ## Names
//!
//! Entry names are stored relative to the archive root with `\` as the separator. Any drive or
//! UNC root is dropped and `/` is turned into `\` when an entry is created, so
//! `C:\Data/Meshes\x.nif` is stored as `Data\Meshes\x.nif`. Lookups ignore case.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.bsa`, `.ba2`
//! - **Endianness**: Little-endian by default, big-endian on some console releases
//! - **Code Page**: Windows-1252 by default
//! - **Compression Methods**:
//!   - None (stored)
//!   - Zlib
//!

pub mod archive;
pub mod binary;
pub mod byteswap;
pub mod compression;
pub mod driver;
pub mod entry;
pub mod error;
pub mod filter;
pub mod folder;
pub mod partial;

pub use archive::{Archive, ArchiveOptions, ArchiveState, EntryStream};
pub use binary::{BinaryReader, LengthPrefix};
pub use byteswap::{ByteOrder, ByteSwap};
pub use compression::{CompressionMethod, Decompressor};
pub use driver::ArchiveFormatDriver;
pub use entry::Entry;
pub use filter::EntryFilter;
pub use folder::{Directory, DirectoryBuilder, Folder};
pub use partial::PartialStream;
