//! A minimal archive layout used to drive the generic machinery in tests and benches
//!
//! | Field        | Size                                       |
//! |--------------|--------------------------------------------|
//! | Magic        | 4 bytes: "TBSA"                            |
//! | Count        | 4 bytes                                    |
//! | Records      | per entry: bz-string name, u64 offset, u32 compressed size, u32 size |
//! | Data         | the stored bytes of every entry            |

#![allow(dead_code)]

use std::{
    io::{Read, Seek, Write},
    path::{Path, PathBuf},
};

use bsa::{
    error::{Error, Result},
    ArchiveFormatDriver, BinaryReader, Directory, Entry,
};
use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};
use encoding_rs::WINDOWS_1252;
use flate2::{write::ZlibEncoder, Compression};

pub const MAGIC: &[u8; 4] = b"TBSA";

pub struct TestFormat;

impl ArchiveFormatDriver for TestFormat {
    fn probe<R: Read + Seek>(&self, reader: &mut BinaryReader<R>) -> Result<bool> {
        Ok(reader.read_bytes(4)? == MAGIC)
    }

    fn read_directory<R: Read + Seek>(&self, reader: &mut BinaryReader<R>) -> Result<Directory> {
        if !self.probe(reader)? {
            return Err(Error::InvalidArchive("missing TBSA signature".into()));
        }

        let count = reader.read_u32()?;
        let mut builder = Directory::builder();
        for _ in 0..count {
            let name = reader.read_bzstring()?;
            let offset = reader.read_u64()?;
            let compressed = reader.read_u32()?;
            let size = reader.read_u32()?;
            builder.insert(Entry::new(&name, offset, compressed, size)?)?;
        }

        Ok(builder.build())
    }
}

/// A directory record pointing anywhere in the file
pub struct Record<'a> {
    pub name: &'a str,
    pub offset: u64,
    pub compressed: u32,
    pub size: u32,
}

fn encoded_name(name: &str) -> Vec<u8> {
    let (bytes, _, unmappable) = WINDOWS_1252.encode(name);
    assert!(!unmappable, "{name} is not representable in Windows-1252");
    bytes.into_owned()
}

fn record_len(name: &str) -> usize {
    1 + encoded_name(name).len() + 1 + 16
}

fn write_records<B: ByteOrder>(out: &mut Vec<u8>, records: &[Record]) {
    out.extend_from_slice(MAGIC);
    out.write_u32::<B>(records.len() as u32).unwrap();
    for record in records {
        let name = encoded_name(record.name);
        out.write_u8(name.len() as u8 + 1).unwrap();
        out.extend_from_slice(&name);
        out.write_u8(0).unwrap();
        out.write_u64::<B>(record.offset).unwrap();
        out.write_u32::<B>(record.compressed).unwrap();
        out.write_u32::<B>(record.size).unwrap();
    }
}

/// The byte found at `position` of an archive built by [`raw`]
pub fn pattern(position: usize) -> u8 {
    (position % 251) as u8
}

/// A little endian archive with hand placed records, padded with [`pattern`] to `length` bytes
pub fn raw(records: &[Record], length: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(length);
    write_records::<LittleEndian>(&mut out, records);
    assert!(out.len() <= length, "records do not fit");

    let header = out.len();
    out.extend((header..length).map(pattern));
    out
}

pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// An archive holding `members`, compressing the ones flagged with `true`
pub fn build<B: ByteOrder>(members: &[(&str, &[u8], bool)]) -> Vec<u8> {
    let mut offset = (8 + members.iter().map(|(name, ..)| record_len(name)).sum::<usize>()) as u64;

    let mut records = Vec::with_capacity(members.len());
    let mut data = Vec::new();
    for (name, contents, compress) in members {
        let stored = if *compress { zlib(contents) } else { contents.to_vec() };
        records.push(Record {
            name: *name,
            offset,
            compressed: if *compress { stored.len() as u32 } else { 0 },
            size: contents.len() as u32,
        });
        offset += stored.len() as u64;
        data.extend_from_slice(&stored);
    }

    let mut out = Vec::new();
    write_records::<B>(&mut out, &records);
    out.extend_from_slice(&data);
    out
}

pub fn build_le(members: &[(&str, &[u8], bool)]) -> Vec<u8> {
    build::<LittleEndian>(members)
}

pub fn build_be(members: &[(&str, &[u8], bool)]) -> Vec<u8> {
    build::<BigEndian>(members)
}

pub fn write_archive(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path
}
