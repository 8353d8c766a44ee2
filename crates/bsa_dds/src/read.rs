//! Reading DDS headers from files and buffers
//!

use std::io::{Cursor, Read, Seek};

use binrw::BinRead;
use tracing::{debug, instrument};

use crate::{error::Result, types::Dds};

/// Read the header of a DDS file, leaving `reader` at the start of the pixel data
///
/// ```no_run
/// use std::fs::File;
///
/// fn describe(path: &str) -> bsa_dds::error::Result<()> {
///     let dds = bsa_dds::read_dds(&mut File::open(path)?)?;
///
///     println!(
///         "{}x{} {} with {} mip levels",
///         dds.header.width,
///         dds.header.height,
///         dds.four_cc_str(),
///         dds.mip_levels()
///     );
///
///     Ok(())
/// }
/// ```
#[instrument(skip(reader), err)]
pub fn read_dds<R: Read + Seek>(reader: &mut R) -> Result<Dds> {
    let dds = Dds::read(reader)?;
    debug!(
        width = dds.header.width,
        height = dds.header.height,
        four_cc = %dds.four_cc_str(),
        dx10 = dds.header_dx10.is_some(),
        "read dds header"
    );
    Ok(dds)
}

impl Dds {
    /// Parse the header at the start of `data`
    pub fn from_bytes(data: &[u8]) -> Result<Dds> {
        read_dds(&mut Cursor::new(data))
    }
}
