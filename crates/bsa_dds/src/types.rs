//! Base types for the structure of a DDS file.

use binrw::{BinRead, BinWrite};

use crate::flags::{
    DDPF_FOURCC, DDSCAPS2_CUBEMAP, DDSCAPS2_VOLUME, DDSD_MIPMAPCOUNT, FOURCC_DX10,
};

/// Size of the `"DDS "` magic in front of the header
pub const MAGIC_SIZE: u32 = 4;

/// Size of [`DdsPixelFormat`] on disk
pub const PIXEL_FORMAT_SIZE: u32 = 32;

/// Size of [`DdsHeader`] on disk
pub const HEADER_SIZE: u32 = 124;

/// Size of [`DdsHeaderDx10`] on disk
pub const HEADER_DX10_SIZE: u32 = 20;

/// Surface pixel format
///
/// Either a FourCC code naming a block compression scheme, or the bit masks of an
/// uncompressed layout.
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct DdsPixelFormat {
    /// Structure size, always 32
    #[br(assert(size == PIXEL_FORMAT_SIZE, "pixel format size is {}", size))]
    pub size: u32,

    /// Which of the remaining fields are valid, see the `DDPF_` constants
    pub flags: u32,

    /// Compression scheme when [`DDPF_FOURCC`] is set
    pub four_cc: u32,

    /// Bits per pixel of uncompressed data
    pub rgb_bit_count: u32,

    pub r_bit_mask: u32,
    pub g_bit_mask: u32,
    pub b_bit_mask: u32,
    pub a_bit_mask: u32,
}

impl Default for DdsPixelFormat {
    fn default() -> Self {
        Self {
            size: PIXEL_FORMAT_SIZE,
            flags: Default::default(),
            four_cc: Default::default(),
            rgb_bit_count: Default::default(),
            r_bit_mask: Default::default(),
            g_bit_mask: Default::default(),
            b_bit_mask: Default::default(),
            a_bit_mask: Default::default(),
        }
    }
}

impl DdsPixelFormat {
    /// The FourCC code as text, with unprintable bytes replaced
    pub fn four_cc_str(&self) -> String {
        self.four_cc
            .to_le_bytes()
            .iter()
            .map(|b| if b.is_ascii_graphic() || *b == b' ' { *b as char } else { '?' })
            .collect()
    }
}

/// DDS file header
///
/// Follows the 4 byte magic at the start of the file. All data is stored in little endian
/// format.
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct DdsHeader {
    /// Structure size, always 124
    #[br(assert(size == HEADER_SIZE, "header size is {}", size))]
    pub size: u32,

    /// Which of the remaining fields are valid, see the `DDSD_` constants
    pub flags: u32,

    pub height: u32,
    pub width: u32,

    /// Bytes per scan line, or the total size of the top level for compressed data
    pub pitch_or_linear_size: u32,

    /// Depth of a volume texture
    pub depth: u32,

    pub mip_map_count: u32,

    pub reserved1: [u32; 11],

    pub pixel_format: DdsPixelFormat,

    /// Surface complexity, see the `DDSCAPS_` constants
    pub caps: u32,

    /// Cubemap faces and volume, see the `DDSCAPS2_` constants
    pub caps2: u32,

    pub reserved2: [u32; 3],
}

impl Default for DdsHeader {
    fn default() -> Self {
        Self {
            size: HEADER_SIZE,
            flags: Default::default(),
            height: Default::default(),
            width: Default::default(),
            pitch_or_linear_size: Default::default(),
            depth: Default::default(),
            mip_map_count: Default::default(),
            reserved1: Default::default(),
            pixel_format: Default::default(),
            caps: Default::default(),
            caps2: Default::default(),
            reserved2: Default::default(),
        }
    }
}

/// Kind of resource described by a [`DdsHeaderDx10`]
#[derive(BinRead, BinWrite, Debug, Copy, Clone, Default, PartialEq, Eq)]
#[brw(little, repr = u32)]
pub enum ResourceDimension {
    #[default]
    Unknown = 0,
    Buffer = 1,
    Texture1D = 2,
    Texture2D = 3,
    Texture3D = 4,
}

/// Extended header present when the pixel format's FourCC is `"DX10"`
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct DdsHeaderDx10 {
    /// A `DXGI_FORMAT` value
    pub dxgi_format: u32,

    pub resource_dimension: ResourceDimension,

    /// A `D3D11_RESOURCE_MISC_FLAG` value
    pub misc_flag: u32,

    /// Number of elements of a texture array
    pub array_size: u32,

    pub misc_flags2: u32,
}

/// The complete header of a DDS file
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little, magic = b"DDS ")]
pub struct Dds {
    pub header: DdsHeader,

    #[br(if(header.pixel_format.four_cc == FOURCC_DX10))]
    pub header_dx10: Option<DdsHeaderDx10>,
}

impl Dds {
    /// Whether the pixel data is block compressed
    pub fn is_compressed(&self) -> bool {
        self.header.pixel_format.flags & DDPF_FOURCC != 0
    }

    /// Whether the file holds the faces of a cubemap
    pub fn is_cubemap(&self) -> bool {
        self.header.caps2 & DDSCAPS2_CUBEMAP != 0
    }

    /// Whether the file holds a volume texture
    pub fn is_volume(&self) -> bool {
        self.header.caps2 & DDSCAPS2_VOLUME != 0
            || self
                .header_dx10
                .is_some_and(|dx10| dx10.resource_dimension == ResourceDimension::Texture3D)
    }

    /// Whether more than the top level of the mip chain is stored
    pub fn has_mipmaps(&self) -> bool {
        self.mip_levels() > 1
    }

    /// Number of stored mip levels, at least 1
    pub fn mip_levels(&self) -> u32 {
        if self.header.flags & DDSD_MIPMAPCOUNT != 0 {
            self.header.mip_map_count.max(1)
        } else {
            1
        }
    }

    /// Offset of the pixel data from the start of the file
    pub fn data_offset(&self) -> u32 {
        MAGIC_SIZE
            + HEADER_SIZE
            + if self.header_dx10.is_some() {
                HEADER_DX10_SIZE
            } else {
                0
            }
    }

    /// The FourCC code of the pixel format as text
    pub fn four_cc_str(&self) -> String {
        self.header.pixel_format.four_cc_str()
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::{BinRead, BinWrite};
    use pretty_assertions::assert_eq;

    use super::{Dds, DdsHeaderDx10, DdsPixelFormat, ResourceDimension};
    use crate::{
        error::Result,
        flags::{make_fourcc, DDPF_FOURCC, DDSCAPS2_CUBEMAP, DDSD_MIPMAPCOUNT, FOURCC_DX10},
    };

    #[test]
    fn read_pixel_format() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x20, 0x00, 0x00, 0x00,
            0x04, 0x00, 0x00, 0x00,
            0x44, 0x58, 0x54, 0x31,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ]);

        let expected = DdsPixelFormat {
            flags: DDPF_FOURCC,
            four_cc: make_fourcc(b'D', b'X', b'T', b'1'),
            ..Default::default()
        };

        let actual = DdsPixelFormat::read(&mut input)?;
        assert_eq!(actual, expected);
        assert_eq!(actual.four_cc_str(), "DXT1");

        Ok(())
    }

    #[test]
    fn pixel_format_size_is_checked() {
        let mut input = Cursor::new(vec![0u8; 32]);
        assert!(DdsPixelFormat::read(&mut input).is_err());
    }

    #[test]
    fn header_layout() -> Result<()> {
        let dds = Dds::default();

        let mut actual = Vec::new();
        dds.write(&mut Cursor::new(&mut actual))?;

        assert_eq!(actual.len(), 128);
        assert_eq!(&actual[..8], b"DDS \x7C\x00\x00\x00");
        assert_eq!(&actual[76..80], &[0x20, 0x00, 0x00, 0x00]);
        assert_eq!(dds.data_offset(), 128);

        Ok(())
    }

    #[test]
    fn dx10_extension_follows_fourcc() -> Result<()> {
        let mut dds = Dds::default();
        dds.header.pixel_format.flags = DDPF_FOURCC;
        dds.header.pixel_format.four_cc = FOURCC_DX10;
        dds.header_dx10 = Some(DdsHeaderDx10 {
            dxgi_format: 98,
            resource_dimension: ResourceDimension::Texture2D,
            array_size: 1,
            ..Default::default()
        });

        let mut bytes = Vec::new();
        dds.write(&mut Cursor::new(&mut bytes))?;
        assert_eq!(bytes.len(), 148);

        let actual = Dds::read(&mut Cursor::new(&bytes))?;
        assert_eq!(actual, dds);
        assert_eq!(actual.data_offset(), 148);
        assert_eq!(actual.four_cc_str(), "DX10");
        assert!(actual.is_compressed());
        assert!(!actual.is_volume());

        Ok(())
    }

    #[test]
    fn capability_helpers() {
        let mut dds = Dds::default();
        assert!(!dds.is_cubemap());
        assert!(!dds.has_mipmaps());
        assert_eq!(dds.mip_levels(), 1);

        dds.header.mip_map_count = 9;
        assert_eq!(dds.mip_levels(), 1);

        dds.header.flags |= DDSD_MIPMAPCOUNT;
        dds.header.caps2 |= DDSCAPS2_CUBEMAP;
        assert!(dds.has_mipmaps());
        assert_eq!(dds.mip_levels(), 9);
        assert!(dds.is_cubemap());
    }
}
