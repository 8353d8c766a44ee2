//! Bit flags and FourCC codes found in DDS headers

/// Packs four characters into a little endian FourCC code
///
/// ```
/// use bsa_dds::flags::make_fourcc;
///
/// assert_eq!(make_fourcc(b'D', b'X', b'T', b'5'), u32::from_le_bytes(*b"DXT5"));
/// ```
pub const fn make_fourcc(ch0: u8, ch1: u8, ch2: u8, ch3: u8) -> u32 {
    (ch0 as u32) | ((ch1 as u32) << 8) | ((ch2 as u32) << 16) | ((ch3 as u32) << 24)
}

/// `"DDS "` read as a little endian integer
pub const DDS_MAGIC: u32 = make_fourcc(b'D', b'D', b'S', b' ');

pub const FOURCC_DXT1: u32 = make_fourcc(b'D', b'X', b'T', b'1');
pub const FOURCC_DXT3: u32 = make_fourcc(b'D', b'X', b'T', b'3');
pub const FOURCC_DXT5: u32 = make_fourcc(b'D', b'X', b'T', b'5');
pub const FOURCC_ATI2: u32 = make_fourcc(b'A', b'T', b'I', b'2');

/// Marks the presence of a [`crate::DdsHeaderDx10`]
pub const FOURCC_DX10: u32 = make_fourcc(b'D', b'X', b'1', b'0');

// Pixel format flags
pub const DDPF_ALPHAPIXELS: u32 = 0x0000_0001;
pub const DDPF_ALPHA: u32 = 0x0000_0002;
pub const DDPF_FOURCC: u32 = 0x0000_0004;
pub const DDPF_RGB: u32 = 0x0000_0040;
pub const DDPF_RGBA: u32 = DDPF_RGB | DDPF_ALPHAPIXELS;
pub const DDPF_LUMINANCE: u32 = 0x0002_0000;

// Header flags
pub const DDSD_CAPS: u32 = 0x0000_0001;
pub const DDSD_HEIGHT: u32 = 0x0000_0002;
pub const DDSD_WIDTH: u32 = 0x0000_0004;
pub const DDSD_PITCH: u32 = 0x0000_0008;
pub const DDSD_PIXELFORMAT: u32 = 0x0000_1000;
pub const DDSD_MIPMAPCOUNT: u32 = 0x0002_0000;
pub const DDSD_LINEARSIZE: u32 = 0x0008_0000;
pub const DDSD_DEPTH: u32 = 0x0080_0000;

/// Flags every texture header carries
pub const DDSD_TEXTURE: u32 = DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PIXELFORMAT;

// Surface flags
pub const DDSCAPS_COMPLEX: u32 = 0x0000_0008;
pub const DDSCAPS_TEXTURE: u32 = 0x0000_1000;
pub const DDSCAPS_MIPMAP: u32 = 0x0040_0000;

// Cubemap and volume flags
pub const DDSCAPS2_CUBEMAP: u32 = 0x0000_0200;
pub const DDSCAPS2_CUBEMAP_POSITIVEX: u32 = DDSCAPS2_CUBEMAP | 0x0000_0400;
pub const DDSCAPS2_CUBEMAP_NEGATIVEX: u32 = DDSCAPS2_CUBEMAP | 0x0000_0800;
pub const DDSCAPS2_CUBEMAP_POSITIVEY: u32 = DDSCAPS2_CUBEMAP | 0x0000_1000;
pub const DDSCAPS2_CUBEMAP_NEGATIVEY: u32 = DDSCAPS2_CUBEMAP | 0x0000_2000;
pub const DDSCAPS2_CUBEMAP_POSITIVEZ: u32 = DDSCAPS2_CUBEMAP | 0x0000_4000;
pub const DDSCAPS2_CUBEMAP_NEGATIVEZ: u32 = DDSCAPS2_CUBEMAP | 0x0000_8000;
pub const DDSCAPS2_CUBEMAP_ALLFACES: u32 = DDSCAPS2_CUBEMAP_POSITIVEX
    | DDSCAPS2_CUBEMAP_NEGATIVEX
    | DDSCAPS2_CUBEMAP_POSITIVEY
    | DDSCAPS2_CUBEMAP_NEGATIVEY
    | DDSCAPS2_CUBEMAP_POSITIVEZ
    | DDSCAPS2_CUBEMAP_NEGATIVEZ;
pub const DDSCAPS2_VOLUME: u32 = 0x0020_0000;

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{make_fourcc, DDSCAPS2_CUBEMAP_ALLFACES, DDSD_TEXTURE, DDS_MAGIC};

    #[test]
    fn fourcc_uses_every_character() {
        assert_eq!(make_fourcc(b'A', b'B', b'C', b'D'), 0x4443_4241);
        assert_eq!(DDS_MAGIC, 0x2053_4444);
    }

    #[test]
    fn combined_flags() {
        assert_eq!(DDSD_TEXTURE, 0x0000_1007);
        assert_eq!(DDSCAPS2_CUBEMAP_ALLFACES, 0x0000_FE00);
    }
}
