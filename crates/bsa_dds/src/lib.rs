//! # DDS Header Documentation
//!
//! This crate describes the header of the **DDS** (DirectDraw Surface) textures stored in BSA
//! archives. Only the header is decoded; the pixel data that follows is left to the caller.
//!
//! ## File Structure
//!
//! A DDS file consists of a magic number, the main header, an optional DX10 extension and the
//! pixel data.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: 0x20534444 ("DDS ")                               |
//! | 0x0004         | Header                 | 124 bytes: see below                                       |
//! | 0x0080         | DX10 Header            | 20 bytes: only when the FourCC is "DX10"                   |
//! | 0x0080/0x0094  | Data                   | The surfaces, top mip level first                          |
//!
//! ### Header
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Size                   | 4 bytes: Fixed value 124                                   |
//! | 0x0004         | Flags                  | 4 bytes: Which fields are valid (`DDSD_*`)                 |
//! | 0x0008         | Height                 | 4 bytes: Height of the top level in pixels                 |
//! | 0x000C         | Width                  | 4 bytes: Width of the top level in pixels                  |
//! | 0x0010         | Pitch or Linear Size   | 4 bytes: Scan line size, or top level size if compressed   |
//! | 0x0014         | Depth                  | 4 bytes: Depth of a volume texture                         |
//! | 0x0018         | Mip Map Count          | 4 bytes: Number of mip levels                              |
//! | 0x001C         | Reserved               | 44 bytes: Unused                                           |
//! | 0x0048         | Pixel Format           | 32 bytes: see below                                        |
//! | 0x0068         | Caps                   | 4 bytes: Surface complexity (`DDSCAPS_*`)                  |
//! | 0x006C         | Caps 2                 | 4 bytes: Cubemap faces and volume (`DDSCAPS2_*`)           |
//! | 0x0070         | Reserved               | 12 bytes: Unused                                           |
//!
//! ### Pixel Format
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Size                   | 4 bytes: Fixed value 32                                    |
//! | 0x0004         | Flags                  | 4 bytes: Which fields are valid (`DDPF_*`)                 |
//! | 0x0008         | FourCC                 | 4 bytes: Compression scheme, e.g. "DXT5"                   |
//! | 0x000C         | RGB Bit Count          | 4 bytes: Bits per pixel of uncompressed data               |
//! | 0x0010         | Bit Masks              | 16 bytes: Red, green, blue and alpha masks                 |
//!
//! ### DX10 Header
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | DXGI Format            | 4 bytes: A `DXGI_FORMAT` value                             |
//! | 0x0004         | Resource Dimension     | 4 bytes: Buffer, 1D, 2D or 3D texture                      |
//! | 0x0008         | Misc Flag              | 4 bytes: A `D3D11_RESOURCE_MISC_FLAG` value                |
//! | 0x000C         | Array Size             | 4 bytes: Number of array elements                          |
//! | 0x0010         | Misc Flags 2           | 4 bytes: Alpha mode                                        |
//!
//! ## Additional Information
//!
//! - **File Extension**: `.dds`
//! - **Endianness**: Little-endian for all multi-byte integers
//!

pub mod error;
pub mod flags;
pub mod read;
pub mod types;

pub use read::read_dds;
pub use types::{Dds, DdsHeader, DdsHeaderDx10, DdsPixelFormat, ResourceDimension};
