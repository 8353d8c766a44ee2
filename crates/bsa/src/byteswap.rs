//! Byte order conversion primitives.

/// Order in which the bytes of a multi-byte scalar are stored
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Least significant byte first
    #[default]
    Little,

    /// Most significant byte first
    Big,
}

impl ByteOrder {
    /// The byte order of the host this library was compiled for
    #[cfg(target_endian = "little")]
    pub const NATIVE: ByteOrder = ByteOrder::Little;

    /// The byte order of the host this library was compiled for
    #[cfg(target_endian = "big")]
    pub const NATIVE: ByteOrder = ByteOrder::Big;

    /// Whether values stored in this order must be swapped after a host-order read
    #[inline]
    pub fn is_foreign(self) -> bool {
        self != Self::NATIVE
    }
}

impl From<ByteOrder> for binrw::Endian {
    fn from(value: ByteOrder) -> Self {
        match value {
            ByteOrder::Little => binrw::Endian::Little,
            ByteOrder::Big => binrw::Endian::Big,
        }
    }
}

impl From<binrw::Endian> for ByteOrder {
    fn from(value: binrw::Endian) -> Self {
        match value {
            binrw::Endian::Little => ByteOrder::Little,
            binrw::Endian::Big => ByteOrder::Big,
        }
    }
}

/// Reverses the order of the bytes making up a value.
///
/// Every implementation is its own inverse, `x.swap().swap() == x`.
pub trait ByteSwap: Sized {
    /// Returns the value with its bytes in reverse order
    fn swap(self) -> Self;
}

impl ByteSwap for u8 {
    #[inline]
    fn swap(self) -> Self {
        self
    }
}

impl ByteSwap for u16 {
    #[inline]
    fn swap(self) -> Self {
        ((self >> 8) & 0x00FF) | ((self << 8) & 0xFF00)
    }
}

impl ByteSwap for u32 {
    #[inline]
    fn swap(self) -> Self {
        let x = ((self >> 16) & 0x0000_FFFF) | ((self << 16) & 0xFFFF_0000);
        ((x & 0xFF00_FF00) >> 8) | ((x & 0x00FF_00FF) << 8)
    }
}

impl ByteSwap for u64 {
    #[inline]
    fn swap(self) -> Self {
        // 32-bit halves, then 16-bit quarters, then single bytes
        let x = self.rotate_left(32);
        let x = ((x & 0xFFFF_0000_FFFF_0000) >> 16) | ((x & 0x0000_FFFF_0000_FFFF) << 16);
        ((x & 0xFF00_FF00_FF00_FF00) >> 8) | ((x & 0x00FF_00FF_00FF_00FF) << 8)
    }
}

macro_rules! signed_swap {
    ($($signed:ty => $unsigned:ty),+ $(,)?) => {
        $(
            impl ByteSwap for $signed {
                #[inline]
                fn swap(self) -> Self {
                    (self as $unsigned).swap() as $signed
                }
            }
        )+
    };
}

signed_swap!(i8 => u8, i16 => u16, i32 => u32, i64 => u64);

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::{ByteOrder, ByteSwap};

    #[test]
    fn swaps_known_values() {
        assert_eq!(0x1234u16.swap(), 0x3412);
        assert_eq!(0x1234_5678u32.swap(), 0x7856_3412);
        assert_eq!(0x0102_0304_0506_0708u64.swap(), 0x0807_0605_0403_0201);
        assert_eq!((-2i16).swap(), 0xFEFFu16 as i16);
        assert_eq!(0x0000_0080i32.swap(), i32::MIN);
    }

    #[test]
    fn matches_core_swap_bytes() {
        assert_eq!(0xDEAD_BEEFu32.swap(), 0xDEAD_BEEFu32.swap_bytes());
        assert_eq!(
            0x0123_4567_89AB_CDEFu64.swap(),
            0x0123_4567_89AB_CDEFu64.swap_bytes()
        );
    }

    #[test]
    fn native_order_is_not_foreign() {
        assert!(!ByteOrder::NATIVE.is_foreign());
        assert_eq!(
            binrw::Endian::from(ByteOrder::Big),
            binrw::Endian::Big
        );
    }

    proptest! {
        #[test]
        fn swap16_is_an_involution(x in any::<u16>()) {
            prop_assert_eq!(x.swap().swap(), x);
        }

        #[test]
        fn swap32_is_an_involution(x in any::<u32>()) {
            prop_assert_eq!(x.swap().swap(), x);
        }

        #[test]
        fn swap64_is_an_involution(x in any::<u64>()) {
            prop_assert_eq!(x.swap().swap(), x);
        }

        #[test]
        fn signed_swap_reinterprets_bits(x in any::<i32>()) {
            prop_assert_eq!(x.swap() as u32, (x as u32).swap());
            prop_assert_eq!(x.swap().swap(), x);
        }
    }
}
