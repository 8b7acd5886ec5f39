//! Exact-width unsigned integers with range-checked construction, checked
//! arithmetic and a canonical big-endian byte form.
//!
//! All widths share the `BasicNumber` capability set. Arithmetic is computed
//! exactly on an unbounded intermediate (`BigUint`) and the result is checked
//! against the range of the type, so no operation ever wraps.

use std::fmt;

use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
use serde::{Serialize, Serializer, Deserialize, Deserializer};
use serde::de::Error as DeError;

use crate::error::ErrorKind;
use crate::utils::*;


/// Common capabilities of the fixed-width unsigned integers.
pub trait BasicNumber: Sized + Clone + Eq + Ord + fmt::Debug {
    /// Width in bytes of the big-endian form.
    const SIZE: usize;

    /// Exact value as an unbounded integer.
    fn bn(&self) -> BigUint;

    /// Construct from an unbounded integer, failing with `OutOfRange`.
    fn from_bn(value: &BigUint) -> CoreResult<Self>;

    /// Big-endian bytes, always exactly `SIZE` long.
    fn to_be_buf(&self) -> Vec<u8>;

    /// Decode big-endian bytes, failing with `InvalidSize` unless exactly
    /// `SIZE` bytes are given.
    fn from_be_buf(buf: &[u8]) -> CoreResult<Self>;

    /// Construct from a signed unbounded integer. Negative values are
    /// out of range.
    fn from_bigint(value: &BigInt) -> CoreResult<Self> {
        let unsigned = value.to_biguint().ok_or_else(|| error_with(
            ErrorKind::OutOfRange, format!("negative value {}", value)
        ))?;
        Self::from_bn(&unsigned)
    }

    fn add(&self, other: &Self) -> CoreResult<Self> {
        Self::from_bn(&(self.bn() + other.bn()))
            .map_err(|_| ErrorKind::Overflow.into())
    }

    fn sub(&self, other: &Self) -> CoreResult<Self> {
        if self < other {
            return Err(ErrorKind::Underflow.into());
        }
        Self::from_bn(&(self.bn() - other.bn()))
    }

    fn mul(&self, other: &Self) -> CoreResult<Self> {
        Self::from_bn(&(self.bn() * other.bn()))
            .map_err(|_| ErrorKind::Overflow.into())
    }

    fn div(&self, other: &Self) -> CoreResult<Self> {
        let divisor = other.bn();
        if divisor.is_zero() {
            return Err(ErrorKind::DivisionByZero.into());
        }
        Self::from_bn(&(self.bn() / divisor))
    }

    /// Hex of the big-endian bytes.
    fn to_hex(&self) -> String {
        hex::encode(self.to_be_buf())
    }

    /// Parse hex of exactly `SIZE` bytes.
    fn from_hex(hex_str: &str) -> CoreResult<Self> {
        Self::from_be_buf(&decode_hex(hex_str)?)
    }
}


fn out_of_range(value: &BigUint, bits: usize) -> crate::error::Error {
    error_with(
        ErrorKind::OutOfRange,
        format!("value {} does not fit in {} bits", value, bits)
    )
}


fn invalid_size(expected: usize, actual: usize) -> crate::error::Error {
    error_with(
        ErrorKind::InvalidSize,
        format!("expected {} bytes, got {}", expected, actual)
    )
}


macro_rules! native_uint {
    ($name:ident, $prim:ty, $size:expr) => {
        #[doc = concat!("Unsigned integer of exactly ", stringify!($size),
                        " byte(s) backed by `", stringify!($prim), "`.")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
                 Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name($prim);

        impl $name {
            pub const MAX: Self = Self(<$prim>::MAX);

            pub const fn new(value: $prim) -> Self {
                Self(value)
            }

            pub const fn value(&self) -> $prim {
                self.0
            }

            /// Big-endian bytes as a fixed array.
            pub const fn to_be_bytes(&self) -> [u8; $size] {
                self.0.to_be_bytes()
            }
        }

        impl BasicNumber for $name {
            const SIZE: usize = $size;

            fn bn(&self) -> BigUint {
                BigUint::from(self.0)
            }

            fn from_bn(value: &BigUint) -> CoreResult<Self> {
                <$prim>::try_from(value)
                    .map(Self)
                    .map_err(|_| out_of_range(value, $size * 8))
            }

            fn to_be_buf(&self) -> Vec<u8> {
                self.0.to_be_bytes().to_vec()
            }

            fn from_be_buf(buf: &[u8]) -> CoreResult<Self> {
                let bytes: [u8; $size] = buf.try_into()
                    .map_err(|_| invalid_size($size, buf.len()))?;
                Ok(Self(<$prim>::from_be_bytes(bytes)))
            }
        }

        impl From<$prim> for $name {
            fn from(value: $prim) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $prim {
            fn from(value: $name) -> $prim {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}


native_uint!(U8, u8, 1);
native_uint!(U16, u16, 2);
native_uint!(U32, u32, 4);
native_uint!(U64, u64, 8);
native_uint!(U128, u128, 16);


macro_rules! widen {
    ($from:ident => $($to:ident),*) => {
        $(
            impl From<$from> for $to {
                fn from(value: $from) -> Self {
                    Self(value.0.into())
                }
            }
        )*
    };
}


widen!(U8 => U16, U32, U64, U128);
widen!(U16 => U32, U64, U128);
widen!(U32 => U64, U128);
widen!(U64 => U128);


/// 256-bit unsigned integer. No machine width covers it, so the value is
/// kept as an arbitrary-precision integer constrained to 256 bits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct U256(BigUint);


impl U256 {
    /// Number of bits.
    pub const BITS: u64 = 256;

    /// Construct from an unbounded integer.
    pub fn new(value: BigUint) -> CoreResult<Self> {
        if value.bits() > Self::BITS {
            return Err(out_of_range(&value, Self::BITS as usize));
        }
        Ok(Self(value))
    }

    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    /// Largest value, 2^256 - 1.
    pub fn max() -> Self {
        Self(BigUint::from_bytes_be(&[0xff; 32]))
    }

    /// Reinterpret 32 big-endian bytes as a number. Infallible since every
    /// 32-byte sequence is in range.
    pub fn from_be_bytes(bytes: &[u8; 32]) -> Self {
        Self(BigUint::from_bytes_be(bytes))
    }

    /// Big-endian bytes as a fixed array.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let digits = self.0.to_bytes_be();
        let mut bytes = [0u8; 32];
        // `digits` is at most 32 bytes by the range invariant
        bytes[32 - digits.len()..].copy_from_slice(&digits);
        bytes
    }

    pub fn value(&self) -> &BigUint {
        &self.0
    }
}


impl BasicNumber for U256 {
    const SIZE: usize = 32;

    fn bn(&self) -> BigUint {
        self.0.clone()
    }

    fn from_bn(value: &BigUint) -> CoreResult<Self> {
        Self::new(value.clone())
    }

    fn to_be_buf(&self) -> Vec<u8> {
        self.to_be_bytes().to_vec()
    }

    fn from_be_buf(buf: &[u8]) -> CoreResult<Self> {
        let bytes: &[u8; 32] = buf.try_into()
            .map_err(|_| invalid_size(32, buf.len()))?;
        Ok(Self::from_be_bytes(bytes))
    }
}


macro_rules! u256_from {
    ($($from:ty),*) => {
        $(
            impl From<$from> for U256 {
                fn from(value: $from) -> Self {
                    Self(BigUint::from(value))
                }
            }
        )*
    };
}


u256_from!(u8, u16, u32, u64, u128);


macro_rules! u256_widen {
    ($($from:ident),*) => {
        $(
            impl From<$from> for U256 {
                fn from(value: $from) -> Self {
                    Self(BigUint::from(value.0))
                }
            }
        )*
    };
}


u256_widen!(U8, U16, U32, U64, U128);


impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}


impl Serialize for U256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}


impl<'de> Deserialize<'de> for U256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex_str = String::deserialize(deserializer)?;
        Self::from_hex(&hex_str).map_err(D::Error::custom)
    }
}
