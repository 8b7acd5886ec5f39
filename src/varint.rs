//! Canonical variable-length integers.
//!
//! | Value range             | Encoding                        |
//! |-------------------------|---------------------------------|
//! | 0 - 252                 | 1 byte: the value itself        |
//! | 253 - 0xffff            | `0xfd` + 2-byte big-endian value |
//! | 0x10000 - 0xffffffff    | `0xfe` + 4-byte big-endian value |
//! | 0x100000000 - u64::MAX  | `0xff` + 8-byte big-endian value |
//!
//! A decoder rejects any encoding that uses a wider prefix than the value
//! needs, so every integer has exactly one valid byte form.

use crate::error::ErrorKind;
use crate::number::*;
use crate::reader::BufReader;
use crate::writer::BufWriter;
use crate::utils::*;


/// Prefix of a 2-byte payload.
pub const VAR_INT_PREFIX_U16: u8 = 0xfd;

/// Prefix of a 4-byte payload.
pub const VAR_INT_PREFIX_U32: u8 = 0xfe;

/// Prefix of an 8-byte payload.
pub const VAR_INT_PREFIX_U64: u8 = 0xff;

/// Smallest value that needs the 2-byte payload.
pub const VAR_INT_MIN_U16: u64 = 0xfd;

/// Smallest value that needs the 4-byte payload.
pub const VAR_INT_MIN_U32: u64 = 0x10000;

/// Smallest value that needs the 8-byte payload.
pub const VAR_INT_MIN_U64: u64 = 0x100000000;


/// Encoded varint kept as its canonical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarInt(Vec<u8>);


impl VarInt {
    /// Wrap raw encoded bytes as they are. Use `is_minimal` to check them.
    pub fn new(buf: Vec<u8>) -> Self {
        Self(buf)
    }

    pub fn from_u64(value: u64) -> Self {
        Self(BufWriter::var_int_buf(value))
    }

    pub fn from_u32(value: u32) -> Self {
        Self::from_u64(value as u64)
    }

    /// Read the next canonical varint from the reader.
    pub fn from_reader(reader: &mut BufReader) -> CoreResult<Self> {
        Ok(Self(reader.read_var_int_buf()?.to_vec()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_u64(&self) -> CoreResult<u64> {
        let mut reader = BufReader::new(&self.0);
        Ok(reader.read_var_int()?.value())
    }

    /// Decode as a 32-bit value, failing with `InvalidValue` when the value
    /// is wider.
    pub fn to_u32(&self) -> CoreResult<u32> {
        let value = self.to_u64()?;
        u32::try_from(value).map_err(|_| error_with(
            ErrorKind::InvalidValue,
            format!("varint {} does not fit in 32 bits", value)
        ))
    }

    /// Check the bytes are exactly the canonical encoding of their value.
    pub fn is_minimal(&self) -> bool {
        match self.to_u64() {
            Ok(value) => BufWriter::var_int_buf(value) == self.0,
            Err(_) => false,
        }
    }
}


impl From<U64> for VarInt {
    fn from(value: U64) -> Self {
        Self::from_u64(value.value())
    }
}
