use crate::buf::FixedBuf;
use crate::error::ErrorKind;
use crate::number::*;
use crate::varint::*;
use crate::utils::*;


/// Sequential reader over a borrowed byte sequence. A failed read never
/// moves the position.
#[derive(Debug, Clone)]
pub struct BufReader<'a> {
    buf: &'a [u8],
    pos: usize,
}


impl<'a> BufReader<'a> {
    /// Create a reader at position zero.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current read position.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Number of unread bytes.
    pub fn remainder_len(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Check whether all bytes have been consumed. Advisory only.
    pub fn eof(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Read the next `len` bytes.
    pub fn read(&mut self, len: usize) -> CoreResult<&'a [u8]> {
        if len > self.remainder_len() {
            return Err(error_with(
                ErrorKind::NotEnoughData,
                format!("need {} bytes at position {}, {} available",
                        len, self.pos, self.remainder_len())
            ));
        }
        let data = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(data)
    }

    /// Read the next `N` bytes into a fixed buffer.
    pub fn read_fixed<const N: usize>(&mut self) -> CoreResult<FixedBuf<N>> {
        let data = self.read(N)?;
        FixedBuf::from_slice(data)
    }

    /// Read everything from the current position to the end.
    pub fn read_remainder(&mut self) -> &'a [u8] {
        let data = &self.buf[self.pos..];
        self.pos = self.buf.len();
        data
    }

    /// Read exactly `T::SIZE` bytes and decode them big-endian.
    pub fn read_number<T: BasicNumber>(&mut self) -> CoreResult<T> {
        let start = self.pos;
        let data = self.read(T::SIZE)?;
        T::from_be_buf(data).map_err(|err| {
            self.pos = start;
            error_with(ErrorKind::InvalidValue, err.to_string())
        })
    }

    pub fn read_u8(&mut self) -> CoreResult<U8> {
        self.read_number()
    }

    pub fn read_u16(&mut self) -> CoreResult<U16> {
        self.read_number()
    }

    pub fn read_u32(&mut self) -> CoreResult<U32> {
        self.read_number()
    }

    pub fn read_u64(&mut self) -> CoreResult<U64> {
        self.read_number()
    }

    pub fn read_u128(&mut self) -> CoreResult<U128> {
        self.read_number()
    }

    pub fn read_u256(&mut self) -> CoreResult<U256> {
        self.read_number()
    }

    /// Read the bytes of the next varint, rejecting non-minimal encodings.
    /// On failure the position is restored to the start of the varint.
    pub fn read_var_int_buf(&mut self) -> CoreResult<&'a [u8]> {
        let start = self.pos;
        let buf = self.buf;
        match self.read_var_int_parts() {
            Ok(_) => Ok(&buf[start..self.pos]),
            Err(err) => {
                self.pos = start;
                Err(err)
            },
        }
    }

    /// Read the next canonical varint.
    pub fn read_var_int(&mut self) -> CoreResult<U64> {
        let start = self.pos;
        self.read_var_int_parts().map(U64::new).map_err(|err| {
            self.pos = start;
            err
        })
    }

    // Prefix byte plus payload, decoded and checked for minimality.
    fn read_var_int_parts(&mut self) -> CoreResult<u64> {
        let first = self.read(1)?[0];
        let (value, min) = match first {
            VAR_INT_PREFIX_U16 => (self.read_u16()?.value() as u64, VAR_INT_MIN_U16),
            VAR_INT_PREFIX_U32 => (self.read_u32()?.value() as u64, VAR_INT_MIN_U32),
            VAR_INT_PREFIX_U64 => (self.read_u64()?.value(), VAR_INT_MIN_U64),
            _ => return Ok(first as u64),
        };
        if value < min {
            return Err(error_with(
                ErrorKind::NonMinimalEncoding,
                format!("varint prefix {:#04x} used for value {}", first, value)
            ));
        }
        Ok(value)
    }
}
