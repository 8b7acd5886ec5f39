use crate::number::*;
use crate::varint::*;


/// Writer that accumulates byte fragments and concatenates them on demand.
#[derive(Debug, Clone, Default)]
pub struct BufWriter {
    bufs: Vec<Vec<u8>>,
    len: usize,
}


impl BufWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with initial fragments.
    pub fn from_bufs<I: IntoIterator<Item = Vec<u8>>>(bufs: I) -> Self {
        let mut writer = Self::new();
        for buf in bufs {
            writer.write(buf);
        }
        writer
    }

    /// Total number of accumulated bytes.
    pub fn length(&self) -> usize {
        self.len
    }

    /// Concatenate all fragments in append order.
    pub fn to_buf(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.len);
        for fragment in &self.bufs {
            buf.extend_from_slice(fragment);
        }
        buf
    }

    /// Append a fragment.
    pub fn write<B: Into<Vec<u8>>>(&mut self, buf: B) -> &mut Self {
        let buf = buf.into();
        self.len += buf.len();
        self.bufs.push(buf);
        self
    }

    pub fn write_u8(&mut self, value: &U8) -> &mut Self {
        self.write(value.to_be_buf())
    }

    pub fn write_u16(&mut self, value: &U16) -> &mut Self {
        self.write(value.to_be_buf())
    }

    pub fn write_u32(&mut self, value: &U32) -> &mut Self {
        self.write(value.to_be_buf())
    }

    pub fn write_u64(&mut self, value: &U64) -> &mut Self {
        self.write(value.to_be_buf())
    }

    pub fn write_u128(&mut self, value: &U128) -> &mut Self {
        self.write(value.to_be_buf())
    }

    pub fn write_u256(&mut self, value: &U256) -> &mut Self {
        self.write(value.to_be_buf())
    }

    /// Append the canonical varint encoding of the value.
    pub fn write_var_int(&mut self, value: &U64) -> &mut Self {
        self.write(Self::var_int_buf(value.value()))
    }

    /// Canonical varint encoding: the shortest legal prefix for the value.
    pub fn var_int_buf(value: u64) -> Vec<u8> {
        let mut buf = Vec::with_capacity(9);
        if value < VAR_INT_MIN_U16 {
            buf.push(value as u8);
        } else if value < VAR_INT_MIN_U32 {
            buf.push(VAR_INT_PREFIX_U16);
            buf.extend_from_slice(&(value as u16).to_be_bytes());
        } else if value < VAR_INT_MIN_U64 {
            buf.push(VAR_INT_PREFIX_U32);
            buf.extend_from_slice(&(value as u32).to_be_bytes());
        } else {
            buf.push(VAR_INT_PREFIX_U64);
            buf.extend_from_slice(&value.to_be_bytes());
        }
        buf
    }
}
