//! Fixed-size byte buffers used for hashes, nonces and challenge ids.

use std::fmt;

use rand::CryptoRng;
use serde::{Serialize, Serializer, Deserialize, Deserializer};
use serde::de::Error as DeError;

use crate::error::ErrorKind;
use crate::utils::*;


/// Byte buffer whose length is fixed at the type level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedBuf<const N: usize>([u8; N]);


/// 32-byte digest produced by the hash primitive.
pub type Hash32 = FixedBuf<32>;


impl<const N: usize> FixedBuf<N> {
    /// Declared size of the buffer in bytes.
    pub const SIZE: usize = N;

    /// Wrap an array of the exact size.
    pub const fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// Create from a slice that must have exactly `N` bytes.
    pub fn from_slice(buf: &[u8]) -> CoreResult<Self> {
        let bytes: [u8; N] = buf.try_into().map_err(|_| error_with(
            ErrorKind::InvalidSize,
            format!("expected {} bytes, got {}", N, buf.len())
        ))?;
        Ok(Self(bytes))
    }

    /// Buffer filled with the same byte.
    pub fn alloc(fill: u8) -> Self {
        Self([fill; N])
    }

    /// Random buffer from a cryptographically secure generator.
    pub fn random<R: CryptoRng + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; N];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Random buffer from the thread-local secure generator.
    pub fn from_random() -> Self {
        Self::random(&mut rand::rng())
    }

    /// Parse a hex string of exactly `2 * N` characters.
    pub fn from_hex(hex_str: &str) -> CoreResult<Self> {
        Self::from_slice(&decode_hex(hex_str)?)
    }

    /// Lowercase hex representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    pub fn into_inner(self) -> [u8; N] {
        self.0
    }
}


impl<const N: usize> Default for FixedBuf<N> {
    fn default() -> Self {
        Self([0u8; N])
    }
}


impl<const N: usize> AsRef<[u8]> for FixedBuf<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}


impl<const N: usize> From<[u8; N]> for FixedBuf<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}


impl<const N: usize> TryFrom<&[u8]> for FixedBuf<N> {
    type Error = crate::error::Error;

    fn try_from(buf: &[u8]) -> CoreResult<Self> {
        Self::from_slice(buf)
    }
}


impl<const N: usize> fmt::Display for FixedBuf<N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}


impl<const N: usize> Serialize for FixedBuf<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}


impl<'de, const N: usize> Deserialize<'de> for FixedBuf<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex_str = String::deserialize(deserializer)?;
        Self::from_hex(&hex_str).map_err(D::Error::custom)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice() {
        let buf = FixedBuf::<4>::from_slice(&[1, 2, 3, 4]).unwrap();
        assert_eq!(buf.as_bytes(), &[1, 2, 3, 4]);
        assert_eq!(FixedBuf::<4>::SIZE, 4);

        let err = FixedBuf::<4>::from_slice(&[1, 2, 3]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSize);
        assert_eq!(err.to_string(), "expected 4 bytes, got 3");

        let err = FixedBuf::<4>::from_slice(&[1, 2, 3, 4, 5]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSize);
    }

    #[test]
    fn test_hex() {
        let buf = FixedBuf::<3>::from_hex("0a0b0c").unwrap();
        assert_eq!(buf.to_hex(), "0a0b0c");
        assert_eq!(buf.to_string(), "0a0b0c");

        let err = FixedBuf::<3>::from_hex("0a0b").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSize);

        let err = FixedBuf::<3>::from_hex("0a0b0g").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidHex);
    }

    #[test]
    fn test_alloc_and_default() {
        assert_eq!(FixedBuf::<16>::alloc(0xab).to_vec(), vec![0xab; 16]);
        assert_eq!(Hash32::default().to_vec(), vec![0u8; 32]);
    }

    #[test]
    fn test_random() {
        let a = FixedBuf::<16>::from_random();
        let b = FixedBuf::<16>::random(&mut rand::rng());
        assert_eq!(a.as_bytes().len(), 16);
        // 2^-128 chance of a false failure
        assert_ne!(a, b);
    }

    #[test]
    fn test_serde() {
        let buf = FixedBuf::<2>::new([0xde, 0xad]);
        let json = serde_json::to_string(&buf).unwrap();
        assert_eq!(json, "\"dead\"");
        let back: FixedBuf<2> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, buf);
        assert!(serde_json::from_str::<FixedBuf<2>>("\"deadbe\"").is_err());
    }
}
