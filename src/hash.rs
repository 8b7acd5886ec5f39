use std::fmt::Debug;

use sha3::{Sha3_256, Digest};

use crate::buf::Hash32;


/// Hash primitive producing 32-byte digests. Implementations must be
/// deterministic; the Merkle tree and the challenge id depend on nothing else.
pub trait HashFunction: Debug + Clone + Default + Send + Sync + 'static {
    /// Single hash of the data.
    fn hash(data: &[u8]) -> Hash32;

    /// Keyed hash of the data.
    fn mac(key: &Hash32, data: &[u8]) -> Hash32;

    /// Hash of the hash of the data.
    fn double_hash(data: &[u8]) -> Hash32 {
        Self::hash(Self::hash(data).as_bytes())
    }
}


/// BLAKE3 hash primitive, the default one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake3;


impl HashFunction for Blake3 {
    fn hash(data: &[u8]) -> Hash32 {
        Hash32::new(*blake3::hash(data).as_bytes())
    }

    fn mac(key: &Hash32, data: &[u8]) -> Hash32 {
        Hash32::new(*blake3::keyed_hash(key.as_bytes(), data).as_bytes())
    }
}


/// SHA3-256 hash primitive. The keyed variant is SHA3-256 over the key
/// followed by the data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha3;


impl HashFunction for Sha3 {
    fn hash(data: &[u8]) -> Hash32 {
        let mut hasher = Sha3_256::new();
        hasher.update(data);
        Hash32::new(hasher.finalize().into())
    }

    fn mac(key: &Hash32, data: &[u8]) -> Hash32 {
        let mut hasher = Sha3_256::new();
        hasher.update(key.as_bytes());
        hasher.update(data);
        Hash32::new(hasher.finalize().into())
    }
}


/// Get BLAKE3 hash of a buffer.
pub fn blake3_hash(data: &[u8]) -> Hash32 {
    Blake3::hash(data)
}


/// Get double BLAKE3 hash of a buffer.
pub fn double_blake3_hash(data: &[u8]) -> Hash32 {
    Blake3::double_hash(data)
}


/// Get keyed BLAKE3 hash of a buffer.
pub fn blake3_mac(key: &Hash32, data: &[u8]) -> Hash32 {
    Blake3::mac(key, data)
}
