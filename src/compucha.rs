//! Proof-of-work challenge: a challenge id paired with a nonce. The id of
//! the challenge is the double hash of its 32-byte serialized form and the
//! challenge is accepted when that id, read as a big-endian number, is below
//! a target.

use rand::CryptoRng;
use serde::{Serialize, Serializer, Deserialize, Deserializer};
use serde::de::Error as DeError;
use tracing::debug;

use crate::buf::{FixedBuf, Hash32};
use crate::hash::{Blake3, HashFunction};
use crate::number::*;
use crate::reader::BufReader;
use crate::utils::*;


/// Size of the challenge id in bytes.
pub const CHALLENGE_ID_SIZE: usize = 16;

/// Size of the serialized challenge in bytes.
pub const COMPUCHA_SIZE: usize = CHALLENGE_ID_SIZE + U128::SIZE;


/// Challenge id plus nonce. The id of the challenge is derived on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompuchaChallenge {
    challenge_id: FixedBuf<CHALLENGE_ID_SIZE>,
    nonce: U128,
}


impl CompuchaChallenge {
    /// Create a challenge from its parts.
    pub fn new(challenge_id: FixedBuf<CHALLENGE_ID_SIZE>, nonce: U128) -> Self {
        Self { challenge_id, nonce }
    }

    /// Pair the challenge id with a random nonce from the thread-local
    /// secure generator.
    pub fn from_random_nonce(challenge_id: FixedBuf<CHALLENGE_ID_SIZE>) -> Self {
        Self::from_random_nonce_with(&mut rand::rng(), challenge_id)
    }

    /// Pair the challenge id with a random nonce from the given secure
    /// generator.
    pub fn from_random_nonce_with<R: CryptoRng + ?Sized>(
            rng: &mut R, challenge_id: FixedBuf<CHALLENGE_ID_SIZE>) -> Self {
        let mut nonce_bytes = [0u8; 16];
        rng.fill_bytes(&mut nonce_bytes);
        Self::new(challenge_id, U128::new(u128::from_be_bytes(nonce_bytes)))
    }

    /// Read a challenge from the next 32 bytes of the reader.
    pub fn from_reader(reader: &mut BufReader) -> CoreResult<Self> {
        let mut fields = BufReader::new(reader.read(COMPUCHA_SIZE)?);
        let challenge_id = fields.read_fixed::<CHALLENGE_ID_SIZE>()?;
        let nonce = fields.read_u128()?;
        Ok(Self::new(challenge_id, nonce))
    }

    pub fn from_buf(buf: &FixedBuf<COMPUCHA_SIZE>) -> CoreResult<Self> {
        Self::from_reader(&mut BufReader::new(buf.as_bytes()))
    }

    pub fn from_hex(hex_str: &str) -> CoreResult<Self> {
        Self::from_buf(&FixedBuf::from_hex(hex_str)?)
    }

    pub fn challenge_id(&self) -> &FixedBuf<CHALLENGE_ID_SIZE> {
        &self.challenge_id
    }

    pub fn nonce(&self) -> U128 {
        self.nonce
    }

    /// Serialized form: challenge id followed by the big-endian nonce.
    pub fn to_buf(&self) -> FixedBuf<COMPUCHA_SIZE> {
        let mut bytes = [0u8; COMPUCHA_SIZE];
        bytes[..CHALLENGE_ID_SIZE].copy_from_slice(self.challenge_id.as_bytes());
        bytes[CHALLENGE_ID_SIZE..].copy_from_slice(&self.nonce.to_be_bytes());
        FixedBuf::new(bytes)
    }

    pub fn to_hex(&self) -> String {
        self.to_buf().to_hex()
    }

    /// Double BLAKE3 hash of the serialized form.
    pub fn id(&self) -> Hash32 {
        self.id_with::<Blake3>()
    }

    /// Double hash of the serialized form with the given hash function.
    pub fn id_with<H: HashFunction>(&self) -> Hash32 {
        H::double_hash(self.to_buf().as_bytes())
    }

    /// Check the id as a big-endian number is strictly below the target.
    pub fn is_target_valid(&self, target: &U256) -> bool {
        self.is_target_valid_with::<Blake3>(target)
    }

    pub fn is_target_valid_with<H: HashFunction>(&self, target: &U256) -> bool {
        &U256::from_be_bytes(self.id_with::<H>().as_bytes()) < target
    }

    /// Try up to `max_attempts` random nonces and return the first
    /// challenge whose id is below the target, or `None` if none was found.
    pub fn mine<R: CryptoRng + ?Sized>(rng: &mut R,
                                       challenge_id: FixedBuf<CHALLENGE_ID_SIZE>,
                                       target: &U256,
                                       max_attempts: u64) -> Option<Self> {
        debug!(%challenge_id, max_attempts, "searching for a valid nonce");
        for attempt in 0..max_attempts {
            let challenge = Self::from_random_nonce_with(rng, challenge_id);
            if challenge.is_target_valid(target) {
                debug!(attempt, nonce = %challenge.nonce, "valid nonce found");
                return Some(challenge);
            }
        }
        debug!(max_attempts, "no valid nonce found");
        None
    }
}


impl Serialize for CompuchaChallenge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}


impl<'de> Deserialize<'de> for CompuchaChallenge {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex_str = String::deserialize(deserializer)?;
        Self::from_hex(&hex_str).map_err(D::Error::custom)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::hash::{Sha3, double_blake3_hash};
    use crate::writer::BufWriter;
    use num_bigint::BigUint;

    fn sample() -> CompuchaChallenge {
        CompuchaChallenge::new(
            FixedBuf::from_hex("000102030405060708090a0b0c0d0e0f").unwrap(),
            U128::new(0x1112131415161718191a1b1c1d1e1f20),
        )
    }

    #[test]
    fn test_to_buf() {
        let buf = sample().to_buf();
        assert_eq!(
            buf.to_hex(),
            "000102030405060708090a0b0c0d0e0f\
             1112131415161718191a1b1c1d1e1f20"
        );
        assert_eq!(COMPUCHA_SIZE, 32);
    }

    #[test]
    fn test_to_buf_matches_writer() {
        let challenge = CompuchaChallenge::new(FixedBuf::alloc(0xab),
                                               U128::MAX);
        let mut writer = BufWriter::new();
        writer
            .write(challenge.challenge_id().to_vec())
            .write_u128(&challenge.nonce());
        assert_eq!(challenge.to_buf().to_vec(), writer.to_buf());
        assert_eq!(challenge.to_hex(), hex::encode(writer.to_buf()));
    }

    #[test]
    fn test_from_hex() {
        let challenge = sample();
        let hex_str = challenge.to_hex();
        assert_eq!(CompuchaChallenge::from_hex(&hex_str).unwrap(), challenge);
        assert_eq!(CompuchaChallenge::from_hex("0011").unwrap_err().kind(),
                   ErrorKind::InvalidSize);
    }

    #[test]
    fn test_from_reader() {
        let mut data = sample().to_buf().to_vec();
        data.push(0x99);
        let mut reader = BufReader::new(&data);
        assert_eq!(CompuchaChallenge::from_reader(&mut reader).unwrap(),
                   sample());
        assert_eq!(reader.read_remainder(), &[0x99]);

        let truncated = &data[..20];
        let mut reader = BufReader::new(truncated);
        assert_eq!(CompuchaChallenge::from_reader(&mut reader).unwrap_err()
                       .kind(),
                   ErrorKind::NotEnoughData);
        assert_eq!(reader.pos(), 0);
    }

    #[test]
    fn test_id() {
        let challenge = sample();
        let expected = double_blake3_hash(challenge.to_buf().as_bytes());
        assert_eq!(challenge.id(), expected);
        assert_eq!(challenge.id(), challenge.id());

        let sha3_id = challenge.id_with::<Sha3>();
        assert_eq!(sha3_id, Sha3::double_hash(challenge.to_buf()
                                                  .as_bytes()));
        assert_ne!(sha3_id, expected);
    }

    #[test]
    fn test_id_tracks_nonce() {
        let challenge = sample();
        let other = CompuchaChallenge::new(*challenge.challenge_id(),
                                           U128::new(1));
        assert_ne!(challenge.id(), other.id());
    }

    #[test]
    fn test_is_target_valid_threshold() {
        let challenge = sample();
        let id = U256::from_be_bytes(challenge.id().as_bytes());

        let above = U256::new(id.value() + 1u32).unwrap();
        assert!(challenge.is_target_valid(&above));
        assert!(!challenge.is_target_valid(&id));

        let below = U256::new(id.value() - 1u32).unwrap();
        assert!(!challenge.is_target_valid(&below));
    }

    #[test]
    fn test_is_target_valid_extremes() {
        let challenge = sample();
        assert!(!challenge.is_target_valid(&U256::zero()));
        // the id equals the maximum only with negligible probability
        assert!(challenge.is_target_valid(&U256::max()));
    }

    #[test]
    fn test_from_random_nonce() {
        let challenge_id = FixedBuf::alloc(3);
        let a = CompuchaChallenge::from_random_nonce(challenge_id);
        let b = CompuchaChallenge::from_random_nonce(challenge_id);
        assert_eq!(a.challenge_id(), &challenge_id);
        // 2^-128 chance of a false failure
        assert_ne!(a.nonce(), b.nonce());
    }

    #[test]
    fn test_mine() {
        let mut rng = rand::rng();
        let challenge_id = FixedBuf::alloc(5);

        // one in 16 ids has a leading zero nibble
        let target = U256::new(BigUint::from(1u8) << 252).unwrap();
        let challenge = CompuchaChallenge::mine(&mut rng, challenge_id, &target,
                                                10_000).unwrap();
        assert!(challenge.is_target_valid(&target));
        assert_eq!(challenge.challenge_id(), &challenge_id);

        let found = CompuchaChallenge::mine(&mut rng, challenge_id,
                                            &U256::zero(), 100);
        assert!(found.is_none());
    }

    #[test]
    fn test_serde() {
        let challenge = sample();
        let json = serde_json::to_string(&challenge).unwrap();
        assert_eq!(json, format!("\"{}\"", challenge.to_hex()));
        let back: CompuchaChallenge = serde_json::from_str(&json).unwrap();
        assert_eq!(back, challenge);
    }
}
