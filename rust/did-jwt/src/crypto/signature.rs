//! JOSE encoding of secp256k1 signatures, and the recovery of signer
//! addresses from them.

use super::did::strip_hex_prefix;
use anyhow::{anyhow, Result};
use k256::{
    ecdsa::{signature::hazmat::PrehashVerifier, RecoveryId, Signature, VerifyingKey},
    elliptic_curve::sec1::ToEncodedPoint,
};
use sha2::{Digest, Sha256};
use sha3::Keccak256;

/// Size of a JOSE `r||s` signature
pub const SIGNATURE_SIZE: usize = 64;
/// Size of a JOSE `r||s||v` signature
pub const SIGNATURE_RECOVERABLE_SIZE: usize = 65;

const LEGACY_RECOVERY_OFFSET: u8 = 27;

/// An ECDSA signature over secp256k1 together with the recovery id that
/// identifies which of the candidate public keys produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignatureData {
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub recovery_id: u8,
}

impl SignatureData {
    pub fn new(r: [u8; 32], s: [u8; 32], recovery_id: u8) -> Self {
        SignatureData { r, s, recovery_id }
    }

    /// The JOSE serialization: `r||s`, with the recovery id appended when
    /// `recoverable` is set.
    pub fn to_jose(&self, recoverable: bool) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(SIGNATURE_RECOVERABLE_SIZE);
        bytes.extend_from_slice(&self.r);
        bytes.extend_from_slice(&self.s);
        if recoverable {
            bytes.push(self.recovery_id);
        }
        bytes
    }

    /// Interpret JOSE signature bytes. A 65-byte signature yields exactly one
    /// candidate; a 64-byte one carries no recovery id, so both possible ids
    /// are returned as candidates.
    pub fn from_jose(bytes: &[u8]) -> Result<Vec<SignatureData>> {
        if bytes.len() != SIGNATURE_SIZE && bytes.len() != SIGNATURE_RECOVERABLE_SIZE {
            return Err(anyhow!(
                "Expected a {SIGNATURE_SIZE} or {SIGNATURE_RECOVERABLE_SIZE} byte signature, got {} bytes",
                bytes.len()
            ));
        }

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[0..32]);
        s.copy_from_slice(&bytes[32..64]);

        Ok(match bytes.get(SIGNATURE_SIZE) {
            Some(v) if *v >= LEGACY_RECOVERY_OFFSET => {
                vec![SignatureData::new(r, s, v - LEGACY_RECOVERY_OFFSET)]
            }
            Some(v) => vec![SignatureData::new(r, s, *v)],
            None => vec![SignatureData::new(r, s, 0), SignatureData::new(r, s, 1)],
        })
    }

    /// The signature as a low-S normalized [Signature], with the recovery id
    /// adjusted to match.
    fn normalized(&self) -> Result<(Signature, RecoveryId)> {
        let mut bytes = [0u8; SIGNATURE_SIZE];
        bytes[0..32].copy_from_slice(&self.r);
        bytes[32..64].copy_from_slice(&self.s);

        let signature = Signature::from_slice(&bytes)?;
        let recovery_id = RecoveryId::from_byte(self.recovery_id)
            .ok_or_else(|| anyhow!("Invalid recovery id: {}", self.recovery_id))?;

        Ok(match signature.normalize_s() {
            Some(low_s) => (
                low_s,
                RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced()),
            ),
            None => (signature, recovery_id),
        })
    }

    /// Recover the address of the key that signed `message`
    pub fn recover_address(&self, message: &[u8]) -> Result<String> {
        let (signature, recovery_id) = self.normalized()?;
        let digest = Sha256::digest(message);
        let key = VerifyingKey::recover_from_prehash(&digest, &signature, recovery_id)?;

        Ok(ethereum_address(&key))
    }

    /// Check the signature over `message` against a known public key, without
    /// recovery
    pub fn verify(&self, message: &[u8], key: &VerifyingKey) -> Result<()> {
        let (signature, _) = self.normalized()?;
        let digest = Sha256::digest(message);

        Ok(key.verify_prehash(&digest, &signature)?)
    }
}

/// Parse a SEC1 encoded public key. The bare 64-byte `x||y` form (no `0x04`
/// tag) is accepted as well.
pub fn parse_public_key(bytes: &[u8]) -> Result<VerifyingKey> {
    if bytes.len() == 64 {
        let mut tagged = Vec::with_capacity(65);
        tagged.push(0x04);
        tagged.extend_from_slice(bytes);
        return Ok(VerifyingKey::from_sec1_bytes(&tagged)?);
    }

    Ok(VerifyingKey::from_sec1_bytes(bytes)?)
}

/// Parse a hex encoded public key, with or without `0x`
pub fn parse_public_key_hex(hex_key: &str) -> Result<VerifyingKey> {
    parse_public_key(&hex::decode(strip_hex_prefix(hex_key))?)
}

/// The Ethereum address of a key: the last 20 bytes of the keccak-256 digest
/// of the untagged uncompressed point, as `0x`-prefixed lower-case hex
pub fn ethereum_address(key: &VerifyingKey) -> String {
    let point = key.as_affine().to_encoded_point(false);
    let digest = Keccak256::digest(&point.as_bytes()[1..]);

    format!("0x{}", hex::encode(&digest[12..]))
}
