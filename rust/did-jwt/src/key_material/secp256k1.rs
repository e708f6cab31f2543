use crate::crypto::{
    did::{strip_hex_prefix, DID_PREFIX, ETHR_METHOD},
    signature::ethereum_address,
    SignatureData, Signer,
};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use k256::{
    ecdsa::{SigningKey, VerifyingKey},
    elliptic_curve::{
        bigint::ArrayEncoding, ops::Reduce, point::AffineCoordinates, sec1::ToEncodedPoint, Curve,
        Field, PrimeField,
    },
    FieldBytes, ProjectivePoint, Scalar, Secp256k1, U256,
};
use sha2::{Digest, Sha256};

const PRIVATE_KEY_SIZE: usize = 32;

/// An in-memory secp256k1 key pair. Signatures are deterministic (RFC 6979),
/// so the same key always produces the same token for the same signing input.
///
/// The `s` value is left as the nonce produced it, high or low, so tokens are
/// byte-for-byte identical to those of other DID JWT implementations that
/// don't normalize. Verifiers accept either form.
#[derive(Clone)]
pub struct KeyPairSigner {
    signing_key: SigningKey,
    address: String,
}

impl KeyPairSigner {
    pub fn new(signing_key: SigningKey) -> Self {
        let address = ethereum_address(signing_key.verifying_key());
        KeyPairSigner {
            signing_key,
            address,
        }
    }

    /// Build a signer from a hex encoded private key, with or without `0x`.
    /// Keys shorter than 32 bytes are left-padded with zeroes.
    pub fn from_private_key_hex(private_key: &str) -> Result<Self> {
        let digits = strip_hex_prefix(private_key);
        let digits = if digits.len() % 2 == 1 {
            format!("0{digits}")
        } else {
            digits.to_owned()
        };

        let bytes = hex::decode(digits)?;
        if bytes.len() > PRIVATE_KEY_SIZE {
            return Err(anyhow!(
                "Private key is {} bytes, expected at most {PRIVATE_KEY_SIZE}",
                bytes.len()
            ));
        }

        let mut padded = [0u8; PRIVATE_KEY_SIZE];
        padded[PRIVATE_KEY_SIZE - bytes.len()..].copy_from_slice(&bytes);

        Ok(KeyPairSigner::new(SigningKey::from_slice(&padded)?))
    }

    /// Generate a fresh random key pair
    pub fn generate() -> Self {
        KeyPairSigner::new(SigningKey::random(&mut rand::rngs::OsRng))
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// The uncompressed SEC1 public key, hex encoded with a `0x` prefix
    pub fn public_key_hex(&self) -> String {
        let point = self.verifying_key().as_affine().to_encoded_point(false);
        format!("0x{}", hex::encode(point.as_bytes()))
    }

    /// The `did:ethr` DID controlled by this key
    pub fn did(&self) -> String {
        format!("{DID_PREFIX}{ETHR_METHOD}:{}", self.address)
    }

    /// ECDSA over a SHA-256 digest with the RFC 6979 nonce. The recovery id
    /// is the parity of the nonce point, plus 2 if its x coordinate
    /// overflowed the group order.
    fn sign_digest(&self, digest: &FieldBytes) -> Result<SignatureData> {
        let secret: Scalar = **self.signing_key.as_nonzero_scalar();
        let z = <Scalar as Reduce<U256>>::reduce_bytes(digest);

        let nonce = rfc6979::generate_k::<Sha256, _>(
            &secret.to_repr(),
            &Secp256k1::ORDER.to_be_byte_array(),
            &z.to_repr(),
            &[],
        );
        let k = Option::<Scalar>::from(Scalar::from_repr(nonce))
            .ok_or_else(|| anyhow!("RFC 6979 produced an out of range nonce"))?;
        let k_inverse =
            Option::<Scalar>::from(k.invert()).ok_or_else(|| anyhow!("Nonce is not invertible"))?;

        let point = (ProjectivePoint::GENERATOR * k).to_affine();
        let x = point.x();
        let r = <Scalar as Reduce<U256>>::reduce_bytes(&x);
        let s = k_inverse * (z + r * secret);

        if bool::from(r.is_zero()) || bool::from(s.is_zero()) {
            return Err(anyhow!("Degenerate signature"));
        }

        let is_y_odd = u8::from(bool::from(point.y_is_odd()));
        let is_x_reduced = u8::from(r.to_repr() != x);

        let mut r_bytes = [0u8; 32];
        let mut s_bytes = [0u8; 32];
        r_bytes.copy_from_slice(&r.to_repr());
        s_bytes.copy_from_slice(&s.to_repr());

        Ok(SignatureData::new(
            r_bytes,
            s_bytes,
            is_y_odd | (is_x_reduced << 1),
        ))
    }
}

impl std::fmt::Debug for KeyPairSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPairSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl Signer for KeyPairSigner {
    fn address(&self) -> String {
        self.address.clone()
    }

    async fn sign(&self, message: &[u8]) -> Result<SignatureData> {
        self.sign_digest(&Sha256::digest(message))
    }
}
