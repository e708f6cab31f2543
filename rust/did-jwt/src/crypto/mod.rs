//! Signing capability and the secp256k1 primitives that tokens rely on.
//!
//! Tokens are signed through the [Signer] trait so that the key itself can
//! live anywhere: in memory (see [crate::key_material::secp256k1]), in a
//! hardware module or behind a remote signing service. A [Signer] only has
//! to do two things: produce a recoverable ECDSA signature over the SHA-256
//! digest of some bytes, and report the Ethereum-style address of its key.

pub mod algorithm;
pub mod did;
pub mod signature;

pub use algorithm::JwtSignatureAlgorithm;
pub use signature::SignatureData;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
pub trait SignerConditionalSendSync: Send + Sync {}

#[cfg(not(target_arch = "wasm32"))]
impl<S> SignerConditionalSendSync for S where S: Signer + Send + Sync {}

#[cfg(target_arch = "wasm32")]
pub trait SignerConditionalSendSync {}

#[cfg(target_arch = "wasm32")]
impl<S> SignerConditionalSendSync for S where S: Signer {}

/// This trait must be implemented by anything that is able to sign tokens on
/// behalf of an issuer.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait Signer: SignerConditionalSendSync {
    /// The `0x`-prefixed, lower-case hex address derived from the signer's
    /// public key. Issuers typically use it to form `did:ethr:<address>`.
    fn address(&self) -> String;

    /// Sign the SHA-256 digest of `message`, returning the signature along
    /// with its recovery id
    async fn sign(&self, message: &[u8]) -> Result<SignatureData>;
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl Signer for Box<dyn Signer> {
    fn address(&self) -> String {
        self.as_ref().address()
    }

    async fn sign(&self, message: &[u8]) -> Result<SignatureData> {
        self.as_ref().sign(message).await
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl<S> Signer for Arc<S>
where
    S: Signer + ?Sized,
{
    fn address(&self) -> String {
        (**self).address()
    }

    async fn sign(&self, message: &[u8]) -> Result<SignatureData> {
        (**self).sign(message).await
    }
}
