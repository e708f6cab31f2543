use crate::{
    crypto::{SignatureData, Signer},
    key_material::secp256k1::KeyPairSigner,
};
use anyhow::{anyhow, Result};
use async_trait::async_trait;

pub const SHORT_PRIVATE_KEY: &str = "0x1234";
pub const SHORT_KEY_ADDRESS: &str = "0xcf03dd0a894ef79cb5b601a43c4b25e3ae4c67ed";
pub const SHORT_KEY_DID: &str = "did:ethr:0xcf03dd0a894ef79cb5b601a43c4b25e3ae4c67ed";

pub const DANEEL_PRIVATE_KEY: &str =
    "0x54ece214d38fe6b46110a21c69fd55230f09688bf85b95fc7c1e4e160441ece1";
pub const DANEEL_ADDRESS: &str = "0x4123cbd143b55c06e451ff253af09286b687a950";

pub fn short_key() -> KeyPairSigner {
    KeyPairSigner::from_private_key_hex(SHORT_PRIVATE_KEY).unwrap()
}

pub fn daneel_key() -> KeyPairSigner {
    KeyPairSigner::from_private_key_hex(DANEEL_PRIVATE_KEY).unwrap()
}

/// A signer whose key is unavailable
pub struct BrokenSigner;

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl Signer for BrokenSigner {
    fn address(&self) -> String {
        SHORT_KEY_ADDRESS.into()
    }

    async fn sign(&self, _message: &[u8]) -> Result<SignatureData> {
        Err(anyhow!("Hardware key is locked"))
    }
}
