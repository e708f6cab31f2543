//! The subset of a DID document that token verification consumes.

use crate::{crypto::did::strip_hex_prefix, serde::Json};
use anyhow::{anyhow, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub const DEFAULT_CONTEXT: &str = "https://w3id.org/did/v1";

/// A resolved DID document. Only the public keys and the authentication
/// references are consulted when verifying tokens; services are carried
/// along for completeness.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct DidDocument {
    #[serde(rename = "@context", default = "default_context")]
    pub context: String,
    pub id: String,
    #[serde(rename = "publicKey", default)]
    pub public_key: Vec<PublicKeyEntry>,
    #[serde(default)]
    pub authentication: Vec<AuthenticationEntry>,
    #[serde(default)]
    pub service: Vec<ServiceEntry>,
}

fn default_context() -> String {
    DEFAULT_CONTEXT.into()
}

impl DidDocument {
    pub fn new(id: &str) -> Self {
        DidDocument {
            context: default_context(),
            id: id.to_owned(),
            public_key: Vec::new(),
            authentication: Vec::new(),
            service: Vec::new(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        DidDocument::from_json(json.as_bytes())
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(String::from_utf8(self.to_json()?)?)
    }

    /// The ids of the public keys that may be used to authenticate as the
    /// subject of this document
    pub fn authentication_key_ids(&self) -> impl Iterator<Item = &str> {
        self.authentication
            .iter()
            .map(|entry| entry.public_key.as_str())
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct PublicKeyEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub key_type: PublicKeyType,
    #[serde(default)]
    pub owner: String,
    #[serde(rename = "ethereumAddress", skip_serializing_if = "Option::is_none")]
    pub ethereum_address: Option<String>,
    #[serde(rename = "publicKeyHex", skip_serializing_if = "Option::is_none")]
    pub public_key_hex: Option<String>,
    #[serde(rename = "publicKeyBase64", skip_serializing_if = "Option::is_none")]
    pub public_key_base64: Option<String>,
    #[serde(rename = "publicKeyBase58", skip_serializing_if = "Option::is_none")]
    pub public_key_base58: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl PublicKeyEntry {
    /// The raw public key bytes, from whichever encoding the entry uses.
    /// Returns `None` if the entry only carries an Ethereum address.
    pub fn public_key_bytes(&self) -> Option<Result<Vec<u8>>> {
        if let Some(hex_key) = &self.public_key_hex {
            return Some(hex::decode(strip_hex_prefix(hex_key)).map_err(|error| anyhow!(error)));
        }
        if let Some(base64_key) = &self.public_key_base64 {
            return Some(
                base64::engine::general_purpose::STANDARD
                    .decode(base64_key)
                    .map_err(|error| anyhow!(error)),
            );
        }
        if let Some(base58_key) = &self.public_key_base58 {
            return Some(
                bs58::decode(base58_key)
                    .into_vec()
                    .map_err(|error| anyhow!(error)),
            );
        }
        None
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct AuthenticationEntry {
    #[serde(rename = "type")]
    pub key_type: PublicKeyType,
    #[serde(rename = "publicKey")]
    pub public_key: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ServiceEntry {
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(rename = "serviceEndpoint")]
    pub service_endpoint: String,
}

/// The `type` of a public key entry. Kept as an open string so that documents
/// with key types this crate doesn't know about still parse.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PublicKeyType(pub String);

impl PublicKeyType {
    pub const SECP256K1_VERIFICATION_KEY_2018: &'static str = "Secp256k1VerificationKey2018";
    pub const SECP256K1_SIGNATURE_AUTHENTICATION_2018: &'static str =
        "Secp256k1SignatureAuthentication2018";
    pub const SECP256K1_SIGNATURE_VERIFICATION_KEY_2018: &'static str =
        "Secp256k1SignatureVerificationKey2018";
    pub const ECDSA_PUBLIC_KEY_SECP256K1: &'static str = "EcdsaPublicKeySecp256k1";
    pub const ECDSA_SECP256K1_VERIFICATION_KEY_2019: &'static str =
        "EcdsaSecp256k1VerificationKey2019";
    pub const ECDSA_SECP256K1_RECOVERY_METHOD_2020: &'static str =
        "EcdsaSecp256k1RecoveryMethod2020";
    pub const CURVE25519_ENCRYPTION_PUBLIC_KEY: &'static str = "Curve25519EncryptionPublicKey";

    pub fn new(name: &str) -> Self {
        PublicKeyType(name.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether keys of this type can check secp256k1 token signatures
    pub fn is_secp256k1_verification_key(&self) -> bool {
        matches!(
            self.as_str(),
            PublicKeyType::SECP256K1_VERIFICATION_KEY_2018
                | PublicKeyType::SECP256K1_SIGNATURE_VERIFICATION_KEY_2018
                | PublicKeyType::ECDSA_PUBLIC_KEY_SECP256K1
                | PublicKeyType::ECDSA_SECP256K1_VERIFICATION_KEY_2019
                | PublicKeyType::ECDSA_SECP256K1_RECOVERY_METHOD_2020
        )
    }
}

impl From<&str> for PublicKeyType {
    fn from(name: &str) -> Self {
        PublicKeyType::new(name)
    }
}

impl Display for PublicKeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
