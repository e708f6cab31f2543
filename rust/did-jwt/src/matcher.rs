//! Attribution of a signature to the keys listed in a DID document.

use crate::{
    crypto::{
        did::strip_hex_prefix,
        signature::{ethereum_address, parse_public_key},
        JwtSignatureAlgorithm, SignatureData,
    },
    document::{DidDocument, PublicKeyEntry},
    error::JwtError,
};
use anyhow::Result;
use std::collections::BTreeSet;

/// The public keys of `document` that can check secp256k1 signatures. When
/// `auth` is set, only keys referenced from the document's `authentication`
/// section qualify.
pub fn authenticators(
    document: &DidDocument,
    auth: bool,
) -> Result<Vec<&PublicKeyEntry>, JwtError> {
    let authentication_ids: BTreeSet<&str> = document.authentication_key_ids().collect();

    let keys: Vec<&PublicKeyEntry> = document
        .public_key
        .iter()
        .filter(|entry| entry.key_type.is_secp256k1_verification_key())
        .filter(|entry| !auth || authentication_ids.contains(entry.id.as_str()))
        .collect();

    if keys.is_empty() {
        return Err(JwtError::NoSuitableKeys(document.id.clone()));
    }

    Ok(keys)
}

/// Does `signature` over `signed_data` come from one of `keys`?
///
/// `ES256K-R` signatures are matched by recovering the signer's address and
/// comparing it against the addresses of the keys. Plain `ES256K` signatures
/// are first checked against every decodable public key; if none of them
/// match and the document lists Ethereum addresses, recovery is tried as
/// well.
pub fn signature_matches(
    algorithm: JwtSignatureAlgorithm,
    keys: &[&PublicKeyEntry],
    signature: &[u8],
    signed_data: &[u8],
) -> Result<bool> {
    let candidates = SignatureData::from_jose(signature)?;

    match algorithm {
        JwtSignatureAlgorithm::ES256KR => Ok(recovered_address_matches(
            keys,
            &candidates,
            signed_data,
        )),
        JwtSignatureAlgorithm::ES256K => {
            if public_key_matches(keys, &candidates, signed_data) {
                return Ok(true);
            }

            let has_address_keys = keys.iter().any(|key| key.ethereum_address.is_some());
            Ok(has_address_keys && recovered_address_matches(keys, &candidates, signed_data))
        }
    }
}

fn public_key_matches(
    keys: &[&PublicKeyEntry],
    candidates: &[SignatureData],
    signed_data: &[u8],
) -> bool {
    // Recovery ids don't matter without recovery, so any candidate will do
    let Some(signature) = candidates.first() else {
        return false;
    };

    keys.iter()
        .filter_map(|entry| entry.public_key_bytes())
        .filter_map(|bytes| bytes.ok())
        .filter_map(|bytes| parse_public_key(&bytes).ok())
        .any(|key| signature.verify(signed_data, &key).is_ok())
}

fn recovered_address_matches(
    keys: &[&PublicKeyEntry],
    candidates: &[SignatureData],
    signed_data: &[u8],
) -> bool {
    let recovered: BTreeSet<String> = candidates
        .iter()
        .filter_map(|candidate| match candidate.recover_address(signed_data) {
            Ok(address) => Some(normalize_address(&address)),
            Err(error) => {
                trace!("Could not recover a key from signature: {error}");
                None
            }
        })
        .collect();

    trace!("Recovered signer addresses: {:?}", recovered);

    keys.iter()
        .filter_map(|entry| key_address(entry))
        .any(|address| recovered.contains(&address))
}

/// The normalized address of a key entry: either its explicit
/// `ethereumAddress`, or the address derived from its public key
fn key_address(entry: &PublicKeyEntry) -> Option<String> {
    if let Some(address) = &entry.ethereum_address {
        return Some(normalize_address(address));
    }

    let bytes = entry.public_key_bytes()?.ok()?;
    let key = parse_public_key(&bytes).ok()?;

    Some(normalize_address(&ethereum_address(&key)))
}

fn normalize_address(address: &str) -> String {
    strip_hex_prefix(address).to_lowercase()
}
