use crate::{
    crypto::did::{normalize_known_did, DID_PREFIX},
    document::{AuthenticationEntry, DidDocument, PublicKeyEntry, PublicKeyType},
};

/// The document an `ethr` DID has before its owner performs any DID
/// operations: a single owner key, known only by its Ethereum address.
pub fn mock_doc_for_address(address: &str) -> DidDocument {
    let did = if address.starts_with(DID_PREFIX) {
        address.to_owned()
    } else {
        normalize_known_did(address)
    };
    let owner = format!("{did}#owner");

    DidDocument {
        public_key: vec![PublicKeyEntry {
            id: owner.clone(),
            key_type: PublicKeyType::new(PublicKeyType::SECP256K1_VERIFICATION_KEY_2018),
            owner: did.clone(),
            ethereum_address: Some(address.to_owned()),
            public_key_hex: None,
            public_key_base64: None,
            public_key_base58: None,
            value: None,
        }],
        authentication: vec![AuthenticationEntry {
            key_type: PublicKeyType::new(PublicKeyType::SECP256K1_SIGNATURE_AUTHENTICATION_2018),
            public_key: owner,
        }],
        ..DidDocument::new(&did)
    }
}

/// A document listing a single key by its hex encoded public key, with no
/// authentication entries
pub fn mock_doc_for_public_key(did: &str, public_key_hex: &str) -> DidDocument {
    DidDocument {
        public_key: vec![PublicKeyEntry {
            id: format!("{did}#keys-1"),
            key_type: PublicKeyType::new(PublicKeyType::SECP256K1_VERIFICATION_KEY_2018),
            owner: did.to_owned(),
            ethereum_address: None,
            public_key_hex: Some(public_key_hex.to_owned()),
            public_key_base64: None,
            public_key_base58: None,
            value: None,
        }],
        ..DidDocument::new(did)
    }
}
