use anyhow::{anyhow, Result};
use std::{fmt::Display, str::FromStr};

pub const DID_PREFIX: &str = "did:";
pub const ETHR_METHOD: &str = "ethr";

/// A DID split into its method and method-specific identifier, e.g.
/// `did:ethr:0xcf03dd0a894ef79cb5b601a43c4b25e3ae4c67ed` has method `ethr`.
/// Anything after the method (including further colons, fragments or query
/// strings) is kept verbatim in the identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Did {
    method: String,
    identifier: String,
}

impl Did {
    pub fn new(method: &str, identifier: &str) -> Result<Self> {
        if method.is_empty() {
            return Err(anyhow!("DID method cannot be empty"));
        }
        if identifier.is_empty() {
            return Err(anyhow!("DID method-specific identifier cannot be empty"));
        }
        Ok(Did {
            method: method.to_owned(),
            identifier: identifier.to_owned(),
        })
    }

    /// The `did:ethr` DID for an Ethereum-style address
    pub fn ethr(address: &str) -> Result<Self> {
        Did::new(ETHR_METHOD, address)
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl FromStr for Did {
    type Err = anyhow::Error;

    fn from_str(did: &str) -> Result<Self, Self::Err> {
        let rest = did
            .strip_prefix(DID_PREFIX)
            .ok_or_else(|| anyhow!("Expected a string starting with '{DID_PREFIX}', got: {did}"))?;
        let (method, identifier) = rest
            .split_once(':')
            .ok_or_else(|| anyhow!("Expected did:<method>:<identifier>, got: {did}"))?;

        Did::new(method, identifier)
    }
}

impl Display for Did {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{DID_PREFIX}{}:{}", self.method, self.identifier)
    }
}

/// Is `candidate` a bare Ethereum address: forty hex digits, optionally
/// preceded by `0x`?
pub fn is_ethereum_address(candidate: &str) -> bool {
    let digits = strip_hex_prefix(candidate);
    digits.len() == 40 && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Turn a bare Ethereum address into the corresponding `did:ethr` DID; any
/// other string is returned unchanged.
pub fn normalize_known_did(potential_did: &str) -> String {
    if is_ethereum_address(potential_did) {
        format!("{DID_PREFIX}{ETHR_METHOD}:0x{}", strip_hex_prefix(potential_did))
    } else {
        potential_did.to_owned()
    }
}

pub(crate) fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}
