use crate::{
    crypto::{
        did::{DID_PREFIX, ETHR_METHOD},
        JwtSignatureAlgorithm, Signer,
    },
    error::JwtError,
    jwt::RawPayload,
    time::TimeProvider,
    tools::{JwtTools, DEFAULT_JWT_VALIDITY_SECONDS},
};
use anyhow::{anyhow, Result};
use serde::Serialize;
use serde_json::Map;

/// A signable is a token that has all the state it needs in order to be
/// signed, but has not yet been signed.
pub struct Signable<'a, S>
where
    S: Signer + ?Sized,
{
    pub signer: &'a S,
    pub issuer: String,
    pub claims: RawPayload,
    pub expires_in_seconds: i64,
    pub algorithm: JwtSignatureAlgorithm,
}

impl<'a, S> Signable<'a, S>
where
    S: Signer + ?Sized,
{
    /// Produce the compact token, stamping it with the time read from `tools`
    pub async fn sign<T>(&self, tools: &JwtTools<T>) -> Result<String, JwtError>
    where
        T: TimeProvider,
    {
        tools
            .create_jwt(
                self.claims.clone(),
                &self.issuer,
                self.signer,
                self.expires_in_seconds,
                self.algorithm.as_ref(),
            )
            .await
    }
}

/// A builder API for signed tokens
pub struct JwtBuilder<'a, S>
where
    S: Signer + ?Sized,
{
    signer: Option<&'a S>,
    issuer: Option<String>,
    claims: RawPayload,
    expires_in_seconds: i64,
    algorithm: JwtSignatureAlgorithm,
}

impl<'a, S> Default for JwtBuilder<'a, S>
where
    S: Signer + ?Sized,
{
    /// Create an empty builder.
    /// Before finalising the builder, you need to at least call `issued_by`.
    ///
    /// To finalise the builder, call its `build` method.
    fn default() -> Self {
        JwtBuilder {
            signer: None,
            issuer: None,
            claims: Map::new(),
            expires_in_seconds: DEFAULT_JWT_VALIDITY_SECONDS,
            algorithm: JwtSignatureAlgorithm::default(),
        }
    }
}

impl<'a, S> JwtBuilder<'a, S>
where
    S: Signer + ?Sized,
{
    /// The token is signed by this signer. Unless [JwtBuilder::as_issuer]
    /// says otherwise, the issuer is the `did:ethr` DID of its address.
    pub fn issued_by(mut self, signer: &'a S) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Use an explicit issuer DID instead of the one derived from the signer
    pub fn as_issuer(mut self, did: &str) -> Self {
        self.issuer = Some(did.to_owned());
        self
    }

    /// Add a claim to the payload. Values that fail to serialize are skipped
    /// with a warning.
    pub fn with_claim<T: Serialize>(mut self, key: &str, claim: T) -> Self {
        match serde_json::to_value(claim) {
            Ok(value) => {
                self.claims.insert(key.to_owned(), value);
            }
            Err(error) => warn!("Could not add claim '{}' to JWT: {}", key, error),
        }
        self
    }

    /// Add every claim of `claims`, in order
    pub fn with_claims(mut self, claims: RawPayload) -> Self {
        self.claims.extend(claims);
        self
    }

    /// The number of seconds after `iat` at which the token expires
    pub fn with_lifetime(mut self, seconds: u64) -> Self {
        self.expires_in_seconds = i64::try_from(seconds).unwrap_or(i64::MAX);
        self
    }

    /// The token will carry no `exp` claim
    pub fn without_expiration(mut self) -> Self {
        self.expires_in_seconds = -1;
        self
    }

    pub fn using_algorithm(mut self, algorithm: JwtSignatureAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn build(self) -> Result<Signable<'a, S>> {
        let signer = self.signer.ok_or_else(|| anyhow!("Missing signer"))?;
        let issuer = match self.issuer {
            Some(issuer) => issuer,
            None => format!("{DID_PREFIX}{ETHR_METHOD}:{}", signer.address()),
        };

        Ok(Signable {
            signer,
            issuer,
            claims: self.claims,
            expires_in_seconds: self.expires_in_seconds,
            algorithm: self.algorithm,
        })
    }
}

impl<'a, S> Clone for JwtBuilder<'a, S>
where
    S: Signer + ?Sized,
{
    fn clone(&self) -> Self {
        JwtBuilder {
            signer: self.signer,
            issuer: self.issuer.clone(),
            claims: self.claims.clone(),
            expires_in_seconds: self.expires_in_seconds,
            algorithm: self.algorithm,
        }
    }
}

impl<'a, S> std::fmt::Debug for JwtBuilder<'a, S>
where
    S: Signer + ?Sized,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtBuilder")
            .field("issuer", &self.issuer)
            .field("claims", &self.claims)
            .field("expires_in_seconds", &self.expires_in_seconds)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}
