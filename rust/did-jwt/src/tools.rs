//! The token engine: create, decode and verify DID-issued JWTs.

use crate::{
    crypto::{
        did::{normalize_known_did, Did},
        JwtSignatureAlgorithm, Signer,
    },
    error::JwtError,
    jwt::{DecodedJwt, JwtHeader, JwtPayload, RawPayload},
    matcher::{authenticators, signature_matches},
    resolver::ResolverRegistry,
    serde::{encode_bytes, Base64Encode},
    time::{SystemTimeProvider, TimeProvider},
};
use serde_json::Value;

/// Validity given to tokens when the caller doesn't ask for anything else
pub const DEFAULT_JWT_VALIDITY_SECONDS: i64 = 300;

/// Clock drift tolerated when checking `nbf`, `iat` and `exp`
pub const DEFAULT_TIME_SKEW_SECONDS: u64 = 300;

/// Per-call verification policy
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Only accept signatures from keys listed under `authentication`
    pub auth: bool,
    /// The audience (usually the verifier's own DID) a token must be
    /// addressed to, if it names an audience at all
    pub audience: Option<String>,
    /// Skip the `nbf` / `iat` / `exp` checks
    pub ignore_timestamps: bool,
    /// Overrides the engine's clock drift tolerance
    pub time_skew: Option<u64>,
}

impl VerifyOptions {
    pub fn with_auth(mut self) -> Self {
        self.auth = true;
        self
    }

    pub fn for_audience(mut self, audience: &str) -> Self {
        self.audience = Some(audience.to_owned());
        self
    }

    pub fn ignoring_timestamps(mut self) -> Self {
        self.ignore_timestamps = true;
        self
    }

    pub fn with_time_skew(mut self, seconds: u64) -> Self {
        self.time_skew = Some(seconds);
        self
    }
}

/// Creates, decodes and verifies tokens, reading the time from `T`.
///
/// ```rust
/// use did_jwt::{
///     key_material::secp256k1::KeyPairSigner,
///     tools::{JwtTools, DEFAULT_JWT_VALIDITY_SECONDS},
/// };
/// use serde_json::{json, Map, Value};
///
/// async fn greet() -> Result<String, did_jwt::error::JwtError> {
///     let signer = KeyPairSigner::generate();
///     let mut claims = Map::<String, Value>::new();
///     claims.insert("hello".into(), json!("world"));
///
///     JwtTools::default()
///         .create_jwt(claims, &signer.did(), &signer, DEFAULT_JWT_VALIDITY_SECONDS, "ES256K-R")
///         .await
/// }
/// ```
#[derive(Clone, Debug)]
pub struct JwtTools<T = SystemTimeProvider>
where
    T: TimeProvider,
{
    time_provider: T,
    time_skew: u64,
}

impl Default for JwtTools<SystemTimeProvider> {
    fn default() -> Self {
        JwtTools::new(SystemTimeProvider)
    }
}

impl<T> JwtTools<T>
where
    T: TimeProvider,
{
    pub fn new(time_provider: T) -> Self {
        JwtTools {
            time_provider,
            time_skew: DEFAULT_TIME_SKEW_SECONDS,
        }
    }

    pub fn with_time_skew(mut self, seconds: u64) -> Self {
        self.time_skew = seconds;
        self
    }

    pub fn now(&self) -> u64 {
        self.time_provider.now()
    }

    /// Create a signed token carrying `claims`.
    ///
    /// The payload keeps the caller's claims in order and then adds, unless
    /// the caller already supplied them: `iat` (now), `exp` (now plus
    /// `expires_in_seconds`, even when the caller supplied `iat`) and `iss`
    /// (`issuer_did`). Setting one of these
    /// three claims to `null` leaves it out of the token, as does a negative
    /// `expires_in_seconds` for `exp`.
    ///
    /// The issuer DID is taken as given: nothing checks that it belongs to
    /// `signer`.
    pub async fn create_jwt<S>(
        &self,
        claims: RawPayload,
        issuer_did: &str,
        signer: &S,
        expires_in_seconds: i64,
        algorithm: &str,
    ) -> Result<String, JwtError>
    where
        S: Signer + ?Sized,
    {
        let algorithm: JwtSignatureAlgorithm = algorithm
            .parse()
            .map_err(|_| JwtError::UnsupportedAlgorithm(algorithm.to_owned()))?;

        let header = JwtHeader::new(algorithm);
        let payload = self.merge_claims(claims, issuer_did, expires_in_seconds);

        let signing_input = format!(
            "{}.{}",
            header.jwt_base64_encode()?,
            payload.jwt_base64_encode()?
        );

        let signature = signer
            .sign(signing_input.as_bytes())
            .await
            .map_err(JwtError::SigningFailed)?;

        let encoded_signature = encode_bytes(&signature.to_jose(algorithm.is_recoverable()));

        Ok(format!("{signing_input}.{encoded_signature}"))
    }

    fn merge_claims(
        &self,
        mut payload: RawPayload,
        issuer_did: &str,
        expires_in_seconds: i64,
    ) -> RawPayload {
        let now = self.time_provider.now();

        match payload.get("iat") {
            Some(Value::Null) => {
                payload.shift_remove("iat");
            }
            Some(_) => (),
            None => {
                payload.insert("iat".into(), now.into());
            }
        };

        match (expires_in_seconds, payload.get("exp")) {
            (seconds, _) if seconds < 0 => {
                payload.shift_remove("exp");
            }
            (_, Some(Value::Null)) => {
                payload.shift_remove("exp");
            }
            (_, Some(_)) => (),
            (seconds, None) => {
                let expiration = now.saturating_add(seconds.unsigned_abs());
                payload.insert("exp".into(), expiration.into());
            }
        };

        match payload.get("iss") {
            Some(Value::Null) => {
                payload.shift_remove("iss");
            }
            Some(_) => (),
            None => {
                payload.insert("iss".into(), issuer_did.into());
            }
        };

        payload
    }

    /// Decode a token with the payload parsed into [JwtPayload]. No signature
    /// or claim checks are performed.
    pub fn decode(&self, token: &str) -> Result<DecodedJwt<JwtPayload>, JwtError> {
        DecodedJwt::decode(token)
    }

    /// Decode a token keeping the payload as an ordered map of all its claims.
    /// No signature or claim checks are performed.
    pub fn decode_raw(&self, token: &str) -> Result<DecodedJwt<RawPayload>, JwtError> {
        DecodedJwt::decode(token)
    }

    /// Verify a token: decode it, check its timestamps and audience, resolve
    /// the issuer's DID document through `registry` and check that the
    /// signature belongs to one of the document's keys.
    pub async fn verify(
        &self,
        token: &str,
        registry: &ResolverRegistry,
        options: &VerifyOptions,
    ) -> Result<JwtPayload, JwtError> {
        let decoded = self.decode(token)?;
        let payload = &decoded.payload;

        if !options.ignore_timestamps {
            self.check_timestamps(payload, options.time_skew.unwrap_or(self.time_skew))?;
        }

        let algorithm = decoded.header.algorithm()?;

        let issuer = normalize_known_did(&payload.iss);
        if issuer.parse::<Did>().is_err() {
            return Err(JwtError::InvalidIssuer(payload.iss.clone()));
        }

        check_audience(payload, registry, options)?;

        let document = registry.resolve(&issuer).await?;
        let keys = authenticators(&document, options.auth)?;

        let matched = signature_matches(
            algorithm,
            &keys,
            &decoded.signature,
            &decoded.signed_data,
        )
        .map_err(|error| JwtError::SignatureInvalid(error.to_string()))?;

        if !matched {
            debug!("No key of {issuer} matches the token signature");
            return Err(JwtError::SignatureInvalid(format!(
                "DID document for {issuer} does not have any matching public keys"
            )));
        }

        debug!("Verified token issued by {issuer}");
        Ok(decoded.payload)
    }

    fn check_timestamps(&self, payload: &JwtPayload, time_skew: u64) -> Result<(), JwtError> {
        let now = i64::try_from(self.time_provider.now()).unwrap_or(i64::MAX);
        let time_skew = i64::try_from(time_skew).unwrap_or(i64::MAX);
        let now_skewed = now.saturating_add(time_skew);

        match (payload.nbf, payload.iat) {
            (Some(nbf), _) if nbf > now_skewed => {
                return Err(JwtError::TokenNotYetValid {
                    claim: "nbf",
                    timestamp: nbf,
                })
            }
            (None, Some(iat)) if iat > now_skewed => {
                return Err(JwtError::TokenNotYetValid {
                    claim: "iat",
                    timestamp: iat,
                })
            }
            _ => (),
        };

        match payload.exp {
            Some(exp) if exp <= now.saturating_sub(time_skew) => Err(JwtError::TokenExpired(exp)),
            _ => Ok(()),
        }
    }
}

/// A token that names an audience this verifier can resolve must be verified
/// on behalf of that same audience.
fn check_audience(
    payload: &JwtPayload,
    registry: &ResolverRegistry,
    options: &VerifyOptions,
) -> Result<(), JwtError> {
    let Some(audience) = &payload.aud else {
        return Ok(());
    };

    let token_audience = normalize_known_did(audience);
    if !registry.can_resolve(&token_audience) {
        return Ok(());
    }

    match &options.audience {
        None => Err(JwtError::AudienceRequired(token_audience)),
        Some(verifier_audience) if *verifier_audience != token_audience => {
            Err(JwtError::AudienceMismatch {
                token_audience,
                verifier_audience: verifier_audience.clone(),
            })
        }
        Some(_) => Ok(()),
    }
}
