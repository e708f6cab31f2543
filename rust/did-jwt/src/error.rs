use thiserror::Error;

/// The ways that creating, decoding or verifying a token can fail.
///
/// Structural problems ([JwtError::MalformedToken],
/// [JwtError::MalformedSegment]) are reported before any signing or
/// resolution takes place. Identity problems ([JwtError::UnsupportedMethod],
/// [JwtError::ResolutionFailed]) are kept apart from cryptographic ones
/// ([JwtError::SignatureInvalid]) so that callers can tell an unreachable
/// resolver from a forged token.
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Could not decode JWT {segment} segment: {cause}")]
    MalformedSegment {
        segment: &'static str,
        #[source]
        cause: anyhow::Error,
    },

    #[error("JWT algorithm '{0}' is not supported")]
    UnsupportedAlgorithm(String),

    #[error("No DID resolver is registered for method '{0}'")]
    UnsupportedMethod(String),

    #[error("Could not resolve {did}: {cause}")]
    ResolutionFailed {
        did: String,
        #[source]
        cause: anyhow::Error,
    },

    #[error("JWT has expired: exp: {0}")]
    TokenExpired(i64),

    #[error("JWT is not valid yet: {claim}: {timestamp}")]
    TokenNotYetValid { claim: &'static str, timestamp: i64 },

    #[error("Signature invalid for JWT: {0}")]
    SignatureInvalid(String),

    #[error("JWT issuer is not a valid DID: {0:?}")]
    InvalidIssuer(String),

    #[error("JWT audience {0} is required but no audience was configured for verification")]
    AudienceRequired(String),

    #[error("JWT audience does not match: aud: {token_audience} != yours: {verifier_audience}")]
    AudienceMismatch {
        token_audience: String,
        verifier_audience: String,
    },

    #[error("DID document for {0} has no public keys suitable for verification")]
    NoSuitableKeys(String),

    #[error("Signer failed to produce a signature: {0}")]
    SigningFailed(anyhow::Error),

    #[error("{0}")]
    Other(anyhow::Error),
}

impl JwtError {
    pub(crate) fn malformed_segment<E>(segment: &'static str, cause: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        JwtError::MalformedSegment {
            segment,
            cause: cause.into(),
        }
    }
}

impl From<anyhow::Error> for JwtError {
    fn from(error: anyhow::Error) -> Self {
        JwtError::Other(error)
    }
}
