use crate::{
    crypto::JwtSignatureAlgorithm,
    error::JwtError,
    serde::{decode_bytes, decode_segment},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

pub const JWT_TYPE: &str = "JWT";

/// An untyped payload: every claim, in the order it appears in the token
pub type RawPayload = Map<String, Value>;

/// The JOSE header. Field order is significant: it serializes as
/// `{"typ":"JWT","alg":"..."}`.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct JwtHeader {
    #[serde(default = "default_type")]
    pub typ: String,
    pub alg: String,
}

fn default_type() -> String {
    JWT_TYPE.into()
}

impl JwtHeader {
    pub fn new(algorithm: JwtSignatureAlgorithm) -> Self {
        JwtHeader {
            typ: JWT_TYPE.into(),
            alg: algorithm.to_string(),
        }
    }

    /// The algorithm named by the header, if it is one this crate supports
    pub fn algorithm(&self) -> Result<JwtSignatureAlgorithm, JwtError> {
        self.alg
            .parse()
            .map_err(|_| JwtError::UnsupportedAlgorithm(self.alg.clone()))
    }
}

impl Default for JwtHeader {
    fn default() -> Self {
        JwtHeader::new(JwtSignatureAlgorithm::ES256K)
    }
}

/// The typed view of a payload. Registered claims get their own fields; every
/// other claim is kept in `extra`, so no claim is lost when decoding.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct JwtPayload {
    /// Issuer; empty when the token carries no `iss` claim
    #[serde(default)]
    pub iss: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub payload_type: Option<String>,
    #[serde(rename = "claim", skip_serializing_if = "Option::is_none")]
    pub claims: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JwtPayload {
    /// Look up a claim that has no dedicated field
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

/// A token split into its parts, without any verification having taken
/// place. `P` is either [JwtPayload] or [RawPayload].
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedJwt<P> {
    pub header: JwtHeader,
    pub payload: P,
    pub signature: Vec<u8>,
    /// The exact bytes covered by the signature: `header.payload` as it
    /// appeared in the token
    pub signed_data: Vec<u8>,
}

impl<P> DecodedJwt<P>
where
    P: DeserializeOwned,
{
    /// Split a compact token and decode each of its segments
    pub fn decode(token: &str) -> Result<Self, JwtError> {
        let (header, payload, signature) = split_token(token)?;

        Ok(DecodedJwt {
            header: decode_segment("header", header)?,
            payload: decode_segment("payload", payload)?,
            signature: decode_bytes("signature", signature)?,
            signed_data: format!("{header}.{payload}").into_bytes(),
        })
    }
}

impl<P> DecodedJwt<P> {
    /// The `(header, payload, signature)` triple
    pub fn into_parts(self) -> (JwtHeader, P, Vec<u8>) {
        (self.header, self.payload, self.signature)
    }
}

/// Split a compact token into its header, payload and signature segments.
/// There must be exactly three segments and none of them may be empty.
pub fn split_token(token: &str) -> Result<(&str, &str, &str), JwtError> {
    let mut parts = token.split('.');

    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(signature), None) => {
            for (name, part) in [
                ("header", header),
                ("payload", payload),
                ("signature", signature),
            ] {
                if part.is_empty() {
                    return Err(JwtError::MalformedToken(format!("{name} cannot be empty")));
                }
            }
            Ok((header, payload, signature))
        }
        _ => Err(JwtError::MalformedToken(
            "Token must have 3 parts: Header, Payload, and Signature".into(),
        )),
    }
}
