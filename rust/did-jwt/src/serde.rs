//! The segment codec: compact JSON wrapped in unpadded base64url.
//!
//! Encoding never emits whitespace, and JSON objects keep the order in which
//! their keys were inserted. That makes the encoded header and payload (and so
//! the signed bytes) a pure function of the values being encoded.

use crate::error::JwtError;
use anyhow::Result;
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use serde::{de::DeserializeOwned, Serialize};

/// Unpadded base64url for encoding; decoding also accepts trailing padding
pub const BASE64_URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Helper trait to ser/de any serde-implementing value to/from compact JSON
pub trait Json: Serialize + DeserializeOwned {
    fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    fn from_json(json_bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(json_bytes)?)
    }
}

impl<T> Json for T where T: Serialize + DeserializeOwned {}

/// Helper trait to encode structs as base64 as part of creating a JWT
pub trait Base64Encode: Json {
    fn jwt_base64_encode(&self) -> Result<String> {
        Ok(BASE64_URL.encode(self.to_json()?))
    }
}

impl<T> Base64Encode for T where T: Json {}

/// Decode one base64url token segment into a JSON-backed structure. Claims
/// that the target type does not know about are ignored (or collected, if the
/// type flattens them into a map).
pub fn decode_segment<T>(segment: &'static str, encoded: &str) -> Result<T, JwtError>
where
    T: DeserializeOwned,
{
    let bytes = decode_bytes(segment, encoded)?;
    serde_json::from_slice(&bytes).map_err(|error| JwtError::malformed_segment(segment, error))
}

/// Decode one base64url token segment into raw bytes
pub fn decode_bytes(segment: &'static str, encoded: &str) -> Result<Vec<u8>, JwtError> {
    BASE64_URL
        .decode(encoded)
        .map_err(|error| JwtError::malformed_segment(segment, error))
}

pub fn encode_bytes(bytes: &[u8]) -> String {
    BASE64_URL.encode(bytes)
}
