use strum_macros::{AsRefStr, Display, EnumString};

// See: https://www.rfc-editor.org/rfc/rfc8812#section-3.2
#[derive(Clone, Copy, Debug, Display, AsRefStr, EnumString, Eq, PartialEq, Hash)]
pub enum JwtSignatureAlgorithm {
    /// ECDSA over secp256k1 with SHA-256; the signature is the 64-byte `r||s`
    ES256K,
    /// As [JwtSignatureAlgorithm::ES256K], followed by a one byte recovery id
    #[strum(to_string = "ES256K-R")]
    ES256KR,
}

impl JwtSignatureAlgorithm {
    /// Whether signatures carry the recovery id as a trailing byte
    pub fn is_recoverable(&self) -> bool {
        matches!(self, JwtSignatureAlgorithm::ES256KR)
    }
}

impl Default for JwtSignatureAlgorithm {
    fn default() -> Self {
        JwtSignatureAlgorithm::ES256KR
    }
}
