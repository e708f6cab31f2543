//! Create, decode and verify JSON Web Tokens issued by Decentralized
//! Identifiers.
//!
//! A token's issuer is a [DID][DID Core] such as
//! `did:ethr:0xcf03dd0a894ef79cb5b601a43c4b25e3ae4c67ed` rather than the
//! subject of a certificate. Tokens are signed with ECDSA over secp256k1
//! (`ES256K`, or `ES256K-R` which appends the recovery id), and verified by
//! resolving the issuer's DID to its current DID document and checking that
//! one of the listed keys produced the signature.
//!
//! # Examples
//!
//! Tokens are signed through the [`crypto::Signer`] capability. The crate
//! ships an in-memory key in [`key_material::secp256k1`]:
//!
//! ```rust
//! use did_jwt::{
//!   builder::JwtBuilder,
//!   key_material::secp256k1::KeyPairSigner,
//!   tools::JwtTools,
//! };
//!
//! async fn generate_token(signer: &KeyPairSigner) -> Result<String, anyhow::Error> {
//!     Ok(JwtBuilder::default()
//!       .issued_by(signer)
//!       .with_claim("hello", "world")
//!       .with_lifetime(60)
//!       .build()?
//!       .sign(&JwtTools::default())
//!       .await?)
//! }
//! ```
//!
//! Verification needs to know how to resolve the issuer's DID. Resolvers for
//! each DID method are registered in a [`resolver::ResolverRegistry`]; the
//! crate itself does not ship any network resolvers.
//!
//! ```rust
//! use did_jwt::{
//!   jwt::JwtPayload,
//!   resolver::{DidResolver, ResolverRegistry},
//!   tools::{JwtTools, VerifyOptions},
//! };
//!
//! async fn check_token<R: DidResolver + 'static>(token: &str, ethr_resolver: R) -> Result<JwtPayload, anyhow::Error> {
//!     let registry = ResolverRegistry::default().with_resolver("ethr", ethr_resolver)?;
//!
//!     Ok(JwtTools::default()
//!       .verify(token, &registry, &VerifyOptions::default())
//!       .await?)
//! }
//! ```
//!
//! [DID Core]: https://www.w3.org/TR/did-core/

#[macro_use]
extern crate tracing as extern_tracing;

pub mod builder;
pub mod crypto;
pub mod document;
pub mod error;
pub mod jwt;
pub mod key_material;
pub mod matcher;
pub mod resolver;
pub mod serde;
pub mod time;
pub mod tools;

#[cfg(all(not(target_arch = "wasm32"), any(test, feature = "helpers")))]
pub mod tracing;

#[cfg(any(test, feature = "helpers"))]
pub mod helpers;

pub use self::error::JwtError;
pub use self::tools::JwtTools;

#[cfg(test)]
mod tests;
