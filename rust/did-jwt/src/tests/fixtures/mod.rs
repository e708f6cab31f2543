mod signers;
mod tokens;

pub use signers::*;
pub use tokens::*;

use crate::{
    crypto::did::ETHR_METHOD,
    document::DidDocument,
    helpers::{FixedTimeProvider, StaticResolver},
    resolver::ResolverRegistry,
    tools::JwtTools,
};

/// A registry that resolves every `did:ethr` DID to `document`
pub fn ethr_registry(document: DidDocument) -> (ResolverRegistry, StaticResolver) {
    let resolver = StaticResolver::new(document);
    let registry = ResolverRegistry::default()
        .with_resolver(ETHR_METHOD, resolver.clone())
        .unwrap();

    (registry, resolver)
}

/// Tools whose clock reads `seconds`, along with a handle to move the clock
pub fn tools_at(seconds: u64) -> (JwtTools<FixedTimeProvider>, FixedTimeProvider) {
    let clock = FixedTimeProvider::new(seconds);
    (JwtTools::new(clock.clone()), clock)
}
