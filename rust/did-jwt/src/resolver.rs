//! Resolution of DIDs to their current documents.
//!
//! A [DidResolver] knows how to resolve the DIDs of one method (`ethr`, `web`
//! and so on). Resolvers are collected in a [ResolverRegistry], which picks
//! the right one by looking at the method part of the DID being resolved. The
//! registry is an ordinary value: share it behind an [Arc] to register and
//! resolve from many tasks at once.

use crate::{crypto::did::Did, document::DidDocument, error::JwtError};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

#[cfg(not(target_arch = "wasm32"))]
pub trait DidResolverConditionalSendSync: Send + Sync {}

#[cfg(not(target_arch = "wasm32"))]
impl<R> DidResolverConditionalSendSync for R where R: DidResolver + Send + Sync {}

#[cfg(target_arch = "wasm32")]
pub trait DidResolverConditionalSendSync {}

#[cfg(target_arch = "wasm32")]
impl<R> DidResolverConditionalSendSync for R where R: DidResolver {}

/// This trait is implemented once per DID method. Implementations own any
/// network access, caching, retry and timeout policy; whatever error they
/// return is surfaced to callers as [JwtError::ResolutionFailed].
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait DidResolver: DidResolverConditionalSendSync {
    /// Resolve `did` to its current document
    async fn resolve(&self, did: &str) -> Result<DidDocument>;
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl<R> DidResolver for Arc<R>
where
    R: DidResolver + ?Sized,
{
    async fn resolve(&self, did: &str) -> Result<DidDocument> {
        (**self).resolve(did).await
    }
}

/// A mapping from DID method name to the resolver for that method. The last
/// resolver registered for a method wins.
#[derive(Clone, Default)]
pub struct ResolverRegistry {
    resolvers: Arc<RwLock<HashMap<String, Arc<dyn DidResolver>>>>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        ResolverRegistry::default()
    }

    /// Builder-style [ResolverRegistry::register]
    pub fn with_resolver<R>(self, method: &str, resolver: R) -> Result<Self>
    where
        R: DidResolver + 'static,
    {
        self.register(method, resolver)?;
        Ok(self)
    }

    /// Register `resolver` for DIDs of `method`, replacing any resolver
    /// previously registered for it. Blank method names are ignored.
    pub fn register<R>(&self, method: &str, resolver: R) -> Result<()>
    where
        R: DidResolver + 'static,
    {
        let method = method.trim();
        if method.is_empty() {
            warn!("Ignoring resolver registered with a blank DID method");
            return Ok(());
        }

        let mut resolvers = self
            .resolvers
            .write()
            .map_err(|_| anyhow!("poisoned lock!"))?;

        if resolvers
            .insert(method.to_owned(), Arc::new(resolver))
            .is_some()
        {
            debug!("Replaced resolver for 'did:{method}'");
        } else {
            debug!("Registered resolver for 'did:{method}'");
        }

        Ok(())
    }

    /// Remove the resolver for `method`, returning whether one was registered
    pub fn unregister(&self, method: &str) -> Result<bool> {
        let mut resolvers = self
            .resolvers
            .write()
            .map_err(|_| anyhow!("poisoned lock!"))?;

        Ok(resolvers.remove(method).is_some())
    }

    /// The methods that currently have a resolver, in no particular order
    pub fn methods(&self) -> Result<Vec<String>> {
        let resolvers = self
            .resolvers
            .read()
            .map_err(|_| anyhow!("poisoned lock!"))?;

        Ok(resolvers.keys().cloned().collect())
    }

    /// Whether a resolver is registered for the method of `potential_did`.
    /// Strings that are not DIDs cannot be resolved.
    pub fn can_resolve(&self, potential_did: &str) -> bool {
        match potential_did.parse::<Did>() {
            Ok(did) => self.lookup(did.method()).ok().flatten().is_some(),
            Err(_) => false,
        }
    }

    /// Resolve `did` using the resolver registered for its method.
    ///
    /// The registry lock is only held while looking up the resolver; it is
    /// released before the resolver is awaited, so a slow or cancelled
    /// resolution never blocks registration.
    pub async fn resolve(&self, did: &str) -> Result<DidDocument, JwtError> {
        let parsed = did
            .parse::<Did>()
            .map_err(|_| JwtError::InvalidIssuer(did.to_owned()))?;

        let resolver = self
            .lookup(parsed.method())?
            .ok_or_else(|| JwtError::UnsupportedMethod(parsed.method().to_owned()))?;

        debug!("Resolving {did}");

        resolver.resolve(did).await.map_err(|cause| {
            warn!("Failed to resolve {did}: {cause}");
            JwtError::ResolutionFailed {
                did: did.to_owned(),
                cause,
            }
        })
    }

    fn lookup(&self, method: &str) -> Result<Option<Arc<dyn DidResolver>>> {
        let resolvers = self
            .resolvers
            .read()
            .map_err(|_| anyhow!("poisoned lock!"))?;

        Ok(resolvers.get(method).cloned())
    }
}

impl std::fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverRegistry")
            .field("methods", &self.methods().unwrap_or_default())
            .finish()
    }
}
