use crate::{document::DidDocument, resolver::DidResolver};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// Resolves every DID to the same document, counting how often it is asked
#[derive(Clone, Debug)]
pub struct StaticResolver {
    document: DidDocument,
    calls: Arc<AtomicUsize>,
}

impl StaticResolver {
    pub fn new(document: DidDocument) -> Self {
        StaticResolver {
            document,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// How many times [DidResolver::resolve] has been called on this resolver
    /// or any of its clones
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl DidResolver for StaticResolver {
    async fn resolve(&self, _did: &str) -> Result<DidDocument> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.document.clone())
    }
}

/// Fails every resolution with the same reason
#[derive(Clone, Debug)]
pub struct FailingResolver {
    reason: String,
}

impl FailingResolver {
    pub fn new(reason: &str) -> Self {
        FailingResolver {
            reason: reason.to_owned(),
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl DidResolver for FailingResolver {
    async fn resolve(&self, did: &str) -> Result<DidDocument> {
        Err(anyhow!("Could not resolve {did}: {}", self.reason))
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use slow::*;

#[cfg(not(target_arch = "wasm32"))]
mod slow {
    use crate::{document::DidDocument, resolver::DidResolver};
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::time::Duration;

    /// Takes `latency` to produce its document, but gives up after `timeout`
    #[derive(Clone, Debug)]
    pub struct SlowResolver {
        document: DidDocument,
        latency: Duration,
        timeout: Duration,
    }

    impl SlowResolver {
        pub fn new(document: DidDocument, latency: Duration, timeout: Duration) -> Self {
            SlowResolver {
                document,
                latency,
                timeout,
            }
        }
    }

    #[async_trait]
    impl DidResolver for SlowResolver {
        async fn resolve(&self, did: &str) -> Result<DidDocument> {
            let lookup = async {
                tokio::time::sleep(self.latency).await;
                self.document.clone()
            };

            tokio::time::timeout(self.timeout, lookup)
                .await
                .map_err(|_| anyhow!("Timed out after {:?} resolving {did}", self.timeout))
        }
    }
}
