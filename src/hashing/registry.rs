//! Thread-safe registry of hash algorithms.
//!
//! The registry maps opaque string identifiers (e.g. `"sha256"`) to
//! factories producing [`Digester`] accumulators. Accumulators are pooled
//! per algorithm: hash state with expensive setup is reset and reused
//! instead of reallocated on every call.
//!
//! Registry mutation and lookup share one `RwLock`; pool get/put uses a
//! per-algorithm mutex so concurrent use of one algorithm never blocks
//! another.

use std::collections::HashMap;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, RwLock};

use digest::DynDigest;

use crate::hashing::digester::{Blake3Accumulator, Digester, DynAccumulator};

/// Factory producing a fresh digest accumulator.
pub type DigesterFactory = Box<dyn Fn() -> Box<dyn Digester> + Send + Sync>;

/// Lookup of an identifier no factory was registered for.
#[derive(Debug, thiserror::Error)]
#[error("no hash algorithm registered with the name {0:?}")]
pub struct UnknownAlgorithm(pub String);

/// Registry of hash algorithm factories with per-algorithm accumulator pools.
#[derive(Default)]
pub struct HashRegistry {
    pools: RwLock<HashMap<String, Arc<DigestPool>>>,
}

impl HashRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the common algorithms pre-registered:
    /// md5, sha1, sha224, sha256, sha384, sha512 and blake3.
    #[must_use]
    pub fn with_default_algorithms() -> Self {
        let registry = Self::new();
        registry.register_digest::<md5::Md5>("md5");
        registry.register_digest::<sha1::Sha1>("sha1");
        registry.register_digest::<sha2::Sha224>("sha224");
        registry.register_digest::<sha2::Sha256>("sha256");
        registry.register_digest::<sha2::Sha384>("sha384");
        registry.register_digest::<sha2::Sha512>("sha512");
        registry.register("blake3", || Box::new(Blake3Accumulator::new()));
        registry
    }

    /// Register a factory under `id`, replacing any existing entry.
    ///
    /// Replacing an entry also discards its pooled accumulators.
    pub fn register<F>(&self, id: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Digester> + Send + Sync + 'static,
    {
        let mut pools = self.pools.write().unwrap();
        pools.insert(id.into(), Arc::new(DigestPool::new(Box::new(factory))));
    }

    /// Register a RustCrypto hash type under `id`.
    pub fn register_digest<D>(&self, id: impl Into<String>)
    where
        D: DynDigest + Default + Send + 'static,
    {
        self.register(id, || Box::new(DynAccumulator(D::default())));
    }

    /// Remove the entry for `id`. No-op when absent.
    pub fn unregister(&self, id: &str) {
        let mut pools = self.pools.write().unwrap();
        pools.remove(id);
    }

    /// Whether a factory is registered under `id`.
    #[must_use]
    pub fn is_registered(&self, id: &str) -> bool {
        self.pools.read().unwrap().contains_key(id)
    }

    /// Registered identifiers, sorted.
    #[must_use]
    pub fn algorithms(&self) -> Vec<String> {
        let mut algorithms: Vec<String> = self.pools.read().unwrap().keys().cloned().collect();
        algorithms.sort();
        algorithms
    }

    /// Get a pooled or fresh accumulator for `id`.
    ///
    /// The accumulator is reset and returned to its pool when the guard is
    /// dropped.
    pub fn digester(&self, id: &str) -> Result<PooledDigester, UnknownAlgorithm> {
        let pool = {
            let pools = self.pools.read().unwrap();
            pools.get(id).cloned()
        };
        let pool = pool.ok_or_else(|| UnknownAlgorithm(id.to_string()))?;
        Ok(pool.acquire())
    }
}

impl fmt::Debug for HashRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRegistry")
            .field("algorithms", &self.algorithms())
            .finish()
    }
}

/// Pool of idle accumulators for one algorithm.
struct DigestPool {
    factory: DigesterFactory,
    idle: Mutex<Vec<Box<dyn Digester>>>,
}

impl DigestPool {
    fn new(factory: DigesterFactory) -> Self {
        Self {
            factory,
            idle: Mutex::new(Vec::new()),
        }
    }

    fn acquire(self: Arc<Self>) -> PooledDigester {
        let digester = self
            .idle
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| (self.factory)());
        PooledDigester {
            digester: Some(digester),
            pool: self,
        }
    }

    fn release(&self, mut digester: Box<dyn Digester>) {
        digester.reset();
        self.idle.lock().unwrap().push(digester);
    }
}

/// Accumulator checked out of a [`HashRegistry`] pool.
///
/// Dereferences to the underlying [`Digester`]; the accumulator is reset
/// and returned to the pool on drop, even when the caller bails early.
pub struct PooledDigester {
    digester: Option<Box<dyn Digester>>,
    pool: Arc<DigestPool>,
}

impl std::fmt::Debug for PooledDigester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledDigester")
            .field("checked_out", &self.digester.is_some())
            .finish()
    }
}

impl Deref for PooledDigester {
    type Target = dyn Digester;

    fn deref(&self) -> &Self::Target {
        self.digester.as_deref().expect("accumulator present until drop")
    }
}

impl DerefMut for PooledDigester {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.digester
            .as_deref_mut()
            .expect("accumulator present until drop")
    }
}

impl Drop for PooledDigester {
    fn drop(&mut self) {
        if let Some(digester) = self.digester.take() {
            self.pool.release(digester);
        }
    }
}
