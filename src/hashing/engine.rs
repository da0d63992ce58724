//! Checksum computation and comparison.

use std::io::Read;
use std::sync::Arc;

use crate::hashing::registry::{HashRegistry, UnknownAlgorithm};

/// Read chunk size when hashing a stream.
const CHUNK_SIZE: usize = 64 * 1024;

/// Errors from checksum computation.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The requested algorithm has no registered factory.
    #[error(transparent)]
    UnknownAlgorithm(#[from] UnknownAlgorithm),
    /// Reading the input stream failed while feeding the accumulator.
    #[error("failed to read data into the {algorithm} accumulator")]
    Read {
        algorithm: String,
        #[source]
        source: std::io::Error,
    },
}

/// Computes and compares digests using algorithms from a [`HashRegistry`].
///
/// Cloning is cheap; clones share the same registry.
#[derive(Debug, Clone)]
pub struct ChecksumEngine {
    registry: Arc<HashRegistry>,
}

impl ChecksumEngine {
    /// Create an engine over an existing registry.
    #[must_use]
    pub fn new(registry: Arc<HashRegistry>) -> Self {
        Self { registry }
    }

    /// Create an engine with the common algorithms pre-registered.
    #[must_use]
    pub fn with_default_algorithms() -> Self {
        Self::new(Arc::new(HashRegistry::with_default_algorithms()))
    }

    /// The registry backing this engine.
    #[must_use]
    pub fn registry(&self) -> &HashRegistry {
        &self.registry
    }

    /// Compute `data`'s digest with the named algorithm.
    pub fn checksum(&self, algorithm: &str, data: &[u8]) -> Result<Vec<u8>, EngineError> {
        let mut digester = self.registry.digester(algorithm)?;
        digester.update(data);
        Ok(digester.finalize_reset())
    }

    /// Compute a digest over everything `reader` yields.
    ///
    /// Read failures are surfaced; the accumulator still returns to its
    /// pool.
    pub fn checksum_reader(
        &self,
        algorithm: &str,
        reader: &mut dyn Read,
    ) -> Result<Vec<u8>, EngineError> {
        let mut digester = self.registry.digester(algorithm)?;
        let mut chunk = [0u8; CHUNK_SIZE];
        loop {
            let n = reader.read(&mut chunk).map_err(|source| EngineError::Read {
                algorithm: algorithm.to_string(),
                source,
            })?;
            if n == 0 {
                break;
            }
            digester.update(&chunk[..n]);
        }
        Ok(digester.finalize_reset())
    }

    /// Whether `data`'s digest is byte-identical to `expected`.
    ///
    /// No prefix or partial matching: a truncated expected digest never
    /// validates.
    pub fn validate(
        &self,
        algorithm: &str,
        expected: &[u8],
        data: &[u8],
    ) -> Result<bool, EngineError> {
        let sum = self.checksum(algorithm, data)?;
        Ok(sum == expected)
    }
}
