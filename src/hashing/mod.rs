//! Hash algorithm registry and checksum engine.
//!
//! This module provides the pluggable hashing layer:
//!
//! * [`digester`]: the `Digester` accumulator capability and adapters for
//!   RustCrypto and BLAKE3 hashers.
//! * [`registry`]: a thread-safe map from algorithm identifiers to
//!   accumulator factories, with per-algorithm pooling of hash state.
//! * [`engine`]: checksum computation and comparison on top of the registry.
//!
//! There is no process-wide default registry: every consumer constructs an
//! engine (usually via [`ChecksumEngine::with_default_algorithms`]) and
//! passes it to whatever needs to hash.

pub mod digester;
pub mod engine;
pub mod registry;

pub use digester::{Blake3Accumulator, Digester};
pub use engine::{ChecksumEngine, EngineError};
pub use registry::{HashRegistry, PooledDigester, UnknownAlgorithm};
