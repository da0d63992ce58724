//! Streaming digest accumulators.
//!
//! A [`Digester`] ingests bytes incrementally and produces a fixed-size
//! digest on demand. The registry hands these out as trait objects so hash
//! algorithms stay interchangeable at runtime.

use digest::DynDigest;

/// Stateful digest accumulator.
///
/// Implementations must support being reused: after [`Digester::reset`] (or
/// [`Digester::finalize_reset`]) the accumulator behaves like a fresh one.
pub trait Digester: Send {
    /// Feed more input into the accumulator.
    fn update(&mut self, data: &[u8]);

    /// Produce the digest over everything written so far and reset.
    fn finalize_reset(&mut self) -> Vec<u8>;

    /// Discard accumulated state.
    fn reset(&mut self);
}

/// Adapter exposing any RustCrypto hash as a [`Digester`].
pub(crate) struct DynAccumulator<D>(pub(crate) D);

impl<D: DynDigest + Send> Digester for DynAccumulator<D> {
    fn update(&mut self, data: &[u8]) {
        DynDigest::update(&mut self.0, data);
    }

    fn finalize_reset(&mut self) -> Vec<u8> {
        DynDigest::finalize_reset(&mut self.0).into_vec()
    }

    fn reset(&mut self) {
        DynDigest::reset(&mut self.0);
    }
}

/// BLAKE3 accumulator.
///
/// BLAKE3 lives outside the RustCrypto trait family, so it gets its own
/// adapter instead of going through [`DynAccumulator`].
pub struct Blake3Accumulator(blake3::Hasher);

impl Blake3Accumulator {
    /// Create a fresh BLAKE3 accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self(blake3::Hasher::new())
    }
}

impl Default for Blake3Accumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Digester for Blake3Accumulator {
    fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    fn finalize_reset(&mut self) -> Vec<u8> {
        let sum = self.0.finalize().as_bytes().to_vec();
        self.0.reset();
        sum
    }

    fn reset(&mut self) {
        self.0.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dyn_accumulator_matches_one_shot_digest() {
        use digest::Digest;

        let mut accumulator = DynAccumulator(sha2::Sha256::default());
        accumulator.update(b"fo");
        accumulator.update(b"o");
        let incremental = accumulator.finalize_reset();

        let one_shot = sha2::Sha256::digest(b"foo").to_vec();
        assert_eq!(incremental, one_shot);
    }

    #[test]
    fn finalize_reset_leaves_a_fresh_accumulator() {
        let mut accumulator = DynAccumulator(md5::Md5::default());
        accumulator.update(b"foo");
        let first = accumulator.finalize_reset();
        accumulator.update(b"foo");
        let second = accumulator.finalize_reset();
        assert_eq!(first, second);
    }

    #[test]
    fn blake3_accumulator_is_deterministic_and_resets() {
        let mut accumulator = Blake3Accumulator::new();
        accumulator.update(b"some data");
        let first = accumulator.finalize_reset();
        assert_eq!(first.len(), 32);

        accumulator.update(b"some data");
        let second = accumulator.finalize_reset();
        assert_eq!(first, second);

        accumulator.update(b"other data");
        assert_ne!(accumulator.finalize_reset(), first);
    }

    #[test]
    fn reset_discards_partial_input() {
        let mut accumulator = Blake3Accumulator::new();
        accumulator.update(b"garbage");
        accumulator.reset();
        accumulator.update(b"some data");
        let after_reset = accumulator.finalize_reset();

        let mut fresh = Blake3Accumulator::new();
        fresh.update(b"some data");
        assert_eq!(after_reset, fresh.finalize_reset());
    }
}
