//! Validated copy sequencing.

use std::io::{self, Read, Write};

use crate::transfer::cache::{Cache, MemoryCache};

/// Outcome reported by a validator: pass/fail plus an optional reason.
pub type Verdict = (bool, Option<String>);

type Validator<'v> = Box<dyn FnMut(&mut dyn Read) -> Verdict + 'v>;

/// Errors from [`CacheCopier::copy`].
///
/// `ValidationFailed` means the data is wrong; every other variant means
/// something broke while checking or moving it. Callers can and should
/// treat the two differently.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    /// No validator was configured.
    #[error("a validator is required before copying")]
    MissingValidator,
    /// Filling the cache from the source failed.
    #[error("failed to copy the source stream into the cache")]
    CacheWrite(#[source] io::Error),
    /// Opening a reader over the cache failed.
    #[error("failed to open a reader over the cache")]
    CacheRead(#[source] io::Error),
    /// The validator rejected the buffered data.
    #[error("validator returned false{}", reason(.message))]
    ValidationFailed { message: Option<String> },
    /// Draining the cache to the destination failed.
    #[error("failed to copy validated data to the destination")]
    Destination(#[source] io::Error),
    /// Releasing the cache failed after an otherwise successful copy.
    #[error("failed to release the cache")]
    CacheClose(#[source] io::Error),
}

fn reason(message: &Option<String>) -> String {
    match message {
        Some(message) => format!(" with the message: {message:?}"),
        None => " with no message".to_string(),
    }
}

/// Copies a source stream to a destination, releasing bytes only after a
/// validator has approved the buffered copy.
///
/// The cache is consumed by the copy: each `copy` call owns its own cache
/// instance, and a fresh in-memory cache is used when none was supplied.
#[derive(Default)]
pub struct CacheCopier<'v> {
    validator: Option<Validator<'v>>,
    cache: Option<Box<dyn Cache + 'v>>,
}

impl<'v> CacheCopier<'v> {
    /// Create a copier with no validator and no cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the validator the buffered data must pass.
    #[must_use]
    pub fn with_validator(
        mut self,
        validator: impl FnMut(&mut dyn Read) -> Verdict + 'v,
    ) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Set the cache backend for the next copy.
    #[must_use]
    pub fn with_cache(mut self, cache: Box<dyn Cache + 'v>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Buffer `src` into the cache, validate it, and on success drain the
    /// cache to `dst`, returning the number of bytes written.
    ///
    /// Nothing reaches `dst` until the validator has approved the buffered
    /// copy. The cache is released exactly once, success or failure; a
    /// release error is reported only when nothing earlier failed.
    pub fn copy(&mut self, dst: &mut dyn Write, src: &mut dyn Read) -> Result<u64, CopyError> {
        let validator = self.validator.as_mut().ok_or(CopyError::MissingValidator)?;
        let mut cache = self
            .cache
            .take()
            .unwrap_or_else(|| Box::new(MemoryCache::new()));

        let copied = fill_validate_drain(dst, src, validator, cache.as_mut());
        let closed = cache.close();
        match (copied, closed) {
            (Err(err), _) => Err(err),
            (Ok(_), Err(err)) => Err(CopyError::CacheClose(err)),
            (Ok(written), Ok(())) => Ok(written),
        }
    }
}

fn fill_validate_drain(
    dst: &mut dyn Write,
    src: &mut dyn Read,
    validator: &mut Validator<'_>,
    cache: &mut dyn Cache,
) -> Result<u64, CopyError> {
    io::copy(src, cache).map_err(CopyError::CacheWrite)?;
    cache.flush().map_err(CopyError::CacheWrite)?;

    let (ok, message) = {
        let mut reader = cache.reader().map_err(CopyError::CacheRead)?;
        validator(reader.as_mut())
        // the validator's reader is dropped here, pass or fail
    };
    if !ok {
        return Err(CopyError::ValidationFailed { message });
    }

    let mut reader = cache.reader().map_err(CopyError::CacheRead)?;
    io::copy(reader.as_mut(), dst).map_err(CopyError::Destination)
}
