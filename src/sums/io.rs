//! Checksums-file persistence.
//!
//! The wire format is a JSON array with one element per record:
//!
//! ```json
//! [
//!   { "name": "foo", "hash": "sha256", "checksum": "2c26b4..." }
//! ]
//! ```
//!
//! Digests are lower-case hex. Algorithm identifiers round-trip as opaque
//! strings: a record with an unknown `hash` loads fine and only fails once
//! something tries to validate against it. An absent file loads as an empty
//! store.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use crate::hashing::ChecksumEngine;
use crate::sums::store::{KnownSum, KnownSums};

impl KnownSums {
    /// Serialize the records to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.records()).context("failed to serialize known sums")
    }

    /// Rebuild a store from JSON produced by [`KnownSums::to_json`].
    pub fn from_json(engine: ChecksumEngine, json: &str) -> Result<Self> {
        let records: Vec<KnownSum> =
            serde_json::from_str(json).context("failed to parse known sums")?;
        Self::from_records(engine, records).context("invalid checksums file")
    }

    /// Load a store from `path`, or an empty store when the file is absent.
    pub fn load(path: &Path, engine: ChecksumEngine) -> Result<Self> {
        let exists = path
            .try_exists()
            .with_context(|| format!("failed to check checksums file: {}", path.display()))?;
        if !exists {
            log::debug!("no checksums file at {}, starting empty", path.display());
            return Ok(Self::new(engine));
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read checksums file: {}", path.display()))?;
        Self::from_json(engine, &content)
            .with_context(|| format!("failed to load checksums file: {}", path.display()))
    }

    /// Save the records to `path`, replacing any previous contents.
    ///
    /// The file is written to a temp file in the target directory first and
    /// then persisted over the destination, so a crash mid-write leaves the
    /// old contents intact.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create a temp file in {}", dir.display()))?;
        tmp.write_all(json.as_bytes())
            .and_then(|()| tmp.write_all(b"\n"))
            .context("failed to write known sums")?;
        tmp.persist(path)
            .with_context(|| format!("failed to persist checksums file: {}", path.display()))?;
        Ok(())
    }
}
