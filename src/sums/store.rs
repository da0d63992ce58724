//! In-memory store of named checksums.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::hashing::{ChecksumEngine, EngineError};

/// A named, algorithm-tagged digest kept for later re-validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownSum {
    /// Name the checksum is recorded under (often a file name).
    pub name: String,
    /// Registry identifier of the hash algorithm.
    #[serde(rename = "hash")]
    pub algorithm: String,
    /// Previously computed digest.
    #[serde(with = "hex::serde")]
    pub checksum: Vec<u8>,
}

/// Errors from [`KnownSums`] operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The (name, algorithm) pair is already recorded.
    #[error("a checksum named {name:?} with algorithm {algorithm:?} already exists")]
    DuplicateSum { name: String, algorithm: String },
    /// An empty algorithm identifier was supplied.
    #[error("algorithm identifier cannot be empty")]
    EmptyAlgorithm,
    /// A lookup by name found no records at all.
    #[error("no known sums are recorded under the name {name:?}")]
    NoMatchingSums { name: String },
    /// The checksum engine failed.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Ordered collection of [`KnownSum`] records.
///
/// Records keep insertion order, which round-trips through serialization.
/// All operations take `&self`: reads share a read lock, mutation takes the
/// write lock, so one store can serve many threads.
pub struct KnownSums {
    engine: ChecksumEngine,
    sums: RwLock<Vec<KnownSum>>,
}

impl KnownSums {
    /// Create an empty store backed by `engine`.
    #[must_use]
    pub fn new(engine: ChecksumEngine) -> Self {
        Self {
            engine,
            sums: RwLock::new(Vec::new()),
        }
    }

    /// Build a store from previously persisted records, preserving order.
    ///
    /// Each record passes through the [`KnownSums::add_precalculated`]
    /// contract, so duplicates and empty algorithms are rejected.
    pub fn from_records(
        engine: ChecksumEngine,
        records: Vec<KnownSum>,
    ) -> Result<Self, StoreError> {
        let store = Self::new(engine);
        for record in records {
            store.add_precalculated(&record.name, &record.algorithm, record.checksum)?;
        }
        Ok(store)
    }

    /// The engine used to compute and validate digests.
    #[must_use]
    pub fn engine(&self) -> &ChecksumEngine {
        &self.engine
    }

    /// Compute `data`'s digest and record it under (name, algorithm).
    ///
    /// Fails without mutating the store when the pair already exists or the
    /// algorithm is unknown to the engine.
    pub fn add(&self, name: &str, algorithm: &str, data: &[u8]) -> Result<(), StoreError> {
        let checksum = self.engine.checksum(algorithm, data)?;
        self.add_precalculated(name, algorithm, checksum)
    }

    /// Record an already computed digest under (name, algorithm).
    ///
    /// Used when restoring persisted records; the algorithm does not need
    /// to be registered, but it must not be empty. The uniqueness check and
    /// the append happen atomically under the write lock.
    pub fn add_precalculated(
        &self,
        name: &str,
        algorithm: &str,
        checksum: Vec<u8>,
    ) -> Result<(), StoreError> {
        if algorithm.is_empty() {
            return Err(StoreError::EmptyAlgorithm);
        }
        let mut sums = self.sums.write().unwrap();
        if sums.iter().any(|sum| matches(sum, name, Some(algorithm))) {
            return Err(StoreError::DuplicateSum {
                name: name.to_string(),
                algorithm: algorithm.to_string(),
            });
        }
        sums.push(KnownSum {
            name: name.to_string(),
            algorithm: algorithm.to_string(),
            checksum,
        });
        Ok(())
    }

    /// Delete every record matching `name` and the algorithm filter.
    ///
    /// An absent filter removes all algorithms recorded for the name.
    /// Removing nothing is a no-op. Returns the number of records removed.
    pub fn remove(&self, name: &str, algorithm: Option<&str>) -> usize {
        let mut sums = self.sums.write().unwrap();
        let before = sums.len();
        sums.retain(|sum| !matches(sum, name, algorithm));
        before - sums.len()
    }

    /// Validate `data` against every record matching `name` and the filter.
    ///
    /// Results are AND-combined and evaluation stops at the first failure.
    /// An empty matching set yields `Ok(false)`: nothing vouched for the
    /// data, but nothing broke while checking. A matched record whose
    /// algorithm is not registered also counts as a failed validation.
    pub fn validate(
        &self,
        name: &str,
        algorithm: Option<&str>,
        data: &[u8],
    ) -> Result<bool, StoreError> {
        let sums = self.sums.read().unwrap();
        let matching: Vec<&KnownSum> = sums
            .iter()
            .filter(|sum| matches(sum, name, algorithm))
            .collect();
        if matching.is_empty() {
            return Ok(false);
        }
        for sum in matching {
            match self.engine.validate(&sum.algorithm, &sum.checksum, data) {
                Ok(true) => {}
                Ok(false) => return Ok(false),
                Err(EngineError::UnknownAlgorithm(_)) => return Ok(false),
                Err(err) => return Err(StoreError::Engine(err)),
            }
        }
        Ok(true)
    }

    /// Copies of the records matching `name` and the algorithm filter.
    #[must_use]
    pub fn matching(&self, name: &str, algorithm: Option<&str>) -> Vec<KnownSum> {
        self.sums
            .read()
            .unwrap()
            .iter()
            .filter(|sum| matches(sum, name, algorithm))
            .cloned()
            .collect()
    }

    /// Copies of all records in insertion order.
    #[must_use]
    pub fn records(&self) -> Vec<KnownSum> {
        self.sums.read().unwrap().clone()
    }

    /// Number of recorded checksums.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sums.read().unwrap().len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sums.read().unwrap().is_empty()
    }
}

fn matches(sum: &KnownSum, name: &str, algorithm: Option<&str>) -> bool {
    if let Some(algorithm) = algorithm {
        if sum.algorithm != algorithm {
            return false;
        }
    }
    sum.name == name
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> KnownSums {
        KnownSums::new(ChecksumEngine::with_default_algorithms())
    }

    fn md5_foo() -> Vec<u8> {
        hex::decode("acbd18db4cc2f85cedef654fccc4a4d8").unwrap()
    }

    #[test]
    fn add_records_a_computed_digest() {
        let store = store();
        store.add("sumname", "md5", b"foo").unwrap();
        assert_eq!(
            store.records(),
            vec![KnownSum {
                name: "sumname".to_string(),
                algorithm: "md5".to_string(),
                checksum: md5_foo(),
            }]
        );
    }

    #[test]
    fn add_rejects_unknown_algorithm() {
        let store = store();
        let err = store.add("sumname", "crc999", b"foo").unwrap_err();
        assert!(matches!(
            err,
            StoreError::Engine(EngineError::UnknownAlgorithm(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn duplicate_add_leaves_store_unchanged() {
        let store = store();
        store.add("sumname", "md5", b"foo").unwrap();
        let before = store.records();

        let err = store.add("sumname", "md5", b"bar").unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSum { .. }));
        assert_eq!(store.records(), before);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn same_name_under_two_algorithms_is_allowed() {
        let store = store();
        store.add("sumname", "md5", b"foo").unwrap();
        store.add("sumname", "sha256", b"foo").unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn add_precalculated_skips_computation() {
        let store = store();
        store
            .add_precalculated("sumname", "md5", b"bar".to_vec())
            .unwrap();
        assert_eq!(store.records()[0].checksum, b"bar".to_vec());
    }

    #[test]
    fn add_precalculated_rejects_empty_algorithm() {
        let store = store();
        let err = store
            .add_precalculated("sumname", "", b"bar".to_vec())
            .unwrap_err();
        assert!(matches!(err, StoreError::EmptyAlgorithm));
        assert!(store.is_empty());
    }

    #[test]
    fn add_precalculated_rejects_duplicates() {
        let store = store();
        store
            .add_precalculated("sumname", "md5", b"foo".to_vec())
            .unwrap();
        let err = store
            .add_precalculated("sumname", "md5", b"bar".to_vec())
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSum { .. }));
        assert_eq!(store.records()[0].checksum, b"foo".to_vec());
    }

    fn populated_for_remove() -> KnownSums {
        let store = store();
        for (name, algorithm) in [
            ("foo", "md5"),
            ("foo", "sha256"),
            ("baz", "sha256"),
            ("baz", "md5"),
        ] {
            store
                .add_precalculated(name, algorithm, b"sum".to_vec())
                .unwrap();
        }
        store
    }

    #[test]
    fn remove_with_algorithm_filter() {
        let store = populated_for_remove();
        assert_eq!(store.remove("foo", Some("md5")), 1);
        let remaining: Vec<(String, String)> = store
            .records()
            .into_iter()
            .map(|sum| (sum.name, sum.algorithm))
            .collect();
        assert_eq!(
            remaining,
            vec![
                ("foo".to_string(), "sha256".to_string()),
                ("baz".to_string(), "sha256".to_string()),
                ("baz".to_string(), "md5".to_string()),
            ]
        );
    }

    #[test]
    fn remove_without_filter_drops_all_algorithms() {
        let store = populated_for_remove();
        assert_eq!(store.remove("foo", None), 2);
        assert!(store.records().iter().all(|sum| sum.name == "baz"));
    }

    #[test]
    fn remove_of_absent_record_is_a_noop() {
        let store = populated_for_remove();
        assert_eq!(store.remove("quux", None), 0);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn validate_single_record() {
        let store = store();
        store.add("f1", "md5", b"foo").unwrap();
        assert!(store.validate("f1", Some("md5"), b"foo").unwrap());
        assert!(!store.validate("f1", Some("md5"), b"bar").unwrap());
    }

    #[test]
    fn validate_without_filter_checks_every_algorithm() {
        let store = store();
        store.add("sumname", "md5", b"foo").unwrap();
        store.add("sumname", "sha1", b"foo").unwrap();
        assert!(store.validate("sumname", None, b"foo").unwrap());
        assert!(!store.validate("sumname", None, b"bar").unwrap());
    }

    #[test]
    fn one_stale_record_fails_the_whole_set() {
        let store = store();
        store.add("sumname", "md5", b"foo").unwrap();
        store
            .add_precalculated("sumname", "sha1", b"deadbeef".to_vec())
            .unwrap();
        store.add("sumname", "sha256", b"foo").unwrap();
        assert!(!store.validate("sumname", None, b"foo").unwrap());
    }

    #[test]
    fn unregistered_algorithm_counts_as_mismatch() {
        let store = store();
        store
            .add_precalculated("sumname", "crc999", b"deadbeef".to_vec())
            .unwrap();
        assert!(!store.validate("sumname", None, b"foo").unwrap());
        assert!(!store.validate("sumname", Some("crc999"), b"foo").unwrap());
    }

    #[test]
    fn empty_matching_set_is_a_failed_validation() {
        let store = store();
        assert!(!store.validate("missing", None, b"foo").unwrap());

        store.add("present", "md5", b"foo").unwrap();
        assert!(!store.validate("present", Some("sha256"), b"foo").unwrap());
    }

    #[test]
    fn matching_returns_copies() {
        let store = populated_for_remove();
        let mut copies = store.matching("foo", None);
        assert_eq!(copies.len(), 2);
        copies[0].checksum = b"mutated".to_vec();
        assert_eq!(store.matching("foo", None)[0].checksum, b"sum".to_vec());
    }
}
