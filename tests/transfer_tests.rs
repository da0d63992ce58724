use std::io::{Cursor, Read};

use sumvalve::hashing::ChecksumEngine;
use sumvalve::transfer::{Cache, CacheCopier, CopyError, FileCache, MemoryCache, Verdict};

/// A few megabytes of non-repeating data, enough to span several read
/// chunks in every code path.
fn big_payload() -> Vec<u8> {
    let mut data = Vec::with_capacity(3 * 1024 * 1024);
    let mut state = 0x243f_6a88u32;
    while data.len() < 3 * 1024 * 1024 {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        data.extend_from_slice(&state.to_le_bytes());
    }
    data
}

fn caches() -> Vec<Box<dyn Cache>> {
    vec![
        Box::new(MemoryCache::new()),
        Box::new(FileCache::new().unwrap()),
    ]
}

fn checksum_validator<'a>(
    engine: &'a ChecksumEngine,
    algorithm: &'a str,
    expected: Vec<u8>,
) -> impl FnMut(&mut dyn Read) -> Verdict + 'a {
    move |reader| match engine.checksum_reader(algorithm, reader) {
        Ok(sum) if sum == expected => (true, None),
        Ok(sum) => (false, Some(format!("got {}", hex::encode(sum)))),
        Err(err) => (false, Some(err.to_string())),
    }
}

#[test]
fn matching_stream_is_forwarded_byte_for_byte() {
    let engine = ChecksumEngine::with_default_algorithms();
    let data = big_payload();
    let expected = engine.checksum("sha256", &data).unwrap();

    for cache in caches() {
        let mut dst = Vec::new();
        let written = CacheCopier::new()
            .with_validator(checksum_validator(&engine, "sha256", expected.clone()))
            .with_cache(cache)
            .copy(&mut dst, &mut Cursor::new(data.clone()))
            .unwrap();
        assert_eq!(written, data.len() as u64);
        assert_eq!(dst, data);
    }
}

#[test]
fn mismatched_stream_leaves_the_destination_empty() {
    let engine = ChecksumEngine::with_default_algorithms();
    let data = big_payload();
    let expected = engine.checksum("sha256", b"something else").unwrap();

    for cache in caches() {
        let mut dst = Vec::new();
        let err = CacheCopier::new()
            .with_validator(checksum_validator(&engine, "sha256", expected.clone()))
            .with_cache(cache)
            .copy(&mut dst, &mut Cursor::new(data.clone()))
            .unwrap_err();
        assert!(matches!(err, CopyError::ValidationFailed { .. }));
        assert!(dst.is_empty());
    }
}

#[test]
fn empty_stream_validates_and_forwards_nothing() {
    let engine = ChecksumEngine::with_default_algorithms();
    let expected = engine.checksum("sha256", b"").unwrap();

    for cache in caches() {
        let mut dst = Vec::new();
        let written = CacheCopier::new()
            .with_validator(checksum_validator(&engine, "sha256", expected.clone()))
            .with_cache(cache)
            .copy(&mut dst, &mut Cursor::new(Vec::new()))
            .unwrap();
        assert_eq!(written, 0);
        assert!(dst.is_empty());
    }
}

#[test]
fn validator_error_text_names_the_algorithm() {
    let engine = ChecksumEngine::with_default_algorithms();
    let mut dst = Vec::new();
    let err = CacheCopier::new()
        .with_validator(checksum_validator(&engine, "nonesuch", vec![0u8; 4]))
        .copy(&mut dst, &mut Cursor::new(b"data"))
        .unwrap_err();
    assert!(err.to_string().contains("nonesuch"));
    assert!(dst.is_empty());
}
