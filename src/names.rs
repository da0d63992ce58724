//! Human-facing hash algorithm names.
//!
//! The registry is addressed by canonical identifiers (`"sha256"`); this
//! module translates the spellings people actually type (`"SHA-256"`,
//! `"sha2-256"`) into those identifiers for the CLI.

/// Algorithm used when the user does not pick one.
pub const DEFAULT_ALGORITHM: &str = "sha256";

/// (canonical identifier, accepted aliases)
const ALIASES: &[(&str, &[&str])] = &[
    ("md5", &["md-5"]),
    ("sha1", &["sha-1"]),
    ("sha224", &["sha-224", "sha2-224"]),
    ("sha256", &["sha-256", "sha2-256"]),
    ("sha384", &["sha-384", "sha2-384"]),
    ("sha512", &["sha-512", "sha2-512"]),
    ("blake3", &["b3"]),
];

/// Canonical identifier for `name`, if the name is known.
///
/// Matching is case-insensitive.
#[must_use]
pub fn canonical(name: &str) -> Option<&'static str> {
    let lowered = name.to_ascii_lowercase();
    ALIASES.iter().find_map(|(canonical, aliases)| {
        (*canonical == lowered || aliases.contains(&lowered.as_str())).then_some(*canonical)
    })
}

/// Canonical identifier when known, the lowercased input otherwise.
///
/// Unknown names pass through so they can still address custom registry
/// entries; the registry reports them if nothing is registered.
#[must_use]
pub fn normalize(name: &str) -> String {
    match canonical(name) {
        Some(canonical) => canonical.to_string(),
        None => name.to_ascii_lowercase(),
    }
}

/// Canonical identifiers this build knows names for.
#[must_use]
pub fn known_names() -> Vec<&'static str> {
    ALIASES.iter().map(|(canonical, _)| *canonical).collect()
}
