//! sumvalve - Checksum Registry and Validated Stream Forwarding
//!
//! A Rust library and CLI for verifying data streams against previously
//! recorded checksums before they are forwarded to their destination, backed
//! by a named multi-hash checksum registry persisted as JSON.

pub mod cli;
pub mod commands;
pub mod error;
pub mod hashing;
pub mod logging;
pub mod names;
pub mod sums;
pub mod transfer;

pub use commands::run_app;
