//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the sumvalve CLI.
///
/// - 0: Success (operation completed, data validated where applicable)
/// - 1: General error (unexpected or operational failure)
/// - 2: Checksum mismatch (completed normally, data did not validate)
///
/// A mismatch is an expected outcome, not an operational failure, so it
/// gets its own status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: the operation completed and any validation passed.
    Success = 0,
    /// General error: an unexpected error occurred.
    GeneralError = 1,
    /// Checksum mismatch: the data did not match the recorded checksum.
    ChecksumMismatch = 2,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "SV000",
            Self::GeneralError => "SV001",
            Self::ChecksumMismatch => "SV002",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "SV001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether this is a checksum mismatch rather than an operational error
    pub mismatch: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: err.to_string(),
            mismatch: exit_code == ExitCode::ChecksumMismatch,
        }
    }
}
