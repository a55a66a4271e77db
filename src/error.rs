//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the MycoScan application.
///
/// - 0: Success (command completed normally)
/// - 1: General error (unexpected failure)
/// - 2: Analysis failed (the classifier was unreachable or rejected the image)
/// - 3: Invalid credentials (mock sign-in rejected the identifier/secret)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: The command completed normally.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// Analysis failed: The identification attempt ended in the failed state.
    AnalysisFailed = 2,
    /// Invalid credentials: sign-in was rejected by the mock backend.
    InvalidCredentials = 3,
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
            Self::Success => "MS000",
            Self::GeneralError => "MS001",
            Self::AnalysisFailed => "MS002",
            Self::InvalidCredentials => "MS003",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "MS001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: err.to_string(),
        }
    }
}
