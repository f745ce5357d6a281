//! Process exit codes.

/// Exit codes for the waddup binaries.
///
/// - 0: Success (the scan ran; per-file failures are part of the report)
/// - 1: General error (bad arguments, invalid directories)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: the scan completed.
    Success = 0,
    /// General error: usage error or a directory could not be used.
    GeneralError = 1,
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
            Self::Success => "WD000",
            Self::GeneralError => "WD001",
        }
    }
}
