//! Process exit codes.
//!
//! Scripts can tell a bad invocation, bad configuration, a missing browser
//! and a failed automation run apart by the exit code alone.

/// Task completed, or help/version was shown.
pub const SUCCESS: u8 = 0;

/// The automation ran but failed or did not meet its success criteria.
pub const AUTOMATION_FAILED: u8 = 1;

/// Malformed command line. Matches the code clap uses for usage errors.
pub const USAGE: u8 = 2;

/// Configuration validation failed.
pub const INVALID_CONFIG: u8 = 3;

/// No usable browser binary, or it did not start.
pub const DRIVER_UNAVAILABLE: u8 = 4;
