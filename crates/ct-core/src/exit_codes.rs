//! Exit codes for the ct-core CLI.
//!
//! Callers can tell outcomes apart without parsing output. The numeric
//! values are stable.

use ct_common::Error;

/// Exit codes for ct-core operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Completed, no records rejected
    Clean = 0,

    /// Roster produced, but some input records were skipped
    CompletedWithSkips = 1,

    /// Configuration error
    ConfigError = 10,

    /// Input dataset error (missing column, unparseable date, unreadable file)
    InputError = 11,

    /// I/O or export error
    IoError = 13,

    /// Internal/unknown error
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Exit code for a completed run.
    pub fn completed(skipped: usize) -> Self {
        if skipped == 0 {
            ExitCode::Clean
        } else {
            ExitCode::CompletedWithSkips
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::Config(_) => ExitCode::ConfigError,
            Error::DataFormat { .. } | Error::MissingColumn { .. } | Error::Csv(_) => {
                ExitCode::InputError
            }
            Error::Export(_) | Error::Io(_) => ExitCode::IoError,
            Error::Json(_) => ExitCode::InternalError,
        }
    }
}
