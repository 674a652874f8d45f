//! Error types for the mock hardware.
//!
//! Internal paths return `MockResult<T>`. The hardware contract itself reports
//! plain `StatusCode`s, so every `MockError` knows which code it surfaces as.

use thiserror::Error;

use crate::overrides::Operation;
use crate::status::StatusCode;

/// Errors raised while serving a request batch.
#[derive(Debug, Error)]
pub enum MockError {
    /// A status override was set for the operation.
    #[error("{operation} forced to return {status}")]
    Forced {
        /// Operation that was called.
        operation: Operation,
        /// Status the override returns.
        status: StatusCode,
    },

    /// Every seeded response batch was already consumed.
    #[error("no more response for {operation}")]
    EmptyLedger {
        /// Operation whose ledger ran dry.
        operation: Operation,
    },

    /// The OS refused to start a completion thread.
    #[error("failed to spawn completion thread: {message}")]
    SpawnFailed {
        /// Error reported by the OS.
        message: String,
    },

    /// An integer that names no status code.
    #[error("unknown status code {code}")]
    UnknownStatus {
        /// Raw value that failed to convert.
        code: i32,
    },

    /// Settings rejected by [`crate::MockHardwareConfig::validate`].
    #[error("invalid mock configuration: {reason}")]
    InvalidConfig {
        /// What was wrong.
        reason: String,
    },
}

impl MockError {
    /// The status code reported to the caller for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Forced { status, .. } => *status,
            Self::InvalidConfig { .. } => StatusCode::InvalidArg,
            Self::EmptyLedger { .. }
            | Self::SpawnFailed { .. }
            | Self::UnknownStatus { .. } => StatusCode::InternalError,
        }
    }

    /// Returns true if the error came from a test-injected override.
    #[must_use]
    pub const fn is_forced(&self) -> bool {
        matches!(self, Self::Forced { .. })
    }

    /// Returns true if the seeded responses ran out.
    #[must_use]
    pub const fn is_empty_ledger(&self) -> bool {
        matches!(self, Self::EmptyLedger { .. })
    }
}

/// Result type alias for mock operations.
pub type MockResult<T> = Result<T, MockError>;

/// Errors returned while reading from a [`crate::ResultRecorder`].
#[derive(Debug, Error)]
pub enum RecorderError {
    /// Nothing arrived before the deadline.
    #[error("no batch delivered within {duration_ms}ms")]
    Timeout {
        /// How long the recorder waited.
        duration_ms: u64,
    },

    /// Every sender was dropped.
    #[error("recorder channel disconnected")]
    Disconnected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forced_error_keeps_its_code() {
        let err = MockError::Forced {
            operation: Operation::SetValues,
            status: StatusCode::TryAgain,
        };
        assert!(err.is_forced());
        assert_eq!(err.status_code(), StatusCode::TryAgain);
        let msg = format!("{err}");
        assert!(msg.contains("setValues"));
        assert!(msg.contains("TRY_AGAIN"));
    }

    #[test]
    fn test_empty_ledger_is_internal_error() {
        let err = MockError::EmptyLedger {
            operation: Operation::GetValues,
        };
        assert!(err.is_empty_ledger());
        assert_eq!(err.status_code(), StatusCode::InternalError);
        assert!(format!("{err}").contains("no more response"));
    }

    #[test]
    fn test_plumbing_errors_are_internal() {
        let unknown = MockError::UnknownStatus { code: 42 };
        assert_eq!(unknown.status_code(), StatusCode::InternalError);
        assert!(format!("{unknown}").contains("42"));

        let spawn = MockError::SpawnFailed {
            message: "resource exhausted".to_string(),
        };
        assert_eq!(spawn.status_code(), StatusCode::InternalError);
        assert!(!spawn.is_forced());
    }

    #[test]
    fn test_recorder_timeout_message() {
        let err = RecorderError::Timeout { duration_ms: 250 };
        assert!(format!("{err}").contains("250ms"));
    }
}
