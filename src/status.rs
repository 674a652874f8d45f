//! Operation outcome codes.
//!
//! The numeric values match the vehicle HAL `StatusCode` so results can be
//! compared against what a real implementation would return.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MockError;

/// Outcome of a hardware operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCode {
    /// The operation succeeded.
    #[default]
    Ok,
    /// Transient failure, the caller may retry.
    TryAgain,
    /// The request was malformed.
    InvalidArg,
    /// The property is not available right now.
    NotAvailable,
    /// The caller lacks permission.
    AccessDenied,
    /// The implementation failed internally.
    InternalError,
    /// The property is disabled.
    NotAvailableDisabled,
    /// Vehicle speed is too low.
    NotAvailableSpeedLow,
    /// Vehicle speed is too high.
    NotAvailableSpeedHigh,
    /// Visibility is too poor.
    NotAvailablePoorVisibility,
    /// Unavailable for safety reasons.
    NotAvailableSafety,
}

impl StatusCode {
    /// Returns true for [`StatusCode::Ok`].
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// The HAL integer code.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::TryAgain => 1,
            Self::InvalidArg => 2,
            Self::NotAvailable => 3,
            Self::AccessDenied => 4,
            Self::InternalError => 5,
            Self::NotAvailableDisabled => 6,
            Self::NotAvailableSpeedLow => 7,
            Self::NotAvailableSpeedHigh => 8,
            Self::NotAvailablePoorVisibility => 9,
            Self::NotAvailableSafety => 10,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::TryAgain => "TRY_AGAIN",
            Self::InvalidArg => "INVALID_ARG",
            Self::NotAvailable => "NOT_AVAILABLE",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::InternalError => "INTERNAL_ERROR",
            Self::NotAvailableDisabled => "NOT_AVAILABLE_DISABLED",
            Self::NotAvailableSpeedLow => "NOT_AVAILABLE_SPEED_LOW",
            Self::NotAvailableSpeedHigh => "NOT_AVAILABLE_SPEED_HIGH",
            Self::NotAvailablePoorVisibility => "NOT_AVAILABLE_POOR_VISIBILITY",
            Self::NotAvailableSafety => "NOT_AVAILABLE_SAFETY",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i32> for StatusCode {
    type Error = MockError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => Self::Ok,
            1 => Self::TryAgain,
            2 => Self::InvalidArg,
            3 => Self::NotAvailable,
            4 => Self::AccessDenied,
            5 => Self::InternalError,
            6 => Self::NotAvailableDisabled,
            7 => Self::NotAvailableSpeedLow,
            8 => Self::NotAvailableSpeedHigh,
            9 => Self::NotAvailablePoorVisibility,
            10 => Self::NotAvailableSafety,
            _ => return Err(MockError::UnknownStatus { code }),
        })
    }
}

impl From<StatusCode> for i32 {
    fn from(status: StatusCode) -> Self {
        status.as_i32()
    }
}
