//! Per-operation forced outcomes.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::status::StatusCode;

/// The two request kinds the hardware serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// `get_values`.
    #[serde(rename = "getValues")]
    GetValues,
    /// `set_values`.
    #[serde(rename = "setValues")]
    SetValues,
}

impl Operation {
    /// Name of the hardware method this operation corresponds to.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GetValues => "getValues",
            Self::SetValues => "setValues",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown operation name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown operation '{0}'")]
pub struct UnknownOperation(pub String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "getValues" | "get_values" => Ok(Self::GetValues),
            "setValues" | "set_values" => Ok(Self::SetValues),
            other => Err(UnknownOperation(other.to_string())),
        }
    }
}

/// Forced outcomes keyed by operation.
///
/// An operation without an entry behaves as if it were forced to `Ok`.
#[derive(Debug, Clone, Default)]
pub struct StatusOverrides {
    by_operation: HashMap<Operation, StatusCode>,
}

impl StatusOverrides {
    /// No overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any previous override for `operation`.
    pub fn set(&mut self, operation: Operation, status: StatusCode) {
        self.by_operation.insert(operation, status);
    }

    /// The failing status forced on `operation`, if any.
    ///
    /// An override of `Ok` is reported as `None`.
    #[must_use]
    pub fn forced_failure(&self, operation: Operation) -> Option<StatusCode> {
        self.by_operation
            .get(&operation)
            .copied()
            .filter(|status| !status.is_ok())
    }

    /// The stored override, including `Ok`.
    #[must_use]
    pub fn get(&self, operation: Operation) -> Option<StatusCode> {
        self.by_operation.get(&operation).copied()
    }
}
