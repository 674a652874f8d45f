//! Construction-time settings for the mock hardware.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{MockError, MockResult};
use crate::value::VehiclePropConfig;

/// Default name given to delayed completion threads.
pub const DEFAULT_THREAD_NAME: &str = "vhal-mock-completion";

/// Mock hardware configuration.
///
/// Loadable from JSON, where the delay is given in nanoseconds:
///
/// ```
/// use std::time::Duration;
/// use vhal_mock::MockHardwareConfig;
///
/// let cfg = MockHardwareConfig::from_json(r#"{"completion_delay_ns": 5000000}"#).unwrap();
/// assert_eq!(cfg.completion_delay, Duration::from_millis(5));
/// assert!(cfg.initial_configs.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MockHardwareConfig {
    /// Delay before results are delivered. Zero delivers inline.
    #[serde(
        rename = "completion_delay_ns",
        serialize_with = "serialize_nanos",
        deserialize_with = "deserialize_nanos"
    )]
    pub completion_delay: Duration,
    /// Property configs reported before any are set explicitly.
    pub initial_configs: Vec<VehiclePropConfig>,
    /// Name of the threads running delayed completions.
    pub thread_name: String,
}

impl Default for MockHardwareConfig {
    fn default() -> Self {
        Self {
            completion_delay: Duration::ZERO,
            initial_configs: Vec::new(),
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }
}

impl MockHardwareConfig {
    /// Parses a config from JSON.
    ///
    /// # Errors
    /// `InvalidConfig` if the document is malformed or the thread name is unusable.
    pub fn from_json(json: &str) -> MockResult<Self> {
        let cfg: Self = serde_json::from_str(json).map_err(|e| MockError::InvalidConfig {
            reason: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks the settings that the type system cannot.
    ///
    /// # Errors
    /// `InvalidConfig` if the thread name is blank or contains a NUL byte.
    pub fn validate(&self) -> MockResult<()> {
        if self.thread_name.trim().is_empty() {
            return Err(MockError::InvalidConfig {
                reason: "thread_name cannot be empty".to_string(),
            });
        }
        if self.thread_name.contains('\0') {
            return Err(MockError::InvalidConfig {
                reason: "thread_name cannot contain NUL bytes".to_string(),
            });
        }
        Ok(())
    }
}

fn serialize_nanos<S: Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    let nanos = u64::try_from(delay.as_nanos()).unwrap_or(u64::MAX);
    serializer.serialize_u64(nanos)
}

fn deserialize_nanos<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let nanos = u64::deserialize(deserializer)?;
    Ok(Duration::from_nanos(nanos))
}
