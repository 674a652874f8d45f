//! Property values, configs, and the request/result shapes exchanged with the
//! hardware.
//!
//! The mock never interprets these beyond copying them around, so they only
//! carry the fields a test needs to tell one request from another.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::status::StatusCode;

/// Availability of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehiclePropertyStatus {
    /// The value is current.
    #[default]
    Available,
    /// The property cannot be read right now.
    Unavailable,
    /// The property is in an error state.
    Error,
}

/// Raw payload of a property value.
///
/// # Examples
///
/// ```
/// use vhal_mock::RawPropValues;
///
/// let raw = RawPropValues::int32(vec![1, 2]);
/// assert_eq!(raw.int32_values, vec![1, 2]);
/// assert!(raw.float_values.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPropValues {
    /// Integer payload.
    pub int32_values: Vec<i32>,
    /// Floating point payload.
    pub float_values: Vec<f32>,
    /// Wide integer payload.
    pub int64_values: Vec<i64>,
    /// Opaque byte payload.
    pub byte_values: Vec<u8>,
    /// String payload.
    pub string_value: String,
}

impl RawPropValues {
    /// Payload holding only `values` as int32.
    #[must_use]
    pub fn int32(values: Vec<i32>) -> Self {
        Self {
            int32_values: values,
            ..Self::default()
        }
    }

    /// Payload holding only `values` as floats.
    #[must_use]
    pub fn float(values: Vec<f32>) -> Self {
        Self {
            float_values: values,
            ..Self::default()
        }
    }

    /// Payload holding only `values` as int64.
    #[must_use]
    pub fn int64(values: Vec<i64>) -> Self {
        Self {
            int64_values: values,
            ..Self::default()
        }
    }

    /// Payload holding only a string.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            string_value: value.into(),
            ..Self::default()
        }
    }
}

/// A property value for one (property, area) pair.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VehiclePropValue {
    /// Nanoseconds since the Unix epoch.
    pub timestamp: i64,
    /// Area the value applies to; 0 for global properties.
    pub area_id: i32,
    /// Property id.
    pub prop: i32,
    /// Availability of the value.
    pub status: VehiclePropertyStatus,
    /// Payload.
    pub value: RawPropValues,
}

impl VehiclePropValue {
    /// Creates a global-area value stamped with the current time.
    #[must_use]
    pub fn new(prop: i32, value: RawPropValues) -> Self {
        Self {
            timestamp: now_nanos(),
            area_id: 0,
            prop,
            status: VehiclePropertyStatus::Available,
            value,
        }
    }

    /// Sets the area id.
    #[must_use]
    pub fn with_area(mut self, area_id: i32) -> Self {
        self.area_id = area_id;
        self
    }

    /// A value carrying only the property and area, as sent in get requests.
    #[must_use]
    pub fn key(prop: i32, area_id: i32) -> Self {
        Self {
            area_id,
            prop,
            ..Self::default()
        }
    }
}

fn now_nanos() -> i64 {
    Utc::now().timestamp_nanos_opt().unwrap_or_default()
}

/// Access mode of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehiclePropertyAccess {
    /// Not accessible.
    #[default]
    None,
    /// Read only.
    Read,
    /// Write only.
    Write,
    /// Readable and writable.
    ReadWrite,
}

/// How a property reports changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehiclePropertyChangeMode {
    /// Never changes.
    #[default]
    Static,
    /// Reported when the value changes.
    OnChange,
    /// Sampled at a configured rate.
    Continuous,
}

/// Per-area limits of a property.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleAreaConfig {
    /// Area these limits apply to.
    pub area_id: i32,
    /// Lower int32 bound.
    pub min_int32_value: i32,
    /// Upper int32 bound.
    pub max_int32_value: i32,
    /// Lower int64 bound.
    pub min_int64_value: i64,
    /// Upper int64 bound.
    pub max_int64_value: i64,
    /// Lower float bound.
    pub min_float_value: f32,
    /// Upper float bound.
    pub max_float_value: f32,
}

/// Static description of a supported property.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VehiclePropConfig {
    /// Property id.
    pub prop: i32,
    /// Who may read or write it.
    pub access: VehiclePropertyAccess,
    /// How changes are reported.
    pub change_mode: VehiclePropertyChangeMode,
    /// Per-area limits.
    pub area_configs: Vec<VehicleAreaConfig>,
    /// Property-specific integer settings.
    pub config_array: Vec<i32>,
    /// Property-specific string setting.
    pub config_string: String,
    /// Lowest sample rate in Hz for continuous properties.
    pub min_sample_rate: f32,
    /// Highest sample rate in Hz for continuous properties.
    pub max_sample_rate: f32,
}

impl VehiclePropConfig {
    /// A config with every optional field defaulted.
    #[must_use]
    pub fn new(prop: i32, access: VehiclePropertyAccess, change_mode: VehiclePropertyChangeMode) -> Self {
        Self {
            prop,
            access,
            change_mode,
            ..Self::default()
        }
    }
}

/// One property read inside a `get_values` batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GetValueRequest {
    /// Caller-chosen id echoed in the result.
    pub request_id: i64,
    /// Property and area to read.
    pub prop: VehiclePropValue,
}

/// Result of one property read.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GetValueResult {
    /// Id of the request this answers.
    pub request_id: i64,
    /// Outcome of the read.
    pub status: StatusCode,
    /// Value read, present only on success.
    pub prop: Option<VehiclePropValue>,
}

impl GetValueResult {
    /// A successful read returning `prop`.
    #[must_use]
    pub fn ok(request_id: i64, prop: VehiclePropValue) -> Self {
        Self {
            request_id,
            status: StatusCode::Ok,
            prop: Some(prop),
        }
    }

    /// A failed read.
    #[must_use]
    pub const fn error(request_id: i64, status: StatusCode) -> Self {
        Self {
            request_id,
            status,
            prop: None,
        }
    }
}

/// One property write inside a `set_values` batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SetValueRequest {
    /// Caller-chosen id echoed in the result.
    pub request_id: i64,
    /// Value to write.
    pub value: VehiclePropValue,
}

/// Result of one property write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SetValueResult {
    /// Id of the request this answers.
    pub request_id: i64,
    /// Outcome of the write.
    pub status: StatusCode,
}

/// Asynchronous failure of a previously accepted write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SetValueErrorEvent {
    /// Why the write failed.
    pub status: StatusCode,
    /// Property that failed.
    pub prop_id: i32,
    /// Area that failed.
    pub area_id: i32,
}

/// Output of a `dump` call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DumpResult {
    /// Whether the caller should also dump its own state.
    pub caller_should_dump_state: bool,
    /// Text produced by the dump.
    pub buffer: String,
    /// Whether property configs changed and should be re-read.
    pub refresh_property_configs: bool,
}
