//! The hardware contract a vehicle property service is written against.
//!
//! Production implementations talk to real buses. [`crate::MockVehicleHardware`]
//! implements the same trait from seeded data.

use std::sync::Arc;

use crate::status::StatusCode;
use crate::value::{
    DumpResult, GetValueRequest, GetValueResult, SetValueErrorEvent, SetValueRequest,
    SetValueResult, VehiclePropConfig, VehiclePropValue,
};

/// Receives the results of a `get_values` batch.
pub type GetValuesCallback = dyn Fn(Vec<GetValueResult>) + Send + Sync;

/// Receives the results of a `set_values` batch.
pub type SetValuesCallback = dyn Fn(Vec<SetValueResult>) + Send + Sync;

/// Receives property values that changed.
pub type PropertyChangeCallback = dyn Fn(Vec<VehiclePropValue>) + Send + Sync;

/// Receives asynchronous write failures.
pub type PropertySetErrorCallback = dyn Fn(Vec<SetValueErrorEvent>) + Send + Sync;

/// Vehicle hardware property interface.
///
/// `get_values` and `set_values` return the outcome of *accepting* the batch.
/// Per-request results arrive through the callback, either before the call
/// returns or later from another thread.
pub trait VehicleHardware: Send + Sync {
    /// All supported property configs.
    fn get_all_property_configs(&self) -> Vec<VehiclePropConfig>;

    /// Writes a batch of property values.
    fn set_values(&self, callback: Arc<SetValuesCallback>, requests: &[SetValueRequest]) -> StatusCode;

    /// Reads a batch of property values.
    fn get_values(&self, callback: Arc<GetValuesCallback>, requests: &[GetValueRequest]) -> StatusCode;

    /// Debug dump driven by command line style arguments.
    fn dump(&self, args: &[String]) -> DumpResult;

    /// Reports whether the hardware is healthy.
    fn check_health(&self) -> StatusCode;

    /// Installs the observer for property change events, replacing any previous one.
    fn register_on_property_change_event(&self, callback: Box<PropertyChangeCallback>);

    /// Installs the observer for asynchronous set errors.
    fn register_on_property_set_error_event(&self, callback: Box<PropertySetErrorCallback>);
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test: the trait must stay usable behind a pointer.
    fn _assert_vehicle_hardware_object_safe(_: &dyn VehicleHardware) {}
    fn _assert_vehicle_hardware_arc(_: Arc<dyn VehicleHardware>) {}
}
