//! # vhal-mock - a programmable stand-in for vehicle property hardware
//!
//! Services that read and write vehicle properties are written against the
//! [`VehicleHardware`] trait. In integration tests, [`MockVehicleHardware`]
//! takes the place of the real bus: the test seeds the results it wants
//! returned, lets the code under test run, then inspects the requests it made.
//!
//! ## Core Concepts
//!
//! - **Ledger**: FIFO of seeded result batches, one per operation, each batch consumed once
//! - **Log**: FIFO of received request batches, drained by the test
//! - **Override**: a forced [`StatusCode`] for an [`Operation`], bypassing the ledger
//! - **Completion delay**: results delivered from a background thread after a delay;
//!   dropping the mock waits for all of them
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//! use vhal_mock::{
//!     MockVehicleHardware, Operation, RawPropValues, ResultRecorder, SetValueRequest,
//!     SetValueResult, StatusCode, VehicleHardware, VehiclePropValue,
//! };
//!
//! let hardware = MockVehicleHardware::new();
//! hardware.set_completion_delay(Duration::from_millis(10));
//! hardware.add_set_value_responses(vec![SetValueResult { request_id: 1, status: StatusCode::Ok }]);
//!
//! let results = ResultRecorder::new();
//! let write = SetValueRequest {
//!     request_id: 1,
//!     value: VehiclePropValue::new(0x1140_0400, RawPropValues::int32(vec![1])),
//! };
//! assert_eq!(hardware.set_values(results.callback(), &[write]), StatusCode::Ok);
//!
//! let delivered = results.recv_timeout(Duration::from_secs(1)).unwrap();
//! assert_eq!(delivered[0].request_id, 1);
//!
//! hardware.set_status(Operation::SetValues, StatusCode::TryAgain);
//! assert_eq!(hardware.set_values(results.callback(), &[]), StatusCode::TryAgain);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod hardware;
pub mod ledger;
pub mod mock;
pub mod overrides;
pub mod recorder;
pub mod status;
pub mod value;

// Re-export primary types at crate root for convenience
pub use config::MockHardwareConfig;
pub use error::{MockError, MockResult, RecorderError};
pub use hardware::{
    GetValuesCallback, PropertyChangeCallback, PropertySetErrorCallback, SetValuesCallback,
    VehicleHardware,
};
pub use ledger::{BatchQueue, RequestLog, ResponseLedger};
pub use mock::MockVehicleHardware;
pub use overrides::{Operation, StatusOverrides, UnknownOperation};
pub use recorder::ResultRecorder;
pub use status::StatusCode;
pub use value::{
    DumpResult, GetValueRequest, GetValueResult, RawPropValues, SetValueErrorEvent,
    SetValueRequest, SetValueResult, VehicleAreaConfig, VehiclePropConfig, VehiclePropValue,
    VehiclePropertyAccess, VehiclePropertyChangeMode, VehiclePropertyStatus,
};
