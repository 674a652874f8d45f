//! Programmable mock of [`VehicleHardware`].
//!
//! Tests seed result batches, optionally force failures or a completion delay,
//! and then inspect the request batches the code under test sent. Requests are
//! always logged, even when they fail.
//!
//! All state sits behind one mutex. Result callbacks and the change observer
//! run while it is held, so they must not call back into the mock. A callback
//! that panics poisons the mutex; later calls recover it and carry on.

mod observer;
mod scheduler;
mod state;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::MockHardwareConfig;
use crate::error::{MockError, MockResult};
use crate::hardware::{
    GetValuesCallback, PropertyChangeCallback, PropertySetErrorCallback, SetValuesCallback,
    VehicleHardware,
};
use crate::overrides::Operation;
use crate::status::StatusCode;
use crate::value::{
    DumpResult, GetValueRequest, GetValueResult, SetValueRequest, SetValueResult,
    VehiclePropConfig,
};

use self::scheduler::{schedule, Shared};
use self::state::{deliver, GetValues, MockState, OperationKind, ResultCallback, SetValues};

/// Mock vehicle hardware backed by seeded responses.
///
/// Dropping the mock blocks until every delayed completion has run.
///
/// ```
/// use vhal_mock::{
///     GetValueRequest, GetValueResult, MockVehicleHardware, ResultRecorder, StatusCode,
///     VehicleHardware, VehiclePropValue,
/// };
///
/// let hardware = MockVehicleHardware::new();
/// hardware.add_get_value_responses(vec![GetValueResult::ok(1, VehiclePropValue::key(7, 0))]);
///
/// let results = ResultRecorder::new();
/// let request = GetValueRequest { request_id: 1, prop: VehiclePropValue::key(7, 0) };
/// assert_eq!(hardware.get_values(results.callback(), &[request.clone()]), StatusCode::Ok);
///
/// assert_eq!(results.try_recv().unwrap().unwrap()[0].request_id, 1);
/// assert_eq!(hardware.next_get_value_requests(), vec![request]);
/// ```
#[derive(Debug)]
pub struct MockVehicleHardware {
    shared: Arc<Shared>,
}

impl Default for MockVehicleHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl MockVehicleHardware {
    /// Creates a mock that completes inline and reports no configs.
    #[must_use]
    pub fn new() -> Self {
        Self::build(MockHardwareConfig::default())
    }

    /// Creates a mock from `cfg`.
    ///
    /// # Errors
    /// `InvalidConfig` if `cfg` fails validation.
    pub fn with_config(cfg: MockHardwareConfig) -> MockResult<Self> {
        cfg.validate()?;
        Ok(Self::build(cfg))
    }

    fn build(cfg: MockHardwareConfig) -> Self {
        let state = MockState::new(&cfg);
        Self {
            shared: Arc::new(Shared::new(state, cfg.thread_name)),
        }
    }

    /// Replaces the configs returned by `get_all_property_configs`.
    pub fn set_property_configs(&self, configs: Vec<VehiclePropConfig>) {
        self.shared.lock_recover().configs = configs;
    }

    /// Seeds the next result batch for `get_values`.
    pub fn add_get_value_responses(&self, responses: Vec<GetValueResult>) {
        self.shared.lock_recover().get_responses.push(responses);
    }

    /// Seeds the next result batch for `set_values`.
    pub fn add_set_value_responses(&self, responses: Vec<SetValueResult>) {
        self.shared.lock_recover().set_responses.push(responses);
    }

    /// The oldest unread `get_values` batch, or an empty one.
    pub fn next_get_value_requests(&self) -> Vec<GetValueRequest> {
        self.shared.lock_recover().get_requests.drain_oldest()
    }

    /// The oldest unread `set_values` batch, or an empty one.
    pub fn next_set_value_requests(&self) -> Vec<SetValueRequest> {
        self.shared.lock_recover().set_requests.drain_oldest()
    }

    /// Forces every later call of `operation` to return `status`.
    ///
    /// Forcing `StatusCode::Ok` restores normal behaviour.
    pub fn set_status(&self, operation: Operation, status: StatusCode) {
        self.shared.lock_recover().overrides.set(operation, status);
    }

    /// Sets the delay applied to results of calls made from now on.
    ///
    /// `Duration::ZERO` delivers results before the call returns.
    pub fn set_completion_delay(&self, delay: Duration) {
        self.shared.lock_recover().completion_delay = delay;
    }

    /// Delay applied to results of new calls.
    #[must_use]
    pub fn completion_delay(&self) -> Duration {
        self.shared.lock_recover().completion_delay
    }

    /// Seeded batches for `operation` not yet consumed.
    #[must_use]
    pub fn remaining_responses(&self, operation: Operation) -> usize {
        let state = self.shared.lock_recover();
        match operation {
            Operation::GetValues => state.get_responses.remaining(),
            Operation::SetValues => state.set_responses.remaining(),
        }
    }

    /// Delayed completions that have not run yet.
    #[must_use]
    pub fn pending_completions(&self) -> usize {
        self.shared.lock_recover().pending_completions
    }

    /// Delayed completions that found nothing to deliver.
    #[must_use]
    pub fn missed_deliveries(&self) -> u64 {
        self.shared.missed_deliveries()
    }

    /// Blocks until every delayed completion has run.
    ///
    /// Must not be called from a result callback.
    pub fn wait_for_completions(&self) {
        self.shared.wait_idle();
    }

    /// Blocks until every delayed completion has run or `timeout` elapses.
    ///
    /// Returns true if nothing is pending any more.
    pub fn wait_for_completions_timeout(&self, timeout: Duration) -> bool {
        self.shared.wait_idle_timeout(timeout)
    }

    fn handle_requests<K: OperationKind>(
        &self,
        state: &mut MockState,
        callback: ResultCallback<K::Result>,
        requests: &[K::Request],
    ) -> MockResult<()> {
        K::requests(state).record(requests.to_vec());

        if let Some(status) = state.overrides.forced_failure(K::OPERATION) {
            warn!(operation = %K::OPERATION, %status, "returning forced status");
            return Err(MockError::Forced {
                operation: K::OPERATION,
                status,
            });
        }

        if state.completion_delay.is_zero() {
            deliver::<K>(state, &callback)
        } else {
            schedule::<K>(&self.shared, state, callback)
        }
    }

    fn try_set_values(
        &self,
        callback: Arc<SetValuesCallback>,
        requests: &[SetValueRequest],
    ) -> MockResult<()> {
        let mut state = self.shared.lock_recover();
        self.handle_requests::<SetValues>(&mut state, callback, requests)?;
        state.change_forwarder.forward(requests);
        Ok(())
    }

    fn try_get_values(
        &self,
        callback: Arc<GetValuesCallback>,
        requests: &[GetValueRequest],
    ) -> MockResult<()> {
        let mut state = self.shared.lock_recover();
        self.handle_requests::<GetValues>(&mut state, callback, requests)
    }
}

fn outcome(result: MockResult<()>) -> StatusCode {
    match result {
        Ok(()) => StatusCode::Ok,
        Err(err) => err.status_code(),
    }
}

impl VehicleHardware for MockVehicleHardware {
    fn get_all_property_configs(&self) -> Vec<VehiclePropConfig> {
        self.shared.lock_recover().configs.clone()
    }

    fn set_values(&self, callback: Arc<SetValuesCallback>, requests: &[SetValueRequest]) -> StatusCode {
        outcome(self.try_set_values(callback, requests))
    }

    fn get_values(&self, callback: Arc<GetValuesCallback>, requests: &[GetValueRequest]) -> StatusCode {
        outcome(self.try_get_values(callback, requests))
    }

    fn dump(&self, _args: &[String]) -> DumpResult {
        DumpResult::default()
    }

    fn check_health(&self) -> StatusCode {
        StatusCode::Ok
    }

    fn register_on_property_change_event(&self, callback: Box<PropertyChangeCallback>) {
        let replaced = self.shared.lock_recover().change_forwarder.register(callback);
        debug!(replaced, "registered property change observer");
    }

    fn register_on_property_set_error_event(&self, _callback: Box<PropertySetErrorCallback>) {
        // Set errors are never raised by the mock.
    }
}

impl Drop for MockVehicleHardware {
    fn drop(&mut self) {
        // Completion threads hold their own reference to the shared state, but
        // their callbacks may borrow from the test; never outlive them.
        self.shared.wait_idle();
    }
}
