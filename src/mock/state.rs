//! State guarded by the mock's single lock, and the per-kind plumbing that
//! lets get and set share one dispatch path.

use std::sync::Arc;
use std::time::Duration;

use tracing::error;

use crate::config::MockHardwareConfig;
use crate::error::MockResult;
use crate::ledger::{RequestLog, ResponseLedger};
use crate::overrides::{Operation, StatusOverrides};
use crate::value::{
    GetValueRequest, GetValueResult, SetValueRequest, SetValueResult, VehiclePropConfig,
};

use super::observer::ChangeForwarder;

/// Completion callback for results of type `R`.
pub(crate) type ResultCallback<R> = Arc<dyn Fn(Vec<R>) + Send + Sync>;

#[derive(Debug)]
pub(crate) struct MockState {
    pub(crate) configs: Vec<VehiclePropConfig>,
    pub(crate) get_requests: RequestLog<GetValueRequest>,
    pub(crate) set_requests: RequestLog<SetValueRequest>,
    pub(crate) get_responses: ResponseLedger<GetValueResult>,
    pub(crate) set_responses: ResponseLedger<SetValueResult>,
    pub(crate) overrides: StatusOverrides,
    pub(crate) completion_delay: Duration,
    pub(crate) pending_completions: usize,
    pub(crate) change_forwarder: ChangeForwarder,
}

impl MockState {
    pub(crate) fn new(cfg: &MockHardwareConfig) -> Self {
        Self {
            configs: cfg.initial_configs.clone(),
            get_requests: RequestLog::new(),
            set_requests: RequestLog::new(),
            get_responses: ResponseLedger::new(Operation::GetValues),
            set_responses: ResponseLedger::new(Operation::SetValues),
            overrides: StatusOverrides::new(),
            completion_delay: cfg.completion_delay,
            pending_completions: 0,
            change_forwarder: ChangeForwarder::default(),
        }
    }
}

/// Selects the request log and response ledger of one operation.
pub(crate) trait OperationKind: 'static {
    type Request: Clone;
    type Result: Send + 'static;

    const OPERATION: Operation;

    fn requests(state: &mut MockState) -> &mut RequestLog<Self::Request>;

    fn responses(state: &mut MockState) -> &mut ResponseLedger<Self::Result>;
}

pub(crate) enum GetValues {}

pub(crate) enum SetValues {}

impl OperationKind for GetValues {
    type Request = GetValueRequest;
    type Result = GetValueResult;

    const OPERATION: Operation = Operation::GetValues;

    fn requests(state: &mut MockState) -> &mut RequestLog<GetValueRequest> {
        &mut state.get_requests
    }

    fn responses(state: &mut MockState) -> &mut ResponseLedger<GetValueResult> {
        &mut state.get_responses
    }
}

impl OperationKind for SetValues {
    type Request = SetValueRequest;
    type Result = SetValueResult;

    const OPERATION: Operation = Operation::SetValues;

    fn requests(state: &mut MockState) -> &mut RequestLog<SetValueRequest> {
        &mut state.set_requests
    }

    fn responses(state: &mut MockState) -> &mut ResponseLedger<SetValueResult> {
        &mut state.set_responses
    }
}

/// Pops the next seeded batch of `K` and hands it to `callback`.
///
/// Must be called with the state lock held.
pub(crate) fn deliver<K: OperationKind>(
    state: &mut MockState,
    callback: &ResultCallback<K::Result>,
) -> MockResult<()> {
    let batch = K::responses(state).consume().map_err(|err| {
        error!(operation = %K::OPERATION, "no more response");
        err
    })?;
    callback(batch);
    Ok(())
}
