//! Delayed completion of accepted requests.
//!
//! A delayed completion runs on its own detached thread. The thread sleeps
//! without holding the state lock, then pops and delivers under it. The number
//! of outstanding threads lives in `MockState` so the mock can refuse to go
//! away until every one of them has finished.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error};

use crate::error::{MockError, MockResult};

use super::state::{deliver, MockState, OperationKind, ResultCallback};

/// State shared between the mock and its completion threads.
#[derive(Debug)]
pub(crate) struct Shared {
    state: Mutex<MockState>,
    idle: Condvar,
    missed_deliveries: AtomicU64,
    thread_name: String,
}

impl Shared {
    pub(crate) fn new(state: MockState, thread_name: String) -> Self {
        Self {
            state: Mutex::new(state),
            idle: Condvar::new(),
            missed_deliveries: AtomicU64::new(0),
            thread_name,
        }
    }

    /// Locks the state, recovering it from a panicked holder.
    ///
    /// Every mutation of `MockState` is a single push, pop or assignment, so a
    /// poisoned state is still consistent. A panicking result callback therefore
    /// never takes the mock out of service.
    pub(crate) fn lock_recover(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn missed_deliveries(&self) -> u64 {
        self.missed_deliveries.load(Ordering::Relaxed)
    }

    /// Blocks until no delayed completion is outstanding.
    pub(crate) fn wait_idle(&self) {
        let mut state = self.lock_recover();
        while state.pending_completions > 0 {
            state = self.idle.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Like [`Shared::wait_idle`], giving up after `timeout`.
    ///
    /// Returns true if the mock became idle.
    pub(crate) fn wait_idle_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock_recover();
        while state.pending_completions > 0 {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            state = self
                .idle
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        true
    }

    /// Body of a completion thread once its delay has elapsed.
    fn complete<K: OperationKind>(&self, callback: &ResultCallback<K::Result>) {
        let mut state = self.lock_recover();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| deliver::<K>(&mut state, callback)));
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(_)) => {
                self.missed_deliveries.fetch_add(1, Ordering::Relaxed);
            }
            Err(_) => {
                error!(operation = %K::OPERATION, "completion callback panicked");
                self.missed_deliveries.fetch_add(1, Ordering::Relaxed);
            }
        }
        state.pending_completions = state.pending_completions.saturating_sub(1);
        drop(state);
        self.idle.notify_all();
    }
}

/// Schedules delivery of the next `K` batch after the current delay.
///
/// Must be called with the state lock held; `state` is that guard's target.
pub(crate) fn schedule<K: OperationKind>(
    shared: &Arc<Shared>,
    state: &mut MockState,
    callback: ResultCallback<K::Result>,
) -> MockResult<()> {
    let delay = state.completion_delay;

    // The worker cannot decrement before the caller releases the lock, so the
    // count is only raised once the thread exists.
    let worker = Arc::clone(shared);
    thread::Builder::new()
        .name(shared.thread_name.clone())
        .spawn(move || {
            thread::sleep(delay);
            worker.complete::<K>(&callback);
        })
        .map_err(|e| MockError::SpawnFailed {
            message: e.to_string(),
        })?;
    state.pending_completions += 1;

    debug!(
        operation = %K::OPERATION,
        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
        pending = state.pending_completions,
        "scheduled delayed completion"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::MockHardwareConfig;
    use crate::mock::state::{GetValues, SetValues};
    use crate::value::{GetValueResult, SetValueResult};

    fn shared_with_delay(delay: Duration) -> Arc<Shared> {
        let cfg = MockHardwareConfig {
            completion_delay: delay,
            ..MockHardwareConfig::default()
        };
        Arc::new(Shared::new(MockState::new(&cfg), cfg.thread_name))
    }

    #[test]
    fn idle_wait_returns_immediately_without_work() {
        let shared = shared_with_delay(Duration::ZERO);
        shared.wait_idle();
        assert!(shared.wait_idle_timeout(Duration::from_millis(1)));
    }

    #[test]
    fn scheduled_completion_runs_after_delay() {
        let shared = shared_with_delay(Duration::from_millis(30));
        let (tx, rx) = crossbeam_channel::unbounded();
        let cb: ResultCallback<GetValueResult> = Arc::new(move |batch: Vec<GetValueResult>| {
            let _ = tx.send((Instant::now(), batch));
        });

        let started = Instant::now();
        {
            let mut state = shared.lock_recover();
            state.get_responses.push(vec![GetValueResult::default()]);
            schedule::<GetValues>(&shared, &mut state, cb).unwrap();
            assert_eq!(state.pending_completions, 1);
        }

        shared.wait_idle();
        let (at, batch) = rx.try_recv().unwrap();
        assert!(at.duration_since(started) >= Duration::from_millis(30));
        assert_eq!(batch.len(), 1);
        assert_eq!(shared.lock_recover().pending_completions, 0);
    }

    #[test]
    fn empty_ledger_counts_missed_delivery() {
        let shared = shared_with_delay(Duration::from_millis(1));
        let cb: ResultCallback<SetValueResult> =
            Arc::new(|_: Vec<SetValueResult>| panic!("nothing was seeded"));
        {
            let mut state = shared.lock_recover();
            schedule::<SetValues>(&shared, &mut state, cb).unwrap();
        }
        shared.wait_idle();
        assert_eq!(shared.missed_deliveries(), 1);
    }

    #[test]
    fn panicking_callback_still_releases_waiters() {
        let shared = shared_with_delay(Duration::from_millis(1));
        let cb: ResultCallback<SetValueResult> =
            Arc::new(|_: Vec<SetValueResult>| panic!("callback failure"));
        {
            let mut state = shared.lock_recover();
            state.set_responses.push(vec![SetValueResult::default()]);
            schedule::<SetValues>(&shared, &mut state, cb).unwrap();
        }
        assert!(shared.wait_idle_timeout(Duration::from_secs(5)));
        assert_eq!(shared.missed_deliveries(), 1);
        assert!(!shared.state.is_poisoned());
    }

    #[test]
    fn failed_spawn_leaves_nothing_pending() {
        let cfg = MockHardwareConfig {
            completion_delay: Duration::from_millis(1),
            ..MockHardwareConfig::default()
        };
        let shared = Arc::new(Shared::new(MockState::new(&cfg), "bad\0name".to_string()));
        let mut state = MockState::new(&cfg);
        let cb: ResultCallback<GetValueResult> = Arc::new(|_: Vec<GetValueResult>| {});

        let spawned = panic::catch_unwind(AssertUnwindSafe(|| {
            schedule::<GetValues>(&shared, &mut state, cb)
        }));
        assert!(!matches!(spawned, Ok(Ok(()))));
        assert_eq!(state.pending_completions, 0);
        assert!(shared.wait_idle_timeout(Duration::from_millis(10)));
    }

    #[test]
    fn idle_wait_times_out_while_work_is_pending() {
        let shared = shared_with_delay(Duration::from_millis(200));
        let cb: ResultCallback<GetValueResult> = Arc::new(|_: Vec<GetValueResult>| {});
        {
            let mut state = shared.lock_recover();
            state.get_responses.push(Vec::new());
            schedule::<GetValues>(&shared, &mut state, cb).unwrap();
        }
        assert!(!shared.wait_idle_timeout(Duration::from_millis(10)));
        shared.wait_idle();
    }
}
