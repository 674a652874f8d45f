//! Channel-backed callbacks for observing delivered batches.
//!
//! A recorder hands out callbacks that forward every batch they receive into a
//! channel, so a test can wait for delayed results without sleeping.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};

use crate::error::RecorderError;
use crate::hardware::PropertyChangeCallback;
use crate::value::VehiclePropValue;

/// Collects batches delivered to the callbacks it creates.
///
/// ```
/// use vhal_mock::ResultRecorder;
///
/// let recorder = ResultRecorder::new();
/// let callback = recorder.callback();
/// callback(vec![1, 2, 3]);
/// assert_eq!(recorder.try_recv().unwrap(), Some(vec![1, 2, 3]));
/// assert_eq!(recorder.try_recv().unwrap(), None);
/// ```
#[derive(Debug)]
pub struct ResultRecorder<T> {
    tx: Sender<Vec<T>>,
    rx: Receiver<Vec<T>>,
}

impl<T> Default for ResultRecorder<T> {
    fn default() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }
}

impl<T: Send + 'static> ResultRecorder<T> {
    /// Creates a recorder with nothing delivered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback forwarding each batch into this recorder.
    ///
    /// Batches sent after the recorder is dropped are discarded.
    #[must_use]
    pub fn callback(&self) -> Arc<dyn Fn(Vec<T>) + Send + Sync> {
        let tx = self.tx.clone();
        Arc::new(move |batch| {
            let _ = tx.send(batch);
        })
    }

    /// Receive the next batch (blocking).
    pub fn recv(&self) -> Result<Vec<T>, RecorderError> {
        self.rx.recv().map_err(|_| RecorderError::Disconnected)
    }

    /// Receive the next batch with a timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Vec<T>, RecorderError> {
        self.rx.recv_timeout(timeout).map_err(|err| match err {
            RecvTimeoutError::Timeout => RecorderError::Timeout {
                duration_ms: timeout.as_millis().min(u128::from(u64::MAX)) as u64,
            },
            RecvTimeoutError::Disconnected => RecorderError::Disconnected,
        })
    }

    /// The next batch if one is already waiting.
    pub fn try_recv(&self) -> Result<Option<Vec<T>>, RecorderError> {
        match self.rx.try_recv() {
            Ok(batch) => Ok(Some(batch)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(RecorderError::Disconnected),
        }
    }

    /// Number of batches delivered but not yet received.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

impl ResultRecorder<VehiclePropValue> {
    /// A boxed property-change observer feeding this recorder.
    #[must_use]
    pub fn change_callback(&self) -> Box<PropertyChangeCallback> {
        let tx = self.tx.clone();
        Box::new(move |values| {
            let _ = tx.send(values);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::thread;

    #[test]
    fn callback_batches_arrive_in_order() {
        let recorder = ResultRecorder::new();
        let cb = recorder.callback();
        cb(vec!["a"]);
        cb(vec!["b", "c"]);
        assert_eq!(recorder.pending(), 2);
        assert_eq!(recorder.recv().unwrap(), vec!["a"]);
        assert_eq!(recorder.recv().unwrap(), vec!["b", "c"]);
    }

    #[test]
    fn recv_timeout_reports_timeout() {
        let recorder: ResultRecorder<u8> = ResultRecorder::new();
        let err = recorder.recv_timeout(Duration::from_millis(10)).unwrap_err();
        let RecorderError::Timeout { duration_ms } = err else {
            panic!("expected Timeout, got {err:?}");
        };
        assert_eq!(duration_ms, 10);
    }

    #[test]
    fn callback_works_across_threads() {
        let recorder = ResultRecorder::new();
        let cb = recorder.callback();
        thread::spawn(move || cb(vec![7u32])).join().unwrap();
        assert_eq!(recorder.recv_timeout(Duration::from_secs(1)).unwrap(), vec![7]);
    }

    #[test]
    fn change_callback_forwards_values() {
        let recorder = ResultRecorder::new();
        let observer = recorder.change_callback();
        observer(vec![VehiclePropValue::key(1, 0)]);
        let got = recorder.try_recv().unwrap().unwrap();
        assert_eq!(got[0].prop, 1);
    }
}
