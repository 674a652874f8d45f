//! FIFO batch storage for seeded responses and received requests.
//!
//! Both stores share one queue type. They differ only in what an empty pop
//! means: a missing response is an error, a missing request is not.

use std::collections::VecDeque;

use crate::error::{MockError, MockResult};
use crate::overrides::Operation;

/// Unbounded FIFO of batches.
#[derive(Debug, Clone)]
pub struct BatchQueue<T> {
    batches: VecDeque<Vec<T>>,
}

impl<T> Default for BatchQueue<T> {
    fn default() -> Self {
        Self {
            batches: VecDeque::new(),
        }
    }
}

impl<T> BatchQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a batch at the tail.
    pub fn push(&mut self, batch: Vec<T>) {
        self.batches.push_back(batch);
    }

    /// Removes the head batch.
    pub fn pop(&mut self) -> Option<Vec<T>> {
        self.batches.pop_front()
    }

    /// Number of queued batches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    /// Returns true if no batch is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

/// Seeded result batches for one operation kind.
#[derive(Debug, Clone)]
pub struct ResponseLedger<T> {
    operation: Operation,
    queue: BatchQueue<T>,
}

impl<T> ResponseLedger<T> {
    /// Creates an empty ledger; `operation` names it in errors.
    #[must_use]
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            queue: BatchQueue::new(),
        }
    }

    /// Seeds a batch to be returned by a later request.
    pub fn push(&mut self, batch: Vec<T>) {
        self.queue.push(batch);
    }

    /// Takes the oldest seeded batch.
    ///
    /// # Errors
    /// `EmptyLedger` if every seeded batch has already been consumed.
    pub fn consume(&mut self) -> MockResult<Vec<T>> {
        self.queue.pop().ok_or(MockError::EmptyLedger {
            operation: self.operation,
        })
    }

    /// Number of batches still waiting to be consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

/// Received request batches for one operation kind.
#[derive(Debug, Clone)]
pub struct RequestLog<T> {
    queue: BatchQueue<T>,
}

impl<T> Default for RequestLog<T> {
    fn default() -> Self {
        Self {
            queue: BatchQueue::new(),
        }
    }
}

impl<T> RequestLog<T> {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a received batch.
    pub fn record(&mut self, batch: Vec<T>) {
        self.queue.push(batch);
    }

    /// Pops the oldest recorded batch, or an empty batch if nothing arrived.
    pub fn drain_oldest(&mut self) -> Vec<T> {
        self.queue.pop().unwrap_or_default()
    }

    /// Number of batches not yet drained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if every recorded batch was drained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_is_fifo() {
        let mut q = BatchQueue::new();
        q.push(vec![1]);
        q.push(vec![2, 3]);
        assert_eq!(q.len(), 2);
        assert_eq!(q.pop(), Some(vec![1]));
        assert_eq!(q.pop(), Some(vec![2, 3]));
        assert_eq!(q.pop(), None);
        assert!(q.is_empty());
    }

    #[test]
    fn ledger_consumes_each_batch_once() {
        let mut ledger = ResponseLedger::new(Operation::GetValues);
        ledger.push(vec!["r1"]);
        ledger.push(vec!["r2"]);
        assert_eq!(ledger.consume().unwrap(), vec!["r1"]);
        assert_eq!(ledger.remaining(), 1);
        assert_eq!(ledger.consume().unwrap(), vec!["r2"]);

        let err = ledger.consume().unwrap_err();
        assert!(matches!(
            err,
            MockError::EmptyLedger {
                operation: Operation::GetValues
            }
        ));
    }

    #[test]
    fn ledger_keeps_empty_batches() {
        let mut ledger: ResponseLedger<u8> = ResponseLedger::new(Operation::SetValues);
        ledger.push(Vec::new());
        assert_eq!(ledger.consume().unwrap(), Vec::<u8>::new());
        assert!(ledger.consume().is_err());
    }

    #[test]
    fn log_drain_on_empty_returns_empty_batch() {
        let mut log: RequestLog<u32> = RequestLog::new();
        assert!(log.drain_oldest().is_empty());

        log.record(vec![10, 11]);
        log.record(vec![12]);
        assert_eq!(log.len(), 2);
        assert_eq!(log.drain_oldest(), vec![10, 11]);
        assert_eq!(log.drain_oldest(), vec![12]);
        assert!(log.drain_oldest().is_empty());
    }
}
