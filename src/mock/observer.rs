//! Single-slot property change forwarding.

use std::fmt;

use crate::hardware::PropertyChangeCallback;
use crate::value::SetValueRequest;

/// Holds the registered property change observer, if any.
#[derive(Default)]
pub(crate) struct ChangeForwarder {
    observer: Option<Box<PropertyChangeCallback>>,
}

impl ChangeForwarder {
    /// Installs `observer`. Returns true if one was replaced.
    pub(crate) fn register(&mut self, observer: Box<PropertyChangeCallback>) -> bool {
        self.observer.replace(observer).is_some()
    }

    pub(crate) const fn is_registered(&self) -> bool {
        self.observer.is_some()
    }

    /// Reports the values written by an accepted batch, in request order.
    pub(crate) fn forward(&self, requests: &[SetValueRequest]) {
        let Some(observer) = self.observer.as_ref() else {
            return;
        };
        let values = requests.iter().map(|request| request.value.clone()).collect();
        observer(values);
    }
}

impl fmt::Debug for ChangeForwarder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeForwarder")
            .field("registered", &self.is_registered())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use crate::value::{RawPropValues, VehiclePropValue};

    fn write(request_id: i64, prop: i32, v: i32) -> SetValueRequest {
        SetValueRequest {
            request_id,
            value: VehiclePropValue::new(prop, RawPropValues::int32(vec![v])),
        }
    }

    #[test]
    fn forward_without_observer_is_noop() {
        let forwarder = ChangeForwarder::default();
        assert!(!forwarder.is_registered());
        forwarder.forward(&[write(1, 1, 1)]);
    }

    #[test]
    fn forwards_values_in_request_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut forwarder = ChangeForwarder::default();
        assert!(!forwarder.register(Box::new(move |values: Vec<VehiclePropValue>| {
            sink.lock().unwrap().push(values);
        })));

        forwarder.forward(&[write(1, 10, 5), write(2, 11, 6)]);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let props: Vec<i32> = seen[0].iter().map(|v| v.prop).collect();
        assert_eq!(props, vec![10, 11]);
    }

    #[test]
    fn register_replaces_previous_observer() {
        let first = Arc::new(Mutex::new(0));
        let second = Arc::new(Mutex::new(0));
        let mut forwarder = ChangeForwarder::default();

        let f = Arc::clone(&first);
        forwarder.register(Box::new(move |_: Vec<VehiclePropValue>| *f.lock().unwrap() += 1));
        let s = Arc::clone(&second);
        assert!(forwarder.register(Box::new(move |_: Vec<VehiclePropValue>| *s.lock().unwrap() += 1)));

        forwarder.forward(&[write(1, 1, 1)]);
        assert_eq!(*first.lock().unwrap(), 0);
        assert_eq!(*second.lock().unwrap(), 1);
    }
}
