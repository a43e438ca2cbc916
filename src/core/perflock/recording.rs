use super::{Handle, HandleCounter, PerfLock};
use crate::core::resources::ResourceRequest;
use std::collections::BTreeSet;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Acquire(Handle, ResourceRequest),
    Release(Handle),
}

/// Test double that records every call in order.
pub struct RecordingPerfLock {
    inner: Mutex<Inner>,
    fail: bool,
}

struct Inner {
    counter: HandleCounter,
    calls: Vec<Call>,
    durations: Vec<Duration>,
    active: BTreeSet<Handle>,
}

impl RecordingPerfLock {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                counter: HandleCounter::new(),
                calls: Vec::new(),
                durations: Vec::new(),
                active: BTreeSet::new(),
            }),
            fail: false,
        }
    }

    /// Every acquire returns [`Handle::INVALID`].
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn durations(&self) -> Vec<Duration> {
        self.inner.lock().unwrap().durations.clone()
    }

    pub fn acquired(&self) -> Vec<ResourceRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Acquire(_, r) => Some(r),
                Call::Release(_) => None,
            })
            .collect()
    }

    pub fn release_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Release(_)))
            .count()
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.clear();
        inner.durations.clear();
    }
}

impl PerfLock for RecordingPerfLock {
    fn acquire(&self, duration: Duration, request: &ResourceRequest) -> Handle {
        let mut inner = self.inner.lock().unwrap();
        let handle = if self.fail {
            Handle::INVALID
        } else {
            inner.counter.next()
        };
        if handle.is_valid() {
            inner.active.insert(handle);
        }
        inner.calls.push(Call::Acquire(handle, request.clone()));
        inner.durations.push(duration);
        handle
    }

    fn release(&self, handle: Handle) {
        let mut inner = self.inner.lock().unwrap();
        inner.active.remove(&handle);
        inner.calls.push(Call::Release(handle));
    }

    fn active_count(&self) -> usize {
        self.inner.lock().unwrap().active.len()
    }
}
