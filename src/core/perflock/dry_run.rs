use super::{Handle, HandleCounter, PerfLock, deadline};
use crate::core::resources::ResourceRequest;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::info;

/// Tracks and logs requests without touching any node. Used when no node
/// map is configured.
pub struct DryRunPerfLock {
    inner: Mutex<Inner>,
}

struct Inner {
    counter: HandleCounter,
    leases: HashMap<Handle, Option<Instant>>,
}

impl DryRunPerfLock {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                counter: HandleCounter::new(),
                leases: HashMap::new(),
            }),
        }
    }
}

impl Default for DryRunPerfLock {
    fn default() -> Self {
        Self::new()
    }
}

impl PerfLock for DryRunPerfLock {
    fn acquire(&self, duration: Duration, request: &ResourceRequest) -> Handle {
        if request.is_empty() {
            return Handle::INVALID;
        }
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let handle = inner.counter.next();
        inner.leases.insert(handle, deadline(Instant::now(), duration));
        info!(
            target: "qpowerhal::perflock",
            "dry-run acquire {} for {}ms: {}",
            handle,
            duration.as_millis(),
            request
        );
        handle
    }

    fn release(&self, handle: Handle) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.leases.remove(&handle).is_some() {
            info!(target: "qpowerhal::perflock", "dry-run release {}", handle);
        }
    }

    fn sweep(&self, now: Instant) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner
            .leases
            .retain(|_, until| until.is_none_or(|t| t > now));
    }

    fn active_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .leases
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resources::Resource;

    #[test]
    fn timed_requests_expire_on_sweep() {
        let lock = DryRunPerfLock::new();
        let req = ResourceRequest::new(vec![Resource::new(1, 1)]);

        let timed = lock.acquire(Duration::from_millis(100), &req);
        let held = lock.acquire(Duration::ZERO, &req);
        assert!(timed.is_valid() && held.is_valid());
        assert_eq!(lock.active_count(), 2);

        lock.sweep(Instant::now() + Duration::from_secs(1));
        assert_eq!(lock.active_count(), 1);

        lock.release(held);
        assert_eq!(lock.active_count(), 0);
    }

    #[test]
    fn empty_request_is_rejected() {
        let lock = DryRunPerfLock::new();
        assert_eq!(
            lock.acquire(Duration::ZERO, &ResourceRequest::default()),
            Handle::INVALID
        );
    }
}
