pub mod dry_run;
pub mod sysfs;

#[cfg(test)]
pub mod recording;

pub use dry_run::DryRunPerfLock;
pub use sysfs::SysfsPerfLock;

use crate::core::resources::ResourceRequest;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Opaque perf-lock handle. Anything `<= 0` is not a live request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Handle(pub i32);

impl Handle {
    pub const INVALID: Handle = Handle(-1);

    pub fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The tuning mechanism that actually holds tunables.
///
/// `acquire` with [`Duration::ZERO`] holds until `release`; a non-zero
/// duration lets the backend drop the request on its own once it lapses.
/// A failed acquire returns [`Handle::INVALID`].
pub trait PerfLock: Send + Sync {
    fn acquire(&self, duration: Duration, request: &ResourceRequest) -> Handle;

    fn release(&self, handle: Handle);

    /// Drop timed requests whose deadline is at or before `now`.
    fn sweep(&self, _now: Instant) {}

    fn active_count(&self) -> usize;
}

/// Issues monotonically increasing handles, skipping non-positive values.
#[derive(Debug)]
pub(crate) struct HandleCounter(i32);

impl HandleCounter {
    pub(crate) fn new() -> Self {
        Self(0)
    }

    pub(crate) fn next(&mut self) -> Handle {
        self.0 = if self.0 >= i32::MAX { 1 } else { self.0 + 1 };
        Handle(self.0)
    }
}

pub(crate) fn deadline(now: Instant, duration: Duration) -> Option<Instant> {
    (!duration.is_zero()).then(|| now + duration)
}

/// Requests tracked by hint id (display state, video, profiles) instead of
/// by a caller-held handle. Performing an id that is already active first
/// releases the earlier request.
#[derive(Debug, Default)]
pub struct NamedActions {
    active: Mutex<HashMap<u32, Handle>>,
}

impl NamedActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn perform(&self, lock: &dyn PerfLock, id: u32, request: &ResourceRequest) -> bool {
        if request.is_empty() {
            debug!(target: "qpowerhal::perflock", "hint 0x{:X}: empty table, nothing to apply", id);
            return true;
        }

        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = active.remove(&id) {
            lock.release(previous);
        }

        let handle = lock.acquire(Duration::ZERO, request);
        if !handle.is_valid() {
            warn!(target: "qpowerhal::perflock", "hint 0x{:X}: perf-lock rejected {}", id, request);
            return false;
        }

        debug!(target: "qpowerhal::perflock", "hint 0x{:X} -> {} {}", id, handle, request);
        active.insert(id, handle);
        true
    }

    /// Returns whether a request was actually released.
    pub fn undo(&self, lock: &dyn PerfLock, id: u32) -> bool {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        match active.remove(&id) {
            Some(handle) => {
                lock.release(handle);
                debug!(target: "qpowerhal::perflock", "hint 0x{:X} undone ({})", id, handle);
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self, id: u32) -> bool {
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(&id)
    }

    pub fn active_ids(&self) -> Vec<u32> {
        let active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        let mut ids: Vec<u32> = active.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn undo_all(&self, lock: &dyn PerfLock) {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        for (_, handle) in active.drain() {
            lock.release(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::recording::{Call, RecordingPerfLock};
    use super::*;
    use crate::core::resources::Resource;

    fn req(id: u32) -> ResourceRequest {
        ResourceRequest::new(vec![Resource::new(id, 1)])
    }

    #[test]
    fn handle_validity() {
        assert!(!Handle::INVALID.is_valid());
        assert!(!Handle(0).is_valid());
        assert!(Handle(7).is_valid());
    }

    #[test]
    fn counter_wraps_to_one() {
        let mut c = HandleCounter(i32::MAX - 1);
        assert_eq!(c.next(), Handle(i32::MAX));
        assert_eq!(c.next(), Handle(1));
    }

    #[test]
    fn performing_same_id_twice_keeps_one_request() {
        let lock = RecordingPerfLock::new();
        let named = NamedActions::new();

        assert!(named.perform(&lock, 0x0C00, &req(1)));
        assert!(named.perform(&lock, 0x0C00, &req(2)));

        assert_eq!(lock.active_count(), 1);
        assert_eq!(
            lock.calls(),
            vec![
                Call::Acquire(Handle(1), req(1)),
                Call::Release(Handle(1)),
                Call::Acquire(Handle(2), req(2)),
            ]
        );
    }

    #[test]
    fn undo_of_unknown_id_is_noop() {
        let lock = RecordingPerfLock::new();
        let named = NamedActions::new();

        assert!(!named.undo(&lock, 0xFF00));
        assert!(lock.calls().is_empty());
    }

    #[test]
    fn rejected_request_is_not_tracked() {
        let lock = RecordingPerfLock::failing();
        let named = NamedActions::new();

        assert!(!named.perform(&lock, 0x0A00, &req(1)));
        assert!(!named.is_active(0x0A00));
    }

    #[test]
    fn empty_table_skips_perflock() {
        let lock = RecordingPerfLock::new();
        let named = NamedActions::new();

        assert!(named.perform(&lock, 0xFF00, &ResourceRequest::default()));
        assert!(lock.calls().is_empty());
        assert!(!named.is_active(0xFF00));
    }
}
