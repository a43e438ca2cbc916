use super::{Handle, HandleCounter, PerfLock, deadline};
use crate::core::resources::{Resource, ResourceRequest};
use crate::core::sysfs::{self, Retry};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Perf-lock that writes each mapped resource straight to a sysfs node.
///
/// The node's original contents are saved when the first request touches
/// it and written back once the last holder releases. While several
/// requests hold the same resource, the newest one's value is in effect.
pub struct SysfsPerfLock {
    nodes: HashMap<u32, PathBuf>,
    retry: Retry,
    inner: Mutex<Inner>,
}

struct Inner {
    counter: HandleCounter,
    leases: HashMap<Handle, Lease>,
    held: HashMap<u32, NodeState>,
}

struct Lease {
    resources: Vec<Resource>,
    until: Option<Instant>,
}

struct NodeState {
    original: String,
    holders: Vec<(Handle, u32)>,
}

impl SysfsPerfLock {
    pub fn new(nodes: HashMap<u32, PathBuf>, retry: Retry) -> Self {
        Self {
            nodes,
            retry,
            inner: Mutex::new(Inner {
                counter: HandleCounter::new(),
                leases: HashMap::new(),
                held: HashMap::new(),
            }),
        }
    }

    pub fn mapped(&self) -> usize {
        self.nodes.len()
    }

    fn write(&self, id: u32, value: &str) {
        if let Some(path) = self.nodes.get(&id)
            && let Err(e) = sysfs::write_value(path, value, self.retry)
        {
            warn!(target: "qpowerhal::perflock", "resource 0x{:X}: {:#}", id, e);
        }
    }

    fn hold(&self, inner: &mut Inner, handle: Handle, resource: Resource) -> bool {
        let Some(path) = self.nodes.get(&resource.id) else {
            debug!(target: "qpowerhal::perflock", "resource 0x{:X} has no node, skipped", resource.id);
            return false;
        };

        if !inner.held.contains_key(&resource.id) {
            let original = match sysfs::read_trimmed(path, self.retry) {
                Ok(v) => v,
                Err(e) => {
                    warn!(target: "qpowerhal::perflock", "resource 0x{:X}: {:#}", resource.id, e);
                    return false;
                }
            };
            inner.held.insert(
                resource.id,
                NodeState {
                    original,
                    holders: Vec::new(),
                },
            );
        }

        if let Some(state) = inner.held.get_mut(&resource.id) {
            state.holders.push((handle, resource.value));
        }
        self.write(resource.id, &resource.value.to_string());
        true
    }

    fn drop_lease(&self, inner: &mut Inner, handle: Handle) -> bool {
        let Some(lease) = inner.leases.remove(&handle) else {
            return false;
        };

        for resource in lease.resources {
            let Some(state) = inner.held.get_mut(&resource.id) else {
                continue;
            };
            state.holders.retain(|(h, _)| *h != handle);

            match state.holders.last() {
                Some(&(_, value)) => self.write(resource.id, &value.to_string()),
                None => {
                    let original = state.original.clone();
                    inner.held.remove(&resource.id);
                    self.write(resource.id, &original);
                }
            }
        }
        true
    }
}

impl PerfLock for SysfsPerfLock {
    fn acquire(&self, duration: Duration, request: &ResourceRequest) -> Handle {
        if request.is_empty() {
            return Handle::INVALID;
        }

        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let handle = inner.counter.next();

        let mut held = Vec::with_capacity(request.len());
        for &resource in request {
            if self.hold(&mut inner, handle, resource) {
                held.push(resource);
            }
        }

        debug!(
            target: "qpowerhal::perflock",
            "acquire {} ({}/{} resources mapped, {}ms)",
            handle,
            held.len(),
            request.len(),
            duration.as_millis()
        );

        inner.leases.insert(
            handle,
            Lease {
                resources: held,
                until: deadline(Instant::now(), duration),
            },
        );
        handle
    }

    fn release(&self, handle: Handle) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if self.drop_lease(&mut inner, handle) {
            debug!(target: "qpowerhal::perflock", "release {}", handle);
        }
    }

    fn sweep(&self, now: Instant) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let expired: Vec<Handle> = inner
            .leases
            .iter()
            .filter(|(_, lease)| lease.until.is_some_and(|t| t <= now))
            .map(|(h, _)| *h)
            .collect();

        for handle in expired {
            self.drop_lease(&mut inner, handle);
            debug!(target: "qpowerhal::perflock", "expired {}", handle);
        }
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
    use std::fs;
    use std::path::Path;

    const MIN_FREQ: u32 = 0x4080_0000;
    const BOOST: u32 = 0x40C0_0000;
    const UNMAPPED: u32 = 0x4180_0000;

    fn setup(dir: &Path) -> SysfsPerfLock {
        fs::write(dir.join("min_freq"), "300000\n").unwrap();
        fs::write(dir.join("sched_boost"), "0\n").unwrap();

        let nodes = HashMap::from([
            (MIN_FREQ, dir.join("min_freq")),
            (BOOST, dir.join("sched_boost")),
        ]);
        SysfsPerfLock::new(nodes, Retry::once())
    }

    fn read(dir: &Path, node: &str) -> String {
        fs::read_to_string(dir.join(node)).unwrap().trim().to_string()
    }

    #[test]
    fn release_restores_original_value() {
        let dir = tempfile::tempdir().unwrap();
        let lock = setup(dir.path());

        let h = lock.acquire(
            Duration::ZERO,
            &ResourceRequest::new(vec![
                Resource::new(MIN_FREQ, 1_000_000),
                Resource::new(BOOST, 1),
                Resource::new(UNMAPPED, 5),
            ]),
        );
        assert!(h.is_valid());
        assert_eq!(read(dir.path(), "min_freq"), "1000000");
        assert_eq!(read(dir.path(), "sched_boost"), "1");

        lock.release(h);
        assert_eq!(read(dir.path(), "min_freq"), "300000");
        assert_eq!(read(dir.path(), "sched_boost"), "0");
        assert_eq!(lock.active_count(), 0);
    }

    #[test]
    fn newest_holder_wins_until_released() {
        let dir = tempfile::tempdir().unwrap();
        let lock = setup(dir.path());

        let first = lock.acquire(
            Duration::ZERO,
            &ResourceRequest::new(vec![Resource::new(MIN_FREQ, 800_000)]),
        );
        let second = lock.acquire(
            Duration::ZERO,
            &ResourceRequest::new(vec![Resource::new(MIN_FREQ, 1_200_000)]),
        );
        assert_eq!(read(dir.path(), "min_freq"), "1200000");

        lock.release(second);
        assert_eq!(read(dir.path(), "min_freq"), "800000");

        lock.release(first);
        assert_eq!(read(dir.path(), "min_freq"), "300000");
    }

    #[test]
    fn sweep_expires_timed_requests() {
        let dir = tempfile::tempdir().unwrap();
        let lock = setup(dir.path());

        lock.acquire(
            Duration::from_millis(50),
            &ResourceRequest::new(vec![Resource::new(BOOST, 2)]),
        );
        assert_eq!(read(dir.path(), "sched_boost"), "2");

        lock.sweep(Instant::now());
        assert_eq!(read(dir.path(), "sched_boost"), "2");

        lock.sweep(Instant::now() + Duration::from_secs(1));
        assert_eq!(read(dir.path(), "sched_boost"), "0");
        assert_eq!(lock.active_count(), 0);
    }

    #[test]
    fn release_of_unknown_handle_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let lock = setup(dir.path());

        lock.release(Handle(42));
        lock.release(Handle::INVALID);
        assert_eq!(read(dir.path(), "min_freq"), "300000");
    }
}
