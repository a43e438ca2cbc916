use crate::core::error::HintError;
use crate::core::perflock::{Handle, PerfLock};
use crate::core::resources::ResourceRequest;
use std::time::Duration;
use tracing::{debug, warn};

/// Hint categories that hold a request between a start and a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Interaction,
    Launch,
    CpuBoost,
    SustainedPerformance,
    VrMode,
    VideoEncode,
    VideoDecode,
    Display,
    Profile,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interaction => "interaction",
            Self::Launch => "launch",
            Self::CpuBoost => "cpu_boost",
            Self::SustainedPerformance => "sustained_performance",
            Self::VrMode => "vr_mode",
            Self::VideoEncode => "video_encode",
            Self::VideoDecode => "video_decode",
            Self::Display => "display",
            Self::Profile => "profile",
        }
    }
}

/// At most one outstanding perf-lock request for a category.
#[derive(Debug)]
pub struct RequestSlot {
    category: Category,
    handle: Option<Handle>,
}

impl RequestSlot {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            handle: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle(&self) -> Option<Handle> {
        self.handle
    }

    /// Release whatever this slot holds, then acquire `request`. On a
    /// rejected acquire the slot is left empty.
    pub fn apply(
        &mut self,
        lock: &dyn PerfLock,
        duration: Duration,
        request: &ResourceRequest,
    ) -> Result<Handle, HintError> {
        self.release(lock);

        let handle = lock.acquire(duration, request);
        if !handle.is_valid() {
            warn!(
                target: "qpowerhal::hint",
                "{}: perf-lock rejected {}",
                self.category.as_str(),
                request
            );
            return Err(HintError::VendorApplyFailure {
                category: self.category.as_str(),
            });
        }

        debug!(target: "qpowerhal::hint", "{} -> {}", self.category.as_str(), handle);
        self.handle = Some(handle);
        Ok(handle)
    }

    /// Returns whether anything was held.
    pub fn release(&mut self, lock: &dyn PerfLock) -> bool {
        match self.handle.take() {
            Some(handle) => {
                lock.release(handle);
                debug!(target: "qpowerhal::hint", "{} released {}", self.category.as_str(), handle);
                true
            }
            None => false,
        }
    }
}

/// Reference count shared by overlapping users of one resource table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RefCount(u32);

impl RefCount {
    /// Returns true on the 0 -> 1 edge.
    pub fn acquire(&mut self) -> bool {
        self.0 += 1;
        self.0 == 1
    }

    /// Returns true on the 1 -> 0 edge. Never drops below zero.
    pub fn release(&mut self) -> bool {
        match self.0 {
            0 => false,
            n => {
                self.0 = n - 1;
                self.0 == 0
            }
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}
