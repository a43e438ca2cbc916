use serde::{Deserialize, Serialize};
use std::fmt;

/// A single tunable write: perf-lock resource id and the value to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resource {
    pub id: u32,
    pub value: u32,
}

impl Resource {
    pub const fn new(id: u32, value: u32) -> Self {
        Self { id, value }
    }

    /// Split a legacy single-word opcode (`0xRRVV`) into resource and level.
    pub const fn legacy(opcode: u32) -> Self {
        Self {
            id: opcode >> 8,
            value: opcode & 0xFF,
        }
    }
}

impl From<[u32; 2]> for Resource {
    fn from(pair: [u32; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}=0x{:X}", self.id, self.value)
    }
}

/// Ordered list of tunables. Earlier entries take precedence in the
/// perf-lock, so order is preserved as given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceRequest {
    resources: Vec<Resource>,
}

impl ResourceRequest {
    pub fn new(resources: Vec<Resource>) -> Self {
        Self { resources }
    }

    pub fn from_static(resources: &'static [Resource]) -> Self {
        Self {
            resources: resources.to_vec(),
        }
    }

    pub fn from_pairs(pairs: &[[u32; 2]]) -> Self {
        Self {
            resources: pairs.iter().copied().map(Resource::from).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Resource> {
        self.resources.iter()
    }

    pub fn as_slice(&self) -> &[Resource] {
        &self.resources
    }
}

impl<'a> IntoIterator for &'a ResourceRequest {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}

impl fmt::Display for ResourceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, r) in self.resources.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", r)?;
        }
        write!(f, "]")
    }
}

/// Named hint ids used for actions tracked by id rather than by handle.
pub mod hint_id {
    pub const VIDEO_ENCODE: u32 = 0x0A00;
    pub const VIDEO_DECODE: u32 = 0x0B00;
    pub const DISPLAY_STATE: u32 = 0x0C00;
    pub const SUSTAINED_PERF: u32 = 0x0F00;
    pub const VR_MODE: u32 = 0x1000;
    pub const VR_MODE_SUSTAINED_PERF: u32 = 0x1001;
    pub const PROFILE: u32 = 0xFF00;
}

/// Perf-lock v3 resource opcodes (SDM660 / MSM8998 family).
pub mod v3 {
    pub const ALL_CPUS_PWR_CLPS_DIS: u32 = 0x4040_0000;
    pub const SCHED_BOOST_ON: u32 = 0x40C0_0000;
    pub const SCHED_IDLE_NR_RUN: u32 = 0x40C2_0000;
    pub const SCHED_IDLE_RESTRICT_CLUSTER: u32 = 0x40C3_0000;
    pub const SCHED_FREQ_AGGR_THRH: u32 = 0x40C5_0000;
    pub const SCHED_GROUP_DOWN_MIGRATE: u32 = 0x40C6_0000;
    pub const SCHED_GROUP_UP_MIGRATE: u32 = 0x40C7_0000;

    pub const MIN_FREQ_BIG_CORE_0: u32 = 0x4080_0000;
    pub const MIN_FREQ_LITTLE_CORE_0: u32 = 0x4080_0100;
    pub const MAX_FREQ_BIG_CORE_0: u32 = 0x4080_4000;
    pub const MAX_FREQ_LITTLE_CORE_0: u32 = 0x4080_4100;

    pub const ABOVE_HISPEED_DELAY_BIG: u32 = 0x4140_0000;
    pub const ABOVE_HISPEED_DELAY_LITTLE: u32 = 0x4140_0100;
    pub const GO_HISPEED_LOAD_BIG: u32 = 0x4141_0000;
    pub const GO_HISPEED_LOAD_LITTLE: u32 = 0x4141_0100;
    pub const HISPEED_FREQ_BIG: u32 = 0x4143_0000;
    pub const HISPEED_FREQ_LITTLE: u32 = 0x4143_0100;
    pub const TARGET_LOADS_BIG: u32 = 0x4142_0000;
    pub const IO_IS_BUSY_BIG: u32 = 0x414B_0000;

    pub const CPUBW_HWMON_MIN_FREQ: u32 = 0x4180_0000;
    pub const CPUBW_HWMON_SAMPLE_MS: u32 = 0x4182_0000;
    pub const GPU_MIN_FREQ: u32 = 0x42C0_0000;
    pub const STOR_CLK_SCALE_DIS: u32 = 0x42C1_0000;
}

/// Legacy single-word perf-lock opcodes (MSM8916 / MSM8939 family).
pub mod legacy {
    pub const ALL_CPUS_PWR_CLPS_DIS: u32 = 0x101;
    pub const CPUS_ONLINE_MAX_LIMIT_2: u32 = 0x8FD;
    pub const IO_BUSY_OFF: u32 = 0xC00;
    pub const SAMPLING_DOWN_FACTOR_1: u32 = 0xD01;
    pub const TR_MS_50: u32 = 0xEFA;
    pub const TR_MS_30: u32 = 0xEFC;
    pub const HS_FREQ_800: u32 = 0xF08;
    pub const HS_FREQ_1026: u32 = 0xF0A;
    pub const HISPEED_LOAD_90: u32 = 0x105A;
    pub const SCHED_BOOST_ON: u32 = 0x1E01;
    pub const TR_MS_CPU0_50: u32 = 0x2BFA;
    pub const TR_MS_CPU4_50: u32 = 0x2FFA;
    pub const SCHED_PREFER_IDLE_DIS: u32 = 0x3E01;
    pub const THREAD_MIGRATION_SYNC_OFF: u32 = 0x4700;

    pub const CPU0_MIN_FREQ_TURBO_MAX: u32 = 0x2FE;
    pub const CPU1_MIN_FREQ_TURBO_MAX: u32 = 0x3FE;
    pub const CPU2_MIN_FREQ_TURBO_MAX: u32 = 0x4FE;
    pub const CPU3_MIN_FREQ_TURBO_MAX: u32 = 0x5FE;
    pub const CPU4_MIN_FREQ_TURBO_MAX: u32 = 0x1FFE;
    pub const CPU5_MIN_FREQ_TURBO_MAX: u32 = 0x20FE;
    pub const CPU6_MIN_FREQ_TURBO_MAX: u32 = 0x21FE;
    pub const CPU7_MIN_FREQ_TURBO_MAX: u32 = 0x22FE;

    pub const CPU0_MAX_FREQ_NONTURBO_MAX: u32 = 0x150A;
    pub const CPU1_MAX_FREQ_NONTURBO_MAX: u32 = 0x160A;
    pub const CPU2_MAX_FREQ_NONTURBO_MAX: u32 = 0x170A;
    pub const CPU3_MAX_FREQ_NONTURBO_MAX: u32 = 0x180A;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_opcode_splits_into_resource_and_level() {
        let r = Resource::legacy(legacy::THREAD_MIGRATION_SYNC_OFF);
        assert_eq!(r, Resource::new(0x47, 0x00));

        let r = Resource::legacy(0x0901);
        assert_eq!(r.id, 0x09);
        assert_eq!(r.value, 0x01);
    }

    #[test]
    fn request_keeps_given_order() {
        let req = ResourceRequest::from_pairs(&[[3, 1], [1, 2], [2, 3]]);
        let ids: Vec<u32> = req.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(req.to_string(), "[0x3=0x1, 0x1=0x2, 0x2=0x3]");
    }
}
