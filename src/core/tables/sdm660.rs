use super::{BoostStyle, ChipTables, GovernorTables, ProfileTables, VideoStyle};
use crate::core::debounce::DebouncePolicy;
use crate::core::profile::GatingPolicy;
use crate::core::resources::{Resource as R, v3::*};
use crate::core::soc::ChipVariant;

const PROFILE_HIGH_PERFORMANCE: &[R] = &[
    R::new(SCHED_BOOST_ON, 1),
    R::new(SCHED_IDLE_NR_RUN, 1),
    R::new(SCHED_IDLE_RESTRICT_CLUSTER, 0),
    R::new(SCHED_FREQ_AGGR_THRH, 1),
    R::new(SCHED_GROUP_DOWN_MIGRATE, 0x5F),
    R::new(SCHED_GROUP_UP_MIGRATE, 0x64),
    R::new(MIN_FREQ_BIG_CORE_0, 0xFFF),
    R::new(MIN_FREQ_LITTLE_CORE_0, 0xFFF),
];

const PROFILE_POWER_SAVE: &[R] = &[
    R::new(MAX_FREQ_BIG_CORE_0, 0),
    R::new(MAX_FREQ_LITTLE_CORE_0, 0),
];

const PROFILE_BIAS_POWER: &[R] = &[
    R::new(MAX_FREQ_BIG_CORE_0, 3),
    R::new(MAX_FREQ_LITTLE_CORE_0, 1),
];

const PROFILE_BIAS_PERFORMANCE: &[R] = &[
    R::new(MIN_FREQ_BIG_CORE_0, 3),
    R::new(MIN_FREQ_LITTLE_CORE_0, 2),
];

const LAUNCH: &[R] = &[
    R::new(SCHED_BOOST_ON, 1),
    R::new(MIN_FREQ_BIG_CORE_0, 3),
    R::new(MIN_FREQ_LITTLE_CORE_0, 2),
    R::new(SCHED_IDLE_NR_RUN, 1),
    R::new(SCHED_IDLE_RESTRICT_CLUSTER, 0),
];

const CPU_BOOST: &[R] = &[R::new(SCHED_BOOST_ON, 2), R::new(MIN_FREQ_BIG_CORE_0, 1)];

const INTERACTION_FLING: &[R] = &[
    R::new(SCHED_BOOST_ON, 2),
    R::new(MIN_FREQ_BIG_CORE_0, 1),
    R::new(MIN_FREQ_LITTLE_CORE_0, 0),
    R::new(CPUBW_HWMON_MIN_FREQ, 1),
    R::new(ABOVE_HISPEED_DELAY_BIG, 1),
    R::new(IO_IS_BUSY_BIG, 1),
    R::new(SCHED_FREQ_AGGR_THRH, 1),
    R::new(GPU_MIN_FREQ, 1),
];

const INTERACTION_SMALL: &[R] = &[
    R::new(MIN_FREQ_BIG_CORE_0, 1),
    R::new(MIN_FREQ_LITTLE_CORE_0, 0),
];

// hispeed 1113MHz / load 95 / delay 40ms on the big cluster, bus sample 10ms
const SDM630_DISPLAY_OFF: &[R] = &[
    R::new(HISPEED_FREQ_BIG, 0x459),
    R::new(GO_HISPEED_LOAD_BIG, 0x5F),
    R::new(ABOVE_HISPEED_DELAY_BIG, 0x4),
    R::new(CPUBW_HWMON_SAMPLE_MS, 0xA),
];

// hispeed 902MHz / load 95 / delay 40ms on the little cluster, group upmigrate 500
const SDM660_DISPLAY_OFF: &[R] = &[
    R::new(HISPEED_FREQ_LITTLE, 0x386),
    R::new(GO_HISPEED_LOAD_LITTLE, 0x5F),
    R::new(ABOVE_HISPEED_DELAY_LITTLE, 0x4),
    R::new(CPUBW_HWMON_SAMPLE_MS, 0xA),
    R::new(SCHED_GROUP_UP_MIGRATE, 0x1F4),
];

const SDM630_VIDEO_ENCODE: &[R] = &[
    R::new(HISPEED_FREQ_BIG, 0x459),
    R::new(GO_HISPEED_LOAD_BIG, 0x5F),
    R::new(ABOVE_HISPEED_DELAY_BIG, 0x4),
    R::new(TARGET_LOADS_BIG, 0x5F),
    R::new(SCHED_IDLE_NR_RUN, 0x5),
    R::new(CPUBW_HWMON_SAMPLE_MS, 0xA),
];

// Shipped tuning writes the 902MHz little-cluster speed to the big node.
const SDM660_VIDEO_ENCODE: &[R] = &[
    R::new(HISPEED_FREQ_BIG, 0x386),
    R::new(GO_HISPEED_LOAD_LITTLE, 0x5F),
    R::new(ABOVE_HISPEED_DELAY_LITTLE, 0x4),
    R::new(CPUBW_HWMON_SAMPLE_MS, 0xA),
];

pub(super) fn tables(sdm630: bool) -> ChipTables {
    ChipTables {
        variant: if sdm630 {
            ChipVariant::Sdm630
        } else {
            ChipVariant::Sdm660
        },
        gating: GatingPolicy::PowerSaveOnly,
        debounce: DebouncePolicy::COVERAGE,
        strict_cpu_boost: true,
        boost: BoostStyle::Timed,
        video: VideoStyle::Interactive,
        display_hints: true,
        modes: false,
        supported_profiles: 5,
        profiles: ProfileTables {
            power_save: PROFILE_POWER_SAVE,
            high_performance: PROFILE_HIGH_PERFORMANCE,
            bias_power: PROFILE_BIAS_POWER,
            bias_performance: PROFILE_BIAS_PERFORMANCE,
        },
        interaction_fling: INTERACTION_FLING,
        interaction_small: INTERACTION_SMALL,
        launch: LAUNCH,
        cpu_boost: CPU_BOOST,
        display_off: if sdm630 {
            SDM630_DISPLAY_OFF
        } else {
            SDM660_DISPLAY_OFF
        },
        video_encode: GovernorTables {
            ondemand: &[],
            interactive: if sdm630 {
                SDM630_VIDEO_ENCODE
            } else {
                SDM660_VIDEO_ENCODE
            },
        },
        video_decode: GovernorTables::default(),
    }
}
