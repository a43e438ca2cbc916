use super::{BoostStyle, ChipTables, GovernorTables, ProfileTables, VideoStyle};
use crate::core::debounce::DebouncePolicy;
use crate::core::profile::GatingPolicy;
use crate::core::resources::{Resource as R, v3::*};
use crate::core::soc::ChipVariant;

const PROFILE_HIGH_PERFORMANCE: &[R] = &[
    R::new(SCHED_BOOST_ON, 0x1),
    R::new(MIN_FREQ_BIG_CORE_0, 0xFFF),
    R::new(MIN_FREQ_LITTLE_CORE_0, 0xFFF),
    R::new(ALL_CPUS_PWR_CLPS_DIS, 0x1),
];

const PROFILE_POWER_SAVE: &[R] = &[
    R::new(MAX_FREQ_BIG_CORE_0, 0x3E8),
    R::new(MAX_FREQ_LITTLE_CORE_0, 0x3E8),
];

const PROFILE_BIAS_POWER: &[R] = &[
    R::new(MAX_FREQ_BIG_CORE_0, 0x514),
    R::new(MAX_FREQ_LITTLE_CORE_0, 0x3E8),
];

const PROFILE_BIAS_PERFORMANCE: &[R] = &[R::new(MIN_FREQ_BIG_CORE_0, 0x578)];

const LAUNCH: &[R] = &[
    R::new(SCHED_BOOST_ON, 0x1),
    R::new(MAX_FREQ_BIG_CORE_0, 0x939),
    R::new(MAX_FREQ_LITTLE_CORE_0, 0xFFF),
    R::new(MIN_FREQ_BIG_CORE_0, 0xFFF),
    R::new(MIN_FREQ_LITTLE_CORE_0, 0xFFF),
    R::new(CPUBW_HWMON_MIN_FREQ, 0x8C),
    R::new(ALL_CPUS_PWR_CLPS_DIS, 0x1),
    R::new(STOR_CLK_SCALE_DIS, 0x1),
];

const CPU_BOOST: &[R] = &[
    R::new(SCHED_BOOST_ON, 0x1),
    R::new(MIN_FREQ_BIG_CORE_0, 0x3E8),
];

const INTERACTION_FLING: &[R] = &[
    R::new(CPUBW_HWMON_MIN_FREQ, 0x33),
    R::new(MIN_FREQ_BIG_CORE_0, 0x3E8),
    R::new(MIN_FREQ_LITTLE_CORE_0, 0x3E8),
    R::new(SCHED_BOOST_ON, 0x2),
];

const INTERACTION_SMALL: &[R] = &[R::new(MIN_FREQ_BIG_CORE_0, 0x3E8)];

pub(super) fn tables() -> ChipTables {
    ChipTables {
        variant: ChipVariant::Msm8998,
        gating: GatingPolicy::None,
        debounce: DebouncePolicy::COVERAGE,
        strict_cpu_boost: true,
        boost: BoostStyle::Tracked,
        video: VideoStyle::Configured,
        display_hints: false,
        modes: true,
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
        display_off: &[],
        video_encode: GovernorTables::default(),
        video_decode: GovernorTables::default(),
    }
}
