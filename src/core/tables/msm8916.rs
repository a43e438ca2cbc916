use super::{BoostStyle, ChipTables, GovernorTables, ProfileTables, VideoStyle};
use crate::core::debounce::DebouncePolicy;
use crate::core::profile::GatingPolicy;
use crate::core::resources::{Resource as R, legacy::*};
use crate::core::soc::ChipVariant;

const PROFILE_HIGH_PERFORMANCE_8916: &[R] = &[
    R::legacy(0x1C00),
    R::legacy(0x0901),
    R::legacy(CPU0_MIN_FREQ_TURBO_MAX),
];

const PROFILE_HIGH_PERFORMANCE_8939: &[R] = &[
    R::legacy(SCHED_BOOST_ON),
    R::legacy(0x1C00),
    R::legacy(0x0901),
    R::legacy(CPU0_MIN_FREQ_TURBO_MAX),
    R::legacy(CPU1_MIN_FREQ_TURBO_MAX),
    R::legacy(CPU2_MIN_FREQ_TURBO_MAX),
    R::legacy(CPU3_MIN_FREQ_TURBO_MAX),
    R::legacy(CPU4_MIN_FREQ_TURBO_MAX),
    R::legacy(CPU5_MIN_FREQ_TURBO_MAX),
    R::legacy(CPU6_MIN_FREQ_TURBO_MAX),
    R::legacy(CPU7_MIN_FREQ_TURBO_MAX),
];

const PROFILE_POWER_SAVE_8916: &[R] = &[R::legacy(CPU0_MAX_FREQ_NONTURBO_MAX)];

const PROFILE_POWER_SAVE_8939: &[R] = &[
    R::legacy(CPUS_ONLINE_MAX_LIMIT_2),
    R::legacy(CPU0_MAX_FREQ_NONTURBO_MAX),
    R::legacy(CPU1_MAX_FREQ_NONTURBO_MAX),
    R::legacy(CPU2_MAX_FREQ_NONTURBO_MAX),
    R::legacy(CPU3_MAX_FREQ_NONTURBO_MAX),
];

const INTERACTION_FLING: &[R] = &[
    R::legacy(ALL_CPUS_PWR_CLPS_DIS),
    R::legacy(SCHED_BOOST_ON),
    R::legacy(SCHED_PREFER_IDLE_DIS),
    R::legacy(0x20D),
];

const INTERACTION_SMALL: &[R] = &[
    R::legacy(ALL_CPUS_PWR_CLPS_DIS),
    R::legacy(SCHED_PREFER_IDLE_DIS),
    R::legacy(0x20D),
];

const LAUNCH: &[R] = &[
    R::legacy(ALL_CPUS_PWR_CLPS_DIS),
    R::legacy(SCHED_BOOST_ON),
    R::legacy(SCHED_PREFER_IDLE_DIS),
    R::legacy(0x20F),
    R::legacy(0x1C00),
    R::legacy(0x4001),
    R::legacy(0x4101),
    R::legacy(0x4201),
];

const CPU_BOOST: &[R] = INTERACTION_FLING;

const DISPLAY_OFF_8916: &[R] = &[R::legacy(TR_MS_50), R::legacy(THREAD_MIGRATION_SYNC_OFF)];

// CPU0 floor at 400MHz keeps volume-key wakeups from peaking power.
const DISPLAY_OFF_8939: &[R] = &[
    R::legacy(TR_MS_CPU0_50),
    R::legacy(TR_MS_CPU4_50),
    R::legacy(THREAD_MIGRATION_SYNC_OFF),
    R::legacy(0x204),
];

const VIDEO_ENCODE: GovernorTables = GovernorTables {
    ondemand: &[
        R::legacy(IO_BUSY_OFF),
        R::legacy(SAMPLING_DOWN_FACTOR_1),
        R::legacy(THREAD_MIGRATION_SYNC_OFF),
    ],
    interactive: &[R::legacy(HS_FREQ_800), R::legacy(0x1C00)],
};

const VIDEO_DECODE: GovernorTables = GovernorTables {
    ondemand: &[R::legacy(THREAD_MIGRATION_SYNC_OFF)],
    interactive: &[
        R::legacy(TR_MS_30),
        R::legacy(HISPEED_LOAD_90),
        R::legacy(HS_FREQ_1026),
    ],
};

pub(super) fn tables(msm8916: bool) -> ChipTables {
    ChipTables {
        variant: if msm8916 {
            ChipVariant::Msm8916
        } else {
            ChipVariant::Msm8939
        },
        gating: GatingPolicy::AllNonBalanced,
        debounce: DebouncePolicy::MIN_GAP,
        strict_cpu_boost: false,
        boost: BoostStyle::Timed,
        video: VideoStyle::PerGovernor,
        display_hints: true,
        modes: false,
        supported_profiles: 3,
        profiles: ProfileTables {
            power_save: if msm8916 {
                PROFILE_POWER_SAVE_8916
            } else {
                PROFILE_POWER_SAVE_8939
            },
            high_performance: if msm8916 {
                PROFILE_HIGH_PERFORMANCE_8916
            } else {
                PROFILE_HIGH_PERFORMANCE_8939
            },
            bias_power: &[],
            bias_performance: &[],
        },
        interaction_fling: INTERACTION_FLING,
        interaction_small: INTERACTION_SMALL,
        launch: LAUNCH,
        cpu_boost: CPU_BOOST,
        display_off: if msm8916 {
            DISPLAY_OFF_8916
        } else {
            DISPLAY_OFF_8939
        },
        video_encode: VIDEO_ENCODE,
        video_decode: VIDEO_DECODE,
    }
}
