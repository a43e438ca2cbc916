//! Per-chip tunable tables, resolved once at startup.

mod msm8916;
mod msm8998;
mod sdm660;

use crate::core::debounce::{BoostSize, DebouncePolicy};
use crate::core::governor::Governor;
use crate::core::profile::{GatingPolicy, PowerProfile};
use crate::core::resources::{Resource, ResourceRequest};
use crate::core::soc::ChipVariant;

/// How launch and CPU boost hints hold their request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostStyle {
    /// Fire-and-forget timed boost.
    Timed,
    /// Handle kept until an explicit stop.
    Tracked,
}

/// How video encode/decode hints pick their table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoStyle {
    /// Built-in encode table under the interactive governor, probed on all
    /// cores.
    Interactive,
    /// Encode table looked up in `[power_hints]` by the metadata's hint id.
    Configured,
    /// Encode and decode tables chosen by governor (ondemand/interactive).
    PerGovernor,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileTables {
    pub power_save: &'static [Resource],
    pub high_performance: &'static [Resource],
    pub bias_power: &'static [Resource],
    pub bias_performance: &'static [Resource],
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GovernorTables {
    pub ondemand: &'static [Resource],
    pub interactive: &'static [Resource],
}

impl GovernorTables {
    fn for_governor(&self, governor: &Governor) -> &'static [Resource] {
        match governor {
            Governor::Ondemand => self.ondemand,
            Governor::Interactive => self.interactive,
            _ => &[],
        }
    }
}

/// Everything that differs between chips, selected once from the variant.
#[derive(Debug, Clone)]
pub struct ChipTables {
    pub variant: ChipVariant,
    pub gating: GatingPolicy,
    pub debounce: DebouncePolicy,
    pub boost: BoostStyle,
    /// CPU boost with no usable duration reports NotHandled.
    pub strict_cpu_boost: bool,
    pub video: VideoStyle,
    /// Whether display on/off hints are acted on at all.
    pub display_hints: bool,
    /// Sustained performance and VR mode support.
    pub modes: bool,
    pub supported_profiles: usize,
    pub profiles: ProfileTables,
    pub interaction_fling: &'static [Resource],
    pub interaction_small: &'static [Resource],
    pub launch: &'static [Resource],
    pub cpu_boost: &'static [Resource],
    pub display_off: &'static [Resource],
    pub video_encode: GovernorTables,
    pub video_decode: GovernorTables,
}

/// Lookup keys for [`ChipTables::select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Profile(PowerProfile),
    Interaction(BoostSize),
    Launch,
    CpuBoost,
    DisplayOff,
    VideoEncode(Governor),
    VideoDecode(Governor),
}

pub const LAUNCH_BOOST_MS: u64 = 2000;

impl ChipTables {
    pub fn for_variant(variant: ChipVariant) -> Self {
        match variant {
            ChipVariant::Sdm660 => sdm660::tables(false),
            ChipVariant::Sdm630 => sdm660::tables(true),
            ChipVariant::Msm8998 => msm8998::tables(),
            ChipVariant::Msm8916 => msm8916::tables(true),
            ChipVariant::Msm8939 => msm8916::tables(false),
        }
    }

    /// Fixed request for a hint. Unknown combinations give an empty request.
    pub fn select(&self, selector: &Selector) -> ResourceRequest {
        let table: &'static [Resource] = match selector {
            Selector::Profile(profile) => match profile {
                PowerProfile::Balanced => &[],
                PowerProfile::PowerSave => self.profiles.power_save,
                PowerProfile::HighPerformance => self.profiles.high_performance,
                PowerProfile::BiasPower => self.profiles.bias_power,
                PowerProfile::BiasPerformance => self.profiles.bias_performance,
            },
            Selector::Interaction(BoostSize::Fling) => self.interaction_fling,
            Selector::Interaction(BoostSize::Small) => self.interaction_small,
            Selector::Launch => self.launch,
            Selector::CpuBoost => self.cpu_boost,
            Selector::DisplayOff => self.display_off,
            Selector::VideoEncode(governor) => self.video_encode.for_governor(governor),
            Selector::VideoDecode(governor) => self.video_decode.for_governor(governor),
        };
        ResourceRequest::from_static(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resources::{legacy, v3};

    #[test]
    fn sdm660_and_sdm630_differ_only_where_expected() {
        let sdm660 = ChipTables::for_variant(ChipVariant::Sdm660);
        let sdm630 = ChipTables::for_variant(ChipVariant::Sdm630);

        assert_eq!(
            sdm660.select(&Selector::Launch),
            sdm630.select(&Selector::Launch)
        );
        assert_ne!(
            sdm660.select(&Selector::DisplayOff),
            sdm630.select(&Selector::DisplayOff)
        );
        assert_eq!(
            sdm630.select(&Selector::DisplayOff).as_slice()[0],
            Resource::new(v3::HISPEED_FREQ_BIG, 0x459)
        );
        assert_eq!(sdm660.gating, GatingPolicy::PowerSaveOnly);
    }

    #[test]
    fn msm8998_profiles_and_launch() {
        let t = ChipTables::for_variant(ChipVariant::Msm8998);
        assert_eq!(
            t.select(&Selector::Profile(PowerProfile::PowerSave)).as_slice(),
            &[
                Resource::new(v3::MAX_FREQ_BIG_CORE_0, 0x3E8),
                Resource::new(v3::MAX_FREQ_LITTLE_CORE_0, 0x3E8),
            ]
        );
        assert_eq!(t.select(&Selector::Launch).len(), 8);
        assert!(t.select(&Selector::DisplayOff).is_empty());
        assert_eq!(t.boost, BoostStyle::Tracked);
        assert!(t.modes);
    }

    #[test]
    fn msm8916_video_tables_follow_governor() {
        let t = ChipTables::for_variant(ChipVariant::Msm8916);
        assert_eq!(
            t.select(&Selector::VideoDecode(Governor::Ondemand)).as_slice(),
            &[Resource::legacy(legacy::THREAD_MIGRATION_SYNC_OFF)]
        );
        assert_eq!(
            t.select(&Selector::VideoEncode(Governor::Interactive)).as_slice(),
            &[Resource::legacy(legacy::HS_FREQ_800), Resource::legacy(0x1C00)]
        );
        assert!(t.select(&Selector::VideoEncode(Governor::Schedutil)).is_empty());
        assert_eq!(t.supported_profiles, 3);
        assert!(t.select(&Selector::Profile(PowerProfile::BiasPower)).is_empty());
    }

    #[test]
    fn msm8939_uses_per_cluster_tables() {
        let t = ChipTables::for_variant(ChipVariant::Msm8939);
        assert_eq!(
            t.select(&Selector::Profile(PowerProfile::HighPerformance)).len(),
            11
        );
        assert_eq!(t.select(&Selector::DisplayOff).len(), 4);
    }

    #[test]
    fn balanced_is_always_empty() {
        for v in [
            ChipVariant::Sdm660,
            ChipVariant::Sdm630,
            ChipVariant::Msm8998,
            ChipVariant::Msm8916,
            ChipVariant::Msm8939,
        ] {
            let t = ChipTables::for_variant(v);
            assert!(t.select(&Selector::Profile(PowerProfile::Balanced)).is_empty());
        }
    }
}
