use crate::core::error::HintError;
use crate::core::perflock::{NamedActions, PerfLock};
use crate::core::resources::{ResourceRequest, hint_id};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerProfile {
    PowerSave,
    Balanced,
    HighPerformance,
    BiasPower,
    BiasPerformance,
}

impl Default for PowerProfile {
    fn default() -> Self {
        PowerProfile::Balanced
    }
}

impl PowerProfile {
    pub const ALL: [PowerProfile; 5] = [
        Self::PowerSave,
        Self::Balanced,
        Self::HighPerformance,
        Self::BiasPower,
        Self::BiasPerformance,
    ];

    /// Profile ids as sent by the power service.
    pub fn from_id(id: i32) -> Option<Self> {
        usize::try_from(id).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn id(&self) -> i32 {
        match self {
            Self::PowerSave => 0,
            Self::Balanced => 1,
            Self::HighPerformance => 2,
            Self::BiasPower => 3,
            Self::BiasPerformance => 4,
        }
    }

    pub fn to_upper_str(&self) -> &'static str {
        match self {
            Self::PowerSave => "POWER_SAVE",
            Self::Balanced => "BALANCED",
            Self::HighPerformance => "HIGH_PERFORMANCE",
            Self::BiasPower => "BIAS_POWER",
            Self::BiasPerformance => "BIAS_PERFORMANCE",
        }
    }
}

impl FromStr for PowerProfile {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(id) = s.parse::<i32>() {
            return Self::from_id(id).ok_or("profile id out of range");
        }
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "power_save" | "powersave" => Ok(Self::PowerSave),
            "balanced" | "balance" => Ok(Self::Balanced),
            "high_performance" | "performance" => Ok(Self::HighPerformance),
            "bias_power" => Ok(Self::BiasPower),
            "bias_performance" => Ok(Self::BiasPerformance),
            _ => Err("unknown profile"),
        }
    }
}

impl std::fmt::Display for PowerProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PowerSave => write!(f, "power_save"),
            Self::Balanced => write!(f, "balanced"),
            Self::HighPerformance => write!(f, "high_performance"),
            Self::BiasPower => write!(f, "bias_power"),
            Self::BiasPerformance => write!(f, "bias_performance"),
        }
    }
}

/// Which hints are swallowed while a non-balanced profile is active.
/// Set-profile itself always goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatingPolicy {
    None,
    PowerSaveOnly,
    AllNonBalanced,
}

impl GatingPolicy {
    pub fn blocks(&self, current: PowerProfile) -> bool {
        match self {
            Self::None => false,
            Self::PowerSaveOnly => current == PowerProfile::PowerSave,
            Self::AllNonBalanced => current != PowerProfile::Balanced,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    Switched {
        from: PowerProfile,
        to: PowerProfile,
    },
}

#[derive(Debug, Default)]
pub struct ProfileMachine {
    current: PowerProfile,
}

impl ProfileMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> PowerProfile {
        self.current
    }

    /// Undo the active non-balanced profile, then apply `target`'s table.
    /// `supported` bounds which profile ids this chip accepts.
    pub fn set(
        &mut self,
        target_id: i32,
        supported: usize,
        table: impl Fn(PowerProfile) -> ResourceRequest,
        lock: &dyn PerfLock,
        actions: &NamedActions,
    ) -> Result<Transition, HintError> {
        let target = PowerProfile::from_id(target_id)
            .filter(|p| (p.id() as usize) < supported)
            .ok_or(HintError::UnknownProfile(target_id))?;

        if target == self.current {
            return Ok(Transition::Unchanged);
        }

        let from = self.current;
        if from != PowerProfile::Balanced {
            actions.undo(lock, hint_id::PROFILE);
            debug!(target: "qpowerhal::profile", "{} undone", from);
        }

        if target != PowerProfile::Balanced && !actions.perform(lock, hint_id::PROFILE, &table(target)) {
            // The previous request is already gone, so nothing is held.
            warn!(target: "qpowerhal::profile", "perf-lock rejected {} table", target);
            self.current = PowerProfile::Balanced;
            return Err(HintError::VendorApplyFailure { category: "profile" });
        }

        info!(target: "qpowerhal::profile", "Profile {} -> {}", from, target);
        self.current = target;
        Ok(Transition::Switched { from, to: target })
    }

    /// Drop the active profile request and fall back to balanced.
    pub fn reset(&mut self, lock: &dyn PerfLock, actions: &NamedActions) {
        if self.current != PowerProfile::Balanced {
            actions.undo(lock, hint_id::PROFILE);
            self.current = PowerProfile::Balanced;
        }
    }
}
