use crate::core::config::Settings;
use crate::core::governor::GovernorProbe;
use crate::core::feature::TapToWake;
use crate::core::hal::PowerHal;
use crate::core::perflock::{DryRunPerfLock, PerfLock, SysfsPerfLock};
use crate::core::soc::{self, ChipVariant};
use crate::core::tables::ChipTables;
use anyhow::{Result, bail};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub settings: Settings,
    pub settings_path: PathBuf,
    /// Log requests instead of writing nodes.
    pub dry_run: bool,
}

impl DaemonConfig {
    pub fn load(settings_path: PathBuf, dry_run: bool) -> Result<Self> {
        let settings = Settings::load_or_default(&settings_path)?;
        Ok(Self {
            settings,
            settings_path,
            dry_run,
        })
    }

    pub fn variant(&self) -> Result<ChipVariant> {
        if let Some(variant) = self.settings.soc.variant {
            info!(target: "qpowerhal::daemon", "Chip variant {} (from settings)", variant);
            return Ok(variant);
        }
        match soc::detect(&self.settings.soc.soc_id_path) {
            Some(variant) => {
                info!(target: "qpowerhal::daemon", "Chip variant {} (detected)", variant);
                Ok(variant)
            }
            None => bail!("Unsupported SoC: set [soc] variant in {}", self.settings_path.display()),
        }
    }

    pub fn perf_lock(&self) -> Arc<dyn PerfLock> {
        let nodes = self.settings.node_map();
        if self.dry_run || nodes.is_empty() {
            info!(target: "qpowerhal::daemon", "Perf-lock backend: dry run");
            return Arc::new(DryRunPerfLock::new());
        }
        info!(target: "qpowerhal::daemon", "Perf-lock backend: sysfs ({} nodes)", nodes.len());
        Arc::new(SysfsPerfLock::new(nodes, self.settings.sysfs.retry()))
    }

    pub fn build_hal(&self) -> Result<PowerHal> {
        let variant = self.variant()?;
        let retry = self.settings.sysfs.retry();
        let probe = GovernorProbe::new(&self.settings.sysfs.root, retry);

        let mut hal = PowerHal::new(ChipTables::for_variant(variant), self.perf_lock(), probe)
            .with_hint_tables(self.settings.power_hints.clone());
        if let Some(node) = &self.settings.feature.tap_to_wake_node {
            hal = hal.with_tap_to_wake(TapToWake::new(node, retry));
        }
        Ok(hal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hint::{HintStatus, PowerHint};

    #[test]
    fn builds_hal_from_settings_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "[soc]\nvariant = \"sdm630\"\n[power_hints]\nvr_mode = [[1, 2]]\n",
        )
        .unwrap();

        let cfg = DaemonConfig::load(path, true).unwrap();
        let hal = cfg.build_hal().unwrap();

        assert_eq!(hal.tables().variant, ChipVariant::Sdm630);
        assert_eq!(hal.power_hint(PowerHint::Launch(Some(1))), HintStatus::Handled);
        assert_eq!(hal.status().perflock_active, 1);
    }

    #[test]
    fn missing_settings_file_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = DaemonConfig::load(dir.path().join("absent.toml"), false).unwrap();
        assert!(cfg.settings.nodes.is_empty());
        assert_eq!(cfg.perf_lock().active_count(), 0);
    }
}
