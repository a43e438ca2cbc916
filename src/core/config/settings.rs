use crate::core::resources::{ResourceRequest, hint_id};
use crate::core::soc::ChipVariant;
use crate::core::sysfs::Retry;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub daemon: DaemonConfig,
    #[serde(default)]
    pub soc: SocConfig,
    #[serde(default)]
    pub sysfs: SysfsConfig,
    #[serde(default)]
    pub feature: FeatureConfig,
    #[serde(default)]
    pub nodes: Vec<NodeMapping>,
    #[serde(default)]
    pub power_hints: PowerHintTables,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DaemonConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_ms: u64,

    #[serde(default = "default_socket")]
    pub socket: String,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            sweep_interval_ms: default_sweep_interval(),
            socket: default_socket(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SocConfig {
    /// Skips detection when set.
    #[serde(default)]
    pub variant: Option<ChipVariant>,

    #[serde(default = "default_soc_id_path")]
    pub soc_id_path: PathBuf,
}

impl Default for SocConfig {
    fn default() -> Self {
        Self {
            variant: None,
            soc_id_path: default_soc_id_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SysfsConfig {
    #[serde(default = "default_sysfs_root")]
    pub root: PathBuf,

    #[serde(default = "default_retries")]
    pub retries: u32,

    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
}

impl Default for SysfsConfig {
    fn default() -> Self {
        Self {
            root: default_sysfs_root(),
            retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
        }
    }
}

impl SysfsConfig {
    pub fn retry(&self) -> Retry {
        Retry::new(self.retries, Duration::from_millis(self.retry_delay_ms))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FeatureConfig {
    #[serde(default)]
    pub tap_to_wake_node: Option<PathBuf>,
}

/// One perf-lock resource id backed by a sysfs node.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeMapping {
    pub id: u32,
    pub path: PathBuf,
}

/// Tables looked up by hint id at runtime. Each entry is a list of
/// `[resource_id, value]` pairs, applied in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PowerHintTables {
    #[serde(default)]
    pub sustained_perf: Vec<[u32; 2]>,
    #[serde(default)]
    pub vr_mode: Vec<[u32; 2]>,
    #[serde(default)]
    pub vr_sustained_perf: Vec<[u32; 2]>,
    #[serde(default)]
    pub video_encode: Vec<[u32; 2]>,
    /// Extra tables keyed by hint id, written as decimal or `0x` hex.
    #[serde(default)]
    pub extra: BTreeMap<String, Vec<[u32; 2]>>,
}

impl PowerHintTables {
    /// Configured table for `id`, or `None` when absent or empty.
    pub fn table(&self, id: u32) -> Option<ResourceRequest> {
        let pairs: &[[u32; 2]] = match id {
            hint_id::SUSTAINED_PERF => &self.sustained_perf,
            hint_id::VR_MODE => &self.vr_mode,
            hint_id::VR_MODE_SUSTAINED_PERF => &self.vr_sustained_perf,
            hint_id::VIDEO_ENCODE => &self.video_encode,
            _ => self
                .extra
                .iter()
                .find(|(key, _)| crate::core::metadata::parse_id(key.trim()) == Some(id))
                .map(|(_, pairs)| pairs.as_slice())
                .unwrap_or(&[]),
        };
        (!pairs.is_empty()).then(|| ResourceRequest::from_pairs(pairs))
    }

    pub fn count(&self) -> usize {
        [
            &self.sustained_perf,
            &self.vr_mode,
            &self.vr_sustained_perf,
            &self.video_encode,
        ]
        .iter()
        .filter(|t| !t.is_empty())
        .count()
            + self.extra.values().filter(|t| !t.is_empty()).count()
    }
}

impl Settings {
    /// Load settings from TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read {}", path.display()))?;

        toml::from_str(&content).context("Failed to parse settings.toml")
    }

    /// Like [`Settings::load`], but a missing file yields defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(target: "qpowerhal::config", "{} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn node_map(&self) -> HashMap<u32, PathBuf> {
        self.nodes
            .iter()
            .map(|n| (n.id, n.path.clone()))
            .collect()
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_sweep_interval() -> u64 {
    1000
}

fn default_socket() -> String {
    crate::common::SOCKET_PATH.to_string()
}

fn default_soc_id_path() -> PathBuf {
    PathBuf::from(crate::core::soc::SOC_ID_PATH)
}

fn default_sysfs_root() -> PathBuf {
    PathBuf::from("/sys")
}

fn default_retries() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    5
}
