use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChipVariant {
    Sdm660,
    Sdm630,
    Msm8998,
    Msm8916,
    Msm8939,
}

impl std::fmt::Display for ChipVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChipVariant::Sdm660 => write!(f, "sdm660"),
            ChipVariant::Sdm630 => write!(f, "sdm630"),
            ChipVariant::Msm8998 => write!(f, "msm8998"),
            ChipVariant::Msm8916 => write!(f, "msm8916"),
            ChipVariant::Msm8939 => write!(f, "msm8939"),
        }
    }
}

impl FromStr for ChipVariant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sdm660" => Ok(Self::Sdm660),
            "sdm630" => Ok(Self::Sdm630),
            "msm8998" => Ok(Self::Msm8998),
            "msm8916" => Ok(Self::Msm8916),
            "msm8939" => Ok(Self::Msm8939),
            other => anyhow::bail!("Unknown chip variant: {}", other),
        }
    }
}

impl ChipVariant {
    /// Variants identified by soc id alone.
    pub fn from_soc_id(soc_id: u32) -> Option<Self> {
        match soc_id {
            318 | 327 => Some(Self::Sdm630),
            206 | 247..=250 => Some(Self::Msm8916),
            _ => None,
        }
    }

    /// Fallback by `ro.board.platform`, once the soc id matched nothing.
    pub fn from_platform(platform: &str) -> Option<Self> {
        let p = platform.trim().to_lowercase();
        let platform_patterns = [
            ("sdm660", Self::Sdm660),
            ("sdm630", Self::Sdm630),
            ("msm8998", Self::Msm8998),
            ("msm8939", Self::Msm8939),
            // 8916 proper was already matched by soc id.
            ("msm8916", Self::Msm8939),
        ];

        platform_patterns
            .into_iter()
            .find(|(prefix, _)| p.starts_with(prefix))
            .map(|(_, variant)| variant)
    }
}

pub const SOC_ID_PATH: &str = "/sys/devices/soc0/soc_id";

static VARIANT_CACHE: OnceLock<Option<ChipVariant>> = OnceLock::new();

/// Detect the running chip once per process.
pub fn detect(soc_id_path: &Path) -> Option<ChipVariant> {
    *VARIANT_CACHE.get_or_init(|| detect_internal(soc_id_path))
}

fn detect_internal(soc_id_path: &Path) -> Option<ChipVariant> {
    let soc_id = read_soc_id(soc_id_path);
    debug!(target: "qpowerhal::soc", "soc_id={:?}", soc_id);

    if let Some(variant) = soc_id.and_then(ChipVariant::from_soc_id) {
        return Some(variant);
    }

    match get_prop("ro.board.platform") {
        Ok(platform) => ChipVariant::from_platform(&platform),
        Err(e) => {
            warn!(target: "qpowerhal::soc", "Unable to read ro.board.platform: {:#}", e);
            None
        }
    }
}

pub fn read_soc_id(path: &Path) -> Option<u32> {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
}

fn get_prop(key: &str) -> Result<String> {
    let output = Command::new("getprop").arg(key).output()?;
    let val = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if val.is_empty() {
        anyhow::bail!("Property empty");
    }
    Ok(val)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soc_ids_map_to_variants() {
        assert_eq!(ChipVariant::from_soc_id(318), Some(ChipVariant::Sdm630));
        assert_eq!(ChipVariant::from_soc_id(327), Some(ChipVariant::Sdm630));
        assert_eq!(ChipVariant::from_soc_id(206), Some(ChipVariant::Msm8916));
        assert_eq!(ChipVariant::from_soc_id(249), Some(ChipVariant::Msm8916));
        assert_eq!(ChipVariant::from_soc_id(317), None);
    }

    #[test]
    fn platform_fallback() {
        assert_eq!(ChipVariant::from_platform("sdm660"), Some(ChipVariant::Sdm660));
        assert_eq!(ChipVariant::from_platform("MSM8998"), Some(ChipVariant::Msm8998));
        // An msm8916 platform whose soc id is not an 8916 part is the 8939 family.
        assert_eq!(ChipVariant::from_platform("msm8916"), Some(ChipVariant::Msm8939));
        assert_eq!(ChipVariant::from_platform("kona"), None);
    }

    #[test]
    fn reads_soc_id_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("soc_id");
        std::fs::write(&path, "318\n").unwrap();
        assert_eq!(read_soc_id(&path), Some(318));
        assert_eq!(read_soc_id(&dir.path().join("missing")), None);
    }

    #[test]
    fn parses_override_names() {
        assert_eq!("SDM630".parse::<ChipVariant>().unwrap(), ChipVariant::Sdm630);
        assert!("sm8150".parse::<ChipVariant>().is_err());
    }
}
