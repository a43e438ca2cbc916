use crate::core::error::HintError;
use crate::core::sysfs::{self, Retry};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Cores probed by the display and SDM660 video paths, in fallback order.
pub const ALL_PROBE_CORES: [usize; 4] = [0, 1, 2, 3];
pub const BOOT_CORE: [usize; 1] = [0];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Governor {
    Interactive,
    Ondemand,
    Schedutil,
    Performance,
    Powersave,
    Other(String),
}

impl Governor {
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "interactive" => Self::Interactive,
            "ondemand" => Self::Ondemand,
            "schedutil" => Self::Schedutil,
            "performance" => Self::Performance,
            "powersave" => Self::Powersave,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Interactive)
    }
}

impl fmt::Display for Governor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interactive => write!(f, "interactive"),
            Self::Ondemand => write!(f, "ondemand"),
            Self::Schedutil => write!(f, "schedutil"),
            Self::Performance => write!(f, "performance"),
            Self::Powersave => write!(f, "powersave"),
            Self::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Reads `scaling_governor` under a sysfs root, falling back across cores.
#[derive(Debug, Clone)]
pub struct GovernorProbe {
    root: PathBuf,
    retry: Retry,
}

impl GovernorProbe {
    pub fn new(root: impl Into<PathBuf>, retry: Retry) -> Self {
        Self {
            root: root.into(),
            retry,
        }
    }

    pub fn governor_path(&self, cpu: usize) -> PathBuf {
        self.root.join(format!(
            "devices/system/cpu/cpu{}/cpufreq/scaling_governor",
            cpu
        ))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn read_core(&self, cpu: usize) -> Option<Governor> {
        let path = self.governor_path(cpu);
        match sysfs::read_trimmed(&path, self.retry) {
            Ok(name) if !name.is_empty() => Some(Governor::parse(&name)),
            Ok(_) => {
                debug!(target: "qpowerhal::governor", "cpu{} governor node is empty", cpu);
                None
            }
            Err(e) => {
                debug!(target: "qpowerhal::governor", "cpu{}: {:#}", cpu, e);
                None
            }
        }
    }

    /// First governor readable among `cores`, tried in order.
    pub fn probe(&self, cores: &[usize]) -> Result<Governor, HintError> {
        for &cpu in cores {
            if let Some(governor) = self.read_core(cpu) {
                return Ok(governor);
            }
        }
        error!(target: "qpowerhal::governor", "Can't obtain scaling governor");
        Err(HintError::GovernorUnavailable(cores.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_governor(root: &Path, cpu: usize, name: &str) {
        let dir = root.join(format!("devices/system/cpu/cpu{}/cpufreq", cpu));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("scaling_governor"), format!("{}\n", name)).unwrap();
    }

    #[test]
    fn parses_known_and_unknown_names() {
        assert_eq!(Governor::parse("interactive\n"), Governor::Interactive);
        assert_eq!(Governor::parse("ondemand"), Governor::Ondemand);
        assert_eq!(
            Governor::parse("walt"),
            Governor::Other("walt".to_string())
        );
        assert!(!Governor::parse("interactive2").is_interactive());
    }

    #[test]
    fn falls_back_to_next_core() {
        let dir = tempfile::tempdir().unwrap();
        write_governor(dir.path(), 2, "interactive");

        let probe = GovernorProbe::new(dir.path(), Retry::once());
        assert_eq!(probe.probe(&ALL_PROBE_CORES), Ok(Governor::Interactive));
    }

    #[test]
    fn first_readable_core_wins() {
        let dir = tempfile::tempdir().unwrap();
        write_governor(dir.path(), 1, "ondemand");
        write_governor(dir.path(), 3, "interactive");

        let probe = GovernorProbe::new(dir.path(), Retry::once());
        assert_eq!(probe.probe(&ALL_PROBE_CORES), Ok(Governor::Ondemand));
    }

    #[test]
    fn no_readable_core_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        write_governor(dir.path(), 0, "");

        let probe = GovernorProbe::new(dir.path(), Retry::once());
        assert_eq!(
            probe.probe(&ALL_PROBE_CORES),
            Err(HintError::GovernorUnavailable(vec![0, 1, 2, 3]))
        );
    }
}
