use crate::core::sysfs::{self, Retry};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Double-tap-to-wake switch backed by a single touch controller node.
#[derive(Debug, Clone)]
pub struct TapToWake {
    node: PathBuf,
    retry: Retry,
}

impl TapToWake {
    pub fn new(node: impl Into<PathBuf>, retry: Retry) -> Self {
        Self {
            node: node.into(),
            retry,
        }
    }

    pub fn node(&self) -> &Path {
        &self.node
    }

    pub fn set(&self, enabled: bool) -> Result<()> {
        let value = if enabled { "1" } else { "0" };
        sysfs::write_value(&self.node, value, self.retry)?;
        info!(target: "qpowerhal::feature", "Double tap to wake {}", if enabled { "on" } else { "off" });
        Ok(())
    }
}
