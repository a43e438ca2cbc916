use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Bounded retry policy for sysfs access. Nodes can transiently fail while a
/// core is hotplugging, so every read and write gets a few short attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retry {
    pub attempts: u32,
    pub delay: Duration,
}

impl Retry {
    pub const fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    pub const fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    fn run<T>(&self, path: &Path, mut op: impl FnMut() -> std::io::Result<T>) -> std::io::Result<T> {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Ok(v) => return Ok(v),
                Err(e) if attempt >= attempts => return Err(e),
                Err(e) => {
                    debug!(
                        target: "qpowerhal::sysfs",
                        "{} failed (attempt {}/{}): {}",
                        path.display(),
                        attempt,
                        attempts,
                        e
                    );
                    attempt += 1;
                    if !self.delay.is_zero() {
                        std::thread::sleep(self.delay);
                    }
                }
            }
        }
    }
}

impl Default for Retry {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(5))
    }
}

/// Read a sysfs node and return its trimmed contents.
pub fn read_trimmed(path: &Path, retry: Retry) -> Result<String> {
    let raw = retry
        .run(path, || fs::read_to_string(path))
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(raw.trim().to_string())
}

pub fn write_value(path: &Path, value: &str, retry: Retry) -> Result<()> {
    retry
        .run(path, || fs::write(path, value))
        .with_context(|| format!("Failed to write {} to {}", value, path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_trims_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let node = dir.path().join("scaling_governor");
        fs::write(&node, "interactive\n").unwrap();

        assert_eq!(read_trimmed(&node, Retry::once()).unwrap(), "interactive");
    }

    #[test]
    fn missing_node_fails_after_all_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let node = dir.path().join("absent");

        let err = read_trimmed(&node, Retry::new(3, Duration::ZERO)).unwrap_err();
        assert!(format!("{:#}", err).contains("absent"));
    }

    #[test]
    fn write_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let node = dir.path().join("min_freq");
        fs::write(&node, "300000").unwrap();

        write_value(&node, "1000000", Retry::default()).unwrap();
        assert_eq!(read_trimmed(&node, Retry::once()).unwrap(), "1000000");
    }
}
