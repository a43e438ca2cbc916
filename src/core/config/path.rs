use std::path::PathBuf;

pub use crate::common::CONFIG_DIR;

pub fn settings_path() -> PathBuf {
    PathBuf::from(CONFIG_DIR).join("settings.toml")
}

/// `--config` wins over the default location.
pub fn resolve(override_path: Option<PathBuf>) -> PathBuf {
    override_path.unwrap_or_else(settings_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins() {
        assert_eq!(resolve(None), PathBuf::from(crate::common::SETTINGS_FILE));
        assert_eq!(
            resolve(Some(PathBuf::from("/tmp/s.toml"))),
            PathBuf::from("/tmp/s.toml")
        );
    }
}
