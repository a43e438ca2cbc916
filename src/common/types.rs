use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_upper_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Snapshot of the dispatch state, as reported by `STATUS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalStatus {
    pub variant: String,
    pub profile: String,
    pub interactive: Option<bool>,
    pub display_hint_sent: bool,
    pub launch_active: bool,
    pub cpu_boost_active: bool,
    pub sustained_performance: bool,
    pub vr_mode: bool,
    pub video_encode_refs: u32,
    pub video_decode_refs: u32,
    /// Hint ids with a request held by id, as `0x` hex.
    pub named_actions: Vec<String>,
    pub perflock_active: usize,
}

/// `STATUS` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonStatus {
    pub version: String,
    pub log_level: LogLevel,
    pub config: String,
    pub hal: HalStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_parse_is_case_insensitive() {
        assert_eq!(LogLevel::parse("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("warn"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("trace"), None);
        assert_eq!(LogLevel::Error.to_upper_str(), "ERROR");
    }
}
