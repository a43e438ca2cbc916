use anyhow::{Result, bail};
use serde::Serialize;
use std::fmt;

/// A coarse power hint. `None` payloads mean "stop" for the lifecycle
/// categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PowerHint {
    /// Touch interaction, optional duration in ms.
    Interaction(Option<i32>),
    Launch(Option<i32>),
    /// Optional duration in µs.
    CpuBoost(Option<i32>),
    VideoEncode(Option<String>),
    VideoDecode(Option<String>),
    SustainedPerformance(Option<i32>),
    VrMode(Option<i32>),
    SetProfile(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HintStatus {
    Handled,
    NotHandled,
}

impl HintStatus {
    pub fn from_bool(handled: bool) -> Self {
        if handled {
            Self::Handled
        } else {
            Self::NotHandled
        }
    }

    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled)
    }
}

impl fmt::Display for HintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handled => write!(f, "HANDLED"),
            Self::NotHandled => write!(f, "NOT_HANDLED"),
        }
    }
}

/// Optional boolean features toggled through `set_feature`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    DoubleTapToWake,
}

impl PowerHint {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Interaction(_) => "interaction",
            Self::Launch(_) => "launch",
            Self::CpuBoost(_) => "cpu_boost",
            Self::VideoEncode(_) => "video_encode",
            Self::VideoDecode(_) => "video_decode",
            Self::SustainedPerformance(_) => "sustained_perf",
            Self::VrMode(_) => "vr_mode",
            Self::SetProfile(_) => "set_profile",
        }
    }

    /// Build a hint from its wire name and optional argument.
    pub fn parse(name: &str, arg: Option<&str>) -> Result<Self> {
        let int = |arg: Option<&str>| -> Result<Option<i32>> {
            match arg {
                None => Ok(None),
                Some(s) => match s.trim().parse::<i32>() {
                    Ok(v) => Ok(Some(v)),
                    Err(_) => bail!("Invalid integer payload: {}", s),
                },
            }
        };
        let text = |arg: Option<&str>| arg.map(str::to_string);

        let hint = match name.to_ascii_lowercase().replace('-', "_").as_str() {
            "interaction" => Self::Interaction(int(arg)?),
            "launch" => Self::Launch(int(arg)?),
            "cpu_boost" => Self::CpuBoost(int(arg)?),
            "video_encode" => Self::VideoEncode(text(arg)),
            "video_decode" => Self::VideoDecode(text(arg)),
            "sustained_perf" | "sustained_performance" => Self::SustainedPerformance(int(arg)?),
            "vr_mode" | "vr" => Self::VrMode(int(arg)?),
            "set_profile" | "profile" => match int(arg)? {
                Some(id) => Self::SetProfile(id),
                None => bail!("set_profile needs a profile id"),
            },
            other => bail!("Unknown hint: {}", other),
        };
        Ok(hint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hint_names() {
        assert_eq!(
            PowerHint::parse("interaction", Some("120")).unwrap(),
            PowerHint::Interaction(Some(120))
        );
        assert_eq!(
            PowerHint::parse("LAUNCH", None).unwrap(),
            PowerHint::Launch(None)
        );
        assert_eq!(
            PowerHint::parse("video-encode", Some("state=1;hint_id=0x0A00")).unwrap(),
            PowerHint::VideoEncode(Some("state=1;hint_id=0x0A00".into()))
        );
        assert_eq!(
            PowerHint::parse("profile", Some("2")).unwrap(),
            PowerHint::SetProfile(2)
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(PowerHint::parse("warp_drive", None).is_err());
        assert!(PowerHint::parse("cpu_boost", Some("fast")).is_err());
        assert!(PowerHint::parse("set_profile", None).is_err());
    }

    #[test]
    fn status_display() {
        assert_eq!(HintStatus::from_bool(true).to_string(), "HANDLED");
        assert_eq!(HintStatus::NotHandled.to_string(), "NOT_HANDLED");
    }
}
