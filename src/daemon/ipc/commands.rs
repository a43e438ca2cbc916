use crate::common::types::LogLevel;
use crate::core::profile::PowerProfile;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Status,
    Reload,
    Ping,
    Quit,
    SetLog(LogLevel),
    Hint(String, Option<String>),
    Interactive(bool),
    Profile(PowerProfile),
    DoubleTap(bool),
}

fn parse_switch(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "on" | "true" => Some(true),
        "0" | "off" | "false" => Some(false),
        _ => None,
    }
}

impl FromStr for Command {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        let Some((head, rest)) = parts.split_first() else {
            return Err("empty");
        };

        match (head.to_ascii_uppercase().as_str(), rest) {
            ("HELP" | "?", []) => Ok(Command::Help),
            ("STATUS", []) => Ok(Command::Status),
            ("RELOAD", []) => Ok(Command::Reload),
            ("PING", []) => Ok(Command::Ping),
            ("QUIT", []) => Ok(Command::Quit),

            ("SETLOG" | "SET_LOG", [level]) => LogLevel::parse(level)
                .map(Command::SetLog)
                .ok_or("usage: SETLOG <DEBUG|INFO|WARN|ERROR>"),

            ("HINT", [name]) => Ok(Command::Hint(name.to_string(), None)),
            // Metadata payloads may contain spaces around `;`.
            ("HINT", [name, payload @ ..]) => {
                Ok(Command::Hint(name.to_string(), Some(payload.join(" "))))
            }

            ("INTERACTIVE", [state]) => parse_switch(state)
                .map(Command::Interactive)
                .ok_or("usage: INTERACTIVE <0|1>"),

            ("PROFILE" | "SET_PROFILE", [profile]) => profile
                .parse::<PowerProfile>()
                .map(Command::Profile)
                .map_err(|_| "usage: PROFILE <name|0-4>"),

            ("FEATURE", [feature, state]) if feature.eq_ignore_ascii_case("DOUBLE_TAP") => {
                parse_switch(state)
                    .map(Command::DoubleTap)
                    .ok_or("usage: FEATURE DOUBLE_TAP <0|1>")
            }

            _ => Err("unknown command (try HELP)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hint_with_spaced_payload() {
        assert_eq!(
            "HINT video_encode state=1; hint_id=0x0A00".parse(),
            Ok(Command::Hint(
                "video_encode".into(),
                Some("state=1; hint_id=0x0A00".into())
            ))
        );
        assert_eq!(
            "hint launch".parse(),
            Ok(Command::Hint("launch".into(), None))
        );
    }

    #[test]
    fn parses_switches_and_profiles() {
        assert_eq!("INTERACTIVE 0".parse(), Ok(Command::Interactive(false)));
        assert_eq!(
            "PROFILE high_performance".parse(),
            Ok(Command::Profile(PowerProfile::HighPerformance))
        );
        assert_eq!("PROFILE 3".parse(), Ok(Command::Profile(PowerProfile::BiasPower)));
        assert_eq!("FEATURE double_tap on".parse(), Ok(Command::DoubleTap(true)));
        assert_eq!("SETLOG debug".parse(), Ok(Command::SetLog(LogLevel::Debug)));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!("".parse::<Command>().is_err());
        assert!("INTERACTIVE maybe".parse::<Command>().is_err());
        assert!("PROFILE turbo".parse::<Command>().is_err());
        assert!("FEATURE GLOVE 1".parse::<Command>().is_err());
        assert!("STATUS now".parse::<Command>().is_err());
    }
}
