use crate::core::error::HintError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Unknown,
    Stopped,
    Started,
}

impl StreamState {
    fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            -1 => Some(Self::Unknown),
            0 => Some(Self::Stopped),
            1 => Some(Self::Started),
            _ => None,
        }
    }
}

/// Parsed video encode/decode payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoMetadata {
    pub state: StreamState,
    pub hint_id: u32,
}

/// Parse `state=<-1|0|1>;hint_id=<id>`. Fields are separated by `;`, keys
/// are matched case-sensitively and unknown keys are ignored. `hint_id`
/// accepts decimal or `0x` hex. Missing fields keep their defaults.
pub fn parse(input: &str, default_hint_id: u32) -> Result<VideoMetadata, HintError> {
    let mut meta = VideoMetadata {
        state: StreamState::Unknown,
        hint_id: default_hint_id,
    };

    if input.trim().is_empty() {
        return Err(HintError::metadata(input, "empty payload"));
    }

    for field in input.split(';').map(str::trim).filter(|f| !f.is_empty()) {
        let Some((key, value)) = field.split_once('=') else {
            return Err(HintError::metadata(
                input,
                format!("field {:?} has no value", field),
            ));
        };
        let value = value.trim();

        match key.trim() {
            "state" => {
                meta.state = value
                    .parse::<i32>()
                    .ok()
                    .and_then(StreamState::from_raw)
                    .ok_or_else(|| HintError::metadata(input, format!("bad state {:?}", value)))?;
            }
            "hint_id" => {
                meta.hint_id = parse_id(value)
                    .ok_or_else(|| HintError::metadata(input, format!("bad hint_id {:?}", value)))?;
            }
            _ => {}
        }
    }

    Ok(meta)
}

pub(crate) fn parse_id(value: &str) -> Option<u32> {
    match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}
