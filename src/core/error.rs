use thiserror::Error;

/// Failures on the hint path. None of these escape to the caller of the
/// hint entry points: each is logged and folded into a [`HintStatus`].
///
/// [`HintStatus`]: crate::core::hint::HintStatus
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HintError {
    #[error("no scaling governor readable on cpus {0:?}")]
    GovernorUnavailable(Vec<usize>),

    #[error("malformed metadata {input:?}: {reason}")]
    MetadataParse { input: String, reason: String },

    #[error("perf-lock rejected {category} request")]
    VendorApplyFailure { category: &'static str },

    #[error("unsupported power profile {0}")]
    UnknownProfile(i32),

    #[error("no resource table configured for hint 0x{0:X}")]
    MissingTable(u32),
}

impl HintError {
    pub fn metadata(input: &str, reason: impl Into<String>) -> Self {
        Self::MetadataParse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
