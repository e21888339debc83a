use thiserror::Error;

/// Error taxonomy for the matching core.
///
/// Public scoring entry points never let these escape: `MissingInput` and
/// collaborator failures are converted into neutral results at the call
/// site. `UnsupportedPlatform` is surfaced to the immediate caller; batch
/// fan-out skips the offending platform and continues.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("{collaborator} unavailable: {reason}")]
    CollaboratorUnavailable {
        collaborator: &'static str,
        reason: String,
    },

    #[error("malformed record: {0}")]
    MalformedRecord(String),
}

impl MatchError {
    pub fn collaborator(collaborator: &'static str, reason: impl Into<String>) -> Self {
        Self::CollaboratorUnavailable {
            collaborator,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failing_part() {
        let err = MatchError::UnsupportedPlatform("friendster".into());
        assert_eq!(err.to_string(), "unsupported platform: friendster");

        let err = MatchError::collaborator("embedder", "connection refused");
        assert_eq!(err.to_string(), "embedder unavailable: connection refused");
    }
}
