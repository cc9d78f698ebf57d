use thiserror::Error;

use marketpulse_core::FetchError;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] marketpulse_core::ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("cannot reach backend at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("strict mode failed: data served from a fallback snapshot")]
    StrictModeViolation,

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Fetch(FetchError::Validation(_)) => 2,
            Self::Fetch(_) | Self::Unreachable { .. } => 3,
            Self::Serialization(_) => 4,
            Self::StrictModeViolation => 5,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketpulse_core::ValidationError;

    #[test]
    fn invalid_requests_exit_with_usage_code() {
        assert_eq!(
            CliError::from(ValidationError::IncompleteRange).exit_code(),
            2
        );
        assert_eq!(
            CliError::from(FetchError::from(ValidationError::IncompleteRange)).exit_code(),
            2
        );
    }

    #[test]
    fn exhausted_fallback_exits_with_fetch_code() {
        let error = CliError::from(FetchError::ExhaustedFallback {
            attempts: Vec::new(),
        });

        assert_eq!(error.exit_code(), 3);
        assert_eq!(error.to_string(), "cannot reach server, try again later");
    }
}
