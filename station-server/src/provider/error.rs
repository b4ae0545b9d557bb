//! Provider error types.

/// Errors from an external provider invocation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// The provider did not finish within the configured bound. The
    /// invocation is abandoned; the data is simply missing this cycle.
    #[error("provider timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The provider process could not be spawned or exited with failure.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// The provider produced output that could not be parsed. The raw
    /// text is preserved for diagnostics.
    #[error("provider output parse error: {message} (raw: {raw})")]
    Parse { message: String, raw: String },
}

impl ProviderError {
    /// The preserved raw output, for parse failures.
    pub fn raw(&self) -> Option<&str> {
        match self {
            ProviderError::Parse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ProviderError::Timeout { timeout_secs: 20 };
        assert_eq!(err.to_string(), "provider timed out after 20s");

        let err = ProviderError::Unavailable {
            message: "no such file".into(),
        };
        assert_eq!(err.to_string(), "provider unavailable: no such file");

        let err = ProviderError::Parse {
            message: "expected value".into(),
            raw: "not-json".into(),
        };
        assert!(err.to_string().contains("parse error"));
        assert!(err.to_string().contains("not-json"));
        assert_eq!(err.raw(), Some("not-json"));
    }
}
