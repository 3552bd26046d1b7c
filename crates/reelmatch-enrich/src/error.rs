use thiserror::Error;

/// Errors raised while talking to a metadata provider.
///
/// These never reach callers of
/// [`EnrichmentClient::lookup`](crate::EnrichmentClient::lookup); the client
/// absorbs them into an empty record.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// Transport failure, timeout, or undecodable body.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("malformed provider response: {0}")]
    Json(#[from] serde_json::Error),

    /// The provider answered with a non-success status.
    #[error("provider returned status {status} for {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL, without credentials.
        url: String,
    },

    /// No API key is configured for the provider.
    #[error("no API key configured for metadata provider")]
    MissingApiKey,
}

impl EnrichError {
    /// Returns `true` if the failure was a request timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }
}

/// Result type alias for provider operations.
pub type Result<T> = std::result::Result<T, EnrichError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = EnrichError::Status {
            status: 401,
            url: "https://api.themoviedb.org/3/search/movie".into(),
        };
        assert!(err.to_string().contains("401"));
        assert!(!err.is_timeout());
        assert_eq!(
            EnrichError::MissingApiKey.to_string(),
            "no API key configured for metadata provider"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EnrichError>();
    }
}
