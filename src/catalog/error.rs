//! Typed outcome of a failed catalog request.

/// Why an upstream catalog request did not produce a page.
///
/// The client never panics or bubbles transport errors past this type; the
/// orchestrator and the proxy routes decide what the user sees.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// No usable API key in the configured location. Checked before every
    /// request, so no network call is made.
    #[error("TMDB API key is not set")]
    MissingCredential,

    /// TMDB answered with a non-success status.
    #[error("TMDB rejected the request ({status}): {body}")]
    UpstreamRejected { status: u16, body: String },

    /// Transport failure or timeout.
    #[error("TMDB is unreachable: {0}")]
    Unreachable(String),

    /// A blank search reached the client.
    #[error("Search query cannot be empty")]
    InvalidQuery,

    /// TMDB answered 2xx but the body was not a catalog page.
    #[error("TMDB returned an unreadable response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    /// Message suitable for showing to an end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::MissingCredential => {
                "TMDB API key is not set. Create .env.local with TMDB_API_KEY=your_actual_api_key"
            }
            FetchError::InvalidQuery => "A search query is required",
            FetchError::UpstreamRejected { .. }
            | FetchError::Unreachable(_)
            | FetchError::MalformedResponse(_) => "Failed to fetch movies",
        }
    }

    /// Whether repeating the same request later may succeed without any
    /// configuration change.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FetchError::UpstreamRejected { .. }
                | FetchError::Unreachable(_)
                | FetchError::MalformedResponse(_)
        )
    }
}
