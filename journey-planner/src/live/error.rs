//! Live data error types.

/// Errors from a live departures source.
///
/// None of these abort a planning request: the enrichment step turns each
/// one into a lower-fidelity timing tier.
#[derive(Debug, thiserror::Error)]
pub enum LiveError {
    /// HTTP request failed (network error, connect timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Call didn't complete within its deadline
    #[error("live source timed out")]
    Timeout,

    /// Payload could not be parsed
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the API
    #[error("rate limited by live API")]
    RateLimited,

    /// Invalid credentials or signature
    #[error("unauthorized (invalid developer id or signature)")]
    Unauthorized,

    /// Source not configured or not available
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// Source deliberately offline or missing data
    #[error("live source unavailable: {0}")]
    Unavailable(String),
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_ref()
        .map(|b| format!(" (body: {b})"))
        .unwrap_or_default()
}

impl LiveError {
    /// True for deadline expiry, whether ours or the HTTP client's.
    pub fn is_timeout(&self) -> bool {
        match self {
            LiveError::Timeout => true,
            LiveError::Http(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// True if the source answered but the payload was unusable.
    pub fn is_malformed(&self) -> bool {
        match self {
            LiveError::Json { .. } => true,
            LiveError::Http(e) => e.is_decode(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for LiveError {
    fn from(err: serde_json::Error) -> Self {
        LiveError::Json {
            message: err.to_string(),
            body: None,
        }
    }
}
