use thiserror::Error;

/// Error string recorded for accounts the API refuses to show (suspended,
/// locked or protected).
pub const ACCOUNT_SUSPENDED: &str = "401 : account_suspended_or_locked";

/// Error string recorded for accounts that no longer exist.
pub const ACCOUNT_NOT_FOUND: &str = "404 : account_not_found";

#[derive(Debug, Error)]
pub enum TwitterError {
    #[error("Rate limited (429)")]
    RateLimited,

    #[error("Failed to send request: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Authentication failed: {0}")]
    Auth(String),
}

/// How the retry layer should treat a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Back off and retry with the same credential
    RateLimited,
    /// Network hiccup or server-side failure, also worth a retry
    Transient,
    /// Give up on this unit of work
    Terminal,
}

impl TwitterError {
    /// Build an error from a non-success HTTP response.
    pub fn from_status(status: u16, message: String) -> Self {
        if status == 429 {
            TwitterError::RateLimited
        } else {
            TwitterError::Api { status, message }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TwitterError::RateLimited => ErrorKind::RateLimited,
            TwitterError::Network(_) => ErrorKind::Transient,
            TwitterError::Api { status, .. } if *status >= 500 => ErrorKind::Transient,
            TwitterError::Api { .. } | TwitterError::Parse(_) | TwitterError::Auth(_) => {
                ErrorKind::Terminal
            }
        }
    }

    /// The account-level error code to record in a timeline file, if this
    /// error means the account itself is unavailable.
    pub fn account_error_code(&self) -> Option<&'static str> {
        match self {
            TwitterError::Api { status: 401 | 403, .. } => Some(ACCOUNT_SUSPENDED),
            TwitterError::Api { status: 404, .. } => Some(ACCOUNT_NOT_FOUND),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TwitterError {
    fn from(err: reqwest::Error) -> Self {
        TwitterError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for TwitterError {
    fn from(err: serde_json::Error) -> Self {
        TwitterError::Parse(err.to_string())
    }
}
