use thiserror::Error;

/// Coarse classification of an [`ApiError`], for callers that branch on the kind
/// rather than the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    NotFound,
    BadSelection,
    Parse,
    InvalidInput,
}

/// Errors returned by [`crate::Client`].
///
/// None of these are retried by the library; they are handed to the caller as-is.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network failure, timeout, or a non-2xx status that is not classified below.
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// The service does not know the dataset (or dimension/option) that was asked for.
    #[error("not found: {url}: {message}")]
    NotFound { url: String, message: String },

    /// The service rejected the dimension selection (missing or unknown dimensions, bad options).
    #[error("selection rejected by {url}: {message}")]
    BadSelection { url: String, message: String },

    /// The body was not JSON or did not have the expected shape.
    #[error("unexpected response from {url}: {reason}")]
    Parse { url: String, reason: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport { .. } => ErrorKind::Transport,
            ApiError::NotFound { .. } => ErrorKind::NotFound,
            ApiError::BadSelection { .. } => ErrorKind::BadSelection,
            ApiError::Parse { .. } => ErrorKind::Parse,
            ApiError::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }

    pub(crate) fn transport(url: &str, err: impl std::fmt::Display) -> Self {
        ApiError::Transport {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn parse(url: &str, err: impl std::fmt::Display) -> Self {
        ApiError::Parse {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(ApiError::transport("u", "boom").kind(), ErrorKind::Transport);
        assert_eq!(ApiError::parse("u", "bad").kind(), ErrorKind::Parse);
        assert_eq!(
            ApiError::InvalidInput("x".into()).kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn message_carries_url_and_reason() {
        let e = ApiError::BadSelection {
            url: "https://x/observations".into(),
            message: "missing query parameters for the following dimensions: [time]".into(),
        };
        let s = e.to_string();
        assert!(s.contains("https://x/observations"));
        assert!(s.contains("[time]"));
    }
}
