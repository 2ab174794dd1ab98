//! Error types for Pingdom API operations.

/// Result type alias for Pingdom operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the Pingdom API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The request could not be completed (connection, TLS, timeout).
    #[error("HTTP request failed: {message}")]
    Http {
        /// Error message.
        message: String,
        /// HTTP status code if available.
        status: Option<u16>,
    },

    /// The API answered with an error envelope.
    #[error("Pingdom API error ({status}): {message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Message from the error envelope.
        message: String,
    },

    /// No check exists with the given id.
    #[error("check {0} not found")]
    NotFound(u64),

    /// The response body could not be decoded.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),
}

impl Error {
    /// Create an HTTP error.
    pub fn http(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Http {
            message: message.into(),
            status,
        }
    }

    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether the check in question does not exist remotely.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Api { status: 404, .. })
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Http {
                message: format!("HTTP {code}"),
                status: Some(code),
            },
            other => Self::Http {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(Error::NotFound(1).is_not_found());
        assert!(Error::api(404, "Not Found").is_not_found());
        assert!(!Error::api(403, "Forbidden").is_not_found());
    }

    #[test]
    fn test_error_display() {
        let err = Error::api(403, "Forbidden");
        assert_eq!(err.to_string(), "Pingdom API error (403): Forbidden");

        let err = Error::NotFound(42);
        assert_eq!(err.to_string(), "check 42 not found");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<u64>("nope").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }
}
