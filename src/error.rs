// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for reveal
//!
//! Every failure is scoped to a single exchange. Errors carry enough context
//! (URL, rule index) to tell which exchange or rule went wrong.

use thiserror::Error;

/// Result type alias for reveal operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A capture rule's response selector does not compile
    #[error("Invalid response selector in rule #{index} '{pattern}': {source}")]
    Selector {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Capture rule list is malformed
    #[error("Rule error: {0}")]
    Rules(String),

    /// Out-of-band replay of a captured request failed
    #[error("Replay of {url} failed: {reason}")]
    Replay { url: String, reason: String },

    /// Handing a payload to the prover failed
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a replay error
    pub fn replay(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Replay {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a rules error
    pub fn rules<S: Into<String>>(msg: S) -> Self {
        Error::Rules(msg.into())
    }

    /// Create a dispatch error
    pub fn dispatch<S: Into<String>>(msg: S) -> Self {
        Error::Dispatch(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a replay failure
    pub fn is_replay(&self) -> bool {
        matches!(self, Error::Replay { .. })
    }

    /// Check if this came from the HTTP transport
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Replay { .. })
    }

    /// Get URL if available
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::Replay { url, .. } => Some(url),
            Error::Http(e) => e.url().map(|u| u.as_str()),
            _ => None,
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Turn any failure into a replay error for `url`
    fn with_url(self, url: &str) -> Result<T>;

    /// Add operation context to error
    fn context(self, msg: &str) -> Result<T>;
}

impl<T, E: Into<Error>> ErrorContext<T> for std::result::Result<T, E> {
    fn with_url(self, url: &str) -> Result<T> {
        self.map_err(|e| match e.into() {
            Error::Replay { reason, .. } => Error::replay(url, reason),
            other => Error::replay(url, other.to_string()),
        })
    }

    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            Error::Other(format!("{}: {}", msg, err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_error() {
        let err = Error::replay("https://example.com/api", "connection reset");

        assert!(err.is_replay());
        assert!(err.is_network());
        assert_eq!(err.url(), Some("https://example.com/api"));
        assert_eq!(
            err.to_string(),
            "Replay of https://example.com/api failed: connection reset"
        );
    }

    #[test]
    fn test_with_url_wraps_as_replay() {
        let res: std::result::Result<(), Error> = Err(Error::other("boom"));
        let err = res.with_url("https://example.com").unwrap_err();

        assert!(err.is_replay());
        assert_eq!(err.url(), Some("https://example.com"));
    }

    #[test]
    fn test_context() {
        let res: std::result::Result<(), &str> = Err("missing field");
        let err = res.context("loading rules").unwrap_err();

        assert_eq!(err.to_string(), "loading rules: missing field");
    }

    #[test]
    fn test_selector_error_names_rule() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = Error::Selector {
            index: 3,
            pattern: "(".to_string(),
            source,
        };

        assert!(err.to_string().starts_with("Invalid response selector in rule #3 '('"));
        assert!(!err.is_replay());
    }
}
