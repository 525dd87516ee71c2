use std::fmt;
use thiserror::Error;

use crate::cache::CacheError;

/// Required statement fragments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    Statement,
    Constraints,
    InputFormat,
    OutputFormat,
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Fragment::Statement => "problem statement",
            Fragment::Constraints => "constraints",
            Fragment::InputFormat => "input",
            Fragment::OutputFormat => "output",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to parse {0}")]
    MissingFragment(Fragment),

    #[error("Task statement container not found")]
    StatementNotFound,

    #[error("Task table not found")]
    TaskTableNotFound,

    #[error("Failed to parse task row: {0}")]
    MalformedTaskRow(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("Request to {url} failed with HTTP {status}: {excerpt}")]
    Status {
        url: String,
        status: u16,
        excerpt: String,
    },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: ParseError,
    },

    #[error("Invalid client configuration: {0}")]
    Client(String),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

pub type Result<T> = std::result::Result<T, FetchError>;

/// First chunk of a response body for error messages
pub(crate) fn excerpt(body: &str) -> String {
    const MAX_CHARS: usize = 200;
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_CHARS) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fragment_names_the_fragment() {
        let err = ParseError::MissingFragment(Fragment::Constraints);
        assert_eq!(err.to_string(), "Failed to parse constraints");
    }

    #[test]
    fn test_excerpt_truncates_long_bodies() {
        let body = "x".repeat(500);
        let short = excerpt(&body);
        assert_eq!(short.len(), 203);
        assert!(short.ends_with("..."));
        assert_eq!(excerpt("  not found \n"), "not found");
    }
}
