use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum CrawlError {
    #[error("Invalid URL pattern `{pattern}`: {message}")]
    #[diagnostic(
        code(webcrawler::invalid_pattern),
        help("Patterns are regular expressions matched against the whole URL or word.")
    )]
    InvalidPattern { pattern: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    #[diagnostic(code(webcrawler::http_client))]
    HttpClient(#[source] reqwest::Error),
}

impl CrawlError {
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read configuration from {path}: {source}")]
    #[diagnostic(code(webcrawler::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(webcrawler::config::json),
        help("The configuration must be a JSON object with camelCase keys such as `startPages`.")
    )]
    Json(#[from] serde_json::Error),
}

/// Failure of a single page fetch. The crawl logs it and moves on.
#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("Invalid URL {url}: {source}")]
    #[diagnostic(code(webcrawler::parse::url))]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to fetch {url}: {source}")]
    #[diagnostic(code(webcrawler::parse::http))]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} failed with status: {status}")]
    #[diagnostic(code(webcrawler::parse::status))]
    Status { url: String, status: u16 },

    #[error("Failed to parse {url}: {message}")]
    #[diagnostic(code(webcrawler::parse::other))]
    Other { url: String, message: String },
}

impl ParseError {
    pub fn other(url: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Other {
            url: url.into(),
            message: message.to_string(),
        }
    }
}
