use thiserror::Error;

/// Errors that can occur while crawling and extracting recipes
#[derive(Error, Debug)]
pub enum SearchError {
    /// Failed to fetch a page
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Page was fetched but the server answered with a non-success status
    #[error("Unexpected status {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Document structure did not match what an extractor expects
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// A CSS selector could not be compiled
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// A nutrition grammar could not be compiled
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A crawl task panicked or was cancelled
    #[error("Crawl task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, SearchError>;
