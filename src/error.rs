use thiserror::Error;

/// Errors that can occur while talking to the recipe API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport-level failure (connect, timeout, body read)
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] reqwest::Error),

    /// A request URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The API answered with a non-success status code
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body was not the JSON we expected
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required top-level array was missing or null
    #[error("Response is missing the '{0}' array")]
    MissingField(&'static str),

    /// A lookup returned no record
    #[error("No details found for meal: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Failed to build an async runtime or HTTP client
    #[error("Runtime error: {0}")]
    Runtime(String),
}
