use thiserror::Error as ThisError;

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, ThisError)]
pub enum Error {
    /// An error occurred during an HTTP request.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A provided URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The server returned an unexpected or unsuccessful HTTP status code.
    #[error("Unexpected response status: {status} at {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that returned the error.
        url: String,
    },

    /// The cookie/crumb bootstrap for the quote API failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The data received from the API was in an unexpected format or was missing a required field.
    #[error("Data format unexpected or missing field: {0}")]
    Data(String),

    /// A table operation was given a row or column set that does not match
    /// the table's column specification. This is the one fatal error of the
    /// collection pipeline; per-ticker fetch problems never surface here.
    #[error("column specification mismatch: {0}")]
    ColumnMismatch(String),
}
