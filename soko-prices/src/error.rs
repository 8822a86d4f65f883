/// Error types for price records and the AMIS client
use thiserror::Error;

/// Main error type for price operations
#[derive(Error, Debug)]
pub enum PriceError {
    /// HTTP request failed
    #[cfg(feature = "api")]
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Bad response status {status} from {url}")]
    BadStatus { status: u16, url: String },

    /// Upstream answered with an empty body
    #[error("Empty response from {0}")]
    EmptyResponse(String),

    /// Every fetch attempt failed
    #[error("All {0} attempts to fetch prices failed")]
    RetriesExhausted(u32),

    /// Failed to parse or write CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// Failed to flush CSV output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Price column missing or not a non-negative number
    #[error("Invalid price: {0:?}")]
    InvalidPrice(String),

    /// County fixture row could not be read
    #[error("Invalid county row: {0}")]
    InvalidCounty(String),
}

/// Type alias for Results using PriceError
pub type Result<T> = std::result::Result<T, PriceError>;
