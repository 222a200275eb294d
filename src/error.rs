use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Library error type for gallery operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The CRM answered with a non-success status.
    #[error("CRM API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Transport-level failure talking to the CRM.
    #[error("CRM request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The CRM response body was not the expected JSON shape.
    #[error("malformed CRM response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A configured or derived URL could not be parsed.
    #[error("invalid CRM url: {0}")]
    Url(#[from] url::ParseError),

    /// The CRM did not answer within the configured timeout.
    #[error("CRM request timed out after {0:?}")]
    Timeout(std::time::Duration),
}
