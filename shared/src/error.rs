use thiserror::Error;

/// Failures of a backend call. The `Display` text is what the toast shows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (network down, CORS, DNS).
    #[error("{0}")]
    Transport(String),
    /// Non-2xx response without a usable error message.
    #[error("Request failed with status {0}")]
    Status(u16),
    /// The backend answered `success: false`.
    #[error("{0}")]
    Application(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;
