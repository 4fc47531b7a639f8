/// Error type shared by the API client, the file reader and the controller.
///
/// Errors travel inside iced messages, so the type is `Clone` and keeps
/// only rendered strings instead of the underlying library errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The configured API base URL could not be parsed or used as a base.
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// The HTTP client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    Client(String),

    /// Transport or decoding failure (server unreachable, bad JSON, ...).
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("server responded with status {0}")]
    Status(u16),

    /// Reading the selected file failed.
    #[error("could not read {path}: {reason}")]
    Read { path: String, reason: String },

    /// Submit was triggered without a selected file.
    #[error("no image selected")]
    MissingSelection,

    /// Submit was triggered while a previous upload is still outstanding.
    #[error("an upload is already in progress")]
    UploadInProgress,
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Error::Status(status.as_u16()),
            None => Error::Request(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
