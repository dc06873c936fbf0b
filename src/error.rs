use thiserror::Error;

/// Every way a fetch can fail. Each variant ends the process with exit code 1.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The destination (or its staging file) could not be created or written.
    #[error("The specified file was not found")]
    LocalPath(#[source] std::io::Error),
    #[error("Credentials not available")]
    Credentials(String),
    /// Anything the storage service or its client rejected.
    #[error("Error: {0}")]
    Service(String),
}

impl FetchError {
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Underlying detail, for logging. `Display` stays the one-line user message.
    pub fn detail(&self) -> String {
        match self {
            FetchError::LocalPath(err) => err.to_string(),
            FetchError::Credentials(detail) | FetchError::Service(detail) => detail.clone(),
        }
    }
}

impl From<s3::error::S3Error> for FetchError {
    fn from(err: s3::error::S3Error) -> Self {
        FetchError::Service(err.to_string())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
}
