//! fetch a single file from an s3 compatible object store
use flexi_logger::{Duplicate, FileSpec, FlexiLoggerError, Logger, LoggerHandle};
use log::{log, Level};
use std::path::{Path, PathBuf};

pub mod basic;
pub mod config;
pub mod download;
pub mod error;

pub use basic::{FetchOptions, FetchRequest, ObjectStore, S3Store, DEFAULT_REGION};
pub use config::{EnvConfig, DEFAULT_DEST};
pub use error::{ConfigError, FetchError};

/// Result of one fetch: a report on success, otherwise one of the three failure kinds.
pub type FetchOutcome = Result<FetchReport, FetchError>;

/// Failures are logged below `warn`; the caller prints the one-line message.
pub const FAILURE_LOG_LEVEL: Level = Level::Info;

/// What a successful fetch wrote, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    pub key: String,
    pub destination: PathBuf,
    pub bytes: u64,
}

impl FetchReport {
    /// The confirmation line printed on success.
    pub fn message(&self) -> String {
        format!(
            "Successfully downloaded {} to {}",
            self.key,
            self.destination.display()
        )
    }
}

/// init logger
/// keep the returned handle alive for the lifetime of the program
/// # Arguments
/// * `level` - flexi_logger spec, overridden by `RUST_LOG`
/// * `log_path` - directory for log files, stderr only if not set
pub fn init_logger(level: &str, log_path: Option<&Path>) -> Result<LoggerHandle, FlexiLoggerError> {
    let logger = Logger::try_with_env_or_str(level)?;
    let logger = match log_path {
        Some(directory) => logger
            .log_to_file(FileSpec::default().directory(directory))
            .duplicate_to_stderr(Duplicate::Warn),
        None => logger.log_to_stderr(),
    };
    logger.format(flexi_logger::detailed_format).start()
}

/// Fetch one object and write it to the request's destination
/// # Arguments
/// * `request` - bucket, key, destination and connection parameters
/// * `options` - region, addressing style and request timeout
/// # Return
/// * `FetchOutcome` - report on success, classified error otherwise
pub async fn fetch_async(request: FetchRequest, options: FetchOptions) -> FetchOutcome {
    let store = S3Store::new(&request, &options).map_err(log_failure)?;
    let bytes = download::get_object(&store, &request.key, &request.dest)
        .await
        .map_err(log_failure)?;
    Ok(FetchReport {
        key: request.key,
        destination: request.dest,
        bytes,
    })
}

/// Blocking form of [`fetch_async`], driven by a current-thread runtime.
/// Must not be called from inside another tokio runtime.
pub fn fetch(request: FetchRequest, options: FetchOptions) -> FetchOutcome {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| log_failure(FetchError::Service(format!("runtime: {}", err))))?;
    runtime.block_on(fetch_async(request, options))
}

fn log_failure(err: FetchError) -> FetchError {
    log!(FAILURE_LOG_LEVEL, "fetch failed: {} ({})", err, err.detail());
    err
}
