use crate::error::FetchError;
use async_trait::async_trait;
use log::debug;
use s3::{bucket::Bucket, creds::Credentials, region::Region};
use std::{fmt, path::PathBuf, time::Duration};

pub const DEFAULT_REGION: &str = "us-east-1";

/// Everything one fetch needs; all fields must be non-empty.
pub struct FetchRequest {
    pub bucket: String,
    pub key: String,
    pub dest: PathBuf,
    pub access_key: String,
    pub secret_key: String,
    pub endpoint: String,
}

impl fmt::Debug for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchRequest")
            .field("bucket", &self.bucket)
            .field("key", &self.key)
            .field("dest", &self.dest)
            .field("endpoint", &self.endpoint)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub region: String,
    pub path_style: bool,
    /// Deadline for the whole download request. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            path_style: false,
            timeout: None,
        }
    }
}

/// The single capability the fetcher needs from a storage service:
/// stream one object of a bound bucket into an open file.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Returns the HTTP status of a successful transfer.
    async fn download_to(&self, key: &str, file: &mut tokio::fs::File) -> Result<u16, FetchError>;
}

/// [`ObjectStore`] backed by rust-s3 against a custom endpoint.
pub struct S3Store {
    bucket: String,
    region: Region,
    credentials: Credentials,
    path_style: bool,
    timeout: Option<Duration>,
}

impl S3Store {
    pub fn new(request: &FetchRequest, options: &FetchOptions) -> Result<Self, FetchError> {
        let credentials = create_credentials(&request.access_key, &request.secret_key)?;
        let region = Region::Custom {
            region: options.region.clone(),
            endpoint: request.endpoint.clone(),
        };
        debug!(
            "s3 store for bucket {} at {} (region {}, path style {})",
            request.bucket, request.endpoint, options.region, options.path_style
        );
        Ok(Self {
            bucket: request.bucket.clone(),
            region,
            credentials,
            path_style: options.path_style,
            timeout: options.timeout,
        })
    }
}

fn create_credentials(access_key: &str, secret_key: &str) -> Result<Credentials, FetchError> {
    if access_key.is_empty() {
        return Err(FetchError::Credentials("access key is empty".to_string()));
    }
    if secret_key.is_empty() {
        return Err(FetchError::Credentials("secret key is empty".to_string()));
    }
    Credentials::new(Some(access_key), Some(secret_key), None, None, None)
        .map_err(|err| FetchError::Credentials(err.to_string()))
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn download_to(&self, key: &str, file: &mut tokio::fs::File) -> Result<u16, FetchError> {
        let bucket = Bucket::new(&self.bucket, self.region.clone(), self.credentials.clone())?;
        // rust-s3 defaults to virtual-host addressing.
        let bucket = if self.path_style {
            bucket.with_path_style()
        } else {
            bucket
        };
        let request = bucket.get_object_to_writer(key, file);
        let status_code = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, request).await.map_err(|_| {
                FetchError::Service(format!("request timed out after {}s", limit.as_secs()))
            })??,
            None => request.await?,
        };
        if !(200..300).contains(&status_code) {
            return Err(FetchError::Service(format!(
                "unexpected status code {}",
                status_code
            )));
        }
        Ok(status_code)
    }
}
