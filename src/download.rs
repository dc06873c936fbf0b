use crate::basic::ObjectStore;
use crate::error::FetchError;
use log::{debug, info};
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Streams `key` into a staging file beside `dest`, then renames it over `dest`.
/// An existing destination is left untouched unless the transfer completes.
pub async fn get_object<S>(store: &S, key: &str, dest: &Path) -> Result<u64, FetchError>
where
    S: ObjectStore + ?Sized,
{
    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staging = tempfile::Builder::new()
        .prefix(".fetch-env")
        .tempfile_in(parent)
        .map_err(FetchError::LocalPath)?;
    debug!("staging download in {}", staging.path().display());
    let handle = staging.as_file().try_clone().map_err(FetchError::LocalPath)?;
    let mut async_output_file = tokio::fs::File::from_std(handle);
    let status_code = store.download_to(key, &mut async_output_file).await?;
    async_output_file.flush().await.map_err(FetchError::LocalPath)?;
    async_output_file.sync_all().await.map_err(FetchError::LocalPath)?;
    let byte_count = async_output_file
        .metadata()
        .await
        .map_err(FetchError::LocalPath)?
        .len();
    drop(async_output_file);
    info!("get_object status code: {}, {} bytes", status_code, byte_count);
    staging
        .persist(dest)
        .map_err(|err| FetchError::LocalPath(err.error))?;
    Ok(byte_count)
}
