//! Writing generated samples to disk

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, info, warn};

/// Errors writing a generated sample
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("No downloads folder is known for this platform")]
    UnsupportedPlatform,

    #[error("Download path does not exist: {}", .0.display())]
    DirectoryMissing(PathBuf),

    #[error("Cannot write empty content to file")]
    EmptyContent,

    #[error("Failed to write file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The current user's downloads folder
pub fn default_output_dir() -> Result<PathBuf, OutputError> {
    let path = dirs::download_dir().ok_or(OutputError::UnsupportedPlatform)?;

    if !path.exists() {
        warn!("Downloads folder does not exist: {}", path.display());
        return Err(OutputError::DirectoryMissing(path));
    }

    info!("Using downloads folder: {}", path.display());
    Ok(path)
}

/// File name for a sample generated at `unix_secs`
pub fn sample_file_name(unix_secs: i64) -> String {
    format!("sample_{}.json", unix_secs)
}

/// Write `contents` to `sample_<unix-seconds>.json` inside `dir`
pub fn write_sample(dir: &Path, contents: &str) -> Result<PathBuf, OutputError> {
    if contents.is_empty() {
        return Err(OutputError::EmptyContent);
    }

    if !dir.exists() {
        return Err(OutputError::DirectoryMissing(dir.to_path_buf()));
    }

    let path = dir.join(sample_file_name(chrono::Utc::now().timestamp()));
    info!("Writing data to file: {}", path.display());

    fs::write(&path, contents).map_err(|source| {
        error!("Error writing to file {}: {}", path.display(), source);
        OutputError::Io {
            path: path.clone(),
            source,
        }
    })?;

    info!("Successfully wrote data to {}", path.display());
    Ok(path)
}

/// Write `contents` into the default downloads folder
pub fn write_sample_to_downloads(contents: &str) -> Result<PathBuf, OutputError> {
    let dir = default_output_dir()?;
    write_sample(&dir, contents)
}
