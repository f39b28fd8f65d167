//! Makes sure a sample image is available, fetching one when the cache is empty.

use downloader::{DownloadError, Downloader, SearchPage};
use image_effect::Frame;
use log::{debug, info, trace, warn};
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("image {path} could not be decoded: {source}")]
    ImageNotFound {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("network error: {0}")]
    Network(#[source] DownloadError),

    #[error("page structure mismatch: {0}")]
    PageStructureMismatch(String),

    #[error("downloaded file {path} is unusable: {reason}")]
    DownloadFailed { path: PathBuf, reason: String },
}

impl From<DownloadError> for SourceError {
    fn from(e: DownloadError) -> Self {
        match e {
            DownloadError::PageStructureMismatch(msg) => SourceError::PageStructureMismatch(msg),
            other => SourceError::Network(other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub path: PathBuf,
    pub keyword: String,
    pub search: SearchPage,
    pub timeout: Duration,
}

/// The decoded image plus whether this run created the file behind it.
#[derive(Debug)]
pub struct Resolved {
    pub frame: Frame,
    pub path: PathBuf,
    pub downloaded: bool,
}

impl Resolved {
    /// Remove the cached file, but only when this run downloaded it.
    pub fn cleanup(self) -> io::Result<()> {
        if self.downloaded {
            fs::remove_file(&self.path)?;
            info!("Deleted the downloaded image file.");
        }
        Ok(())
    }
}

pub fn load(path: &Path) -> Result<Frame, SourceError> {
    Frame::open(path).map_err(|e| SourceError::ImageNotFound {
        path: path.to_path_buf(),
        source: e,
    })
}

pub async fn resolve(config: &SourceConfig) -> Result<Resolved, SourceError> {
    match load(&config.path) {
        Ok(frame) => {
            debug!("using cached image {}", config.path.display());
            return Ok(Resolved {
                frame,
                path: config.path.clone(),
                downloaded: false,
            });
        }
        Err(e) => {
            warn!("The image didn't exist!");
            debug!("{e}");
        }
    }

    let url = config.search.find_image_url(&config.keyword).await?;
    info!("Download picture from: {url}");

    Downloader::new(url, &config.path)
        .with_timeout(config.timeout)
        .start(|downloaded, total| match total {
            Some(total) => trace!("downloaded {downloaded}/{total} bytes"),
            None => trace!("downloaded {downloaded} bytes"),
        })
        .await
        .map_err(|e| match e {
            DownloadError::IncompleteDownload { downloaded, total } => SourceError::DownloadFailed {
                path: config.path.clone(),
                reason: format!("transfer ended at {downloaded}/{total} bytes"),
            },
            other => SourceError::from(other),
        })?;

    match Frame::open(&config.path) {
        Ok(frame) => Ok(Resolved {
            frame,
            path: config.path.clone(),
            downloaded: true,
        }),
        Err(e) => {
            _ = fs::remove_file(&config.path);
            Err(SourceError::DownloadFailed {
                path: config.path.clone(),
                reason: e.to_string(),
            })
        }
    }
}
