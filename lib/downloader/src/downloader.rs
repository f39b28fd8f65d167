use crate::{DownloadError, Result};
use futures::StreamExt;
use std::{
    ffi::OsString,
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

/// Streams `url` into `save_path` through a sibling `.tmp` file so a failed
/// transfer never leaves a truncated file at `save_path`.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Downloader {
    url: String,
    save_path: PathBuf,
    timeout: Duration,
}

impl Downloader {
    pub fn new(url: impl Into<String>, save_path: impl Into<PathBuf>) -> Downloader {
        Downloader {
            url: url.into(),
            save_path: save_path.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.save_path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// `progress_cb` receives the bytes written so far and the total size
    /// when the server reports one. A body shorter than the announced
    /// `Content-Length` is `IncompleteDownload`.
    pub async fn start(&self, progress_cb: impl FnMut(u64, Option<u64>)) -> Result<()> {
        let tmp_filepath = self.tmp_path();

        let result = match self.fetch_into(&tmp_filepath, progress_cb).await {
            Ok(()) => fs::rename(&tmp_filepath, &self.save_path).map_err(DownloadError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                log::debug!("saved {} to {}", self.url, self.save_path.display());
                Ok(())
            }
            Err(e) => {
                _ = fs::remove_file(&tmp_filepath);
                Err(e)
            }
        }
    }

    async fn fetch_into(
        &self,
        tmp_filepath: &Path,
        mut progress_cb: impl FnMut(u64, Option<u64>),
    ) -> Result<()> {
        let mut save_file =
            fs::File::create(tmp_filepath).map_err(|e| DownloadError::FileCreateError {
                error: e,
                path: tmp_filepath.display().to_string(),
            })?;

        let response = crate::client(self.timeout)?
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| DownloadError::RequestError {
                error: e,
                url: self.url.clone(),
            })?;

        let total_size = response.content_length();
        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                // The connection dropped before the announced length arrived
                Err(e) if total_size.is_some_and(|total| downloaded < total) => {
                    log::debug!("download of {} broke off: {e}", self.url);
                    break;
                }
                Err(e) => {
                    return Err(DownloadError::RequestError {
                        error: e,
                        url: self.url.clone(),
                    });
                }
            };
            save_file.write_all(&chunk)?;

            downloaded += chunk.len() as u64;
            progress_cb(downloaded, total_size);
        }
        save_file.flush()?;

        match total_size {
            Some(total) if total != downloaded => {
                log::warn!("download of {} stopped at {downloaded}/{total} bytes", self.url);
                Err(DownloadError::IncompleteDownload { downloaded, total })
            }
            _ => Ok(()),
        }
    }
}
